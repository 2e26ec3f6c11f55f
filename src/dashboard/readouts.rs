//! Text Readouts
//!
//! The six live values shown above the charts.

use crate::api::SensorSnapshot;

/// Shown before the first snapshot arrives and for fields the server omits
pub const PLACEHOLDER: &str = "--";

/// Identifies one readout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadoutId {
    Temperature,
    Humidity,
    Rainfall,
    TankLevel,
    HvacLoad,
    Decision,
}

impl ReadoutId {
    pub const ALL: [ReadoutId; 6] = [
        ReadoutId::Temperature,
        ReadoutId::Humidity,
        ReadoutId::Rainfall,
        ReadoutId::TankLevel,
        ReadoutId::HvacLoad,
        ReadoutId::Decision,
    ];

    /// Stable element identifier
    pub fn element_id(&self) -> &'static str {
        match self {
            ReadoutId::Temperature => "temperature",
            ReadoutId::Humidity => "humidity",
            ReadoutId::Rainfall => "rainfall",
            ReadoutId::TankLevel => "tankLevel",
            ReadoutId::HvacLoad => "hvacLoad",
            ReadoutId::Decision => "decision",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReadoutId::Temperature => "Temperature",
            ReadoutId::Humidity => "Humidity",
            ReadoutId::Rainfall => "Rainfall",
            ReadoutId::TankLevel => "Tank Level",
            ReadoutId::HvacLoad => "HVAC Load",
            ReadoutId::Decision => "System Decision",
        }
    }
}

/// Current text of every readout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readouts {
    pub temperature: String,
    pub humidity: String,
    pub rainfall: String,
    pub tank_level: String,
    pub hvac_load: String,
    pub decision: String,
}

impl Default for Readouts {
    fn default() -> Self {
        Self {
            temperature: PLACEHOLDER.to_string(),
            humidity: PLACEHOLDER.to_string(),
            rainfall: PLACEHOLDER.to_string(),
            tank_level: PLACEHOLDER.to_string(),
            hvac_load: PLACEHOLDER.to_string(),
            decision: PLACEHOLDER.to_string(),
        }
    }
}

impl Readouts {
    pub fn get(&self, id: ReadoutId) -> &str {
        match id {
            ReadoutId::Temperature => &self.temperature,
            ReadoutId::Humidity => &self.humidity,
            ReadoutId::Rainfall => &self.rainfall,
            ReadoutId::TankLevel => &self.tank_level,
            ReadoutId::HvacLoad => &self.hvac_load,
            ReadoutId::Decision => &self.decision,
        }
    }

    /// Overwrite all six readouts from a snapshot
    pub fn apply(&mut self, snapshot: &SensorSnapshot) {
        self.temperature = format!("{} °C", snapshot.temperature);
        self.humidity = format!("{} %", snapshot.humidity);
        self.rainfall = if snapshot.rainfall { "Yes" } else { "No" }.to_string();
        self.tank_level = format!("{} %", snapshot.tank_level);
        self.hvac_load = snapshot
            .hvac_load
            .map(|load| format!("{} %", load))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        self.set_decision(snapshot.system_decision.as_deref());
    }

    pub fn set_decision(&mut self, decision: Option<&str>) {
        self.decision = decision.unwrap_or(PLACEHOLDER).to_string();
    }
}
