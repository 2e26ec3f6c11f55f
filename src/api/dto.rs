//! Data Transfer Objects
//!
//! Request and response bodies exchanged with the sensor server.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================
// Sensor snapshot
// ============================================

/// Latest readings returned by `GET /api/sensor-data`
///
/// Server versions differ in which fields they send, so everything that is
/// not charted is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Air temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Whether it is raining (accepts any truthy/falsy JSON value)
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub rainfall: bool,
    /// Rainwater tank fill level in %
    pub tank_level: f64,
    /// HVAC load in %
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hvac_load: Option<f64>,
    /// Decision label computed (or overridden) on the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_decision: Option<String>,
    /// Hour of day the server sampled at
    #[serde(default, rename = "time", skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

/// JavaScript truthiness: `false`, `0`, `NaN`, `""` and `null` are falsy.
fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

pub(crate) fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================
// Override
// ============================================

/// Response of `GET /api/override`
///
/// `new_decision` is `null` when the override was cleared.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OverrideResponse {
    #[serde(default)]
    pub new_decision: Option<String>,
}

// ============================================
// Thresholds
// ============================================

/// Body of `POST /api/set-thresholds`
///
/// Values are forwarded exactly as typed; the server does the parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRequest {
    pub humidity: String,
    pub temperature: String,
}

impl ThresholdRequest {
    pub fn new(humidity: impl Into<String>, temperature: impl Into<String>) -> Self {
        Self {
            humidity: humidity.into(),
            temperature: temperature.into(),
        }
    }
}

// ============================================
// Savings and link status
// ============================================

/// Response of `GET /api/savings`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SavingsEstimate {
    pub energy_savings_kwh: f64,
    pub water_savings_liters: f64,
    /// Percentage string, e.g. `"15.0%"`
    pub efficiency_gain: String,
}

/// Response of `GET /api/mqtt-status`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkStatus {
    pub status: String,
}

impl LinkStatus {
    pub fn is_connected(&self) -> bool {
        self.status.eq_ignore_ascii_case("connected")
    }
}
