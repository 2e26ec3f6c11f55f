//! Chart Series
//!
//! Rolling time series behind the three dashboard charts.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// Default number of points kept per chart (10 minutes at one point every 5s)
pub const DEFAULT_HISTORY_CAPACITY: usize = 120;

/// The three charted metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Temperature,
    Humidity,
    TankLevel,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Temperature, ChartKind::Humidity, ChartKind::TankLevel];

    /// Static presentation settings for this chart
    pub fn spec(&self) -> ChartSpec {
        match self {
            ChartKind::Temperature => ChartSpec {
                element_id: "temperatureChart",
                label: "Temperature (°C)",
                color: "#00ffee",
                responsive: true,
                maintain_aspect_ratio: false,
            },
            ChartKind::Humidity => ChartSpec {
                element_id: "humidityChart",
                label: "Humidity (%)",
                color: "#A100FF",
                responsive: true,
                maintain_aspect_ratio: false,
            },
            ChartKind::TankLevel => ChartSpec {
                element_id: "tankLevelChart",
                label: "Tank Level (%)",
                color: "#39FF14",
                responsive: true,
                maintain_aspect_ratio: false,
            },
        }
    }

    fn index(&self) -> usize {
        match self {
            ChartKind::Temperature => 0,
            ChartKind::Humidity => 1,
            ChartKind::TankLevel => 2,
        }
    }
}

/// Label, stroke colour and sizing behaviour of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    /// Stable identifier of the chart's mount point
    pub element_id: &'static str,
    pub label: &'static str,
    /// Stroke colour as `#rrggbb`
    pub color: &'static str,
    /// Resize with the surrounding surface
    pub responsive: bool,
    /// Keep a fixed width/height ratio while resizing
    pub maintain_aspect_ratio: bool,
}

/// A single charted reading
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub timestamp: DateTime<Local>,
    /// Display form of `timestamp`
    pub label: String,
    pub value: f64,
}

/// Bounded, insertion-ordered series; the oldest point is evicted when full
#[derive(Debug, Clone)]
pub struct ChartSeries {
    kind: ChartKind,
    points: VecDeque<ChartPoint>,
    capacity: usize,
    evicted: u64,
}

impl ChartSeries {
    pub fn new(kind: ChartKind, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            kind,
            points: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn spec(&self) -> ChartSpec {
        self.kind.spec()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points dropped to stay within capacity
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Append a point, evicting the oldest one when at capacity
    pub fn push(&mut self, point: ChartPoint) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
            self.evicted += 1;
        }
        self.points.push_back(point);
    }

    pub fn points(&self) -> impl Iterator<Item = &ChartPoint> + '_ {
        self.points.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn latest(&self) -> Option<&ChartPoint> {
        self.points.back()
    }

    /// Minimum and maximum value, `None` when empty
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.values().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// The three chart series, addressable by [`ChartKind`]
#[derive(Debug, Clone)]
pub struct Charts {
    series: [ChartSeries; 3],
}

impl Charts {
    pub fn new(capacity: usize) -> Self {
        Self {
            series: ChartKind::ALL.map(|kind| ChartSeries::new(kind, capacity)),
        }
    }

    pub fn get(&self, kind: ChartKind) -> &ChartSeries {
        &self.series[kind.index()]
    }

    pub fn get_mut(&mut self, kind: ChartKind) -> &mut ChartSeries {
        &mut self.series[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartSeries> + '_ {
        self.series.iter()
    }
}
