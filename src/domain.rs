//! ==============================================================================
//! domain.rs - sensor roster, clamp ranges and the reading payload
//! ==============================================================================
//!
//! purpose:
//!     static description of the simulated warehouse: which sensors exist,
//!     where they are, which class they belong to and where they start.
//!
//! relationships:
//!     - used by: store.rs (baseline validation), generator.rs (clamping),
//!       server.rs (json payload)
//!
//! ==============================================================================

use serde::{Deserialize, Serialize};

/// sensor class decides which clamp range applies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorClass {
    Freezer,
    Standard,
}

/// inclusive min/max bounds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// temperature and humidity bounds for one sensor class
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClampRange {
    pub temperature: Range,
    pub humidity: Range,
}

impl SensorClass {
    pub fn clamp_range(self) -> ClampRange {
        match self {
            SensorClass::Freezer => ClampRange {
                temperature: Range::new(-25.0, -10.0),
                humidity: Range::new(80.0, 100.0),
            },
            SensorClass::Standard => ClampRange {
                temperature: Range::new(15.0, 35.0),
                humidity: Range::new(30.0, 80.0),
            },
        }
    }
}

/// immutable description of one simulated sensor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorDescriptor {
    pub id: &'static str,
    pub location: &'static str,
    pub class: SensorClass,
}

/// the fixed warehouse roster, in reporting order
pub const ROSTER: [SensorDescriptor; 5] = [
    SensorDescriptor { id: "WH-TEMP-001", location: "Warehouse Zone A", class: SensorClass::Standard },
    SensorDescriptor { id: "WH-HUM-002", location: "Loading Dock", class: SensorClass::Standard },
    SensorDescriptor { id: "WH-FRZ-003", location: "Freezer Unit 1", class: SensorClass::Freezer },
    SensorDescriptor { id: "WH-DRY-004", location: "Dry Storage", class: SensorClass::Standard },
    SensorDescriptor { id: "WH-OFF-005", location: "Office Area", class: SensorClass::Standard },
];

/// starting temperature per sensor id (celsius)
pub const BASELINE_TEMPERATURES: &[(&str, f64)] = &[
    ("WH-TEMP-001", 22.0),
    ("WH-HUM-002", 28.0),
    ("WH-FRZ-003", -18.0),
    ("WH-DRY-004", 25.0),
    ("WH-OFF-005", 20.0),
];

/// starting relative humidity per sensor id (percent)
pub const BASELINE_HUMIDITIES: &[(&str, f64)] = &[
    ("WH-TEMP-001", 55.0),
    ("WH-HUM-002", 70.0),
    ("WH-FRZ-003", 90.0),
    ("WH-DRY-004", 40.0),
    ("WH-OFF-005", 50.0),
];

/// fallback baselines for sensors missing from the tables above
pub const DEFAULT_TEMPERATURE: f64 = 20.0;
pub const DEFAULT_HUMIDITY: f64 = 50.0;

/// one sensor snapshot as served by the api
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "sensorId")]
    pub sensor_id: String,
    pub location: String,
    /// iso-8601 utc, e.g. "2024-01-01T12:00:00.000000Z"
    pub timestamp: String,
    /// rounded to one decimal
    pub temperature_celsius: f64,
    /// rounded to one decimal
    pub humidity_percent: f64,
}
