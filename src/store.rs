//! ==============================================================================
//! store.rs - in-memory sensor state
//! ==============================================================================
//!
//! purpose:
//!     holds the current temperature/humidity of every roster sensor between
//!     requests, which is what makes the readings drift instead of jump.
//!
//! relationships:
//!     - uses: domain.rs (roster, baselines, clamp ranges)
//!     - used by: generator.rs (read-modify-write), server.rs (owns it)
//!
//! ==============================================================================

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{SensorDescriptor, DEFAULT_HUMIDITY, DEFAULT_TEMPERATURE};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("sensor {0} not found in state store")]
    NotFound(String),
    #[error("sensor {0} appears more than once in the roster")]
    DuplicateSensor(String),
    #[error("baseline {field} {value} for sensor {sensor_id} is outside its clamp range")]
    BaselineOutOfRange {
        sensor_id: String,
        field: &'static str,
        value: f64,
    },
}

/// current values of one sensor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorState {
    pub temperature: f64,
    pub humidity: f64,
}

#[derive(Debug, Default)]
pub struct StateStore {
    sensors: HashMap<String, SensorState>,
}

fn baseline(table: &[(&str, f64)], sensor_id: &str, default: f64) -> f64 {
    table
        .iter()
        .find(|(id, _)| *id == sensor_id)
        .map(|(_, value)| *value)
        .unwrap_or(default)
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// build a store that is already initialized
    pub fn with_roster(
        roster: &[SensorDescriptor],
        temperatures: &[(&str, f64)],
        humidities: &[(&str, f64)],
    ) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.initialize(roster, temperatures, humidities)?;
        Ok(store)
    }

    /// reset every roster sensor to its baseline, dropping any prior drift.
    /// on error the store is left untouched.
    pub fn initialize(
        &mut self,
        roster: &[SensorDescriptor],
        temperatures: &[(&str, f64)],
        humidities: &[(&str, f64)],
    ) -> Result<(), StoreError> {
        let mut sensors = HashMap::with_capacity(roster.len());

        for descriptor in roster {
            let state = SensorState {
                temperature: baseline(temperatures, descriptor.id, DEFAULT_TEMPERATURE),
                humidity: baseline(humidities, descriptor.id, DEFAULT_HUMIDITY),
            };

            let range = descriptor.class.clamp_range();
            if !range.temperature.contains(state.temperature) {
                return Err(StoreError::BaselineOutOfRange {
                    sensor_id: descriptor.id.to_string(),
                    field: "temperature",
                    value: state.temperature,
                });
            }
            if !range.humidity.contains(state.humidity) {
                return Err(StoreError::BaselineOutOfRange {
                    sensor_id: descriptor.id.to_string(),
                    field: "humidity",
                    value: state.humidity,
                });
            }

            if sensors.insert(descriptor.id.to_string(), state).is_some() {
                return Err(StoreError::DuplicateSensor(descriptor.id.to_string()));
            }
        }

        self.sensors = sensors;
        Ok(())
    }

    pub fn get(&self, sensor_id: &str) -> Result<SensorState, StoreError> {
        self.sensors
            .get(sensor_id)
            .copied()
            .ok_or_else(|| StoreError::NotFound(sensor_id.to_string()))
    }

    /// overwrite a known sensor. unknown ids are rejected so the id set
    /// always matches the roster.
    pub fn set(&mut self, sensor_id: &str, temperature: f64, humidity: f64) -> Result<(), StoreError> {
        let state = self
            .sensors
            .get_mut(sensor_id)
            .ok_or_else(|| StoreError::NotFound(sensor_id.to_string()))?;
        state.temperature = temperature;
        state.humidity = humidity;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }
}
