//! ==============================================================================
//! generator.rs - random walk reading generator
//! ==============================================================================
//!
//! purpose:
//!     advances the simulated warehouse by one tick. every sensor drifts by a
//!     small uniform delta, is clamped to its class range, is written back to
//!     the store and reported as a rounded snapshot.
//!
//! relationships:
//!     - uses: store.rs (current values), domain.rs (roster, clamp ranges)
//!     - used by: server.rs (one pass per GET /latest-readings)
//!
//! the rng and the clock instant are passed in, so a seeded rng plus a fixed
//! timestamp makes a pass fully reproducible.
//!
//! ==============================================================================

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;

use crate::domain::{Reading, SensorDescriptor};
use crate::store::{StateStore, StoreError};

/// maximum temperature change per tick (celsius)
pub const TEMPERATURE_DRIFT: f64 = 0.5;
/// maximum humidity change per tick (percent)
pub const HUMIDITY_DRIFT: f64 = 2.0;

/// round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// iso-8601 utc with microseconds and a trailing "Z"
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// run one drift step over the roster and report the new values in roster order
pub fn generate<R: Rng>(
    roster: &[SensorDescriptor],
    store: &mut StateStore,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<Vec<Reading>, StoreError> {
    let timestamp = format_timestamp(now);
    let mut readings = Vec::with_capacity(roster.len());

    for sensor in roster {
        let current = store.get(sensor.id)?;

        let delta_t = rng.random_range(-TEMPERATURE_DRIFT..=TEMPERATURE_DRIFT);
        let delta_h = rng.random_range(-HUMIDITY_DRIFT..=HUMIDITY_DRIFT);

        let range = sensor.class.clamp_range();
        let temperature = range.temperature.clamp(current.temperature + delta_t);
        let humidity = range.humidity.clamp(current.humidity + delta_h);

        store.set(sensor.id, temperature, humidity)?;

        readings.push(Reading {
            sensor_id: sensor.id.to_string(),
            location: sensor.location.to_string(),
            timestamp: timestamp.clone(),
            temperature_celsius: round1(temperature),
            humidity_percent: round1(humidity),
        });
    }

    Ok(readings)
}
