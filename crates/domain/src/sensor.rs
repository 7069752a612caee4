//! Sensor snapshot — one point-in-time reading of all sensors.
//!
//! Snapshots may be partial: a sensor that failed to read simply leaves
//! its key absent. Rule conditions must tolerate absence (a missing
//! reading never triggers and never errors).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Conventional reading name for air temperature in °C.
pub const TEMPERATURE: &str = "temperature";
/// Conventional reading name for relative humidity in %.
pub const HUMIDITY: &str = "humidity";
/// Conventional reading name for soil moisture in %.
pub const SOIL_MOISTURE: &str = "soil_moisture";
/// Conventional reading name for CO₂ concentration in ppm.
pub const CO2: &str = "co2";

/// A point-in-time map of sensor readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorSnapshot {
    readings: BTreeMap<String, f64>,
}

impl SensorSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a reading.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.readings.insert(name.into(), value);
        self
    }

    /// Insert or replace a reading.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.readings.insert(name.into(), value);
    }

    /// Look up a reading by name.
    #[must_use]
    pub fn reading(&self, name: &str) -> Option<f64> {
        self.readings.get(name).copied()
    }

    /// Number of readings present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the snapshot carries no readings at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl From<BTreeMap<String, f64>> for SensorSnapshot {
    fn from(readings: BTreeMap<String, f64>) -> Self {
        Self { readings }
    }
}

impl FromIterator<(String, f64)> for SensorSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            readings: iter.into_iter().collect(),
        }
    }
}
