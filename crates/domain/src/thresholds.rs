//! Thresholds — configuration-supplied environmental limits.
//!
//! The defaults match a temperate grow tent: 18–28 °C, 40–60 %RH,
//! soil moisture floor at 30 %, CO₂ band 400–1200 ppm.

use serde::{Deserialize, Serialize};

/// Environmental limits that parameterize the default rule library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum air temperature in °C before heating kicks in.
    pub temp_min: f64,
    /// Maximum air temperature in °C before cooling kicks in.
    pub temp_max: f64,
    /// Minimum relative humidity in % before the humidifier kicks in.
    pub humidity_min: f64,
    /// Maximum relative humidity in % before ventilation kicks in.
    pub humidity_max: f64,
    /// Minimum soil moisture in % before watering starts.
    pub soil_moisture_min: f64,
    /// Maximum soil moisture in %.
    pub soil_moisture_max: f64,
    /// Minimum CO₂ concentration in ppm.
    pub co2_min: f64,
    /// Maximum CO₂ concentration in ppm.
    pub co2_max: f64,
    /// Duration of one watering pulse in seconds.
    pub watering_seconds: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_min: 18.0,
            temp_max: 28.0,
            humidity_min: 40.0,
            humidity_max: 60.0,
            soil_moisture_min: 30.0,
            soil_moisture_max: 80.0,
            co2_min: 400.0,
            co2_max: 1200.0,
            watering_seconds: 30,
        }
    }
}
