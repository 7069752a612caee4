//! Deterministic synthetic sensor source.
//!
//! Generates slowly drifting readings around plausible grow-room
//! midpoints. The drift is a pure function of the cycle counter, so two
//! sources started together produce identical sequences and soak runs
//! are reproducible.

use growctl_domain::sensor::{CO2, HUMIDITY, SOIL_MOISTURE, SensorSnapshot, TEMPERATURE};

/// Synthetic snapshot generator for demo and soak runs.
#[derive(Debug, Default, Clone)]
pub struct SimulatedSensorSource {
    cycle: u64,
}

impl SimulatedSensorSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next snapshot in the sequence.
    ///
    /// Each reading oscillates around its midpoint with a different
    /// period, so the rule set sees every combination of high and low
    /// conditions over a long enough run. Soil moisture drifts downward
    /// between refills to periodically exercise the watering rule.
    pub fn next_snapshot(&mut self) -> SensorSnapshot {
        #[allow(clippy::cast_precision_loss)]
        let t = self.cycle as f64;
        self.cycle = self.cycle.wrapping_add(1);

        let temperature = 23.0 + 7.0 * (t / 19.0).sin();
        let humidity = 60.0 + 25.0 * (t / 31.0).sin();
        // Sawtooth between 75 and 25, draining 2 points per cycle.
        let soil_moisture = 75.0 - (t * 2.0) % 50.0;
        let co2 = 800.0 + 500.0 * (t / 43.0).sin();

        SensorSnapshot::new()
            .with(TEMPERATURE, round1(temperature))
            .with(HUMIDITY, round1(humidity))
            .with(SOIL_MOISTURE, round1(soil_moisture))
            .with(CO2, round1(co2))
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
