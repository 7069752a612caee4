//! Default rule library — the canonical environmental control rules.
//!
//! Seven rules parameterized by [`Thresholds`]: four "on" rules for
//! temperature and humidity, a watering rule for soil moisture, and two
//! hysteresis "off" rules. The off rules only match while the device is
//! actually on and the reading has cleared the threshold by a margin, so
//! the system does not oscillate at the exact boundary.

use crate::device::Device;
use crate::sensor::{HUMIDITY, SOIL_MOISTURE, TEMPERATURE};
use crate::thresholds::Thresholds;

use super::{Action, Condition, TriggerRule};

/// Margin in °C above `temp_min` before the heater switches off.
pub const TEMPERATURE_HYSTERESIS: f64 = 2.0;

/// Margin in %RH above `humidity_min` before the humidifier switches off.
pub const HUMIDITY_HYSTERESIS: f64 = 5.0;

/// Build the default rule set for the given thresholds.
///
/// Registration order is the evaluation order; "on" rules come before
/// their "off" counterparts.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn default_rules(thresholds: &Thresholds) -> Vec<TriggerRule> {
    let rules = vec![
        TriggerRule::builder()
            .name("low_temperature_heating")
            .condition(Condition::SensorBelow {
                sensor: TEMPERATURE.to_string(),
                threshold: thresholds.temp_min,
            })
            .action(Action::Activate {
                device: Device::Heater,
                on: true,
            })
            .cooldown_seconds(300)
            .description(format!(
                "turn on heater when temperature < {} °C",
                thresholds.temp_min
            ))
            .build(),
        TriggerRule::builder()
            .name("high_temperature_cooling")
            .condition(Condition::SensorAbove {
                sensor: TEMPERATURE.to_string(),
                threshold: thresholds.temp_max,
            })
            .action(Action::Activate {
                device: Device::Fan,
                on: true,
            })
            .cooldown_seconds(300)
            .description(format!(
                "turn on fan when temperature > {} °C",
                thresholds.temp_max
            ))
            .build(),
        TriggerRule::builder()
            .name("low_humidity_humidifier")
            .condition(Condition::SensorBelow {
                sensor: HUMIDITY.to_string(),
                threshold: thresholds.humidity_min,
            })
            .action(Action::Activate {
                device: Device::Humidifier,
                on: true,
            })
            // Humidifiers take longer to show effect, so re-fire less often.
            .cooldown_seconds(600)
            .description(format!(
                "turn on humidifier when humidity < {} %",
                thresholds.humidity_min
            ))
            .build(),
        TriggerRule::builder()
            .name("high_humidity_ventilation")
            .condition(Condition::SensorAbove {
                sensor: HUMIDITY.to_string(),
                threshold: thresholds.humidity_max,
            })
            .action(Action::Activate {
                device: Device::Fan,
                on: true,
            })
            .cooldown_seconds(300)
            .description(format!(
                "turn on fan when humidity > {} %",
                thresholds.humidity_max
            ))
            .build(),
        TriggerRule::builder()
            .name("low_soil_moisture_watering")
            .condition(Condition::SensorBelow {
                sensor: SOIL_MOISTURE.to_string(),
                threshold: thresholds.soil_moisture_min,
            })
            .action(Action::Pulse {
                device: Device::WaterPump,
                seconds: thresholds.watering_seconds,
            })
            // Watering is the most disruptive action and the slowest to
            // show up in the readings.
            .cooldown_seconds(3600)
            .description(format!(
                "water plants when soil moisture < {} %",
                thresholds.soil_moisture_min
            ))
            .build(),
        TriggerRule::builder()
            .name("temperature_normal_heater_off")
            .condition(Condition::AllOf {
                conditions: vec![
                    Condition::SensorAbove {
                        sensor: TEMPERATURE.to_string(),
                        threshold: thresholds.temp_min + TEMPERATURE_HYSTERESIS,
                    },
                    Condition::DeviceOn {
                        device: Device::Heater,
                    },
                ],
            })
            .action(Action::Activate {
                device: Device::Heater,
                on: false,
            })
            .cooldown_seconds(60)
            .description("turn off heater when temperature is back to normal")
            .build(),
        TriggerRule::builder()
            .name("humidity_normal_humidifier_off")
            .condition(Condition::AllOf {
                conditions: vec![
                    Condition::SensorAbove {
                        sensor: HUMIDITY.to_string(),
                        threshold: thresholds.humidity_min + HUMIDITY_HYSTERESIS,
                    },
                    Condition::DeviceOn {
                        device: Device::Humidifier,
                    },
                ],
            })
            .action(Action::Activate {
                device: Device::Humidifier,
                on: false,
            })
            .cooldown_seconds(60)
            .description("turn off humidifier when humidity is back to normal")
            .build(),
    ];

    // All inputs are static and non-empty, so building cannot fail.
    rules.into_iter().collect::<Result<Vec<_>, _>>().unwrap_or_default()
}
