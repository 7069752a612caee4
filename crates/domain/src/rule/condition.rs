//! Condition — a pure predicate over a sensor snapshot and device states.

use serde::{Deserialize, Serialize};

use crate::device::{self, Device, DeviceStates};
use crate::sensor::SensorSnapshot;

/// A predicate that decides whether a rule should fire.
///
/// Conditions are pure: they read the snapshot and the current device
/// states and produce a boolean, with no side effects. A reading that is
/// absent from the snapshot makes any threshold comparison evaluate to
/// `false` — partial snapshots never trigger and never error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// The named reading is present and strictly below the threshold.
    SensorBelow { sensor: String, threshold: f64 },
    /// The named reading is present and strictly above the threshold.
    SensorAbove { sensor: String, threshold: f64 },
    /// The device is currently ON.
    DeviceOn { device: Device },
    /// The device is currently OFF (or never actuated).
    DeviceOff { device: Device },
    /// Every inner condition holds (logical AND). Empty means `true`.
    AllOf { conditions: Vec<Condition> },
}

impl Condition {
    /// Evaluate the predicate against a snapshot and the device states.
    #[must_use]
    pub fn evaluate(&self, snapshot: &SensorSnapshot, states: &DeviceStates) -> bool {
        match self {
            Self::SensorBelow { sensor, threshold } => snapshot
                .reading(sensor)
                .is_some_and(|value| value < *threshold),
            Self::SensorAbove { sensor, threshold } => snapshot
                .reading(sensor)
                .is_some_and(|value| value > *threshold),
            Self::DeviceOn { device } => device::is_on(states, *device),
            Self::DeviceOff { device } => !device::is_on(states, *device),
            Self::AllOf { conditions } => conditions
                .iter()
                .all(|condition| condition.evaluate(snapshot, states)),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SensorBelow { sensor, threshold } => {
                write!(f, "{sensor} < {threshold}")
            }
            Self::SensorAbove { sensor, threshold } => {
                write!(f, "{sensor} > {threshold}")
            }
            Self::DeviceOn { device } => write!(f, "{device} is on"),
            Self::DeviceOff { device } => write!(f, "{device} is off"),
            Self::AllOf { conditions } => {
                let rendered: Vec<String> = conditions.iter().map(ToString::to_string).collect();
                write!(f, "({})", rendered.join(" and "))
            }
        }
    }
}
