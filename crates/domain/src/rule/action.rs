//! Action — the actuation performed when a rule fires.

use serde::{Deserialize, Serialize};

use crate::device::Device;

/// An actuation to perform when a rule's condition matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Switch a device ON or OFF.
    Activate { device: Device, on: bool },
    /// Switch a device ON now and schedule it OFF after `seconds`.
    ///
    /// The OFF transition is a deadline resolved by the engine on a later
    /// evaluation cycle, never a blocking sleep, and an emergency stop
    /// cancels it.
    Pulse { device: Device, seconds: u64 },
}

impl Action {
    /// The device this action drives.
    #[must_use]
    pub fn device(&self) -> Device {
        match self {
            Self::Activate { device, .. } | Self::Pulse { device, .. } => *device,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Activate { device, on } => {
                write!(f, "{device} {}", if *on { "on" } else { "off" })
            }
            Self::Pulse { device, seconds } => write!(f, "{device} pulse {seconds}s"),
        }
    }
}
