//! Device — a controllable actuator in the grow environment.
//!
//! The set of devices is closed: every device the engine can drive is a
//! variant here, so an "unknown device" can only appear at the string
//! boundary (API callers addressing devices by name) and is rejected
//! during parsing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A physical (or simulated) device wired to a relay channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    Heater,
    Fan,
    Humidifier,
    WaterPump,
}

impl Device {
    /// Every known device, in emergency-stop order.
    pub const ALL: [Self; 4] = [Self::Heater, Self::Fan, Self::Humidifier, Self::WaterPump];

    /// Canonical snake_case name, matching serde and config keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heater => "heater",
            Self::Fan => "fan",
            Self::Humidifier => "humidifier",
            Self::WaterPump => "water_pump",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a device name does not match any known device.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown device `{0}`")]
pub struct UnknownDeviceError(pub String);

impl FromStr for Device {
    type Err = UnknownDeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heater" => Ok(Self::Heater),
            "fan" => Ok(Self::Fan),
            "humidifier" => Ok(Self::Humidifier),
            "water_pump" => Ok(Self::WaterPump),
            other => Err(UnknownDeviceError(other.to_string())),
        }
    }
}

/// ON/OFF state per device.
///
/// Only the engine's actuation path writes this map; rule conditions and
/// status queries read it.
pub type DeviceStates = BTreeMap<Device, bool>;

/// Read a device state, treating absent entries as OFF.
#[must_use]
pub fn is_on(states: &DeviceStates, device: Device) -> bool {
    states.get(&device).copied().unwrap_or(false)
}
