//! Raspberry Pi GPIO relay backend.
//!
//! ## Responsibilities
//!
//! - Map each device to a BCM pin ([`PinConfig`]).
//! - Drive active-low relay channels: logical ON pulls the pin LOW,
//!   logical OFF parks it HIGH.
//! - Park every channel HIGH on teardown so relays never stay energized
//!   after the daemon exits.
//!
//! The real driver is gated behind the `hardware` feature so the crate
//! builds on development machines without the Pi peripheral bus. Without
//! the feature, [`RelayActuator::new`] reports the hardware as
//! unavailable and the host falls back to the simulation backend.

use serde::{Deserialize, Serialize};

use growctl_domain::device::Device;
use growctl_domain::error::ActuatorError;

/// BCM pin assignment for each relay channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    pub heater: u8,
    pub fan: u8,
    pub humidifier: u8,
    pub water_pump: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            heater: 22,
            fan: 27,
            humidifier: 17,
            water_pump: 23,
        }
    }
}

impl PinConfig {
    /// The BCM pin wired to the given device's relay channel.
    #[must_use]
    pub fn pin_for(&self, device: Device) -> u8 {
        match device {
            Device::Heater => self.heater,
            Device::Fan => self.fan,
            Device::Humidifier => self.humidifier,
            Device::WaterPump => self.water_pump,
        }
    }

    /// Reject assignments that wire two devices to the same pin.
    ///
    /// # Errors
    ///
    /// Returns [`ActuatorError::Gpio`] naming the shared pin.
    pub fn validate(&self) -> Result<(), ActuatorError> {
        let mut seen = std::collections::BTreeMap::new();
        for device in Device::ALL {
            let pin = self.pin_for(device);
            if let Some(other) = seen.insert(pin, device) {
                return Err(ActuatorError::Gpio {
                    pin,
                    reason: format!("pin shared by {other} and {device}"),
                });
            }
        }
        Ok(())
    }
}

/// Level to drive for a logical state on an active-low relay channel:
/// `true` means pull the pin LOW.
#[must_use]
pub const fn drives_low(on: bool) -> bool {
    on
}

#[cfg(feature = "hardware")]
mod driver {
    use std::collections::BTreeMap;
    use std::future::Future;

    use rppal::gpio::{Gpio, OutputPin};

    use growctl_app::ports::DeviceActuator;
    use growctl_domain::device::Device;
    use growctl_domain::error::ActuatorError;

    use super::{PinConfig, drives_low};

    /// Relay board driver over the Pi GPIO character device.
    pub struct RelayActuator {
        pins: BTreeMap<Device, OutputPin>,
    }

    impl RelayActuator {
        /// Claim all four relay pins and park them HIGH (everything OFF).
        ///
        /// # Errors
        ///
        /// Returns [`ActuatorError::Unavailable`] when the GPIO bus
        /// cannot be opened and [`ActuatorError::Gpio`] when a pin
        /// cannot be claimed.
        pub fn new(config: &PinConfig) -> Result<Self, ActuatorError> {
            config.validate()?;
            let gpio = Gpio::new().map_err(|err| ActuatorError::Unavailable {
                reason: err.to_string(),
            })?;

            let mut pins = BTreeMap::new();
            for device in Device::ALL {
                let number = config.pin_for(device);
                let mut pin = gpio
                    .get(number)
                    .map_err(|err| ActuatorError::Gpio {
                        pin: number,
                        reason: err.to_string(),
                    })?
                    .into_output_high();
                // Keep the parked-HIGH level across process exit.
                pin.set_reset_on_drop(false);
                pins.insert(device, pin);
            }
            tracing::info!("relay board initialized, all channels parked OFF");
            Ok(Self { pins })
        }
    }

    impl DeviceActuator for RelayActuator {
        fn activate(
            &mut self,
            device: Device,
            on: bool,
        ) -> impl Future<Output = Result<(), ActuatorError>> + Send {
            if let Some(pin) = self.pins.get_mut(&device) {
                if drives_low(on) {
                    pin.set_low();
                } else {
                    pin.set_high();
                }
            }
            tracing::debug!(device = %device, on, "relay channel switched");
            async { Ok(()) }
        }

        fn teardown(&mut self) -> impl Future<Output = Result<(), ActuatorError>> + Send {
            for pin in self.pins.values_mut() {
                pin.set_high();
            }
            tracing::info!("relay channels parked OFF");
            async { Ok(()) }
        }

        fn is_simulated(&self) -> bool {
            false
        }
    }
}

#[cfg(not(feature = "hardware"))]
mod driver {
    use std::future::Future;

    use growctl_app::ports::DeviceActuator;
    use growctl_domain::device::Device;
    use growctl_domain::error::ActuatorError;

    use super::PinConfig;

    /// Placeholder driver for builds without the `hardware` feature.
    /// Construction always fails, steering the host to the simulation
    /// backend.
    #[derive(Debug)]
    pub struct RelayActuator {
        _private: (),
    }

    impl RelayActuator {
        /// # Errors
        ///
        /// Always returns [`ActuatorError::Unavailable`].
        pub fn new(config: &PinConfig) -> Result<Self, ActuatorError> {
            config.validate()?;
            Err(ActuatorError::Unavailable {
                reason: "built without the hardware feature".to_string(),
            })
        }
    }

    impl DeviceActuator for RelayActuator {
        fn activate(
            &mut self,
            _device: Device,
            _on: bool,
        ) -> impl Future<Output = Result<(), ActuatorError>> + Send {
            async {
                Err(ActuatorError::Unavailable {
                    reason: "built without the hardware feature".to_string(),
                })
            }
        }

        fn teardown(&mut self) -> impl Future<Output = Result<(), ActuatorError>> + Send {
            async { Ok(()) }
        }

        fn is_simulated(&self) -> bool {
            false
        }
    }
}

pub use driver::RelayActuator;
