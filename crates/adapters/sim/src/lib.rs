//! Simulation backend.
//!
//! ## Responsibilities
//!
//! - Log-only [`SimulatedActuator`] implementing the actuator port, so
//!   the full engine runs on machines without relay hardware.
//! - [`SimulatedSensorSource`](sensors::SimulatedSensorSource), a
//!   deterministic synthetic snapshot generator for demos and soak runs.
//!
//! This is also the fallback backend when hardware initialization fails.

use std::future::Future;

use growctl_app::ports::DeviceActuator;
use growctl_domain::device::Device;
use growctl_domain::error::ActuatorError;

pub mod sensors;

/// Actuator that records requested transitions in the log and does
/// nothing else. Every operation succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedActuator;

impl SimulatedActuator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DeviceActuator for SimulatedActuator {
    fn activate(
        &mut self,
        device: Device,
        on: bool,
    ) -> impl Future<Output = Result<(), ActuatorError>> + Send {
        let state = if on { "ON" } else { "OFF" };
        tracing::info!(
            device = %device,
            state,
            "SIMULATION: {} -> {state}",
            device.as_str().to_uppercase(),
        );
        async { Ok(()) }
    }

    fn teardown(&mut self) -> impl Future<Output = Result<(), ActuatorError>> + Send {
        tracing::info!("SIMULATION: teardown");
        async { Ok(()) }
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
