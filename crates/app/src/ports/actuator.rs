//! Device actuator port — the single writer of physical device state.

use std::future::Future;

use growctl_domain::device::Device;
use growctl_domain::error::ActuatorError;

/// Backend that performs the physical (or simulated) device state change.
///
/// Exactly one actuator is selected at engine construction; all rule
/// actions, manual overrides, and the emergency stop funnel through it.
pub trait DeviceActuator {
    /// Switch a device ON or OFF.
    ///
    /// On error the engine leaves its device-state table untouched: the
    /// actuator is the ground truth, so a failed write must not be
    /// recorded as a state change.
    fn activate(
        &mut self,
        device: Device,
        on: bool,
    ) -> impl Future<Output = Result<(), ActuatorError>> + Send;

    /// Release any hardware handles, parking every channel OFF.
    ///
    /// Called once during engine cleanup, after the emergency stop.
    fn teardown(&mut self) -> impl Future<Output = Result<(), ActuatorError>> + Send;

    /// Whether actuations are log-only (no hardware IO).
    fn is_simulated(&self) -> bool;
}
