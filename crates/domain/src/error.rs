//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into the
//! workspace error via `#[from]` — no `String`-only variants.

/// Top-level workspace error.
#[derive(Debug, thiserror::Error)]
pub enum GrowCtlError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The device actuator failed.
    #[error("actuator error")]
    Actuator(#[from] ActuatorError),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A rule was built with an empty name.
    #[error("rule name must not be empty")]
    EmptyName,

    /// A rule with the same name is already registered.
    #[error("rule `{0}` is already registered")]
    DuplicateRule(String),

    /// A rule was built without a condition.
    #[error("rule must have a condition")]
    NoCondition,

    /// A rule was built without an action.
    #[error("rule must have an action")]
    NoAction,
}

/// Failures reported by a device actuator backend.
#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    /// The hardware backend cannot be used on this build or host.
    #[error("hardware backend unavailable: {reason}")]
    Unavailable { reason: String },

    /// A GPIO operation failed.
    #[error("gpio operation failed on pin {pin}: {reason}")]
    Gpio { pin: u8, reason: String },
}
