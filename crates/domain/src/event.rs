//! Trigger event — an immutable record of one rule firing.
//!
//! Events are returned from each evaluation cycle and published on the
//! event bus; the host application persists them. A failed actuation
//! still produces an event, marked unsuccessful.

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::id::EventId;
use crate::rule::Action;
use crate::time::Timestamp;

/// Record of a single rule firing, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub id: EventId,
    /// Name of the rule that fired.
    pub rule: String,
    /// Device the rule's action drives.
    pub device: Device,
    /// Rendered action, e.g. `heater on` or `water_pump pulse 30s`.
    pub action: String,
    pub timestamp: Timestamp,
    pub success: bool,
    /// Present when `success` is false.
    pub error: Option<String>,
}

impl TriggerEvent {
    /// Record a successful firing.
    #[must_use]
    pub fn success(rule: impl Into<String>, action: &Action, timestamp: Timestamp) -> Self {
        Self {
            id: EventId::new(),
            rule: rule.into(),
            device: action.device(),
            action: action.to_string(),
            timestamp,
            success: true,
            error: None,
        }
    }

    /// Record a failed firing.
    #[must_use]
    pub fn failure(
        rule: impl Into<String>,
        action: &Action,
        timestamp: Timestamp,
        error: impl std::fmt::Display,
    ) -> Self {
        Self {
            id: EventId::new(),
            rule: rule.into(),
            device: action.device(),
            action: action.to_string(),
            timestamp,
            success: false,
            error: Some(error.to_string()),
        }
    }
}
