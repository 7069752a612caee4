//! Trigger rule — condition → action with cooldown and enable state.
//!
//! A rule fires when its [`Condition`] matches a sensor snapshot, subject
//! to a per-rule cooldown that spaces out successive firings (debounce
//! against relay chatter). The engine owns all timing state: rules never
//! update their own `last_triggered`.

mod action;
mod condition;
mod defaults;

pub use action::Action;
pub use condition::Condition;
pub use defaults::{HUMIDITY_HYSTERESIS, TEMPERATURE_HYSTERESIS, default_rules};

use serde::{Deserialize, Serialize};

use crate::error::{GrowCtlError, ValidationError};
use crate::time::{Timestamp, seconds};

/// Default spacing between two firings of the same rule.
pub const DEFAULT_COOLDOWN_SECONDS: u64 = 300;

/// Spacing enforced after a failed action before the rule may retry.
///
/// The cooldown only starts on success, so without this gate a
/// persistently failing action would re-fire on every poll cycle.
pub const FAILURE_BACKOFF_SECONDS: u64 = 30;

/// An automation rule: when `condition` matches, perform `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRule {
    /// Unique identity among the engine's active rules.
    pub name: String,
    pub condition: Condition,
    pub action: Action,
    /// Minimum spacing between two firings, in seconds.
    pub cooldown_seconds: u64,
    /// Disabled rules are skipped entirely, condition unevaluated.
    pub enabled: bool,
    /// Set by the engine after a successful firing, never by the rule.
    pub last_triggered: Option<Timestamp>,
    /// Set by the engine after a failed firing, cleared on success.
    pub last_failed: Option<Timestamp>,
    /// Human-readable summary for status and diagnostics.
    pub description: String,
}

impl TriggerRule {
    /// Create a builder for constructing a [`TriggerRule`].
    #[must_use]
    pub fn builder() -> TriggerRuleBuilder {
        TriggerRuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GrowCtlError::Validation`] when `name` is empty
    /// ([`ValidationError::EmptyName`]).
    pub fn validate(&self) -> Result<(), GrowCtlError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Cooldown gate: whether the rule may fire at `now`.
    ///
    /// Evaluated strictly before the condition (cheap check first). A
    /// rule is eligible when it is enabled, the cooldown since the last
    /// successful firing has elapsed, and the failure backoff since the
    /// last failed firing has elapsed.
    #[must_use]
    pub fn is_eligible(&self, now: Timestamp) -> bool {
        if !self.enabled {
            return false;
        }
        if let Some(last) = self.last_triggered
            && now - last < seconds(self.cooldown_seconds)
        {
            return false;
        }
        if let Some(failed) = self.last_failed
            && now - failed < seconds(FAILURE_BACKOFF_SECONDS)
        {
            return false;
        }
        true
    }

    /// Read-only projection for status and diagnostics.
    #[must_use]
    pub fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            name: self.name.clone(),
            enabled: self.enabled,
            description: self.description.clone(),
            condition: self.condition.to_string(),
            action: self.action.to_string(),
            cooldown_seconds: self.cooldown_seconds,
            last_triggered: self.last_triggered,
        }
    }
}

/// Diagnostic view of a rule — never exposes the evaluable parts directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    pub name: String,
    pub enabled: bool,
    pub description: String,
    /// Rendered condition, e.g. `temperature < 18`.
    pub condition: String,
    /// Rendered action, e.g. `heater on`.
    pub action: String,
    pub cooldown_seconds: u64,
    pub last_triggered: Option<Timestamp>,
}

/// Step-by-step builder for [`TriggerRule`].
#[derive(Debug, Default)]
pub struct TriggerRuleBuilder {
    name: Option<String>,
    condition: Option<Condition>,
    action: Option<Action>,
    cooldown_seconds: Option<u64>,
    enabled: Option<bool>,
    description: Option<String>,
}

impl TriggerRuleBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn cooldown_seconds(mut self, seconds: u64) -> Self {
        self.cooldown_seconds = Some(seconds);
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Consume the builder, validate, and return a [`TriggerRule`].
    ///
    /// # Errors
    ///
    /// Returns [`GrowCtlError::Validation`] if the name is empty or the
    /// condition or action is missing.
    pub fn build(self) -> Result<TriggerRule, GrowCtlError> {
        let condition = self.condition.ok_or(ValidationError::NoCondition)?;
        let action = self.action.ok_or(ValidationError::NoAction)?;
        let rule = TriggerRule {
            name: self.name.unwrap_or_default(),
            condition,
            action,
            cooldown_seconds: self.cooldown_seconds.unwrap_or(DEFAULT_COOLDOWN_SECONDS),
            enabled: self.enabled.unwrap_or(true),
            last_triggered: None,
            last_failed: None,
            description: self.description.unwrap_or_default(),
        };
        rule.validate()?;
        Ok(rule)
    }
}
