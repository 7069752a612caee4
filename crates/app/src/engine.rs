//! Automation engine — evaluates trigger rules against sensor snapshots.
//!
//! The engine does not run its own timer loop: an external scheduler
//! fetches a fresh [`SensorSnapshot`] and calls [`AutomationEngine::check_and_trigger`]
//! on each poll cycle. Rules are evaluated in registration order; the
//! cooldown gate is applied before the condition; matching rules actuate
//! devices through the [`DeviceActuator`] port, which is the only writer
//! of device state. Every mutating operation takes `&mut self`, so access
//! is serialized by construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use growctl_domain::device::{Device, DeviceStates};
use growctl_domain::error::{ActuatorError, GrowCtlError, ValidationError};
use growctl_domain::event::TriggerEvent;
use growctl_domain::rule::{Action, RuleDescriptor, TriggerRule};
use growctl_domain::sensor::SensorSnapshot;
use growctl_domain::time::{Timestamp, seconds};

use crate::ports::{Clock, DeviceActuator, EventPublisher};

/// Rule-based control loop over periodic sensor snapshots.
pub struct AutomationEngine<A, C, P> {
    actuator: A,
    clock: C,
    publisher: P,
    rules: Vec<TriggerRule>,
    device_states: DeviceStates,
    /// Deadlines for pulse actions awaiting their OFF transition.
    scheduled_off: BTreeMap<Device, Timestamp>,
    cleaned_up: bool,
}

/// Read-only diagnostic snapshot of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Whether actuations are log-only.
    pub simulation_mode: bool,
    pub device_states: DeviceStates,
    /// Devices with a scheduled OFF transition and its deadline.
    pub pending_off: BTreeMap<Device, Timestamp>,
    pub active_rules: usize,
    pub total_rules: usize,
    pub rules: Vec<RuleDescriptor>,
}

impl<A, C, P> AutomationEngine<A, C, P>
where
    A: DeviceActuator,
    C: Clock,
    P: EventPublisher,
{
    /// Create an engine with an empty rule set.
    pub fn new(actuator: A, clock: C, publisher: P) -> Self {
        Self {
            actuator,
            clock,
            publisher,
            rules: Vec::new(),
            device_states: DeviceStates::new(),
            scheduled_off: BTreeMap::new(),
            cleaned_up: false,
        }
    }

    /// Register a rule at the end of the evaluation order.
    ///
    /// # Errors
    ///
    /// Returns [`GrowCtlError::Validation`] when the rule is invalid or a
    /// rule with the same name is already registered.
    pub fn add_rule(&mut self, rule: TriggerRule) -> Result<(), GrowCtlError> {
        rule.validate()?;
        if self.rules.iter().any(|r| r.name == rule.name) {
            return Err(ValidationError::DuplicateRule(rule.name.clone()).into());
        }
        tracing::debug!(rule = %rule.name, "added automation rule");
        self.rules.push(rule);
        Ok(())
    }

    /// Remove the rule with the given name. Returns whether one was found.
    pub fn remove_rule(&mut self, name: &str) -> bool {
        let Some(index) = self.rules.iter().position(|r| r.name == name) else {
            return false;
        };
        self.rules.remove(index);
        tracing::info!(rule = name, "removed automation rule");
        true
    }

    /// Enable the rule with the given name. Returns whether one was found.
    pub fn enable_rule(&mut self, name: &str) -> bool {
        self.set_enabled(name, true)
    }

    /// Disable the rule with the given name. Returns whether one was found.
    ///
    /// Disabled rules are skipped entirely: neither the cooldown gate nor
    /// the condition is evaluated for them.
    pub fn disable_rule(&mut self, name: &str) -> bool {
        self.set_enabled(name, false)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        let Some(rule) = self.rules.iter_mut().find(|r| r.name == name) else {
            return false;
        };
        rule.enabled = enabled;
        tracing::info!(rule = name, enabled, "toggled automation rule");
        true
    }

    /// Read-only snapshot of every registered rule.
    #[must_use]
    pub fn list_rules(&self) -> Vec<RuleDescriptor> {
        self.rules.iter().map(TriggerRule::descriptor).collect()
    }

    /// Evaluate all rules against a snapshot and fire the ones that match.
    ///
    /// Completes any due scheduled-off deadlines first, then walks the
    /// rules in registration order. A failing action is caught per rule:
    /// it produces an unsuccessful event and leaves `last_triggered`
    /// unchanged (a short failure backoff prevents a retry storm), and it
    /// never prevents evaluation of the remaining rules. Rules later in
    /// the order observe device-state changes made earlier in the same
    /// cycle.
    pub async fn check_and_trigger(&mut self, snapshot: &SensorSnapshot) -> Vec<TriggerEvent> {
        let now = self.clock.now();
        self.complete_due_pulses(now).await;

        let mut events = Vec::new();
        for index in 0..self.rules.len() {
            let rule = &self.rules[index];
            if !rule.is_eligible(now) {
                continue;
            }
            if !rule.condition.evaluate(snapshot, &self.device_states) {
                continue;
            }

            let name = rule.name.clone();
            let action = rule.action.clone();
            tracing::info!(rule = %name, action = %action, "triggering rule");

            match self.execute(&action, now).await {
                Ok(()) => {
                    self.rules[index].last_triggered = Some(now);
                    self.rules[index].last_failed = None;
                    events.push(TriggerEvent::success(name.as_str(), &action, now));
                }
                Err(err) => {
                    tracing::error!(rule = %name, error = %err, "rule action failed");
                    self.rules[index].last_failed = Some(now);
                    events.push(TriggerEvent::failure(name.as_str(), &action, now, &err));
                }
            }
        }

        for event in &events {
            // Fire-and-forget: event plumbing must never stall control.
            let _ = self.publisher.publish(event.clone()).await;
        }

        if !events.is_empty() {
            tracing::info!(count = events.len(), "evaluation cycle fired rules");
        }
        events
    }

    /// Manual-control entry point: switch a device by name.
    ///
    /// Unknown names and actuation failures are logged and reported as
    /// `false`; they never leave partial state behind and never propagate.
    pub async fn activate_device(&mut self, name: &str, on: bool) -> bool {
        let Ok(device) = name.parse::<Device>() else {
            tracing::error!(device = name, "unknown device");
            return false;
        };
        match self.apply(device, on).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(device = %device, error = %err, "device actuation failed");
                false
            }
        }
    }

    /// Force every known device OFF, bypassing rules and cooldowns.
    ///
    /// Cancels pending pulse deadlines, so an in-flight watering sequence
    /// is aborted rather than completed later. Best-effort per device:
    /// one failing relay never prevents stopping the others.
    pub async fn emergency_stop(&mut self) {
        tracing::warn!("emergency stop, deactivating all devices");
        self.scheduled_off.clear();
        for device in Device::ALL {
            if let Err(err) = self.apply(device, false).await {
                tracing::error!(device = %device, error = %err, "failed to stop device");
            }
        }
    }

    /// Release hardware resources after forcing an emergency stop.
    ///
    /// Idempotent: subsequent calls are no-ops.
    pub async fn cleanup(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.emergency_stop().await;
        if let Err(err) = self.actuator.teardown().await {
            tracing::error!(error = %err, "actuator teardown failed");
        }
        self.cleaned_up = true;
        tracing::info!("engine cleanup completed");
    }

    /// Read-only diagnostic snapshot; never mutates engine state.
    #[must_use]
    pub fn get_status(&self) -> StatusSnapshot {
        StatusSnapshot {
            simulation_mode: self.actuator.is_simulated(),
            device_states: self.device_states.clone(),
            pending_off: self.scheduled_off.clone(),
            active_rules: self.rules.iter().filter(|r| r.enabled).count(),
            total_rules: self.rules.len(),
            rules: self.list_rules(),
        }
    }

    /// Execute one action through the actuator.
    async fn execute(&mut self, action: &Action, now: Timestamp) -> Result<(), ActuatorError> {
        match action {
            Action::Activate { device, on } => self.apply(*device, *on).await,
            Action::Pulse {
                device,
                seconds: duration,
            } => {
                self.apply(*device, true).await?;
                self.scheduled_off.insert(*device, now + seconds(*duration));
                Ok(())
            }
        }
    }

    /// Actuate a device and record the new state on success.
    async fn apply(&mut self, device: Device, on: bool) -> Result<(), ActuatorError> {
        self.actuator.activate(device, on).await?;
        self.device_states.insert(device, on);
        tracing::info!(device = %device, on, "device actuated");
        Ok(())
    }

    /// Turn off devices whose pulse deadline has come due.
    async fn complete_due_pulses(&mut self, now: Timestamp) {
        let due: Vec<Device> = self
            .scheduled_off
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(device, _)| *device)
            .collect();
        for device in due {
            // Keep the deadline on failure so the release is retried
            // on the next cycle; the device must not stay on silently.
            match self.apply(device, false).await {
                Ok(()) => {
                    self.scheduled_off.remove(&device);
                }
                Err(err) => {
                    tracing::error!(device = %device, error = %err, "failed to complete scheduled off");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use growctl_domain::rule::{Condition, default_rules};
    use growctl_domain::sensor::{CO2, HUMIDITY, SOIL_MOISTURE, TEMPERATURE};
    use growctl_domain::thresholds::Thresholds;
    use growctl_domain::time;

    use std::future::Future;

    // ── Recording actuator ─────────────────────────────────────────

    #[derive(Default)]
    struct RecordingActuator {
        log: Vec<(Device, bool)>,
        fail_on: Option<Device>,
        teardowns: usize,
    }

    impl DeviceActuator for RecordingActuator {
        fn activate(
            &mut self,
            device: Device,
            on: bool,
        ) -> impl Future<Output = Result<(), ActuatorError>> + Send {
            let result = if self.fail_on == Some(device) {
                Err(ActuatorError::Gpio {
                    pin: 0,
                    reason: "injected failure".to_string(),
                })
            } else {
                self.log.push((device, on));
                Ok(())
            };
            async move { result }
        }

        fn teardown(&mut self) -> impl Future<Output = Result<(), ActuatorError>> + Send {
            self.teardowns += 1;
            async { Ok(()) }
        }

        fn is_simulated(&self) -> bool {
            true
        }
    }

    // ── Manual clock ───────────────────────────────────────────────

    #[derive(Clone)]
    struct ManualClock(Arc<Mutex<Timestamp>>);

    impl ManualClock {
        fn start() -> Self {
            Self(Arc::new(Mutex::new(time::now())))
        }

        fn advance(&self, secs: u64) {
            *self.0.lock().unwrap() += seconds(secs);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            *self.0.lock().unwrap()
        }
    }

    // ── Spy publisher ──────────────────────────────────────────────

    #[derive(Clone, Default)]
    struct SpyPublisher {
        events: Arc<Mutex<Vec<TriggerEvent>>>,
    }

    impl EventPublisher for SpyPublisher {
        fn publish(
            &self,
            event: TriggerEvent,
        ) -> impl Future<Output = Result<(), GrowCtlError>> + Send {
            self.events.lock().unwrap().push(event);
            async { Ok(()) }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    type TestEngine = AutomationEngine<RecordingActuator, ManualClock, SpyPublisher>;

    fn engine_with_defaults() -> (TestEngine, ManualClock, SpyPublisher) {
        let clock = ManualClock::start();
        let publisher = SpyPublisher::default();
        let mut engine =
            AutomationEngine::new(RecordingActuator::default(), clock.clone(), publisher.clone());
        for rule in default_rules(&Thresholds::default()) {
            engine.add_rule(rule).unwrap();
        }
        (engine, clock, publisher)
    }

    fn hot_dry_snapshot() -> SensorSnapshot {
        SensorSnapshot::new()
            .with(TEMPERATURE, 32.0)
            .with(HUMIDITY, 35.0)
            .with(SOIL_MOISTURE, 25.0)
            .with(CO2, 500.0)
    }

    fn nominal_snapshot() -> SensorSnapshot {
        SensorSnapshot::new()
            .with(TEMPERATURE, 24.0)
            .with(HUMIDITY, 50.0)
            .with(SOIL_MOISTURE, 60.0)
            .with(CO2, 800.0)
    }

    fn fan_rule(name: &str, threshold: f64) -> TriggerRule {
        TriggerRule::builder()
            .name(name)
            .condition(Condition::SensorAbove {
                sensor: TEMPERATURE.to_string(),
                threshold,
            })
            .action(Action::Activate {
                device: Device::Fan,
                on: true,
            })
            .build()
            .unwrap()
    }

    // ── Evaluation ─────────────────────────────────────────────────

    #[tokio::test]
    async fn should_fire_matching_rules_for_hot_dry_snapshot() {
        let (mut engine, _, _) = engine_with_defaults();

        let events = engine.check_and_trigger(&hot_dry_snapshot()).await;

        let fired: Vec<&str> = events.iter().map(|e| e.rule.as_str()).collect();
        assert_eq!(
            fired,
            vec![
                "high_temperature_cooling",
                "low_humidity_humidifier",
                "low_soil_moisture_watering",
            ]
        );
        assert!(events.iter().all(|e| e.success));

        let status = engine.get_status();
        assert_eq!(status.device_states.get(&Device::Fan), Some(&true));
        assert_eq!(status.device_states.get(&Device::Humidifier), Some(&true));
        // Pump is on with its OFF transition scheduled.
        assert_eq!(status.device_states.get(&Device::WaterPump), Some(&true));
        assert!(status.pending_off.contains_key(&Device::WaterPump));
    }

    #[tokio::test]
    async fn should_return_no_events_for_nominal_snapshot() {
        let (mut engine, _, _) = engine_with_defaults();
        let events = engine.check_and_trigger(&nominal_snapshot()).await;
        assert!(events.is_empty());
        assert!(engine.get_status().device_states.is_empty());
    }

    #[tokio::test]
    async fn should_not_fire_disabled_rule() {
        let (mut engine, _, _) = engine_with_defaults();
        assert!(engine.disable_rule("high_temperature_cooling"));

        let events = engine.check_and_trigger(&hot_dry_snapshot()).await;
        assert!(events.iter().all(|e| e.rule != "high_temperature_cooling"));
        assert!(engine.actuator.log.iter().all(|(d, _)| *d != Device::Fan));
    }

    #[tokio::test]
    async fn should_let_later_rules_observe_earlier_actuations_in_same_cycle() {
        let clock = ManualClock::start();
        let mut engine = AutomationEngine::new(
            RecordingActuator::default(),
            clock,
            SpyPublisher::default(),
        );
        engine.add_rule(fan_rule("fan_on", 28.0)).unwrap();
        engine
            .add_rule(
                TriggerRule::builder()
                    .name("heater_follows_fan")
                    .condition(Condition::DeviceOn {
                        device: Device::Fan,
                    })
                    .action(Action::Activate {
                        device: Device::Heater,
                        on: true,
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let snapshot = SensorSnapshot::new().with(TEMPERATURE, 30.0);
        let events = engine.check_and_trigger(&snapshot).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].rule, "heater_follows_fan");
    }

    // ── Cooldown gating ────────────────────────────────────────────

    #[tokio::test]
    async fn should_fire_at_most_once_within_cooldown_window() {
        let (mut engine, clock, _) = engine_with_defaults();

        let first = engine.check_and_trigger(&hot_dry_snapshot()).await;
        assert!(!first.is_empty());

        clock.advance(120);
        let second = engine.check_and_trigger(&hot_dry_snapshot()).await;
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn should_fire_again_once_cooldown_elapsed() {
        let clock = ManualClock::start();
        let mut engine = AutomationEngine::new(
            RecordingActuator::default(),
            clock.clone(),
            SpyPublisher::default(),
        );
        engine.add_rule(fan_rule("fan_on", 28.0)).unwrap();

        let snapshot = SensorSnapshot::new().with(TEMPERATURE, 30.0);
        assert_eq!(engine.check_and_trigger(&snapshot).await.len(), 1);

        clock.advance(299);
        assert!(engine.check_and_trigger(&snapshot).await.is_empty());

        clock.advance(1);
        assert_eq!(engine.check_and_trigger(&snapshot).await.len(), 1);
    }

    // ── Hysteresis ─────────────────────────────────────────────────

    #[tokio::test]
    async fn should_turn_heater_off_only_outside_hysteresis_band() {
        let (mut engine, clock, _) = engine_with_defaults();

        let cold = SensorSnapshot::new().with(TEMPERATURE, 16.0);
        let events = engine.check_and_trigger(&cold).await;
        assert_eq!(events[0].rule, "low_temperature_heating");
        assert_eq!(
            engine.get_status().device_states.get(&Device::Heater),
            Some(&true)
        );

        // 19 °C is inside the +2 °C band: heater stays on.
        clock.advance(60);
        let inside_band = SensorSnapshot::new().with(TEMPERATURE, 19.0);
        assert!(engine.check_and_trigger(&inside_band).await.is_empty());
        assert_eq!(
            engine.get_status().device_states.get(&Device::Heater),
            Some(&true)
        );

        // 21 °C has cleared the band: heater goes off.
        clock.advance(60);
        let cleared = SensorSnapshot::new().with(TEMPERATURE, 21.0);
        let events = engine.check_and_trigger(&cleared).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].rule, "temperature_normal_heater_off");
        assert_eq!(
            engine.get_status().device_states.get(&Device::Heater),
            Some(&false)
        );
    }

    // ── Pulse actions ──────────────────────────────────────────────

    #[tokio::test]
    async fn should_complete_watering_pulse_on_a_later_cycle() {
        let (mut engine, clock, _) = engine_with_defaults();

        let dry = SensorSnapshot::new().with(SOIL_MOISTURE, 20.0);
        engine.check_and_trigger(&dry).await;
        assert_eq!(
            engine.get_status().device_states.get(&Device::WaterPump),
            Some(&true)
        );

        // Deadline not yet due.
        clock.advance(10);
        engine.check_and_trigger(&nominal_snapshot()).await;
        assert_eq!(
            engine.get_status().device_states.get(&Device::WaterPump),
            Some(&true)
        );

        clock.advance(20);
        engine.check_and_trigger(&nominal_snapshot()).await;
        let status = engine.get_status();
        assert_eq!(status.device_states.get(&Device::WaterPump), Some(&false));
        assert!(status.pending_off.is_empty());
    }

    #[tokio::test]
    async fn should_cancel_pending_pulse_on_emergency_stop() {
        let (mut engine, clock, _) = engine_with_defaults();

        let dry = SensorSnapshot::new().with(SOIL_MOISTURE, 20.0);
        engine.check_and_trigger(&dry).await;
        assert!(!engine.get_status().pending_off.is_empty());

        engine.emergency_stop().await;
        let status = engine.get_status();
        assert!(status.pending_off.is_empty());
        assert_eq!(status.device_states.get(&Device::WaterPump), Some(&false));

        // The cancelled deadline must not resurface later.
        clock.advance(3600);
        engine.check_and_trigger(&nominal_snapshot()).await;
        let off_count = engine
            .actuator
            .log
            .iter()
            .filter(|(d, on)| *d == Device::WaterPump && !on)
            .count();
        assert_eq!(off_count, 1);
    }

    #[tokio::test]
    async fn should_retry_scheduled_off_until_release_succeeds() {
        let (mut engine, clock, _) = engine_with_defaults();

        let dry = SensorSnapshot::new().with(SOIL_MOISTURE, 20.0);
        engine.check_and_trigger(&dry).await;

        // Relay starts failing before the deadline comes due.
        engine.actuator.fail_on = Some(Device::WaterPump);
        clock.advance(30);
        engine.check_and_trigger(&nominal_snapshot()).await;
        let status = engine.get_status();
        assert_eq!(status.device_states.get(&Device::WaterPump), Some(&true));
        assert!(status.pending_off.contains_key(&Device::WaterPump));

        // Once the relay recovers the release goes through.
        engine.actuator.fail_on = None;
        clock.advance(30);
        engine.check_and_trigger(&nominal_snapshot()).await;
        let status = engine.get_status();
        assert_eq!(status.device_states.get(&Device::WaterPump), Some(&false));
        assert!(status.pending_off.is_empty());
    }

    // ── Failure handling ───────────────────────────────────────────

    #[tokio::test]
    async fn should_emit_failure_event_and_keep_evaluating_other_rules() {
        let clock = ManualClock::start();
        let actuator = RecordingActuator {
            fail_on: Some(Device::Fan),
            ..RecordingActuator::default()
        };
        let mut engine = AutomationEngine::new(actuator, clock, SpyPublisher::default());
        for rule in default_rules(&Thresholds::default()) {
            engine.add_rule(rule).unwrap();
        }

        let events = engine.check_and_trigger(&hot_dry_snapshot()).await;
        let fan_event = events
            .iter()
            .find(|e| e.rule == "high_temperature_cooling")
            .unwrap();
        assert!(!fan_event.success);
        assert!(fan_event.error.is_some());

        // The later rules still fired.
        assert!(events.iter().any(|e| e.rule == "low_humidity_humidifier"));
        // Failed actuation leaves no state behind.
        assert!(!engine.get_status().device_states.contains_key(&Device::Fan));
    }

    #[tokio::test]
    async fn should_back_off_after_failed_action_then_retry() {
        let clock = ManualClock::start();
        let actuator = RecordingActuator {
            fail_on: Some(Device::Fan),
            ..RecordingActuator::default()
        };
        let mut engine = AutomationEngine::new(actuator, clock.clone(), SpyPublisher::default());
        engine.add_rule(fan_rule("fan_on", 28.0)).unwrap();

        let snapshot = SensorSnapshot::new().with(TEMPERATURE, 30.0);
        let events = engine.check_and_trigger(&snapshot).await;
        assert!(!events[0].success);

        // Within the failure backoff the rule must not retry.
        clock.advance(10);
        assert!(engine.check_and_trigger(&snapshot).await.is_empty());

        // After the backoff it retries, well before the full cooldown.
        clock.advance(20);
        engine.actuator.fail_on = None;
        let events = engine.check_and_trigger(&snapshot).await;
        assert_eq!(events.len(), 1);
        assert!(events[0].success);
    }

    // ── Manual control ─────────────────────────────────────────────

    #[tokio::test]
    async fn should_reject_unknown_device_name_without_touching_state() {
        let (mut engine, _, _) = engine_with_defaults();
        let before = engine.get_status();

        assert!(!engine.activate_device("nonexistent", true).await);

        assert_eq!(engine.get_status(), before);
    }

    #[tokio::test]
    async fn should_activate_known_device_by_name() {
        let (mut engine, _, _) = engine_with_defaults();
        assert!(engine.activate_device("fan", true).await);
        assert_eq!(
            engine.get_status().device_states.get(&Device::Fan),
            Some(&true)
        );
    }

    #[tokio::test]
    async fn should_report_false_when_actuation_fails() {
        let clock = ManualClock::start();
        let actuator = RecordingActuator {
            fail_on: Some(Device::Heater),
            ..RecordingActuator::default()
        };
        let mut engine = AutomationEngine::new(actuator, clock, SpyPublisher::default());

        assert!(!engine.activate_device("heater", true).await);
        assert!(engine.get_status().device_states.is_empty());
    }

    // ── Emergency stop & cleanup ───────────────────────────────────

    #[tokio::test]
    async fn should_force_every_device_off_on_emergency_stop() {
        let (mut engine, _, _) = engine_with_defaults();
        engine.activate_device("fan", true).await;
        engine.activate_device("heater", true).await;

        engine.emergency_stop().await;

        let status = engine.get_status();
        for device in Device::ALL {
            assert_eq!(status.device_states.get(&device), Some(&false));
        }
    }

    #[tokio::test]
    async fn should_stop_remaining_devices_when_one_relay_fails() {
        let clock = ManualClock::start();
        let actuator = RecordingActuator {
            fail_on: Some(Device::Heater),
            ..RecordingActuator::default()
        };
        let mut engine = AutomationEngine::new(actuator, clock, SpyPublisher::default());

        engine.emergency_stop().await;

        let status = engine.get_status();
        assert_eq!(status.device_states.get(&Device::Fan), Some(&false));
        assert_eq!(status.device_states.get(&Device::WaterPump), Some(&false));
        assert!(!status.device_states.contains_key(&Device::Heater));
    }

    #[tokio::test]
    async fn should_teardown_actuator_exactly_once_across_repeated_cleanups() {
        let (mut engine, _, _) = engine_with_defaults();
        engine.activate_device("humidifier", true).await;

        engine.cleanup().await;
        engine.cleanup().await;

        assert_eq!(engine.actuator.teardowns, 1);
        assert_eq!(
            engine.get_status().device_states.get(&Device::Humidifier),
            Some(&false)
        );
    }

    // ── Rule registry ──────────────────────────────────────────────

    #[tokio::test]
    async fn should_reject_duplicate_rule_name() {
        let (mut engine, _, _) = engine_with_defaults();
        let result = engine.add_rule(fan_rule("high_temperature_cooling", 30.0));
        assert!(matches!(
            result,
            Err(GrowCtlError::Validation(ValidationError::DuplicateRule(name))) if name == "high_temperature_cooling"
        ));
        assert_eq!(engine.get_status().total_rules, 7);
    }

    #[tokio::test]
    async fn should_remove_rule_by_name() {
        let (mut engine, _, _) = engine_with_defaults();
        assert!(engine.remove_rule("low_soil_moisture_watering"));
        assert!(!engine.remove_rule("low_soil_moisture_watering"));
        assert_eq!(engine.get_status().total_rules, 6);
    }

    #[tokio::test]
    async fn should_return_false_when_toggling_unknown_rule() {
        let (mut engine, _, _) = engine_with_defaults();
        assert!(!engine.enable_rule("no_such_rule"));
        assert!(!engine.disable_rule("no_such_rule"));
    }

    #[tokio::test]
    async fn should_count_active_rules_in_status() {
        let (mut engine, _, _) = engine_with_defaults();
        assert_eq!(engine.get_status().active_rules, 7);

        engine.disable_rule("low_temperature_heating");
        let status = engine.get_status();
        assert_eq!(status.active_rules, 6);
        assert_eq!(status.total_rules, 7);
    }

    #[tokio::test]
    async fn should_reenable_disabled_rule() {
        let (mut engine, _, _) = engine_with_defaults();
        engine.disable_rule("high_temperature_cooling");
        assert!(engine.enable_rule("high_temperature_cooling"));

        let events = engine.check_and_trigger(&hot_dry_snapshot()).await;
        assert!(events.iter().any(|e| e.rule == "high_temperature_cooling"));
    }

    // ── Events & status ────────────────────────────────────────────

    #[tokio::test]
    async fn should_publish_every_event_on_the_bus() {
        let (mut engine, _, publisher) = engine_with_defaults();
        let events = engine.check_and_trigger(&hot_dry_snapshot()).await;

        let published = publisher.events.lock().unwrap();
        assert_eq!(*published, events);
    }

    #[tokio::test]
    async fn should_report_simulation_mode_from_actuator() {
        let (engine, _, _) = engine_with_defaults();
        assert!(engine.get_status().simulation_mode);
    }

    #[tokio::test]
    async fn should_serialize_status_snapshot() {
        let (mut engine, _, _) = engine_with_defaults();
        engine.activate_device("fan", true).await;

        let json = serde_json::to_value(engine.get_status()).unwrap();
        assert_eq!(json["simulation_mode"], true);
        assert_eq!(json["device_states"]["fan"], true);
        assert_eq!(json["total_rules"], 7);
    }

    #[tokio::test]
    async fn should_record_last_triggered_in_descriptors() {
        let (mut engine, _, _) = engine_with_defaults();
        engine.check_and_trigger(&hot_dry_snapshot()).await;

        let rules = engine.list_rules();
        let cooling = rules
            .iter()
            .find(|r| r.name == "high_temperature_cooling")
            .unwrap();
        assert!(cooling.last_triggered.is_some());

        let heating = rules
            .iter()
            .find(|r| r.name == "low_temperature_heating")
            .unwrap();
        assert!(heating.last_triggered.is_none());
    }
}
