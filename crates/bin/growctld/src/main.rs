//! # growctld — growctl daemon
//!
//! Composition root that wires the automation engine to a backend and
//! runs the poll loop.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Select the actuation backend (relay hardware or simulation)
//! - Construct the engine and install the default rule library
//! - Subscribe to the event bus and log trigger events
//! - Poll sensors on a fixed interval and feed the engine
//! - Handle graceful shutdown (SIGINT), releasing hardware on exit
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use growctl_adapter_gpio::RelayActuator;
use growctl_adapter_sim::SimulatedActuator;
use growctl_adapter_sim::sensors::SimulatedSensorSource;
use growctl_app::engine::AutomationEngine;
use growctl_app::event_bus::InProcessEventBus;
use growctl_app::ports::{DeviceActuator, SystemClock};
use growctl_domain::device::Device;
use growctl_domain::error::ActuatorError;
use growctl_domain::rule::default_rules;

mod config;

use config::Config;

/// The actuation backend selected at startup.
enum Backend {
    Relay(RelayActuator),
    Simulated(SimulatedActuator),
}

impl DeviceActuator for Backend {
    fn activate(
        &mut self,
        device: Device,
        on: bool,
    ) -> impl Future<Output = Result<(), ActuatorError>> + Send {
        async move {
            match self {
                Self::Relay(inner) => inner.activate(device, on).await,
                Self::Simulated(inner) => inner.activate(device, on).await,
            }
        }
    }

    fn teardown(&mut self) -> impl Future<Output = Result<(), ActuatorError>> + Send {
        async move {
            match self {
                Self::Relay(inner) => inner.teardown().await,
                Self::Simulated(inner) => inner.teardown().await,
            }
        }
    }

    fn is_simulated(&self) -> bool {
        match self {
            Self::Relay(inner) => inner.is_simulated(),
            Self::Simulated(inner) => inner.is_simulated(),
        }
    }
}

/// Pick the backend per configuration, falling back to simulation when
/// the hardware cannot be initialized.
fn select_backend(config: &Config) -> Backend {
    if !config.hardware.enabled {
        tracing::info!("running in simulation mode");
        return Backend::Simulated(SimulatedActuator::new());
    }
    match RelayActuator::new(&config.pins) {
        Ok(relay) => Backend::Relay(relay),
        Err(err) => {
            tracing::warn!(error = %err, "hardware unavailable, falling back to simulation");
            Backend::Simulated(SimulatedActuator::new())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let event_bus = InProcessEventBus::new(256);
    let mut subscriber = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match subscriber.recv().await {
                Ok(event) => tracing::info!(
                    rule = %event.rule,
                    device = %event.device,
                    action = %event.action,
                    success = event.success,
                    "trigger event",
                ),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let backend = select_backend(&config);
    let mut engine = AutomationEngine::new(backend, SystemClock, event_bus);
    for rule in default_rules(&config.thresholds) {
        engine
            .add_rule(rule)
            .context("installing default rule library")?;
    }

    let status = engine.get_status();
    tracing::info!(
        simulation = status.simulation_mode,
        rules = status.total_rules,
        poll_seconds = config.automation.poll_seconds,
        "growctld started",
    );

    let mut sensors = SimulatedSensorSource::new();
    let mut interval = tokio::time::interval(Duration::from_secs(config.automation.poll_seconds));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let snapshot = sensors.next_snapshot();
                engine.check_and_trigger(&snapshot).await;
            }
            result = tokio::signal::ctrl_c() => {
                result.context("listening for shutdown signal")?;
                tracing::info!("shutdown signal received");
                break;
            }
        }
    }

    engine.cleanup().await;
    Ok(())
}
