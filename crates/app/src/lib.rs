//! # growctl-app
//!
//! Application layer — the automation engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceActuator` — switch devices on/off, release hardware handles
//!   - `Clock` — current time, injectable for deterministic cooldown tests
//!   - `EventPublisher` — fire-and-forget publication of trigger events
//! - Provide the **`AutomationEngine`** use-case: evaluate rules against a
//!   sensor snapshot, gate on cooldowns, actuate devices, record outcomes,
//!   and expose emergency-stop/status/management operations
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `growctl-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod engine;
pub mod event_bus;
pub mod ports;
