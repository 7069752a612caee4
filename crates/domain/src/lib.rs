//! # growctl-domain
//!
//! Pure domain model for the growctl environmental automation engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (the controllable actuators: heater, fan, humidifier, water pump)
//! - Define **Sensor snapshots** (one point-in-time reading of all sensors)
//! - Define **Thresholds** (configuration-supplied environmental limits)
//! - Define **Trigger rules** (condition → action with cooldown and enable state)
//! - Define **Trigger events** (records of rule firings, success or failure)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod event;
pub mod rule;
pub mod sensor;
pub mod thresholds;
