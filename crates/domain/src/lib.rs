//! # reachy-mini-domain
//!
//! Pure domain model for the Reachy Mini hub.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - **Device identity**: `DeviceEndpoint`, `DeviceKey` (`"{host}:{port}"`)
//!   and port validation
//! - **Config entries**: the persisted configuration of one robot
//! - **Entities**: the six entity kinds a robot exposes, their descriptors,
//!   unique ids (`"{entry_id}_{suffix}"`), readings and states
//! - **Services**: `turn_on` / `turn_off` / `toggle` commands
//! - **Events**: entry and state-change records
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod config_entry;
pub mod device;
pub mod endpoint;
pub mod entity;
pub mod event;
pub mod service;
