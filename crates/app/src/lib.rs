//! # reachy-mini-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `ConfigEntryRepository`: persistent config entries
//!   - `Integration`: setup/teardown and entity access for one robot kind
//!   - `Readable` / `Toggleable` / `Streamable`: entity capabilities
//!   - `EventPublisher`: domain event fan-out
//! - Hold the process-wide `DeviceRegistry` of configured device keys
//! - Run the config flow and the entry lifecycle (`EntryService`)
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `reachy-mini-domain` only (plus `tokio::sync`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod registry;
pub mod services;
