//! # reachy-mini-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **configuration surface**: the `user` config-flow step and
//!   config entry listing/removal (`/api/config_flow/user`, `/api/entries`)
//! - Serve **entity access**: snapshots, service calls and camera endpoints
//!   (`/api/entries/{id}/entities`, `/api/entities/{unique_id}/…`)
//! - Stream domain events over SSE (`/api/events/stream`)
//! - Map application errors into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `reachy-mini-app` (for port traits and services) and
//! `reachy-mini-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
