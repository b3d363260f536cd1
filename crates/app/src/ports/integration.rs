//! Integration port: lifecycle and service-call handling for robot
//! integrations.
//!
//! An integration turns a [`ConfigEntry`] into the entities of one robot and
//! answers state queries and service calls for them.

use std::future::Future;

use reachy_mini_domain::config_entry::ConfigEntry;
use reachy_mini_domain::entity::{EntityDescriptor, EntityKind, EntitySnapshot};
use reachy_mini_domain::error::ReachyError;
use reachy_mini_domain::id::EntryId;
use reachy_mini_domain::service::Service;

/// A pluggable robot integration.
///
/// The entry service drives it, holding its lifecycle lock for every call:
///
/// 1. [`setup`](Self::setup): once per activated config entry
/// 2. [`refresh`](Self::refresh) / [`handle_service_call`](Self::handle_service_call) /
///    camera calls: while the entry is loaded
/// 3. [`teardown`](Self::teardown): when the entry is removed
pub trait Integration {
    /// Unique name identifying this integration (e.g. `"simulated"`).
    fn name(&self) -> &'static str;

    /// Create the entities of `entry`, one per [`EntityKind`].
    fn setup(
        &mut self,
        entry: &ConfigEntry,
    ) -> impl Future<Output = Result<Vec<EntityDescriptor>, ReachyError>> + Send;

    /// Drop the entities of `entry_id`. Returns `false` when nothing was
    /// loaded for it.
    fn teardown(
        &mut self,
        entry_id: EntryId,
    ) -> impl Future<Output = Result<bool, ReachyError>> + Send;

    /// Refresh every entity of `entry_id` and return their snapshots.
    fn refresh(
        &self,
        entry_id: EntryId,
    ) -> impl Future<Output = Result<Vec<EntitySnapshot>, ReachyError>> + Send;

    /// Apply `service` to one entity and return its new snapshot.
    fn handle_service_call(
        &self,
        entry_id: EntryId,
        kind: EntityKind,
        service: Service,
    ) -> impl Future<Output = Result<EntitySnapshot, ReachyError>> + Send;

    /// A still frame from a camera entity.
    fn camera_image(
        &self,
        entry_id: EntryId,
        kind: EntityKind,
        width: Option<u32>,
        height: Option<u32>,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, ReachyError>> + Send;

    /// Stream URL of a camera entity.
    fn stream_source(
        &self,
        entry_id: EntryId,
        kind: EntityKind,
    ) -> impl Future<Output = Result<Option<String>, ReachyError>> + Send;
}
