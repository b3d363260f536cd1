//! Config entry store port: persistence keyed by entry id.

use std::future::Future;

use reachy_mini_domain::config_entry::ConfigEntry;
use reachy_mini_domain::endpoint::DeviceKey;
use reachy_mini_domain::error::ReachyError;
use reachy_mini_domain::id::EntryId;

/// Persistent store of [`ConfigEntry`] records.
///
/// Implementations must refuse a second entry for the same device key with
/// [`ReachyError::Duplicate`].
pub trait ConfigEntryRepository {
    fn create(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, ReachyError>> + Send;

    fn get_by_id(
        &self,
        entry_id: EntryId,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, ReachyError>> + Send;

    fn find_by_device_key(
        &self,
        device_key: &DeviceKey,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, ReachyError>> + Send;

    /// All entries, oldest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, ReachyError>> + Send;

    /// Remove an entry. Returns whether a row was removed.
    fn delete(&self, entry_id: EntryId) -> impl Future<Output = Result<bool, ReachyError>> + Send;
}

impl<T: ConfigEntryRepository + Send + Sync> ConfigEntryRepository for std::sync::Arc<T> {
    fn create(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, ReachyError>> + Send {
        (**self).create(entry)
    }

    fn get_by_id(
        &self,
        entry_id: EntryId,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, ReachyError>> + Send {
        (**self).get_by_id(entry_id)
    }

    fn find_by_device_key(
        &self,
        device_key: &DeviceKey,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, ReachyError>> + Send {
        (**self).find_by_device_key(device_key)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, ReachyError>> + Send {
        (**self).get_all()
    }

    fn delete(&self, entry_id: EntryId) -> impl Future<Output = Result<bool, ReachyError>> + Send {
        (**self).delete(entry_id)
    }
}
