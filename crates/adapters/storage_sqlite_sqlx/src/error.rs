//! Failures of the config entry store.

use reachy_mini_domain::endpoint::DeviceKey;
use reachy_mini_domain::error::{DuplicateDeviceError, ReachyError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("config entry query failed")]
    Database(#[from] sqlx::Error),

    #[error("config entry schema upgrade failed")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    /// Classify a failed insert. The `(host, port)` unique constraint
    /// surfaces as a duplicate device, anything else as storage.
    pub(crate) fn on_insert(err: sqlx::Error, device_key: DeviceKey) -> ReachyError {
        let clashes = err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());
        if clashes {
            DuplicateDeviceError { device_key }.into()
        } else {
            Self::from(err).into()
        }
    }
}

impl From<StorageError> for ReachyError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
