//! `SQLite` implementation of [`ConfigEntryRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use reachy_mini_app::ports::ConfigEntryRepository;
use reachy_mini_domain::config_entry::ConfigEntry;
use reachy_mini_domain::endpoint::{DeviceEndpoint, DeviceKey};
use reachy_mini_domain::error::ReachyError;
use reachy_mini_domain::id::EntryId;
use reachy_mini_domain::time;

use crate::error::StorageError;

/// Wrapper for converting database rows into a domain [`ConfigEntry`].
struct Wrapper(ConfigEntry);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ConfigEntry> {
        value.map(|w| w.0)
    }
}

fn decode_error(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let entry_id: String = row.try_get("entry_id")?;
        let title: String = row.try_get("title")?;
        let host: String = row.try_get("host")?;
        let port: i64 = row.try_get("port")?;
        let created_at: String = row.try_get("created_at")?;

        let entry_id = EntryId::from_str(&entry_id).map_err(decode_error)?;
        let port = u16::try_from(port).map_err(decode_error)?;
        let endpoint = DeviceEndpoint::new(host, port).map_err(decode_error)?;
        let created_at = time::from_text(&created_at).map_err(decode_error)?;

        Ok(Self(
            ConfigEntry::builder(endpoint)
                .entry_id(entry_id)
                .title(title)
                .created_at(created_at)
                .build(),
        ))
    }
}

/// Turn a unique-constraint violation into [`ReachyError::Duplicate`].
const INSERT: &str = "INSERT INTO config_entries (entry_id, title, host, port, device_key, created_at) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM config_entries WHERE entry_id = ?";
const SELECT_BY_DEVICE_KEY: &str = "SELECT * FROM config_entries WHERE device_key = ?";
const SELECT_ALL: &str = "SELECT * FROM config_entries ORDER BY created_at, rowid";
const DELETE_BY_ID: &str = "DELETE FROM config_entries WHERE entry_id = ?";

/// `SQLite`-backed config entry repository.
pub struct SqliteConfigEntryRepository {
    pool: SqlitePool,
}

impl SqliteConfigEntryRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ConfigEntryRepository for SqliteConfigEntryRepository {
    fn create(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, ReachyError>> + Send {
        let pool = self.pool.clone();
        async move {
            let device_key = entry.device_key();
            sqlx::query(INSERT)
                .bind(entry.entry_id.to_string())
                .bind(&entry.title)
                .bind(entry.endpoint.host())
                .bind(i64::from(entry.endpoint.port()))
                .bind(device_key.as_str())
                .bind(time::to_text(entry.created_at))
                .execute(&pool)
                .await
                .map_err(|err| StorageError::on_insert(err, device_key.clone()))?;

            tracing::debug!(entry_id = %entry.entry_id, %device_key, "config entry stored");
            Ok(entry)
        }
    }

    fn get_by_id(
        &self,
        entry_id: EntryId,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, ReachyError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(entry_id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_device_key(
        &self,
        device_key: &DeviceKey,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, ReachyError>> + Send {
        let pool = self.pool.clone();
        let device_key = device_key.as_str().to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_DEVICE_KEY)
                .bind(device_key)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, ReachyError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn delete(&self, entry_id: EntryId) -> impl Future<Output = Result<bool, ReachyError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(entry_id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }
}
