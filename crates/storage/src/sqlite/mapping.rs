use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{FlagRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn map_flag_row(row: &sqlx::sqlite::SqliteRow) -> Result<FlagRecord, StorageError> {
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(ser)?;
    Ok(FlagRecord {
        key: row.try_get("key").map_err(ser)?,
        value: row.try_get("value").map_err(ser)?,
        updated_at,
    })
}
