use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::repository::{FlagRecord, FlagRepository, StorageError};

use super::SqliteRepository;
use super::mapping::{conn, map_flag_row};

#[async_trait]
impl FlagRepository for SqliteRepository {
    async fn get_flag(&self, key: &str) -> Result<Option<FlagRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT key, value, updated_at
            FROM progress_flags
            WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_flag_row).transpose()
    }

    async fn set_flag(
        &self,
        key: &str,
        value: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO progress_flags (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn clear_flag(&self, key: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM progress_flags WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_flags(&self) -> Result<Vec<FlagRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT key, value, updated_at
            FROM progress_flags
            ORDER BY key
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_flag_row).collect()
    }
}
