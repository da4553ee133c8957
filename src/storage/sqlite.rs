//! SQLite-backed interaction log
//!
//! ## Database Schema
//!
//! ```sql
//! CREATE TABLE wellness_logs (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     user_id INTEGER NOT NULL,
//!     mood INTEGER NOT NULL,
//!     stress INTEGER NOT NULL,
//!     sleep_hours REAL NOT NULL,
//!     sleep_quality TEXT,
//!     notes TEXT,
//!     created_at TEXT NOT NULL
//! );
//! ```
//!
//! Chat exchanges are stored with zero mood/stress/sleep values and the
//! exchange in `notes`, alongside regular check-ins.

use crate::error::StorageError;
use crate::storage::{InteractionLog, WellnessChatEntry, WellnessLogRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// Interaction log stored in a SQLite database file
#[derive(Clone)]
pub struct SqliteInteractionLog {
    pool: SqlitePool,
}

impl SqliteInteractionLog {
    /// Open (creating if missing) the database at `database_url` and ensure the schema
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema initialization fails.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        tracing::info!(database_url = %database_url, "Opening interaction log database");

        let options = SqliteConnectOptions::new()
            .create_if_missing(true)
            .filename(database_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let log = Self { pool };
        log.init_schema().await?;
        Ok(log)
    }

    async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wellness_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                mood INTEGER NOT NULL,
                stress INTEGER NOT NULL,
                sleep_hours REAL NOT NULL,
                sleep_quality TEXT,
                notes TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_wellness_logs_user ON wellness_logs(user_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent rows for a user, newest first
    pub async fn recent_for_user(
        &self,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<WellnessLogRecord>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, user_id, mood, stress, sleep_hours, sleep_quality, notes, created_at \
             FROM wellness_logs WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let created_at: String = row.try_get("created_at")?;
                let created_at = DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
                    .with_timezone(&Utc);

                Ok(WellnessLogRecord {
                    id: row.try_get("id")?,
                    user_id: row.try_get("user_id")?,
                    mood: row.try_get("mood")?,
                    stress: row.try_get("stress")?,
                    sleep_hours: row.try_get("sleep_hours")?,
                    sleep_quality: row.try_get("sleep_quality")?,
                    notes: row.try_get("notes")?,
                    created_at,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(StorageError::from)
    }

    /// Close the pool, waiting for in-flight queries
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl InteractionLog for SqliteInteractionLog {
    async fn record(&self, entry: &WellnessChatEntry) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO wellness_logs \
             (user_id, mood, stress, sleep_hours, sleep_quality, notes, created_at) \
             VALUES (?1, 0, 0, 0.0, NULL, ?2, ?3)",
        )
        .bind(entry.user_id)
        .bind(entry.notes())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::debug!(user_id = entry.user_id, "Recorded wellness chat exchange");
        Ok(())
    }
}
