//! SQLite dialog store implementation.
//!
//! Implements `DialogStore` from `telephonist-core` using sqlx with split
//! read/write pools. Messages are stored as one JSON array per dialog.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use telephonist_core::dialog::store::DialogStore;
use telephonist_types::dialog::Dialog;
use telephonist_types::error::StoreError;
use telephonist_types::message::Message;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `DialogStore`.
///
/// Without a pool the store runs dry: `create` hands the dialog back without
/// an id and `update` does nothing.
#[derive(Clone)]
pub struct SqliteDialogStore {
    pool: Option<DatabasePool>,
}

impl SqliteDialogStore {
    /// Create a store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a store with no database.
    pub fn dry_run() -> Self {
        Self { pool: None }
    }

    /// Fetch a stored dialog by id.
    pub async fn get(&self, id: &str) -> Result<Option<Dialog>, StoreError> {
        let Some(pool) = &self.pool else {
            return Ok(None);
        };

        let row = sqlx::query(
            "SELECT id, user_id, start_time, duration_s, messages FROM dialogs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let dialog_row =
                    DialogRow::from_row(&row).map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Some(dialog_row.into_dialog()?))
            }
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

struct DialogRow {
    id: String,
    user_id: String,
    start_time: String,
    duration_s: i64,
    messages: String,
}

impl DialogRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            start_time: row.try_get("start_time")?,
            duration_s: row.try_get("duration_s")?,
            messages: row.try_get("messages")?,
        })
    }

    fn into_dialog(self) -> Result<Dialog, StoreError> {
        let messages: Vec<Message> = serde_json::from_str(&self.messages)
            .map_err(|e| StoreError::Query(format!("invalid messages json: {e}")))?;

        Ok(Dialog {
            id: Some(self.id),
            user_id: self.user_id,
            messages,
            start_time: parse_datetime(&self.start_time)?,
            duration_s: self.duration_s,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn encode_messages(messages: &[Message]) -> Result<String, StoreError> {
    serde_json::to_string(messages).map_err(|e| StoreError::Query(e.to_string()))
}

// ---------------------------------------------------------------------------
// DialogStore implementation
// ---------------------------------------------------------------------------

impl DialogStore for SqliteDialogStore {
    async fn create(&self, dialog: &Dialog) -> Result<Dialog, StoreError> {
        if dialog.messages.is_empty() {
            tracing::error!(user_id = %dialog.user_id, "Refusing to store empty dialog");
            return Err(StoreError::EmptyDialog);
        }

        let Some(pool) = &self.pool else {
            tracing::warn!(user_id = %dialog.user_id, "No database configured, dialog not stored");
            return Ok(dialog.clone());
        };

        let id = Uuid::now_v7().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO dialogs (id, user_id, start_time, duration_s, messages, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&dialog.user_id)
        .bind(dialog.start_time.to_rfc3339())
        .bind(dialog.duration_s)
        .bind(encode_messages(&dialog.messages)?)
        .bind(&now)
        .bind(&now)
        .execute(&pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        tracing::info!(user_id = %dialog.user_id, dialog_id = %id, "Stored dialog");

        let mut stored = dialog.clone();
        stored.id = Some(id);
        Ok(stored)
    }

    async fn update(&self, dialog: &Dialog) -> Result<(), StoreError> {
        let Some(id) = dialog.id.as_deref() else {
            return Err(StoreError::MissingId);
        };

        let Some(pool) = &self.pool else {
            tracing::debug!(dialog_id = %id, "No database configured, update skipped");
            return Ok(());
        };

        let result = sqlx::query("UPDATE dialogs SET messages = ?, updated_at = ? WHERE id = ?")
            .bind(encode_messages(&dialog.messages)?)
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
