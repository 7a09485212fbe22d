//! SQLite chat message repository implementation.
//!
//! Implements `ChatMessageRepository` from `fixit-core` using sqlx with split
//! read/write pools. Appends go through the single writer connection inside a
//! transaction, which is what keeps `created_at` non-decreasing per listing.

use chrono::Utc;
use fixit_core::repository::chat_message::ChatMessageRepository;
use fixit_types::chat::{NewChatMessage, StoredMessage};
use fixit_types::error::RepositoryError;
use fixit_types::listing::ListingId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `ChatMessageRepository`.
pub struct SqliteChatMessageRepository {
    pool: DatabasePool,
}

impl SqliteChatMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct ChatMessageRow {
    id: i64,
    listing_id: i64,
    sender_id: i64,
    recipient_id: i64,
    message: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            listing_id: row.try_get("listing_id")?,
            sender_id: row.try_get("sender_id")?,
            recipient_id: row.try_get("recipient_id")?,
            message: row.try_get("message")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<StoredMessage, RepositoryError> {
        Ok(StoredMessage {
            id: self.id,
            listing_id: self.listing_id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            message: self.message,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// ChatMessageRepository impl
// ---------------------------------------------------------------------------

impl ChatMessageRepository for SqliteChatMessageRepository {
    async fn append(&self, msg: &NewChatMessage) -> Result<StoredMessage, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let latest: Option<String> =
            sqlx::query_scalar("SELECT MAX(created_at) FROM chat_messages WHERE listing_id = ?")
                .bind(msg.listing_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(query_error)?;

        let now = Utc::now();
        let created_at = match latest.as_deref().map(parse_datetime).transpose()? {
            Some(latest) if latest > now => latest,
            _ => now,
        };

        let result = sqlx::query(
            "INSERT INTO chat_messages (listing_id, sender_id, recipient_id, message, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(msg.listing_id)
        .bind(msg.sender_id)
        .bind(msg.recipient_id)
        .bind(&msg.message)
        .bind(format_datetime(&created_at))
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;

        // Stored text has microsecond precision; hand back exactly what a
        // later read would return.
        let created_at = parse_datetime(&format_datetime(&created_at))?;

        Ok(StoredMessage {
            id: result.last_insert_rowid(),
            listing_id: msg.listing_id,
            sender_id: msg.sender_id,
            recipient_id: msg.recipient_id,
            message: msg.message.clone(),
            created_at,
        })
    }

    async fn list_by_listing(
        &self,
        listing_id: ListingId,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages WHERE listing_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(listing_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = ChatMessageRow::from_row(row).map_err(query_error)?;
            messages.push(r.into_message()?);
        }
        Ok(messages)
    }

    async fn count_by_listing(&self, listing_id: ListingId) -> Result<i64, RepositoryError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE listing_id = ?")
            .bind(listing_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)
    }
}
