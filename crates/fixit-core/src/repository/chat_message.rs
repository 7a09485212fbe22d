//! Chat message repository trait definition.
//!
//! Defines the append-only storage interface for listing conversations. The
//! infrastructure layer (fixit-infra) implements this trait with SQLite
//! persistence; [`InMemoryChatMessageRepository`] backs tests and embedders
//! that do not need durability.

use std::sync::Mutex;

use chrono::Utc;
use fixit_types::chat::{NewChatMessage, StoredMessage};
use fixit_types::error::RepositoryError;
use fixit_types::listing::ListingId;

/// Repository trait for chat message persistence.
///
/// Messages are never updated or deleted through this trait. The store owns
/// id and timestamp assignment: `created_at` must never go backwards within a
/// listing, even if the wall clock does.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait ChatMessageRepository: Send + Sync {
    /// Append a validated message and return it with its id and timestamp.
    ///
    /// Fails only on storage-layer errors; business validation happens before.
    fn append(
        &self,
        msg: &NewChatMessage,
    ) -> impl std::future::Future<Output = Result<StoredMessage, RepositoryError>> + Send;

    /// All messages of a listing, ascending by `created_at` (ties by id).
    fn list_by_listing(
        &self,
        listing_id: ListingId,
    ) -> impl std::future::Future<Output = Result<Vec<StoredMessage>, RepositoryError>> + Send;

    /// Number of messages stored for a listing.
    fn count_by_listing(
        &self,
        listing_id: ListingId,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}

/// Volatile message store kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryChatMessageRepository {
    messages: Mutex<Vec<StoredMessage>>,
}

impl InMemoryChatMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of appended messages across all listings.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StoredMessage>> {
        // A poisoned lock only means a panic elsewhere; the Vec is still consistent.
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChatMessageRepository for InMemoryChatMessageRepository {
    async fn append(&self, msg: &NewChatMessage) -> Result<StoredMessage, RepositoryError> {
        let mut messages = self.lock();

        let latest = messages
            .iter()
            .filter(|m| m.listing_id == msg.listing_id)
            .map(|m| m.created_at)
            .max();
        let now = Utc::now();
        let created_at = match latest {
            Some(latest) if latest > now => latest,
            _ => now,
        };

        let stored = StoredMessage {
            id: messages.len() as i64 + 1,
            listing_id: msg.listing_id,
            sender_id: msg.sender_id,
            recipient_id: msg.recipient_id,
            message: msg.message.clone(),
            created_at,
        };
        messages.push(stored.clone());
        Ok(stored)
    }

    async fn list_by_listing(
        &self,
        listing_id: ListingId,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        let mut found: Vec<StoredMessage> = self
            .lock()
            .iter()
            .filter(|m| m.listing_id == listing_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn count_by_listing(&self, listing_id: ListingId) -> Result<i64, RepositoryError> {
        Ok(self
            .lock()
            .iter()
            .filter(|m| m.listing_id == listing_id)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_message(listing_id: ListingId, text: &str) -> NewChatMessage {
        NewChatMessage {
            listing_id,
            sender_id: 1,
            recipient_id: 2,
            message: text.to_string(),
        }
    }

    #[tokio::test]
    async fn append_assigns_sequential_ids() {
        let repo = InMemoryChatMessageRepository::new();
        let first = repo.append(&new_message(7, "one")).await.unwrap();
        let second = repo.append(&new_message(7, "two")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn list_by_listing_is_chronological_and_isolated() {
        let repo = InMemoryChatMessageRepository::new();
        for i in 0..5 {
            repo.append(&new_message(7, &format!("msg {i}"))).await.unwrap();
        }
        repo.append(&new_message(8, "other listing")).await.unwrap();

        let messages = repo.list_by_listing(7).await.unwrap();
        assert_eq!(messages.len(), 5);
        assert!(messages.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        assert_eq!(messages[0].message, "msg 0");
        assert_eq!(messages[4].message, "msg 4");

        assert_eq!(repo.count_by_listing(8).await.unwrap(), 1);
        assert!(repo.list_by_listing(9).await.unwrap().is_empty());
    }
}
