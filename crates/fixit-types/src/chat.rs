//! Chat message domain types.
//!
//! A `StoredMessage` is the immutable record the message store hands back after
//! an append. It is both the history row served over HTTP and the payload of a
//! live relay frame, so its JSON shape is part of the wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

use crate::listing::ListingId;

/// Integer identity of an authenticated user (owner or repairman).
pub type UserId = i64;

/// Store-assigned identity of a chat message.
pub type MessageId = i64;

/// Identity of one live channel, assigned when the connection opens.
///
/// Two connections for the same user always carry different ids, which is what
/// lets the registry remove a stale connection without touching a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new ConnectionId using UUID v7 (time-sortable).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: MessageId,
    pub listing_id: ListingId,
    pub sender_id: UserId,
    /// Recipient resolved from the listing's accepted bid at send time.
    pub recipient_id: UserId,
    /// Trimmed, non-empty message text.
    pub message: String,
    /// Assigned by the store; never earlier than the previous message of the listing.
    pub created_at: DateTime<Utc>,
}

/// A validated message ready to be appended to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    pub listing_id: ListingId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub message: String,
}
