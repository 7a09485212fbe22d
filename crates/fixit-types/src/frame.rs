//! Wire frames exchanged over a chat channel.
//!
//! Every frame is a JSON envelope tagged by `type`. Inbound frames carry their
//! payload under `data`:
//!
//! ```json
//! { "type": "auth", "data": { "userId": 12 } }
//! { "type": "chat", "data": { "message": "hi", "listingId": 7, "senderId": 12, "recipientId": 31 } }
//! ```
//!
//! Outbound frames are either a relayed message or an error report:
//!
//! ```json
//! { "type": "chat", "data": { "id": 1, "listingId": 7, ... } }
//! { "type": "error", "message": "invalid payload: message must not be empty" }
//! ```
//!
//! Parsing happens once at the boundary ([`InboundFrame::parse`]) so that the
//! dispatcher matches on a closed enum instead of probing optional JSON fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::{StoredMessage, UserId};
use crate::error::ChatError;
use crate::listing::ListingId;

/// A frame received from a client, already classified and shape-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Auth(AuthPayload),
    Chat(ChatPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    /// Raw text as sent; trimming and emptiness checks happen in the dispatcher.
    pub message: String,
    pub listing_id: ListingId,
    pub sender_id: UserId,
    /// Optional: the server derives the recipient from the listing and only
    /// cross-checks this value when present.
    #[serde(default)]
    pub recipient_id: Option<UserId>,
}

impl InboundFrame {
    /// Parse a text frame into a typed inbound frame.
    ///
    /// - Not JSON, not an object, or missing `type`/`data` -> [`ChatError::Malformed`]
    /// - `type` outside the known set -> [`ChatError::UnknownFrameType`]
    /// - `data` with missing or mistyped fields -> [`ChatError::Validation`]
    pub fn parse(text: &str) -> Result<Self, ChatError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ChatError::Malformed(format!("not valid JSON: {e}")))?;

        let Value::Object(mut envelope) = value else {
            return Err(ChatError::Malformed("expected a JSON object".to_string()));
        };

        let kind = match envelope.remove("type") {
            Some(Value::String(kind)) => kind,
            Some(_) => return Err(ChatError::Malformed("'type' must be a string".to_string())),
            None => return Err(ChatError::Malformed("missing 'type'".to_string())),
        };

        let data = match envelope.remove("data") {
            Some(Value::Null) | None => {
                return Err(ChatError::Malformed("missing 'data'".to_string()));
            }
            Some(data) => data,
        };

        match kind.as_str() {
            "auth" => serde_json::from_value(data)
                .map(InboundFrame::Auth)
                .map_err(|e| ChatError::Validation(format!("auth: {e}"))),
            "chat" => serde_json::from_value(data)
                .map(InboundFrame::Chat)
                .map_err(|e| ChatError::Validation(format!("chat: {e}"))),
            _ => Err(ChatError::UnknownFrameType(kind)),
        }
    }
}

/// A frame sent to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundFrame {
    /// A message relayed live to its recipient.
    Chat { data: StoredMessage },
    /// A recoverable failure reported to the sender of the offending frame.
    Error { message: String },
}

impl From<&ChatError> for OutboundFrame {
    fn from(err: &ChatError) -> Self {
        OutboundFrame::Error {
            message: err.to_string(),
        }
    }
}
