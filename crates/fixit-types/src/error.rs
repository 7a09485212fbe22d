use thiserror::Error;

use crate::chat::UserId;
use crate::listing::ListingId;

/// Errors raised while handling a frame on a chat channel.
///
/// Every variant is recoverable: the transport turns it into an error frame
/// sent back to the same channel and keeps the channel open.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("unknown frame type '{0}'")]
    UnknownFrameType(String),

    #[error("invalid payload: {0}")]
    Validation(String),

    #[error("channel is not authenticated")]
    NotAuthenticated,

    #[error("sender {claimed} does not match authenticated user {principal}")]
    SenderMismatch { claimed: UserId, principal: UserId },

    #[error("listing {0} not found")]
    ListingNotFound(ListingId),

    #[error("chat for listing {0} is not open")]
    ChatNotOpen(ListingId),

    #[error("user {user} is not a participant of listing {listing}")]
    NotParticipant { listing: ListingId, user: UserId },

    #[error("failed to store message: {0}")]
    Persistence(String),

    #[error("channel is closed")]
    ChannelClosed,
}

/// Errors from repository operations (used by trait definitions in fixit-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        ChatError::Persistence(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::SenderMismatch {
            claimed: 3,
            principal: 4,
        };
        assert_eq!(
            err.to_string(),
            "sender 3 does not match authenticated user 4"
        );
    }

    #[test]
    fn test_repository_error_converts_to_persistence() {
        let err: ChatError = RepositoryError::Query("disk I/O error".to_string()).into();
        assert_eq!(
            err,
            ChatError::Persistence("query error: disk I/O error".to_string())
        );
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
