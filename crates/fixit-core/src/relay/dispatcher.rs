//! Per-channel protocol state machine.
//!
//! A channel starts `ConnectedUnauthenticated`, becomes `Authenticated` after
//! an `auth` frame, and ends `Closed` when the transport goes away. Chat
//! frames are validated, checked against the [`RelayPolicy`], appended to the
//! message store, and then relayed to the recipient's channel if it is
//! registered. Storing and live delivery are independent outcomes: a message
//! that was stored but not delivered is still a success for the sender.
//!
//! The dispatcher never touches the socket. It returns a [`DispatchOutcome`];
//! the transport turns rejections into error frames on the same channel.

use std::sync::Arc;

use fixit_types::chat::{ConnectionId, NewChatMessage, StoredMessage, UserId};
use fixit_types::error::ChatError;
use fixit_types::frame::{ChatPayload, InboundFrame, OutboundFrame};
use fixit_types::listing::ListingId;
use tracing::{debug, info, warn};

use super::policy::RelayPolicy;
use super::registry::{ChannelHandle, ConnectionRegistry, RelayOutcome};
use crate::repository::chat_message::ChatMessageRepository;

/// Lifecycle of one channel. There is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    ConnectedUnauthenticated,
    Authenticated(UserId),
    Closed,
}

/// Server-side state of one open channel.
#[derive(Debug)]
pub struct ChannelSession {
    handle: ChannelHandle,
    state: ChannelState,
}

impl ChannelSession {
    pub fn id(&self) -> ConnectionId {
        self.handle.id()
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// The authenticated user, if any.
    pub fn principal(&self) -> Option<UserId> {
        match self.state {
            ChannelState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// What happened to one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The channel is now registered for `user_id`.
    Authenticated {
        user_id: UserId,
        displaced: Option<ConnectionId>,
    },
    /// The message was stored; `relay` says whether it also went out live.
    Chat {
        stored: StoredMessage,
        relay: RelayOutcome,
    },
    /// The frame was refused. Nothing was stored.
    Rejected(ChatError),
}

impl DispatchOutcome {
    /// Frame to send back to the originating channel, if any.
    pub fn reply(&self) -> Option<OutboundFrame> {
        match self {
            DispatchOutcome::Rejected(err) => Some(OutboundFrame::from(err)),
            _ => None,
        }
    }

    /// Queue [`reply`](Self::reply) on the originating channel.
    ///
    /// Returns `None` when there is nothing to send.
    pub fn send_reply(&self, handle: &ChannelHandle) -> Option<RelayOutcome> {
        let frame = self.reply()?;
        let outcome = handle.deliver(frame);
        if outcome != RelayOutcome::Delivered {
            warn!(connection_id = %handle.id(), ?outcome, "error reply dropped");
        }
        Some(outcome)
    }
}

/// Composition root of the chat relay: store, policy, and registry.
pub struct ChatDispatcher<S: ChatMessageRepository, P: RelayPolicy> {
    store: Arc<S>,
    policy: Arc<P>,
    registry: Arc<ConnectionRegistry>,
    max_message_chars: usize,
}

impl<S: ChatMessageRepository, P: RelayPolicy> ChatDispatcher<S, P> {
    pub fn new(
        store: Arc<S>,
        policy: Arc<P>,
        registry: Arc<ConnectionRegistry>,
        max_message_chars: usize,
    ) -> Self {
        Self {
            store,
            policy,
            registry,
            max_message_chars,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start tracking a freshly opened channel. It is anonymous until `auth`.
    pub fn open(&self, handle: ChannelHandle) -> ChannelSession {
        debug!(connection_id = %handle.id(), "channel opened");
        ChannelSession {
            handle,
            state: ChannelState::ConnectedUnauthenticated,
        }
    }

    /// Handle one text frame received on `session`.
    pub async fn handle_text(&self, session: &mut ChannelSession, text: &str) -> DispatchOutcome {
        if session.state == ChannelState::Closed {
            return DispatchOutcome::Rejected(ChatError::ChannelClosed);
        }

        let frame = match InboundFrame::parse(text) {
            Ok(frame) => frame,
            Err(err) => {
                debug!(connection_id = %session.id(), error = %err, "rejected inbound frame");
                return DispatchOutcome::Rejected(err);
            }
        };

        match frame {
            InboundFrame::Auth(auth) => self.authenticate(session, auth.user_id),
            InboundFrame::Chat(chat) => match self.send_chat(session, chat).await {
                Ok((stored, relay)) => DispatchOutcome::Chat { stored, relay },
                Err(err) => {
                    debug!(connection_id = %session.id(), error = %err, "rejected chat frame");
                    DispatchOutcome::Rejected(err)
                }
            },
        }
    }

    /// Tear down a channel: drop every registry entry pointing at it.
    ///
    /// Returns how many entries were removed. Closing twice is harmless.
    pub fn close(&self, session: &mut ChannelSession) -> usize {
        if session.state == ChannelState::Closed {
            return 0;
        }
        let removed = self.registry.unregister(session.id());
        info!(
            connection_id = %session.id(),
            user_id = ?session.principal(),
            removed,
            "channel closed"
        );
        session.state = ChannelState::Closed;
        removed
    }

    /// Conversation history of a listing, for a reader the policy allows.
    ///
    /// Served out of band (HTTP), never pushed over a channel.
    pub async fn history(
        &self,
        listing_id: ListingId,
        reader: UserId,
    ) -> Result<Vec<StoredMessage>, ChatError> {
        if !self.policy.may_read(listing_id, reader).await? {
            return Err(ChatError::NotParticipant {
                listing: listing_id,
                user: reader,
            });
        }
        Ok(self.store.list_by_listing(listing_id).await?)
    }

    fn authenticate(&self, session: &mut ChannelSession, user_id: UserId) -> DispatchOutcome {
        // Moving a channel to another user must not leave it filed under the old one.
        if let Some(previous) = session.principal() {
            if previous != user_id {
                self.registry.unregister_user(previous, session.id());
            }
        }

        let displaced = self.registry.register(user_id, session.handle.clone());
        session.state = ChannelState::Authenticated(user_id);
        info!(connection_id = %session.id(), user_id, "channel authenticated");

        DispatchOutcome::Authenticated { user_id, displaced }
    }

    async fn send_chat(
        &self,
        session: &ChannelSession,
        chat: ChatPayload,
    ) -> Result<(StoredMessage, RelayOutcome), ChatError> {
        let text = validate_message(&chat.message, self.max_message_chars)?;

        let principal = session.principal().ok_or(ChatError::NotAuthenticated)?;
        if chat.sender_id != principal {
            return Err(ChatError::SenderMismatch {
                claimed: chat.sender_id,
                principal,
            });
        }

        let participants = self.policy.participants(chat.listing_id).await?;
        let recipient = participants
            .counterpart(principal)
            .ok_or(ChatError::NotParticipant {
                listing: chat.listing_id,
                user: principal,
            })?;
        if let Some(claimed) = chat.recipient_id {
            if claimed != recipient {
                return Err(ChatError::NotParticipant {
                    listing: chat.listing_id,
                    user: claimed,
                });
            }
        }

        let stored = self
            .store
            .append(&NewChatMessage {
                listing_id: chat.listing_id,
                sender_id: principal,
                recipient_id: recipient,
                message: text,
            })
            .await
            .map_err(|e| {
                warn!(listing_id = chat.listing_id, error = %e, "failed to store chat message");
                ChatError::from(e)
            })?;

        let relay = match self.registry.lookup(recipient) {
            Some(handle) => handle.deliver(OutboundFrame::Chat {
                data: stored.clone(),
            }),
            None => RelayOutcome::RecipientOffline,
        };
        debug!(
            message_id = stored.id,
            listing_id = stored.listing_id,
            recipient_id = recipient,
            ?relay,
            "chat message stored"
        );

        Ok((stored, relay))
    }
}

/// Trim a message and enforce the non-empty and length rules.
pub fn validate_message(raw: &str, max_chars: usize) -> Result<String, ChatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ChatError::Validation("message must not be empty".to_string()));
    }
    if trimmed.chars().count() > max_chars {
        return Err(ChatError::Validation(format!(
            "message exceeds {max_chars} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use fixit_types::error::RepositoryError;
    use fixit_types::listing::Participants;
    use serde_json::json;
    use tokio::sync::mpsc;

    use crate::repository::chat_message::InMemoryChatMessageRepository;

    const OWNER: UserId = 1;
    const REPAIRMAN: UserId = 2;
    const STRANGER: UserId = 3;
    const LISTING: ListingId = 7;

    /// Listing 7 is open for chat between OWNER and REPAIRMAN; nothing else exists.
    struct FixedPolicy;

    impl RelayPolicy for FixedPolicy {
        async fn participants(&self, listing_id: ListingId) -> Result<Participants, ChatError> {
            if listing_id == LISTING {
                Ok(Participants {
                    owner_id: OWNER,
                    repairman_id: REPAIRMAN,
                })
            } else {
                Err(ChatError::ListingNotFound(listing_id))
            }
        }

        async fn may_read(&self, listing_id: ListingId, user: UserId) -> Result<bool, ChatError> {
            Ok(self.participants(listing_id).await?.includes(user))
        }
    }

    struct FailingStore;

    impl ChatMessageRepository for FailingStore {
        async fn append(&self, _msg: &NewChatMessage) -> Result<StoredMessage, RepositoryError> {
            Err(RepositoryError::Connection)
        }

        async fn list_by_listing(
            &self,
            _listing_id: ListingId,
        ) -> Result<Vec<StoredMessage>, RepositoryError> {
            Err(RepositoryError::Connection)
        }

        async fn count_by_listing(&self, _listing_id: ListingId) -> Result<i64, RepositoryError> {
            Err(RepositoryError::Connection)
        }
    }

    type Dispatcher = ChatDispatcher<InMemoryChatMessageRepository, FixedPolicy>;

    fn dispatcher() -> Dispatcher {
        ChatDispatcher::new(
            Arc::new(InMemoryChatMessageRepository::new()),
            Arc::new(FixedPolicy),
            Arc::new(ConnectionRegistry::new()),
            100,
        )
    }

    fn connect<S: ChatMessageRepository, P: RelayPolicy>(
        d: &ChatDispatcher<S, P>,
    ) -> (ChannelSession, mpsc::Receiver<OutboundFrame>) {
        let (handle, rx) = ChannelHandle::channel(8);
        (d.open(handle), rx)
    }

    fn auth(user: UserId) -> String {
        json!({"type": "auth", "data": {"userId": user}}).to_string()
    }

    fn chat(message: &str, sender: UserId, recipient: UserId) -> String {
        json!({
            "type": "chat",
            "data": {
                "message": message,
                "listingId": LISTING,
                "senderId": sender,
                "recipientId": recipient,
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn auth_registers_channel() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);
        assert_eq!(session.state(), ChannelState::ConnectedUnauthenticated);

        let outcome = d.handle_text(&mut session, &auth(OWNER)).await;
        assert_eq!(
            outcome,
            DispatchOutcome::Authenticated {
                user_id: OWNER,
                displaced: None
            }
        );
        assert_eq!(outcome.reply(), None);
        assert_eq!(session.state(), ChannelState::Authenticated(OWNER));
        assert_eq!(d.registry().lookup(OWNER).unwrap().id(), session.id());
    }

    #[tokio::test]
    async fn re_auth_is_idempotent() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);
        d.handle_text(&mut session, &auth(OWNER)).await;
        let outcome = d.handle_text(&mut session, &auth(OWNER)).await;

        assert!(matches!(
            outcome,
            DispatchOutcome::Authenticated { displaced: None, .. }
        ));
        assert_eq!(d.registry().online_count(), 1);
    }

    #[tokio::test]
    async fn re_auth_as_other_user_moves_channel() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);
        d.handle_text(&mut session, &auth(OWNER)).await;
        d.handle_text(&mut session, &auth(REPAIRMAN)).await;

        assert!(!d.registry().is_online(OWNER));
        assert_eq!(d.registry().lookup(REPAIRMAN).unwrap().id(), session.id());

        d.close(&mut session);
        assert_eq!(d.registry().online_count(), 0);
    }

    #[tokio::test]
    async fn malformed_frames_get_error_replies_and_keep_channel() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);

        for text in ["not json", r#"{"data":{}}"#, r#"{"type":"chat"}"#] {
            let outcome = d.handle_text(&mut session, text).await;
            assert!(matches!(outcome, DispatchOutcome::Rejected(ChatError::Malformed(_))));
            assert!(matches!(outcome.reply(), Some(OutboundFrame::Error { .. })));
        }

        let outcome = d
            .handle_text(&mut session, r#"{"type":"typing","data":{}}"#)
            .await;
        assert!(matches!(
            outcome,
            DispatchOutcome::Rejected(ChatError::UnknownFrameType(_))
        ));

        assert_eq!(session.state(), ChannelState::ConnectedUnauthenticated);
        let outcome = d.handle_text(&mut session, &auth(OWNER)).await;
        assert!(matches!(outcome, DispatchOutcome::Authenticated { .. }));
    }

    #[tokio::test]
    async fn rejection_outcome_is_cloneable() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);
        let outcome = d.handle_text(&mut session, "not json").await;

        let copy = outcome.clone();
        assert_eq!(copy, outcome);
        assert_eq!(copy.reply(), outcome.reply());
    }

    #[tokio::test]
    async fn send_reply_queues_error_frame() {
        let d = dispatcher();
        let (mut session, mut rx) = connect(&d);
        let (handle, mut outbox) = ChannelHandle::channel(2);

        let outcome = d.handle_text(&mut session, "not json").await;
        assert_eq!(outcome.send_reply(&handle), Some(RelayOutcome::Delivered));
        assert!(matches!(outbox.try_recv(), Ok(OutboundFrame::Error { .. })));
        assert!(rx.try_recv().is_err());

        let accepted = d.handle_text(&mut session, &auth(OWNER)).await;
        assert_eq!(accepted.send_reply(&handle), None);
        assert!(outbox.try_recv().is_err());
    }

    #[tokio::test]
    async fn send_reply_reports_full_outbox() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);
        let outcome = d.handle_text(&mut session, "not json").await;

        let (handle, mut outbox) = ChannelHandle::channel(1);
        assert_eq!(outcome.send_reply(&handle), Some(RelayOutcome::Delivered));
        assert_eq!(outcome.send_reply(&handle), Some(RelayOutcome::WriteFailed));

        assert!(matches!(outbox.try_recv(), Ok(OutboundFrame::Error { .. })));
        assert!(outbox.try_recv().is_err());

        drop(outbox);
        assert_eq!(outcome.send_reply(&handle), Some(RelayOutcome::WriteFailed));
    }

    #[tokio::test]
    async fn empty_messages_are_never_stored() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);
        d.handle_text(&mut session, &auth(OWNER)).await;

        for text in ["", "   ", "\n\t "] {
            let outcome = d.handle_text(&mut session, &chat(text, OWNER, REPAIRMAN)).await;
            assert!(matches!(outcome, DispatchOutcome::Rejected(ChatError::Validation(_))));
        }
        assert!(d.store().is_empty());
    }

    #[tokio::test]
    async fn overlong_messages_are_rejected() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);
        d.handle_text(&mut session, &auth(OWNER)).await;

        let long = "x".repeat(101);
        let outcome = d.handle_text(&mut session, &chat(&long, OWNER, REPAIRMAN)).await;
        assert!(matches!(outcome, DispatchOutcome::Rejected(ChatError::Validation(_))));
        assert!(d.store().is_empty());
    }

    #[tokio::test]
    async fn chat_before_auth_is_rejected() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);
        let outcome = d.handle_text(&mut session, &chat("hi", OWNER, REPAIRMAN)).await;
        assert_eq!(outcome, DispatchOutcome::Rejected(ChatError::NotAuthenticated));
        assert!(d.store().is_empty());
    }

    #[tokio::test]
    async fn spoofed_sender_is_rejected() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);
        d.handle_text(&mut session, &auth(STRANGER)).await;

        let outcome = d.handle_text(&mut session, &chat("hi", OWNER, REPAIRMAN)).await;
        assert_eq!(
            outcome,
            DispatchOutcome::Rejected(ChatError::SenderMismatch {
                claimed: OWNER,
                principal: STRANGER
            })
        );
        assert!(d.store().is_empty());
    }

    #[tokio::test]
    async fn non_participants_cannot_send_or_redirect() {
        let d = dispatcher();
        let (mut stranger, _rx) = connect(&d);
        d.handle_text(&mut stranger, &auth(STRANGER)).await;
        let outcome = d.handle_text(&mut stranger, &chat("hi", STRANGER, OWNER)).await;
        assert!(matches!(
            outcome,
            DispatchOutcome::Rejected(ChatError::NotParticipant { user: STRANGER, .. })
        ));

        let (mut owner, _rx) = connect(&d);
        d.handle_text(&mut owner, &auth(OWNER)).await;
        let outcome = d.handle_text(&mut owner, &chat("hi", OWNER, STRANGER)).await;
        assert!(matches!(
            outcome,
            DispatchOutcome::Rejected(ChatError::NotParticipant { user: STRANGER, .. })
        ));
        assert!(d.store().is_empty());
    }

    #[tokio::test]
    async fn unknown_listing_is_rejected() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);
        d.handle_text(&mut session, &auth(OWNER)).await;

        let frame = json!({
            "type": "chat",
            "data": {"message": "hi", "listingId": 99, "senderId": OWNER}
        })
        .to_string();
        let outcome = d.handle_text(&mut session, &frame).await;
        assert_eq!(outcome, DispatchOutcome::Rejected(ChatError::ListingNotFound(99)));
    }

    #[tokio::test]
    async fn online_recipient_gets_exactly_one_relay() {
        let d = dispatcher();
        let (mut owner, mut owner_rx) = connect(&d);
        let (mut repairman, mut repairman_rx) = connect(&d);
        d.handle_text(&mut owner, &auth(OWNER)).await;
        d.handle_text(&mut repairman, &auth(REPAIRMAN)).await;

        let outcome = d
            .handle_text(&mut owner, &chat("  hello  ", OWNER, REPAIRMAN))
            .await;
        let DispatchOutcome::Chat { stored, relay } = outcome else {
            panic!("expected chat outcome");
        };
        assert_eq!(relay, RelayOutcome::Delivered);
        assert_eq!(stored.message, "hello");
        assert_eq!(stored.recipient_id, REPAIRMAN);
        assert_eq!(d.store().len(), 1);

        let frame = repairman_rx.try_recv().unwrap();
        assert_eq!(frame, OutboundFrame::Chat { data: stored });
        assert!(repairman_rx.try_recv().is_err());
        // The sender gets nothing back on success.
        assert!(owner_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn recipient_derived_when_omitted() {
        let d = dispatcher();
        let (mut repairman, _rx) = connect(&d);
        d.handle_text(&mut repairman, &auth(REPAIRMAN)).await;

        let frame = json!({
            "type": "chat",
            "data": {"message": "on my way", "listingId": LISTING, "senderId": REPAIRMAN}
        })
        .to_string();
        let outcome = d.handle_text(&mut repairman, &frame).await;
        let DispatchOutcome::Chat { stored, .. } = outcome else {
            panic!("expected chat outcome");
        };
        assert_eq!(stored.recipient_id, OWNER);
    }

    #[tokio::test]
    async fn offline_recipient_still_stored_without_error() {
        let d = dispatcher();
        let (mut owner, mut owner_rx) = connect(&d);
        d.handle_text(&mut owner, &auth(OWNER)).await;

        let outcome = d.handle_text(&mut owner, &chat("hello", OWNER, REPAIRMAN)).await;
        assert!(matches!(
            outcome,
            DispatchOutcome::Chat {
                relay: RelayOutcome::RecipientOffline,
                ..
            }
        ));
        assert_eq!(outcome.reply(), None);
        assert_eq!(d.store().len(), 1);
        assert!(owner_rx.try_recv().is_err());

        // A late connect does not replay the message live.
        let (mut repairman, mut repairman_rx) = connect(&d);
        d.handle_text(&mut repairman, &auth(REPAIRMAN)).await;
        assert!(repairman_rx.try_recv().is_err());

        let history = d.history(LISTING, REPAIRMAN).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message, "hello");
    }

    #[tokio::test]
    async fn closed_recipient_channel_is_a_silent_write_failure() {
        let d = dispatcher();
        let (mut owner, _owner_rx) = connect(&d);
        let (mut repairman, repairman_rx) = connect(&d);
        d.handle_text(&mut owner, &auth(OWNER)).await;
        d.handle_text(&mut repairman, &auth(REPAIRMAN)).await;
        drop(repairman_rx);

        let outcome = d.handle_text(&mut owner, &chat("hello", OWNER, REPAIRMAN)).await;
        assert!(matches!(
            outcome,
            DispatchOutcome::Chat {
                relay: RelayOutcome::WriteFailed,
                ..
            }
        ));
        assert_eq!(outcome.reply(), None);
        assert_eq!(d.store().len(), 1);
    }

    #[tokio::test]
    async fn persistence_failure_is_reported_and_not_relayed() {
        let d = ChatDispatcher::new(
            Arc::new(FailingStore),
            Arc::new(FixedPolicy),
            Arc::new(ConnectionRegistry::new()),
            100,
        );
        let (mut owner, _owner_rx) = connect(&d);
        let (mut repairman, mut repairman_rx) = connect(&d);
        d.handle_text(&mut owner, &auth(OWNER)).await;
        d.handle_text(&mut repairman, &auth(REPAIRMAN)).await;

        let outcome = d.handle_text(&mut owner, &chat("hello", OWNER, REPAIRMAN)).await;
        assert!(matches!(
            outcome,
            DispatchOutcome::Rejected(ChatError::Persistence(_))
        ));
        assert!(matches!(outcome.reply(), Some(OutboundFrame::Error { .. })));
        assert!(repairman_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn close_unregisters_and_rejects_later_frames() {
        let d = dispatcher();
        let (mut session, _rx) = connect(&d);
        d.handle_text(&mut session, &auth(OWNER)).await;

        assert_eq!(d.close(&mut session), 1);
        assert_eq!(session.state(), ChannelState::Closed);
        assert!(!d.registry().is_online(OWNER));
        assert_eq!(d.close(&mut session), 0);

        let outcome = d.handle_text(&mut session, &auth(OWNER)).await;
        assert_eq!(outcome, DispatchOutcome::Rejected(ChatError::ChannelClosed));
    }

    #[tokio::test]
    async fn late_close_of_old_channel_keeps_new_one() {
        let d = dispatcher();
        let (mut old, _old_rx) = connect(&d);
        let (mut new, _new_rx) = connect(&d);
        d.handle_text(&mut old, &auth(OWNER)).await;
        let outcome = d.handle_text(&mut new, &auth(OWNER)).await;
        assert_eq!(
            outcome,
            DispatchOutcome::Authenticated {
                user_id: OWNER,
                displaced: Some(old.id())
            }
        );

        assert_eq!(d.close(&mut old), 0);
        assert_eq!(d.registry().lookup(OWNER).unwrap().id(), new.id());
    }

    #[tokio::test]
    async fn history_requires_participant() {
        let d = dispatcher();
        let err = d.history(LISTING, STRANGER).await.unwrap_err();
        assert_eq!(
            err,
            ChatError::NotParticipant {
                listing: LISTING,
                user: STRANGER
            }
        );
        assert!(d.history(LISTING, OWNER).await.unwrap().is_empty());
    }

    #[test]
    fn validate_message_trims() {
        assert_eq!(validate_message("  hi \n", 10).unwrap(), "hi");
        assert!(validate_message(" ", 10).is_err());
        assert!(validate_message("héllo", 5).is_ok());
        assert!(validate_message("héllo!", 5).is_err());
    }
}
