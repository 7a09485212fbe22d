//! Connection registry: which live channel currently speaks for each user.
//!
//! Each authenticated user maps to exactly one [`ChannelHandle`]. A newer
//! connection for the same user replaces the older entry (last connect wins,
//! no fan-out to several devices). Entries are removed by channel identity so
//! that an old connection closing late never evicts the newer one.

use dashmap::DashMap;
use fixit_types::chat::{ConnectionId, UserId};
use fixit_types::frame::OutboundFrame;
use tokio::sync::mpsc;
use tracing::debug;

/// Outcome of an attempt to push a frame into a recipient's channel.
///
/// Live delivery is reported separately from persistence: a message can be
/// stored and still not delivered live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The frame was queued on the recipient's open channel.
    Delivered,
    /// No channel is registered for the recipient.
    RecipientOffline,
    /// The recipient's channel is closed or its buffer is full.
    WriteFailed,
}

/// Sending side of one live channel.
///
/// Cloning a handle is cheap; clones share the same identity and outbox.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    id: ConnectionId,
    outbox: mpsc::Sender<OutboundFrame>,
}

impl ChannelHandle {
    pub fn new(id: ConnectionId, outbox: mpsc::Sender<OutboundFrame>) -> Self {
        Self { id, outbox }
    }

    /// Create a handle with a fresh identity and a bounded outbox.
    ///
    /// The returned receiver is drained by the transport into the socket.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutboundFrame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(ConnectionId::new(), tx), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Whether the transport side of this channel is still draining frames.
    pub fn is_open(&self) -> bool {
        !self.outbox.is_closed()
    }

    /// Queue a frame without waiting.
    pub fn deliver(&self, frame: OutboundFrame) -> RelayOutcome {
        match self.outbox.try_send(frame) {
            Ok(()) => RelayOutcome::Delivered,
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(connection_id = %self.id, "outbox full, dropping frame");
                RelayOutcome::WriteFailed
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(connection_id = %self.id, "outbox closed, dropping frame");
                RelayOutcome::WriteFailed
            }
        }
    }
}

/// Map of authenticated users to their single live channel.
///
/// Built once per server process and shared by every channel task; all
/// operations are atomic with respect to each other.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: DashMap<UserId, ChannelHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or overwrite) the channel for `user`.
    ///
    /// Returns the id of the channel that was displaced, if any. The displaced
    /// channel is not closed; it simply stops receiving relays.
    pub fn register(&self, user: UserId, handle: ChannelHandle) -> Option<ConnectionId> {
        let new_id = handle.id();
        let displaced = self
            .entries
            .insert(user, handle)
            .map(|old| old.id())
            .filter(|old| *old != new_id);
        if let Some(old) = displaced {
            debug!(user_id = user, connection_id = %new_id, displaced = %old, "channel replaced");
        }
        displaced
    }

    /// The channel currently registered for `user`.
    pub fn lookup(&self, user: UserId) -> Option<ChannelHandle> {
        self.entries.get(&user).map(|entry| entry.value().clone())
    }

    /// Remove every entry that points at the channel `id`.
    ///
    /// Entries of other channels, including newer channels of the same user,
    /// are left alone. Returns how many entries were removed; unknown ids are
    /// a no-op.
    pub fn unregister(&self, id: ConnectionId) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, handle| {
            if handle.id() == id {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Remove `user`'s entry only if it still points at channel `id`.
    pub fn unregister_user(&self, user: UserId, id: ConnectionId) -> bool {
        self.entries
            .remove_if(&user, |_, handle| handle.id() == id)
            .is_some()
    }

    pub fn is_online(&self, user: UserId) -> bool {
        self.entries.contains_key(&user)
    }

    /// Number of users with a registered channel.
    pub fn online_count(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
