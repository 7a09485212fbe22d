//! Relay policy: who may message whom about which listing.
//!
//! A conversation exists between a listing's owner and the repairman whose bid
//! the owner accepted, and only after that acceptance. The dispatcher asks the
//! policy for the authoritative participants instead of trusting the
//! sender/recipient ids a client puts in its frames.

use fixit_types::chat::UserId;
use fixit_types::error::ChatError;
use fixit_types::listing::{ListingId, ListingStatus, Participants};

use crate::repository::listing::ListingRepository;

/// Decides the participants of a listing conversation.
pub trait RelayPolicy: Send + Sync {
    /// The two users allowed to exchange messages about `listing_id`.
    ///
    /// Fails with `ListingNotFound` for unknown listings and `ChatNotOpen`
    /// before a bid was accepted.
    fn participants(
        &self,
        listing_id: ListingId,
    ) -> impl std::future::Future<Output = Result<Participants, ChatError>> + Send;

    /// Whether `user` may read the message history of `listing_id`.
    fn may_read(
        &self,
        listing_id: ListingId,
        user: UserId,
    ) -> impl std::future::Future<Output = Result<bool, ChatError>> + Send;
}

/// Policy backed by the listing/bid collaborator's accepted-bid state.
pub struct AcceptedBidPolicy<L: ListingRepository> {
    listings: L,
}

impl<L: ListingRepository> AcceptedBidPolicy<L> {
    pub fn new(listings: L) -> Self {
        Self { listings }
    }
}

impl<L: ListingRepository> RelayPolicy for AcceptedBidPolicy<L> {
    async fn participants(&self, listing_id: ListingId) -> Result<Participants, ChatError> {
        let listing = self
            .listings
            .get_listing(listing_id)
            .await?
            .ok_or(ChatError::ListingNotFound(listing_id))?;

        if listing.status == ListingStatus::Open {
            return Err(ChatError::ChatNotOpen(listing_id));
        }

        let bid = self
            .listings
            .accepted_bid(listing_id)
            .await?
            .ok_or(ChatError::ChatNotOpen(listing_id))?;

        Ok(Participants {
            owner_id: listing.owner_id,
            repairman_id: bid.repairman_id,
        })
    }

    async fn may_read(&self, listing_id: ListingId, user: UserId) -> Result<bool, ChatError> {
        let listing = self
            .listings
            .get_listing(listing_id)
            .await?
            .ok_or(ChatError::ListingNotFound(listing_id))?;

        if listing.owner_id == user {
            return Ok(true);
        }

        // The owner can always read (possibly empty) history; the repairman
        // only once their bid was accepted.
        let accepted = self.listings.accepted_bid(listing_id).await?;
        Ok(accepted.is_some_and(|bid| bid.repairman_id == user))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
