//! Listing/bid repository trait definition.
//!
//! Listings and bids belong to the marketplace CRUD collaborator. The chat
//! relay only reads them to decide who may talk about a listing; the write
//! operations exist for seeding and for the bid-acceptance transition.

use fixit_types::error::RepositoryError;
use fixit_types::listing::{Bid, BidId, Listing, ListingId, NewBid, NewListing};

/// Repository trait for the listing/bid view used by the relay policy.
pub trait ListingRepository: Send + Sync {
    /// Get a listing by id.
    fn get_listing(
        &self,
        id: ListingId,
    ) -> impl std::future::Future<Output = Result<Option<Listing>, RepositoryError>> + Send;

    /// Get the accepted bid of a listing, if one was accepted.
    fn accepted_bid(
        &self,
        listing_id: ListingId,
    ) -> impl std::future::Future<Output = Result<Option<Bid>, RepositoryError>> + Send;

    /// List all bids placed on a listing, oldest first.
    fn bids_for_listing(
        &self,
        listing_id: ListingId,
    ) -> impl std::future::Future<Output = Result<Vec<Bid>, RepositoryError>> + Send;

    /// Create a new open listing.
    fn create_listing(
        &self,
        listing: &NewListing,
    ) -> impl std::future::Future<Output = Result<Listing, RepositoryError>> + Send;

    /// Place a pending bid on a listing. Returns `NotFound` if the listing does not exist.
    fn create_bid(
        &self,
        bid: &NewBid,
    ) -> impl std::future::Future<Output = Result<Bid, RepositoryError>> + Send;

    /// Accept a bid: atomically moves the listing to `in_progress` and the bid to `accepted`.
    ///
    /// Returns `NotFound` if the bid does not belong to the listing and
    /// `Conflict` if the listing is no longer open.
    fn accept_bid(
        &self,
        listing_id: ListingId,
        bid_id: BidId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
