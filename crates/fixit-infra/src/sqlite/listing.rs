//! SQLite listing/bid repository implementation.
//!
//! Implements `ListingRepository` from `fixit-core`. Only the accepted-bid
//! transition is transactional; everything else is a single statement.

use chrono::Utc;
use fixit_core::repository::listing::ListingRepository;
use fixit_types::error::RepositoryError;
use fixit_types::listing::{
    Bid, BidId, BidStatus, Listing, ListingId, ListingStatus, NewBid, NewListing,
};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, query_error};

/// SQLite-backed implementation of `ListingRepository`.
#[derive(Clone)]
pub struct SqliteListingRepository {
    pool: DatabasePool,
}

impl SqliteListingRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn listing_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Listing, RepositoryError> {
    let status: String = row.try_get("status").map_err(query_error)?;
    Ok(Listing {
        id: row.try_get("id").map_err(query_error)?,
        owner_id: row.try_get("owner_id").map_err(query_error)?,
        title: row.try_get("title").map_err(query_error)?,
        description: row.try_get("description").map_err(query_error)?,
        category: row.try_get("category").map_err(query_error)?,
        image_url: row.try_get("image_url").map_err(query_error)?,
        status: status.parse::<ListingStatus>().map_err(RepositoryError::Query)?,
    })
}

fn bid_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Bid, RepositoryError> {
    let status: String = row.try_get("status").map_err(query_error)?;
    Ok(Bid {
        id: row.try_get("id").map_err(query_error)?,
        listing_id: row.try_get("listing_id").map_err(query_error)?,
        repairman_id: row.try_get("repairman_id").map_err(query_error)?,
        amount: row.try_get("amount").map_err(query_error)?,
        comment: row.try_get("comment").map_err(query_error)?,
        status: status.parse::<BidStatus>().map_err(RepositoryError::Query)?,
    })
}

impl ListingRepository for SqliteListingRepository {
    async fn get_listing(&self, id: ListingId) -> Result<Option<Listing>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM listings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(listing_from_row).transpose()
    }

    async fn accepted_bid(&self, listing_id: ListingId) -> Result<Option<Bid>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM bids WHERE listing_id = ? AND status = 'accepted'")
            .bind(listing_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(bid_from_row).transpose()
    }

    async fn bids_for_listing(&self, listing_id: ListingId) -> Result<Vec<Bid>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM bids WHERE listing_id = ? ORDER BY id ASC")
            .bind(listing_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(bid_from_row).collect()
    }

    async fn create_listing(&self, listing: &NewListing) -> Result<Listing, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO listings (owner_id, title, description, category, image_url, status, created_at)
             VALUES (?, ?, ?, ?, ?, 'open', ?)",
        )
        .bind(listing.owner_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(&listing.category)
        .bind(&listing.image_url)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(Listing {
            id: result.last_insert_rowid(),
            owner_id: listing.owner_id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            category: listing.category.clone(),
            image_url: listing.image_url.clone(),
            status: ListingStatus::Open,
        })
    }

    async fn create_bid(&self, bid: &NewBid) -> Result<Bid, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO bids (listing_id, repairman_id, amount, comment, status, created_at)
             VALUES (?, ?, ?, ?, 'pending', ?)",
        )
        .bind(bid.listing_id)
        .bind(bid.repairman_id)
        .bind(bid.amount)
        .bind(&bid.comment)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("FOREIGN KEY") {
                    return RepositoryError::NotFound;
                }
            }
            query_error(e)
        })?;

        Ok(Bid {
            id: result.last_insert_rowid(),
            listing_id: bid.listing_id,
            repairman_id: bid.repairman_id,
            amount: bid.amount,
            comment: bid.comment.clone(),
            status: BidStatus::Pending,
        })
    }

    async fn accept_bid(&self, listing_id: ListingId, bid_id: BidId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let status: Option<String> = sqlx::query_scalar("SELECT status FROM listings WHERE id = ?")
            .bind(listing_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_error)?;
        let status = status
            .ok_or(RepositoryError::NotFound)?
            .parse::<ListingStatus>()
            .map_err(RepositoryError::Query)?;
        if status != ListingStatus::Open {
            return Err(RepositoryError::Conflict(format!(
                "listing {listing_id} is {status}, not open"
            )));
        }

        let updated = sqlx::query(
            "UPDATE bids SET status = 'accepted' WHERE id = ? AND listing_id = ? AND status = 'pending'",
        )
        .bind(bid_id)
        .bind(listing_id)
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;
        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("UPDATE listings SET status = 'in_progress' WHERE id = ?")
            .bind(listing_id)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;
        Ok(())
    }
}
