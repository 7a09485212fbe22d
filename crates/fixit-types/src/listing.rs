use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::chat::UserId;

pub type ListingId = i64;
pub type BidId = i64;

/// A repair request posted by a device owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub status: ListingStatus,
}

/// Listing lifecycle states.
///
/// - Open: accepting bids
/// - InProgress: a bid was accepted; the owner and repairman may chat
/// - Completed: repair finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Open,
    InProgress,
    Completed,
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingStatus::Open => write!(f, "open"),
            ListingStatus::InProgress => write!(f, "in_progress"),
            ListingStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(ListingStatus::Open),
            "in_progress" => Ok(ListingStatus::InProgress),
            "completed" => Ok(ListingStatus::Completed),
            other => Err(format!("invalid listing status: '{other}'")),
        }
    }
}

impl Default for ListingStatus {
    fn default() -> Self {
        ListingStatus::Open
    }
}

/// A repairman's offer against a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: BidId,
    pub listing_id: ListingId,
    pub repairman_id: UserId,
    /// Offer in minor currency units.
    pub amount: i64,
    pub comment: Option<String>,
    pub status: BidStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    Pending,
    Accepted,
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BidStatus::Pending => write!(f, "pending"),
            BidStatus::Accepted => write!(f, "accepted"),
        }
    }
}

impl FromStr for BidStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BidStatus::Pending),
            "accepted" => Ok(BidStatus::Accepted),
            other => Err(format!("invalid bid status: '{other}'")),
        }
    }
}

/// Input for creating a listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
}

/// Input for creating a bid.
#[derive(Debug, Clone)]
pub struct NewBid {
    pub listing_id: ListingId,
    pub repairman_id: UserId,
    pub amount: i64,
    pub comment: Option<String>,
}

/// The two users allowed to converse about a listing.
///
/// Only exists once the owner accepted a bid; the repairman is the author of
/// that bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participants {
    pub owner_id: UserId,
    pub repairman_id: UserId,
}

impl Participants {
    /// The other party of the conversation, or `None` if `user` is not a participant.
    pub fn counterpart(&self, user: UserId) -> Option<UserId> {
        if user == self.owner_id {
            Some(self.repairman_id)
        } else if user == self.repairman_id {
            Some(self.owner_id)
        } else {
            None
        }
    }

    pub fn includes(&self, user: UserId) -> bool {
        user == self.owner_id || user == self.repairman_id
    }
}
