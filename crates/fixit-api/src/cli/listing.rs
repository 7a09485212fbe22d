//! Listing and bid CLI commands.
//!
//! Listings and bids normally come from the marketplace service; these
//! commands seed and inspect them so a chat can be opened locally.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use fixit_core::repository::chat_message::ChatMessageRepository;
use fixit_core::repository::listing::ListingRepository;
use fixit_types::error::RepositoryError;
use fixit_types::listing::{BidId, BidStatus, ListingId, NewBid, NewListing};

use crate::state::AppState;

/// Create an open listing.
pub async fn create_listing(state: &AppState, new: NewListing, json: bool) -> Result<()> {
    if new.title.trim().is_empty() {
        bail!("listing title must not be empty");
    }
    let listing = state.listings.create_listing(&new).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        println!(
            "  {} Created listing {} '{}' for owner {}",
            style("✓").green().bold(),
            style(listing.id).cyan(),
            style(&listing.title).bold(),
            listing.owner_id
        );
    }
    Ok(())
}

/// Show a listing, its bids, and how many messages were exchanged.
pub async fn show_listing(state: &AppState, id: ListingId, json: bool) -> Result<()> {
    let Some(listing) = state.listings.get_listing(id).await? else {
        bail!("listing {id} not found");
    };
    let bids = state.listings.bids_for_listing(id).await?;
    let message_count = state.dispatcher.store().count_by_listing(id).await?;

    if json {
        let out = serde_json::json!({
            "listing": listing,
            "bids": bids,
            "messageCount": message_count,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} ({})",
        style(format!("#{}", listing.id)).cyan(),
        style(&listing.title).bold(),
        listing.status
    );
    println!("  Owner:    {}", listing.owner_id);
    println!("  Category: {}", listing.category);
    println!("  Messages: {message_count}");
    println!();

    if bids.is_empty() {
        println!("  {} No bids yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Bid").fg(Color::White),
        Cell::new("Repairman").fg(Color::White),
        Cell::new("Amount").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Comment").fg(Color::White),
    ]);

    for bid in &bids {
        let status = Cell::new(bid.status.to_string());
        let status = if bid.status == BidStatus::Accepted {
            status.fg(Color::Green)
        } else {
            status.fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(bid.id).fg(Color::Cyan),
            Cell::new(bid.repairman_id),
            Cell::new(bid.amount),
            status,
            Cell::new(bid.comment.as_deref().unwrap_or("")),
        ]);
    }

    println!("{table}");
    println!();
    Ok(())
}

/// Place a pending bid.
pub async fn place_bid(state: &AppState, new: NewBid, json: bool) -> Result<()> {
    if new.amount <= 0 {
        bail!("bid amount must be positive");
    }
    let bid = match state.listings.create_bid(&new).await {
        Ok(bid) => bid,
        Err(RepositoryError::NotFound) => bail!("listing {} not found", new.listing_id),
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&bid)?);
    } else {
        println!(
            "  {} Bid {} placed on listing {} by repairman {}",
            style("✓").green().bold(),
            style(bid.id).cyan(),
            bid.listing_id,
            bid.repairman_id
        );
    }
    Ok(())
}

/// Accept a bid; the listing moves to `in_progress` and the chat opens.
pub async fn accept_bid(
    state: &AppState,
    listing_id: ListingId,
    bid_id: BidId,
    json: bool,
) -> Result<()> {
    match state.listings.accept_bid(listing_id, bid_id).await {
        Ok(()) => {}
        Err(RepositoryError::NotFound) => {
            bail!("bid {bid_id} not found on listing {listing_id}")
        }
        Err(RepositoryError::Conflict(msg)) => bail!("cannot accept bid: {msg}"),
        Err(e) => return Err(e.into()),
    }

    if json {
        println!(
            "{}",
            serde_json::json!({"listingId": listing_id, "bidId": bid_id, "accepted": true})
        );
    } else {
        println!(
            "  {} Accepted bid {} on listing {}; chat is open",
            style("✓").green().bold(),
            style(bid_id).cyan(),
            style(listing_id).cyan()
        );
    }
    Ok(())
}
