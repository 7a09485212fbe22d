//! Conversation history CLI command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use fixit_core::repository::chat_message::ChatMessageRepository;
use fixit_types::listing::ListingId;

use crate::state::AppState;

/// Print every stored message of a listing, oldest first.
///
/// Operator view: no participant check.
pub async fn show_history(state: &AppState, listing_id: ListingId, json: bool) -> Result<()> {
    let messages = state.dispatcher.store().list_by_listing(listing_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages for listing {}.",
            style("i").blue().bold(),
            style(listing_id).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Sent").fg(Color::White),
        Cell::new("From").fg(Color::White),
        Cell::new("To").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for msg in &messages {
        table.add_row(vec![
            Cell::new(msg.created_at.format("%Y-%m-%d %H:%M:%S").to_string()).fg(Color::DarkGrey),
            Cell::new(msg.sender_id).fg(Color::Cyan),
            Cell::new(msg.recipient_id),
            Cell::new(&msg.message),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} message{}",
        style(messages.len()).bold(),
        if messages.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
