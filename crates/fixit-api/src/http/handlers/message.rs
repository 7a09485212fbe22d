//! Conversation history endpoint.

use axum::Json;
use axum::extract::{Path, State};

use fixit_types::chat::StoredMessage;
use fixit_types::listing::ListingId;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::state::AppState;

/// GET /listings/{id}/messages - Messages of a listing, oldest first.
///
/// Only the listing owner and the accepted repairman may read.
pub async fn list_messages(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<StoredMessage>>, AppError> {
    let listing_id: ListingId = raw_id
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid listing id '{raw_id}'")))?;

    let messages = state.dispatcher.history(listing_id, user_id).await?;
    tracing::debug!(listing_id, user_id, count = messages.len(), "served message history");
    Ok(Json(messages))
}
