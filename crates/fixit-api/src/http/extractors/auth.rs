//! Bearer token authentication extractor.
//!
//! Extracts and verifies API tokens from:
//! - `Authorization: Bearer <token>` header
//! - `X-API-Key: <token>` header
//!
//! Tokens are SHA-256 hashed and looked up in the `api_tokens` table, which
//! maps each token to the user it was issued for.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use fixit_types::chat::UserId;

use crate::http::error::AppError;
use crate::state::AppState;

/// The user a request's token belongs to. Extracting this validates the token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        match state.tokens.verify(&token).await? {
            Some(user_id) => Ok(AuthUser(user_id)),
            None => Err(AppError::Unauthorized(
                "Invalid token. Provide a valid token via 'Authorization: Bearer <token>' header."
                    .to_string(),
            )),
        }
    }
}

/// Extract the token from request headers.
fn extract_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(key_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing token. Provide via 'Authorization: Bearer <token>' header.".to_string(),
    ))
}
