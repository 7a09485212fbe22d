//! API token store.
//!
//! Tokens identify a user on the history endpoint. Only the SHA-256 hash of a
//! token is persisted; the plaintext is returned once at issue time.

use chrono::Utc;
use fixit_types::chat::UserId;
use fixit_types::error::RepositoryError;
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::pool::DatabasePool;
use super::{format_datetime, query_error};

/// Prefix that makes Fixit tokens recognizable in logs and config files.
pub const TOKEN_PREFIX: &str = "fixit_";

/// Compute SHA-256 hash of a token (lowercase hex).
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{:x}", digest)
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    format!(
        "{TOKEN_PREFIX}{}",
        bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
    )
}

/// SQLite-backed store of hashed API tokens.
#[derive(Clone)]
pub struct SqliteTokenRepository {
    pool: DatabasePool,
}

impl SqliteTokenRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Mint a new token for `user_id` and return its plaintext.
    pub async fn issue(&self, user_id: UserId) -> Result<String, RepositoryError> {
        let token = generate_token();
        let id = uuid::Uuid::now_v7().to_string();

        sqlx::query(
            "INSERT INTO api_tokens (id, user_id, token_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(hash_token(&token))
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        tracing::info!(user_id, token_id = %id, "issued api token");
        Ok(token)
    }

    /// Resolve a presented token to its user, or `None` if unknown.
    pub async fn verify(&self, token: &str) -> Result<Option<UserId>, RepositoryError> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT id, user_id FROM api_tokens WHERE token_hash = ?")
                .bind(hash_token(token))
                .fetch_optional(&self.pool.reader)
                .await
                .map_err(query_error)?;

        let Some((id, user_id)) = row else {
            return Ok(None);
        };

        // Best effort; a failed timestamp update must not fail authentication.
        if let Err(e) = sqlx::query("UPDATE api_tokens SET last_used_at = ? WHERE id = ?")
            .bind(format_datetime(&Utc::now()))
            .bind(&id)
            .execute(&self.pool.writer)
            .await
        {
            tracing::debug!(token_id = %id, error = %e, "failed to record token use");
        }

        Ok(Some(user_id))
    }

    /// Delete every token of `user_id`. Returns how many were removed.
    pub async fn revoke_user(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM api_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected())
    }
}
