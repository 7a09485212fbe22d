//! Server configuration types for Fixit.
//!
//! `ServerConfig` represents the top-level `config.toml` that controls the
//! listen address, database location, and chat channel limits.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Fixit server.
///
/// Loaded from `~/.fixit/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind the HTTP/WebSocket listener on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the HTTP/WebSocket listener on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database file name, relative to the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Maximum length of a chat message, in characters, after trimming.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Capacity of each channel's outbound frame buffer.
    #[serde(default = "default_relay_buffer")]
    pub relay_buffer: usize,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,

    /// Allow any origin, method, and header through CORS.
    #[serde(default = "default_cors_permissive")]
    pub cors_permissive: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_database_file() -> String {
    "fixit.db".to_string()
}

fn default_max_message_chars() -> usize {
    4000
}

fn default_relay_buffer() -> usize {
    64
}

fn default_cors_permissive() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_file: default_database_file(),
            max_message_chars: default_max_message_chars(),
            relay_buffer: default_relay_buffer(),
            otel: false,
            cors_permissive: default_cors_permissive(),
        }
    }
}
