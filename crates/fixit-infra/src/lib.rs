//! Infrastructure layer for Fixit.
//!
//! Contains implementations of the repository traits defined in `fixit-core`:
//! SQLite storage for listings, bids and chat messages, the API token store,
//! the `config.toml` loader, and data directory resolution.

pub mod config;
pub mod filesystem;
pub mod sqlite;
