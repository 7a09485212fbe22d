//! Shared domain types for Fixit.
//!
//! This crate contains the types shared by every layer of the marketplace chat:
//! stored chat messages, the listing/bid view consumed by the relay policy,
//! the channel wire frames, configuration, and the error enums.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod frame;
pub mod listing;
