//! HTTP and WebSocket layer for Fixit.
//!
//! `/ws` carries the realtime chat protocol; `/listings/{id}/messages` serves
//! conversation history to bearer-token authenticated participants.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
