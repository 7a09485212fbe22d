//! Chat relay logic and repository trait definitions for Fixit.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, plus the realtime relay: connection registry, relay
//! policy, and the per-channel dispatcher. It depends only on `fixit-types`
//! -- never on `fixit-infra` or any database/IO crate.

pub mod relay;
pub mod repository;
