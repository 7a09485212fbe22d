//! Observability setup for Fixit: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
