//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; level configurable from config or `RUST_LOG`
//! - Metrics are cheap (atomic increments) and exposed on a separate listener
//! - Startup confirmation additionally goes to plain stdout so it shows up
//!   in platform deploy logs that don't capture the structured stream

pub mod logging;
pub mod metrics;
