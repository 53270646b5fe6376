//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and middleware produce:
//!     → tracing events (structured logs, request IDs)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer, filtered by RUST_LOG
//!       or the configured log level)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod metrics;
