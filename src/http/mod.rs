//! HTTP surface of the relay.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → POST /api/send (spec in, normalized response out)
//!     → GET  /api/ping (liveness)
//! ```

pub mod server;

pub use server::HttpServer;
