//! Request relay subsystem.
//!
//! # Data Flow
//! ```text
//! RequestSpec (JSON from the client)
//!     → translate.rs (validate, build URL/headers/body, pick transport)
//!     → transport.rs (execute on a long-lived client, buffer the body)
//!     → normalize.rs (flatten status/headers/body into a ResponseSpec)
//!     → ResponseSpec (JSON back to the client)
//! ```
//!
//! Failures at any stage collapse into [`SendError`], which maps itself
//! onto the relay's HTTP surface.

pub mod error;
pub mod normalize;
pub mod spec;
pub mod translate;
pub mod transport;

pub use error::{SendError, SendResult};
pub use spec::{RequestSpec, ResponseSpec};
pub use transport::Transports;

use std::time::Instant;

use crate::config::{RelayConfig, RelayOptions};

/// The relay engine: owns the transport profiles and the knobs that shape
/// outbound requests. One instance serves the whole process.
pub struct Relay {
    transports: Transports,
    options: RelayOptions,
    max_response_bytes: usize,
}

impl Relay {
    pub fn new(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            transports: Transports::new()?,
            options: config.relay.clone(),
            max_response_bytes: config.limits.max_response_bytes,
        })
    }

    /// Execute one spec end to end. The reported duration covers the whole
    /// pipeline, translation included.
    pub async fn send(&self, spec: &RequestSpec) -> SendResult<ResponseSpec> {
        let started = Instant::now();
        let prepared = translate::build(&self.transports, &self.options, spec)?;
        let raw = transport::execute(prepared, self.max_response_bytes).await?;
        Ok(normalize::normalize(raw, started.elapsed()))
    }
}
