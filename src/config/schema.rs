//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files,
//! and every field has a default so a missing or partial file still yields
//! a runnable server.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Buffer limits for inbound and upstream payloads.
    pub limits: LimitsConfig,

    /// Knobs applied to every outbound request.
    pub relay: RelayOptions,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Buffer limits. Both sides of the relay are fully buffered in memory, so
/// these bound the per-request footprint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted size of an inbound spec body, in bytes.
    pub max_request_body_bytes: usize,

    /// Maximum buffered size of an upstream response body, in bytes.
    /// Larger responses fail the call rather than being truncated.
    pub max_response_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_body_bytes: 2 * 1024 * 1024,
            max_response_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Knobs applied to every outbound request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayOptions {
    /// User-Agent sent when the spec does not provide one.
    pub user_agent: String,

    /// Deadline applied when a spec carries no positive timeout, in
    /// milliseconds.
    pub default_timeout_ms: u64,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            user_agent: concat!("api-relay/", env!("CARGO_PKG_VERSION")).to_string(),
            default_timeout_ms: 60_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). Overridden by RUST_LOG.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
