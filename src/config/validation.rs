//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Validation is a pure function over the whole config and reports every
//! problem it finds, not just the first.

use std::net::SocketAddr;

use reqwest::header::HeaderValue;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug)]
pub enum ValidationError {
    /// An address field does not parse as host:port.
    InvalidAddress { field: &'static str, value: String },

    /// A limit or timeout that must be positive is zero.
    MustBePositive { field: &'static str },

    /// The default User-Agent cannot be sent as an HTTP header value.
    InvalidUserAgent { value: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidAddress { field, value } => {
                write!(f, "{field}: `{value}` is not a valid socket address")
            }
            ValidationError::MustBePositive { field } => {
                write!(f, "{field}: must be greater than zero")
            }
            ValidationError::InvalidUserAgent { value } => {
                write!(f, "relay.user_agent: `{value}` is not a valid header value")
            }
        }
    }
}

/// Validate a loaded configuration, collecting all errors.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.limits.max_request_body_bytes == 0 {
        errors.push(ValidationError::MustBePositive {
            field: "limits.max_request_body_bytes",
        });
    }
    if config.limits.max_response_bytes == 0 {
        errors.push(ValidationError::MustBePositive {
            field: "limits.max_response_bytes",
        });
    }
    if config.relay.default_timeout_ms == 0 {
        errors.push(ValidationError::MustBePositive {
            field: "relay.default_timeout_ms",
        });
    }

    if HeaderValue::from_str(&config.relay.user_agent).is_err() {
        errors.push(ValidationError::InvalidUserAgent {
            value: config.relay.user_agent.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
