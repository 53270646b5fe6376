//! Error definitions for the relay pipeline.
//!
//! Every failure in translate/execute/normalize collapses into [`SendError`],
//! which carries its own HTTP mapping: client mistakes surface as 400,
//! upstream trouble as 502, and deadline overruns as 504. The response body
//! is a small JSON object with a stable `error` kind and a human `message`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while relaying a request.
#[derive(Debug, Error)]
pub enum SendError {
    /// The spec could not be turned into an outbound request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A body payload could not be encoded (bad base64, unserializable JSON).
    #[error("failed to encode request body: {0}")]
    EncodingFailure(String),

    /// The whole-call deadline elapsed before the response was buffered.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Connect, TLS or protocol failure while talking to the target.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The response body exceeded the in-memory buffer limit.
    #[error("response body exceeded the {limit} byte limit")]
    PayloadTooLarge { limit: usize },
}

/// Result type for relay operations.
pub type SendResult<T> = Result<T, SendError>;

impl SendError {
    /// Stable machine-readable kind, used in error bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            SendError::InvalidRequest(_) => "invalid_request",
            SendError::EncodingFailure(_) => "encoding_failure",
            SendError::Timeout(_) => "timeout",
            SendError::TransportFailure(_) => "transport_failure",
            SendError::PayloadTooLarge { .. } => "payload_too_large",
        }
    }

    /// HTTP status the relay answers with for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            SendError::InvalidRequest(_) | SendError::EncodingFailure(_) => {
                StatusCode::BAD_REQUEST
            }
            SendError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            SendError::TransportFailure(_) | SendError::PayloadTooLarge { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// Collapse a client error into a transport failure, keeping the cause
    /// chain in the message. reqwest's top-level Display omits the causes.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        SendError::TransportFailure(message)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for SendError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
