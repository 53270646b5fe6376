//! Long-lived outbound transports.
//!
//! Two client profiles are built at startup and shared by every relayed
//! request: one validates upstream certificates, the other accepts any
//! certificate so self-signed development servers can be reached. Both
//! keep their connection pools across calls and neither follows
//! redirects, so 3xx responses surface to the caller unchanged.

use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, Request, StatusCode};

use crate::relay::error::{SendError, SendResult};
use crate::relay::translate::Prepared;

pub struct Transports {
    validating: Client,
    bypassing: Client,
}

impl Transports {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            validating: Client::builder().redirect(Policy::none()).build()?,
            bypassing: Client::builder()
                .redirect(Policy::none())
                .danger_accept_invalid_certs(true)
                .build()?,
        })
    }

    pub fn select(&self, validate_ssl: bool) -> &Client {
        if validate_ssl {
            &self.validating
        } else {
            &self.bypassing
        }
    }
}

/// An upstream response with its body fully buffered.
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Send a prepared request and buffer the response body, bounded by
/// `max_bytes` and by the prepared deadline. The deadline covers the whole
/// exchange; when it fires the in-flight call is dropped, which cancels
/// the outbound connection.
pub async fn execute(prepared: Prepared, max_bytes: usize) -> SendResult<RawResponse> {
    let Prepared {
        client,
        request,
        timeout,
    } = prepared;
    let deadline_ms = timeout.as_millis() as u64;
    tokio::time::timeout(timeout, run(client, request, max_bytes))
        .await
        .map_err(|_| SendError::Timeout(deadline_ms))?
}

async fn run(client: Client, request: Request, max_bytes: usize) -> SendResult<RawResponse> {
    let mut response = client.execute(request).await.map_err(SendError::transport)?;
    let status = response.status();
    let headers = response.headers().clone();

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(SendError::transport)? {
        if body.len() + chunk.len() > max_bytes {
            return Err(SendError::PayloadTooLarge { limit: max_bytes });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(RawResponse {
        status,
        headers,
        body,
    })
}
