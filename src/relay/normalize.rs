//! Upstream response normalization.
//!
//! Collapses a buffered upstream response into the flat JSON shape clients
//! render: joined headers, a text-or-base64 body with an explicit binary
//! flag, and timing/size measurements.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::relay::spec::{NameValue, ResponseSpec};
use crate::relay::transport::RawResponse;

/// Substrings that mark a content type as text, besides the `text/` prefix.
const TEXT_MARKERS: [&str; 4] = ["json", "xml", "javascript", "html"];

pub fn normalize(raw: RawResponse, elapsed: Duration) -> ResponseSpec {
    let content_type = raw
        .headers
        .get(CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
    let textual = is_text_like(content_type.as_deref());

    let body = if textual {
        String::from_utf8_lossy(&raw.body).into_owned()
    } else {
        BASE64.encode(&raw.body)
    };

    ResponseSpec {
        status: raw.status.as_u16(),
        status_text: status_text(raw.status),
        headers: join_headers(&raw.headers),
        body,
        body_is_binary: !textual,
        duration_ms: elapsed.as_millis() as u64,
        size_bytes: raw.body.len() as u64,
        final_url: String::new(),
        cookies: BTreeMap::new(),
    }
}

/// A missing content type means binary. Unknown types are binary unless
/// they carry one of the text markers anywhere in the value.
fn is_text_like(content_type: Option<&str>) -> bool {
    let Some(raw) = content_type else {
        return false;
    };
    let lowered = raw.to_ascii_lowercase();
    lowered.starts_with("text/") || TEXT_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// "200 OK" when the code has a canonical reason phrase, the bare code
/// otherwise.
fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

/// One entry per distinct header name, in the order the transport exposed
/// them. Repeated values are joined with ", ".
fn join_headers(headers: &HeaderMap) -> Vec<NameValue> {
    headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect::<Vec<_>>()
                .join(", ");
            NameValue::new(name.as_str(), joined)
        })
        .collect()
}
