//! Spec-to-request translation.
//!
//! Everything that can be validated before network I/O is validated here:
//! URL and method parsing, header well-formedness, body encoding. The
//! output pairs a ready-to-send request with the transport that must carry
//! it and the deadline for the whole call.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};
use reqwest::{multipart, Client, Method, Request};
use url::Url;

use crate::config::RelayOptions;
use crate::relay::error::{SendError, SendResult};
use crate::relay::spec::{AuthSpec, BodySpec, MultipartPart, NameValue, RequestSpec};
use crate::relay::transport::Transports;

/// A fully built outbound request, the client that will carry it, and the
/// effective deadline.
#[derive(Debug)]
pub struct Prepared {
    pub client: Client,
    pub request: Request,
    pub timeout: Duration,
}

/// Turn a wire spec into a [`Prepared`] outbound request.
pub fn build(
    transports: &Transports,
    options: &RelayOptions,
    spec: &RequestSpec,
) -> SendResult<Prepared> {
    let client = transports.select(spec.validate_ssl).clone();
    let method = parse_method(&spec.method)?;
    let url = build_url(&spec.url, &spec.query_params)?;

    let mut headers = HeaderMap::new();
    copy_headers(&mut headers, &spec.headers)?;
    apply_default_headers(&mut headers, &options.user_agent)?;
    apply_auth(&mut headers, &spec.auth)?;

    let mut builder = client.request(method.clone(), url);
    if requires_body(&method) {
        // The body mode owns Content-Type; a caller-supplied value is
        // replaced, never duplicated.
        builder = match &spec.body {
            BodySpec::None => builder,
            BodySpec::Json { json } => {
                let bytes = if json.is_null() {
                    // A null document still produces a JSON body.
                    b"{}".to_vec()
                } else {
                    serde_json::to_vec(json)
                        .map_err(|e| SendError::EncodingFailure(e.to_string()))?
                };
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                builder.body(bytes)
            }
            BodySpec::Form { form } => {
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                );
                builder.body(encode_form(form))
            }
            BodySpec::Multipart { multipart } => {
                // The multipart encoder supplies its own boundary value.
                headers.remove(CONTENT_TYPE);
                builder.multipart(build_multipart(multipart)?)
            }
            BodySpec::Raw {
                raw,
                raw_content_type,
            } => {
                let content_type = raw_content_type.as_deref().unwrap_or("text/plain");
                headers.insert(CONTENT_TYPE, parse_content_type(content_type)?);
                builder.body(raw.clone().unwrap_or_default())
            }
        };
    }

    let request = builder
        .headers(headers)
        .build()
        .map_err(|e| SendError::InvalidRequest(e.to_string()))?;

    Ok(Prepared {
        client,
        request,
        timeout: effective_timeout(spec.timeout_ms, options.default_timeout_ms),
    })
}

/// Zero and negative deadlines mean "use the server default".
pub(crate) fn effective_timeout(timeout_ms: i64, default_ms: u64) -> Duration {
    if timeout_ms > 0 {
        Duration::from_millis(timeout_ms as u64)
    } else {
        Duration::from_millis(default_ms)
    }
}

fn parse_method(raw: &str) -> SendResult<Method> {
    let upper = raw.to_ascii_uppercase();
    Method::from_bytes(upper.as_bytes())
        .map_err(|_| SendError::InvalidRequest(format!("unsupported method `{raw}`")))
}

fn build_url(raw: &str, params: &[NameValue]) -> SendResult<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| SendError::InvalidRequest(format!("invalid url `{raw}`: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SendError::InvalidRequest(format!(
            "unsupported url scheme `{}`",
            url.scheme()
        )));
    }
    if params.iter().any(|p| p.name.is_some()) {
        let mut pairs = url.query_pairs_mut();
        for param in params {
            if let Some(name) = param.name.as_deref() {
                pairs.append_pair(name, param.value.as_deref().unwrap_or(""));
            }
        }
    }
    Ok(url)
}

fn copy_headers(headers: &mut HeaderMap, entries: &[NameValue]) -> SendResult<()> {
    for entry in entries {
        let Some(name) = entry.name.as_deref() else {
            continue;
        };
        let parsed = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| SendError::InvalidRequest(format!("invalid header name `{name}`")))?;
        let value = header_value(entry.value.as_deref().unwrap_or(""))?;
        headers.append(parsed, value);
    }
    Ok(())
}

/// Accept and User-Agent are filled in only when the caller did not set
/// them.
fn apply_default_headers(headers: &mut HeaderMap, user_agent: &str) -> SendResult<()> {
    if !headers.contains_key(ACCEPT) {
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    }
    if !headers.contains_key(USER_AGENT) {
        headers.insert(USER_AGENT, header_value(user_agent)?);
    }
    Ok(())
}

/// Credential injection replaces any Authorization header the caller set.
fn apply_auth(headers: &mut HeaderMap, auth: &AuthSpec) -> SendResult<()> {
    let value = match auth {
        AuthSpec::None => return Ok(()),
        AuthSpec::Basic { username, password } => {
            let credentials = format!(
                "{}:{}",
                username.as_deref().unwrap_or(""),
                password.as_deref().unwrap_or("")
            );
            format!("Basic {}", BASE64.encode(credentials))
        }
        AuthSpec::Bearer { token } => format!("Bearer {}", token.as_deref().unwrap_or("")),
    };
    headers.insert(AUTHORIZATION, header_value(&value)?);
    Ok(())
}

/// Only these methods carry a body; for everything else the spec's body is
/// ignored.
fn requires_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

fn encode_form(fields: &[NameValue]) -> String {
    let mut encoder = url::form_urlencoded::Serializer::new(String::new());
    for field in fields {
        if let Some(name) = field.name.as_deref() {
            encoder.append_pair(name, field.value.as_deref().unwrap_or(""));
        }
    }
    encoder.finish()
}

fn build_multipart(parts: &[MultipartPart]) -> SendResult<multipart::Form> {
    let mut form = multipart::Form::new();
    for part in parts {
        let Some(name) = part.name.clone() else {
            continue;
        };
        let piece = match part.content_base64.as_deref() {
            Some(encoded) if !encoded.is_empty() => {
                let bytes = BASE64.decode(encoded).map_err(|e| {
                    SendError::EncodingFailure(format!("part `{name}` is not valid base64: {e}"))
                })?;
                let content_type = part
                    .content_type
                    .as_deref()
                    .unwrap_or("application/octet-stream");
                multipart::Part::bytes(bytes)
                    .file_name(part.filename.clone().unwrap_or_else(|| "file".to_string()))
                    .mime_str(content_type)
                    .map_err(|_| {
                        SendError::InvalidRequest(format!("invalid content type `{content_type}`"))
                    })?
            }
            _ => multipart::Part::text(part.value.clone().unwrap_or_default()),
        };
        form = form.part(name, piece);
    }
    Ok(form)
}

/// The value must be a media type (`type/subtype`, parameters allowed),
/// the same shape multipart parts enforce. The caller's spelling is kept
/// on the wire.
fn parse_content_type(raw: &str) -> SendResult<HeaderValue> {
    raw.parse::<mime::Mime>()
        .map_err(|_| SendError::InvalidRequest(format!("invalid content type `{raw}`")))?;
    HeaderValue::from_str(raw)
        .map_err(|_| SendError::InvalidRequest(format!("invalid content type `{raw}`")))
}

fn header_value(raw: &str) -> SendResult<HeaderValue> {
    HeaderValue::from_str(raw)
        .map_err(|_| SendError::InvalidRequest(format!("invalid header value `{raw}`")))
}
