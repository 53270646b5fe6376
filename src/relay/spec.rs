//! Wire-format types for the relay API.
//!
//! These shapes mirror the JSON contract spoken by API-building clients:
//! camelCase field names, tagged unions for body and auth, and nullable
//! name/value pairs. Deserialization is lenient where clients are sloppy:
//! missing fields fall back to defaults and unknown fields are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A declarative description of one outbound HTTP request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestSpec {
    /// Absolute target URL. Must be non-blank.
    pub url: String,

    /// HTTP method name, case-insensitive. Must be non-blank.
    pub method: String,

    /// Headers copied onto the outbound request in order. Entries with a
    /// missing name are skipped; duplicate names are all sent.
    #[serde(deserialize_with = "null_as_default")]
    pub headers: Vec<NameValue>,

    /// Query parameters appended after any query already present in `url`.
    #[serde(deserialize_with = "null_as_default")]
    pub query_params: Vec<NameValue>,

    /// Request body. Only sent for POST, PUT and PATCH.
    #[serde(deserialize_with = "null_as_default")]
    pub body: BodySpec,

    /// Credential injection applied after header copying.
    #[serde(deserialize_with = "null_as_default")]
    pub auth: AuthSpec,

    /// Carried on the wire but not acted on: redirects are never followed,
    /// so 3xx responses come back verbatim.
    pub follow_redirects: bool,

    /// Selects the certificate-validating transport (true) or the one that
    /// accepts any certificate (false).
    pub validate_ssl: bool,

    /// Whole-call deadline in milliseconds. Zero or negative means the
    /// server default applies.
    pub timeout_ms: i64,
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: String::new(),
            headers: Vec::new(),
            query_params: Vec::new(),
            body: BodySpec::None,
            auth: AuthSpec::None,
            follow_redirects: true,
            validate_ssl: true,
            timeout_ms: 60_000,
        }
    }
}

/// A single name/value pair as clients send it. Either side may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameValue {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }
}

/// Request body variants, discriminated by the `mode` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BodySpec {
    /// No body.
    #[default]
    None,

    /// Arbitrary JSON document, serialized verbatim. A null document is
    /// sent as an empty object.
    Json {
        #[serde(default)]
        json: Value,
    },

    /// URL-encoded form fields, in order. Entries with a missing name are
    /// skipped.
    Form {
        #[serde(default)]
        form: Vec<NameValue>,
    },

    /// Multipart form. Parts with base64 content become file parts, the
    /// rest become text parts.
    Multipart {
        #[serde(default)]
        multipart: Vec<MultipartPart>,
    },

    /// Raw string body with an optional content type (text/plain when
    /// absent).
    #[serde(rename_all = "camelCase")]
    Raw {
        #[serde(default)]
        raw: Option<String>,
        #[serde(default)]
        raw_content_type: Option<String>,
    },
}

/// One part of a multipart body. All fields are optional on the wire; a
/// part without a name is dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultipartPart {
    /// Form field name.
    pub name: Option<String>,

    /// File name for file parts. Defaults to "file".
    pub filename: Option<String>,

    /// Content type for file parts. Defaults to application/octet-stream.
    pub content_type: Option<String>,

    /// Base64-encoded file bytes. Non-empty content marks this as a file
    /// part; otherwise `value` is sent as a text part.
    pub content_base64: Option<String>,

    /// Text content for text parts. Missing means empty.
    pub value: Option<String>,
}

/// Credential injection variants, discriminated by the `type` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthSpec {
    /// Leave headers untouched.
    #[default]
    None,

    /// `Authorization: Basic base64(username:password)`. Missing fields
    /// are treated as empty strings.
    Basic {
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password: Option<String>,
    },

    /// `Authorization: Bearer <token>`.
    Bearer {
        #[serde(default)]
        token: Option<String>,
    },
}

/// The normalized result of one relayed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSpec {
    /// Numeric HTTP status of the upstream response.
    pub status: u16,

    /// Status code with its canonical reason phrase, e.g. "200 OK". Bare
    /// code when no canonical phrase exists.
    pub status_text: String,

    /// One entry per distinct header name, in the order the transport
    /// exposed them. Repeated values are joined with ", ".
    pub headers: Vec<NameValue>,

    /// Body text, or base64 of the raw bytes when `body_is_binary` is set.
    pub body: String,

    /// Whether `body` is base64 rather than text.
    pub body_is_binary: bool,

    /// Wall-clock duration of the relay call in milliseconds.
    pub duration_ms: u64,

    /// Size of the upstream body in bytes, before any encoding.
    pub size_bytes: u64,

    /// Reserved: always empty. Redirects are not followed, so the final
    /// URL never differs from the requested one.
    pub final_url: String,

    /// Reserved: always empty. Cookies ride in `headers` as Set-Cookie.
    pub cookies: BTreeMap<String, String>,
}

/// Folds an explicit JSON `null` into the field's default. Clients that
/// send `"body": null` instead of omitting the field get the same result.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_a_full_client_payload() {
        let payload = json!({
            "url": "https://api.example.com/v1/items?page=1",
            "method": "post",
            "headers": [{"name": "X-Env", "value": "staging"}],
            "queryParams": [{"name": "limit", "value": "10"}],
            "body": {"mode": "json", "json": {"title": "hello"}},
            "auth": {"type": "bearer", "token": "tok-123", "username": "", "password": ""}
        });

        let spec: RequestSpec = serde_json::from_value(payload).unwrap();
        assert_eq!(spec.url, "https://api.example.com/v1/items?page=1");
        assert_eq!(spec.method, "post");
        assert_eq!(spec.headers, vec![NameValue::new("X-Env", "staging")]);
        assert_eq!(spec.query_params, vec![NameValue::new("limit", "10")]);
        assert!(matches!(spec.body, BodySpec::Json { ref json } if json["title"] == "hello"));
        assert!(matches!(spec.auth, AuthSpec::Bearer { ref token } if token.as_deref() == Some("tok-123")));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let spec: RequestSpec =
            serde_json::from_value(json!({"url": "http://x", "method": "GET"})).unwrap();

        assert!(matches!(spec.body, BodySpec::None));
        assert!(matches!(spec.auth, AuthSpec::None));
        assert!(spec.follow_redirects);
        assert!(spec.validate_ssl);
        assert_eq!(spec.timeout_ms, 60_000);
        assert!(spec.headers.is_empty());
        assert!(spec.query_params.is_empty());
    }

    #[test]
    fn explicit_nulls_fall_back_to_defaults() {
        let spec: RequestSpec = serde_json::from_value(json!({
            "url": "http://x",
            "method": "GET",
            "headers": null,
            "queryParams": null,
            "body": null,
            "auth": null
        }))
        .unwrap();

        assert!(spec.headers.is_empty());
        assert!(spec.query_params.is_empty());
        assert!(matches!(spec.body, BodySpec::None));
        assert!(matches!(spec.auth, AuthSpec::None));
    }

    #[test]
    fn auth_none_tolerates_stray_credential_fields() {
        // Clients send every credential field regardless of the selected type.
        let spec: RequestSpec = serde_json::from_value(json!({
            "url": "http://x",
            "method": "GET",
            "auth": {"type": "none", "username": "", "password": "", "token": ""}
        }))
        .unwrap();

        assert!(matches!(spec.auth, AuthSpec::None));
    }

    #[test]
    fn json_body_without_document_is_null() {
        let spec: RequestSpec = serde_json::from_value(json!({
            "url": "http://x",
            "method": "POST",
            "body": {"mode": "json"}
        }))
        .unwrap();

        assert!(matches!(spec.body, BodySpec::Json { json: Value::Null }));
    }

    #[test]
    fn raw_body_uses_camel_case_content_type_key() {
        let spec: RequestSpec = serde_json::from_value(json!({
            "url": "http://x",
            "method": "POST",
            "body": {"mode": "raw", "raw": "a: 1", "rawContentType": "application/yaml"}
        }))
        .unwrap();

        match spec.body {
            BodySpec::Raw {
                raw,
                raw_content_type,
            } => {
                assert_eq!(raw.as_deref(), Some("a: 1"));
                assert_eq!(raw_content_type.as_deref(), Some("application/yaml"));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn multipart_part_reads_camel_case_keys() {
        let spec: RequestSpec = serde_json::from_value(json!({
            "url": "http://x",
            "method": "POST",
            "body": {"mode": "multipart", "multipart": [
                {"name": "doc", "filename": "a.bin", "contentType": "application/octet-stream", "contentBase64": "AAEC"},
                {"name": "note", "value": "hi"}
            ]}
        }))
        .unwrap();

        match spec.body {
            BodySpec::Multipart { multipart } => {
                assert_eq!(multipart.len(), 2);
                assert_eq!(multipart[0].content_base64.as_deref(), Some("AAEC"));
                assert_eq!(multipart[0].content_type.as_deref(), Some("application/octet-stream"));
                assert_eq!(multipart[1].value.as_deref(), Some("hi"));
                assert!(multipart[1].content_base64.is_none());
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn response_serializes_camel_case_keys() {
        let response = ResponseSpec {
            status: 200,
            status_text: "200 OK".to_string(),
            headers: vec![NameValue::new("content-type", "text/plain")],
            body: "ok".to_string(),
            body_is_binary: false,
            duration_ms: 12,
            size_bytes: 2,
            final_url: String::new(),
            cookies: BTreeMap::new(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusText"], "200 OK");
        assert_eq!(value["bodyIsBinary"], false);
        assert_eq!(value["durationMs"], 12);
        assert_eq!(value["sizeBytes"], 2);
        assert_eq!(value["finalUrl"], "");
        assert!(value["cookies"].as_object().unwrap().is_empty());
    }
}
