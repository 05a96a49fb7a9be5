//! Request specification and encoding.
//!
//! [`RequestSpec`] is the logical form of an operation: verb, path relative
//! to the resource root, an insertion-ordered parameter mapping, and any
//! extra headers. [`encode`] turns it into an [`EncodedRequest`] ready for
//! the transport: a concrete URL (with query string for GET), layered
//! headers, and an encoded body.

use bytes::Bytes;
use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};

/// Insertion-ordered parameter mapping.
///
/// Values are JSON values so the same mapping carries both query parameters
/// (strings) and record bodies (nested objects for create/update).
pub type Params = serde_json::Map<String, Value>;

const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP request method.
///
/// Unrecognized verbs are carried through as [`Method::Other`] rather than
/// rejected; the server decides whether it understands them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Other(String),
}

impl Method {
    /// Convert to reqwest::Method.
    pub fn to_http(&self) -> Result<reqwest::Method> {
        match self {
            Method::Get => Ok(reqwest::Method::GET),
            Method::Post => Ok(reqwest::Method::POST),
            Method::Put => Ok(reqwest::Method::PUT),
            Method::Patch => Ok(reqwest::Method::PATCH),
            Method::Delete => Ok(reqwest::Method::DELETE),
            Method::Other(verb) => reqwest::Method::from_bytes(verb.as_bytes()).map_err(|_| {
                Error::new(ErrorKind::Validation(format!(
                    "'{}' is not a valid HTTP method token",
                    verb
                )))
            }),
        }
    }

    /// Returns true if this method carries a body when parameters are present.
    fn has_body(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

/// The logical form of one API operation. Built fresh per call.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// Path relative to the session resource root.
    pub path: String,
    /// Request method.
    pub method: Method,
    /// Query parameters (GET) or body fields (other methods).
    pub params: Params,
    /// Per-request headers, layered over the defaults.
    pub extra_headers: Vec<(String, String)>,
}

impl RequestSpec {
    /// Create a new request spec.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            params: Params::new(),
            extra_headers: Vec::new(),
        }
    }

    /// Add a parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Replace the full parameter mapping.
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Add a per-request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }
}

/// A ready-to-send request. Transport input; ephemeral.
#[derive(Debug, Clone)]
pub struct EncodedRequest {
    /// Absolute URL, including the query string for GET requests.
    pub url: String,
    /// Final header set after layering.
    pub headers: Vec<(String, String)>,
    /// Encoded body, if any.
    pub body: Option<Bytes>,
}

impl EncodedRequest {
    /// The outgoing headers with the Authorization value redacted, suitable
    /// for diagnostics and error context.
    pub fn redacted_headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.clone(), "Bearer [REDACTED]".to_string())
                } else {
                    (name.clone(), value.clone())
                }
            })
            .collect()
    }
}

/// Encode a request spec against an absolute URL.
///
/// Header layering, later layers winning on key collision:
/// `Content-Type: application/json` default, then per-request extra headers,
/// then `Authorization: Bearer <token>` (non-overridable) when a token is
/// given.
pub fn encode(spec: &RequestSpec, url: &str, token: Option<&str>) -> Result<EncodedRequest> {
    let mut headers: Vec<(String, String)> =
        vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())];
    for (name, value) in &spec.extra_headers {
        set_header(&mut headers, name, value);
    }
    if let Some(token) = token {
        set_header(&mut headers, "Authorization", &format!("Bearer {}", token));
    }

    let mut url = url.to_string();
    let mut body = None;

    if spec.method.has_body() {
        if !spec.params.is_empty() {
            body = Some(encode_body(&spec.params, &headers)?);
        }
    } else if !spec.params.is_empty() {
        url.push('?');
        url.push_str(&query_string(&spec.params));
    }

    Ok(EncodedRequest { url, headers, body })
}

/// Insert or replace a header, matching names case-insensitively.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        Some((_, existing_value)) => *existing_value = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

/// Encode a non-GET body according to the effective Content-Type.
fn encode_body(params: &Params, headers: &[(String, String)]) -> Result<Bytes> {
    let content_type = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.as_str())
        .unwrap_or(JSON_CONTENT_TYPE);

    if content_type
        .split(';')
        .next()
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
    {
        Ok(Bytes::from(serde_json::to_vec(&Value::Object(
            params.clone(),
        ))?))
    } else {
        // application/x-www-form-urlencoded escaping, not RFC 3986-strict
        Ok(Bytes::from(serde_urlencoded::to_string(params)?))
    }
}

/// Build an RFC 3986 percent-encoded query string (space is `%20`, not `+`).
fn query_string(params: &Params) -> String {
    params
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(&param_str(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Render a parameter value for the query string.
fn param_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(param_str)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_query_string_rfc3986() {
        let spec = RequestSpec::new(Method::Get, "query/").param("q", "SELECT Id FROM Account");
        let encoded = encode(&spec, "https://na1.salesforce.com/query/", Some("tok")).unwrap();

        // Space encodes as %20, never '+'
        assert_eq!(
            encoded.url,
            "https://na1.salesforce.com/query/?q=SELECT%20Id%20FROM%20Account"
        );
        assert!(encoded.body.is_none());
    }

    #[test]
    fn test_get_without_params_has_no_query() {
        let spec = RequestSpec::new(Method::Get, "limits/");
        let encoded = encode(&spec, "https://na1.salesforce.com/limits/", Some("tok")).unwrap();
        assert_eq!(encoded.url, "https://na1.salesforce.com/limits/");
    }

    #[test]
    fn test_header_layering() {
        let spec = RequestSpec::new(Method::Get, "")
            .header("X-Custom", "value")
            .header("content-type", "text/plain")
            .header("Authorization", "Bearer forged");

        let encoded = encode(&spec, "https://example.com/", Some("real")).unwrap();

        let get = |name: &str| {
            encoded
                .headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        };

        // extra headers override the default, case-insensitively
        assert_eq!(get("Content-Type"), Some("text/plain"));
        assert_eq!(get("X-Custom"), Some("value"));
        // the bearer token is layered last and wins over any caller value
        assert_eq!(get("Authorization"), Some("Bearer real"));
        // no duplicate entries after the case-insensitive merges
        assert_eq!(encoded.headers.len(), 3);
    }

    #[test]
    fn test_no_token_no_authorization_header() {
        let spec = RequestSpec::new(Method::Get, "");
        let encoded = encode(&spec, "https://example.com/services/data/", None).unwrap();
        assert!(!encoded
            .headers
            .iter()
            .any(|(n, _)| n.eq_ignore_ascii_case("authorization")));
    }

    #[test]
    fn test_json_body() {
        let spec = RequestSpec::new(Method::Post, "sobjects/Account")
            .param("Name", "Test Account")
            .param("NumberOfEmployees", 5);
        let encoded = encode(&spec, "https://example.com/sobjects/Account", Some("t")).unwrap();

        let body: Value = serde_json::from_slice(encoded.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({"Name": "Test Account", "NumberOfEmployees": 5}));
    }

    #[test]
    fn test_form_body_when_content_type_overridden() {
        let spec = RequestSpec::new(Method::Post, "token")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .param("grant_type", "password")
            .param("username", "user@example.com");
        let encoded = encode(&spec, "https://example.com/token", None).unwrap();

        let body = String::from_utf8(encoded.body.unwrap().to_vec()).unwrap();
        assert_eq!(body, "grant_type=password&username=user%40example.com");
    }

    #[test]
    fn test_json_content_type_with_charset_still_json() {
        let spec = RequestSpec::new(Method::Post, "x")
            .header("Content-Type", "application/json; charset=utf-8")
            .param("a", 1);
        let encoded = encode(&spec, "https://example.com/x", None).unwrap();
        let body: Value = serde_json::from_slice(encoded.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({"a": 1}));
    }

    #[test]
    fn test_delete_without_params_has_no_body() {
        let spec = RequestSpec::new(Method::Delete, "sobjects/Account/001xx");
        let encoded = encode(&spec, "https://example.com/sobjects/Account/001xx", Some("t")).unwrap();
        assert!(encoded.body.is_none());
    }

    #[test]
    fn test_custom_method_passthrough() {
        let method = Method::Other("PROPFIND".to_string());
        assert_eq!(method.to_http().unwrap().as_str(), "PROPFIND");

        let bad = Method::Other("NOT A TOKEN".to_string());
        assert!(bad.to_http().unwrap_err().is_validation_error());
    }

    #[test]
    fn test_param_order_preserved() {
        let spec = RequestSpec::new(Method::Get, "")
            .param("b", "2")
            .param("a", "1");
        let encoded = encode(&spec, "https://example.com/", None).unwrap();
        assert!(encoded.url.ends_with("?b=2&a=1"));
    }

    #[test]
    fn test_array_param_comma_joined() {
        let spec =
            RequestSpec::new(Method::Get, "").param("fields", json!(["Name", "Id"]));
        let encoded = encode(&spec, "https://example.com/", None).unwrap();
        assert!(encoded.url.ends_with("?fields=Name%2CId"));
    }

    #[test]
    fn test_redacted_headers() {
        let spec = RequestSpec::new(Method::Get, "");
        let encoded = encode(&spec, "https://example.com/", Some("secret_token")).unwrap();

        let redacted = encoded.redacted_headers();
        let auth = redacted
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case("authorization"))
            .unwrap();
        assert_eq!(auth.1, "Bearer [REDACTED]");
        assert!(!format!("{:?}", redacted).contains("secret_token"));
    }
}
