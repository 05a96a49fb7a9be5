//! Response classification.
//!
//! Maps `(status, body)` to an [`ApiResult`] or a typed API error. The
//! mapping is driven purely by the HTTP status and body; it is independent
//! of which operation issued the request.

use serde_json::Value;
use tracing::warn;

use crate::config::ResultShape;
use crate::error::{Error, ErrorKind, Result};

/// Message carried by the 304 result variant.
pub const NOT_MODIFIED_MESSAGE: &str =
    "The requested object has not changed since the specified time";

/// A decoded success payload, shaped per [`ResultShape`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A JSON value tree.
    Structured(Value),
    /// A key-order-preserving view of a top-level JSON object.
    Mapping(serde_json::Map<String, Value>),
}

impl Payload {
    /// Consume the payload as a plain JSON value.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Structured(value) => value,
            Payload::Mapping(map) => Value::Object(map),
        }
    }

    /// Borrow the payload as a mapping, if it is one.
    pub fn as_mapping(&self) -> Option<&serde_json::Map<String, Value>> {
        match self {
            Payload::Mapping(map) => Some(map),
            Payload::Structured(Value::Object(map)) => Some(map),
            Payload::Structured(_) => None,
        }
    }
}

/// Outcome of a classified request.
///
/// `NotModified` and `EmptySuccess` are not errors; they signal no-content
/// success states (304, and 200/201/204/300 with an empty body).
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult {
    /// A decoded response body.
    Success(Payload),
    /// Success with no body.
    EmptySuccess,
    /// 304 Not Modified.
    NotModified(String),
}

impl ApiResult {
    /// Returns true if this result carries a payload.
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }

    /// Render the result as a JSON value.
    ///
    /// `EmptySuccess` renders as `{"success": true}`; `NotModified` renders
    /// as `{"message": <text>}`.
    pub fn into_value(self) -> Value {
        match self {
            ApiResult::Success(payload) => payload.into_value(),
            ApiResult::EmptySuccess => serde_json::json!({"success": true}),
            ApiResult::NotModified(message) => serde_json::json!({"message": message}),
        }
    }
}

/// Classify a buffered response into an [`ApiResult`] or a typed error.
///
/// `request_headers` is the (redacted) outgoing header capture, attached to
/// API errors for diagnostics.
pub(crate) fn classify(
    status: u16,
    body: &str,
    shape: ResultShape,
    request_headers: &[(String, String)],
) -> Result<ApiResult> {
    // 304 with a body falls through to the default branch.
    if status == 304 && body.is_empty() {
        return Ok(ApiResult::NotModified(NOT_MODIFIED_MESSAGE.to_string()));
    }

    if matches!(status, 200 | 201 | 204 | 300) {
        if body.is_empty() {
            return Ok(ApiResult::EmptySuccess);
        }
        return Ok(ApiResult::Success(decode_payload(body, shape)?));
    }

    let message = if body.is_empty() {
        String::new()
    } else {
        // The real discriminator is a structured `error` field after a JSON
        // parse; anything else is reported as the raw body.
        match serde_json::from_str::<Value>(body) {
            Ok(parsed) if parsed.get("error").is_some() => parsed
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => body.to_string(),
        }
    };

    warn!(status, %message, "API error response");

    Err(Error::new(ErrorKind::Api {
        status,
        message,
        request_headers: request_headers.to_vec(),
    }))
}

/// Decode a success body according to the configured result shape.
fn decode_payload(body: &str, shape: ResultShape) -> Result<Payload> {
    let value: Value = serde_json::from_str(body)?;
    Ok(match (shape, value) {
        (ResultShape::Mapping, Value::Object(map)) => Payload::Mapping(map),
        // The shapes only differ for object bodies.
        (_, value) => Payload::Structured(value),
    })
}
