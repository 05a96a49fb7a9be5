//! OAuth 2.0 password-grant login.
//!
//! The one authentication flow this crate models: username + password +
//! security token exchanged directly for an access token at the instance's
//! token endpoint. There is no refresh; a session lives until the client is
//! dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{encode, Method, RequestSpec};
use crate::response::{classify, ApiResult};
use crate::session::Session;
use crate::transport;

/// Decoded token endpoint payload.
///
/// `access_token` and `instance_url` are required; everything else the
/// deployment happens to return (token type, scope, signature, issued_at,
/// ...) is preserved in `extra` for inspection. The token is redacted in
/// Debug output.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Instance URL all resource requests are routed to.
    pub instance_url: String,
    /// Any additional fields returned by the token endpoint.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Perform the password-grant login call and build a session from it.
///
/// Credential parameters are skipped in the tracing span.
#[instrument(skip_all, fields(username = %username))]
pub(crate) fn password_grant(
    config: &ClientConfig,
    username: &str,
    password: &str,
    security_token: &str,
) -> Result<(Session, TokenResponse)> {
    let spec = RequestSpec::new(Method::Post, "")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .param("grant_type", "password")
        .param("client_id", config.client_id())
        .param("client_secret", config.client_secret())
        .param("username", username)
        .param("password", format!("{}{}", password, security_token));

    let token_url = format!("{}/services/oauth2/token", config.instance_url());
    let encoded = encode(&spec, &token_url, None)?;
    let raw = transport::execute(&encoded, &spec.method)?;
    let result = classify(
        raw.status,
        &raw.body,
        config.result_shape(),
        &encoded.redacted_headers(),
    )?;

    let payload = match result {
        ApiResult::Success(payload) => payload.into_value(),
        // The token endpoint never legitimately answers without a body.
        ApiResult::EmptySuccess | ApiResult::NotModified(_) => {
            return Err(Error::new(ErrorKind::Auth(
                "login response had no body".to_string(),
            )))
        }
    };

    for field in ["access_token", "instance_url"] {
        if payload.get(field).and_then(Value::as_str).is_none() {
            return Err(Error::new(ErrorKind::Auth(format!(
                "login response missing required field '{}'",
                field
            ))));
        }
    }

    let token: TokenResponse = serde_json::from_value(payload)?;
    let session = Session::new(
        token.access_token.clone(),
        &token.instance_url,
        config.api_version(),
    );

    Ok((session, token))
}
