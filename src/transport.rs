//! Blocking HTTP transport.
//!
//! One transport handle is built inside each [`execute`] call and dropped
//! before it returns, so callers can share a client across threads without
//! serializing requests. Fixed policy: 2 second connect timeout, 60 second
//! total timeout, TLS 1.2 minimum, response fully buffered. No retry; a
//! failed attempt propagates immediately.

use std::time::Duration;

use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::request::{EncodedRequest, Method};

/// Connection establishment timeout.
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Total request timeout, including reading the full body.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A fully-buffered HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Response body, decoded as UTF-8.
    pub body: String,
}

/// Execute one request and buffer the full response.
///
/// Any network-level failure (DNS, TLS handshake, timeout) surfaces as a
/// [`ErrorKind::Transport`] error carrying the underlying diagnostic.
pub(crate) fn execute(request: &EncodedRequest, method: &Method) -> Result<RawResponse> {
    let client = reqwest::blocking::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .min_tls_version(reqwest::tls::Version::TLS_1_2)
        .user_agent(crate::USER_AGENT)
        .build()
        .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

    let mut req = client.request(method.to_http()?, &request.url);
    for (name, value) in &request.headers {
        req = req.header(name.as_str(), value.as_str());
    }
    if let Some(ref body) = request.body {
        req = req.body(body.to_vec());
    }

    debug!(method = ?method, url = %request.url, "Sending request");

    let response = req.send()?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response.text()?;

    debug!(status, body_len = body.len(), "Response received");

    Ok(RawResponse {
        status,
        headers,
        body,
    })
}
