//! Client configuration.

use crate::error::{Error, ErrorKind, Result};
use crate::DEFAULT_API_VERSION;

/// How decoded success payloads are represented.
///
/// This is a caller-visible representation choice only; it never changes
/// which requests are sent or how responses are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultShape {
    /// Decode the body as a JSON value tree.
    #[default]
    Structured,
    /// Decode a top-level JSON object into a key-order-preserving mapping.
    ///
    /// Non-object bodies (arrays, scalars) are identical under both shapes.
    Mapping,
}

/// Configuration for a Salesforce client. Immutable after construction.
///
/// The client secret is redacted in Debug output to prevent accidental
/// exposure in logs.
#[derive(Clone)]
pub struct ClientConfig {
    instance_url: String,
    api_version: String,
    client_id: String,
    client_secret: String,
    result_shape: ResultShape,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("instance_url", &self.instance_url)
            .field("api_version", &self.api_version)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("result_shape", &self.result_shape)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// The configured login/instance URL, without a trailing slash.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// The API version, e.g. "62.0".
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The connected app consumer key.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The connected app consumer secret.
    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// The configured payload representation.
    pub fn result_shape(&self) -> ResultShape {
        self.result_shape
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    instance_url: Option<String>,
    api_version: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    result_shape: ResultShape,
}

impl ClientConfigBuilder {
    /// Set the login/instance URL.
    pub fn instance_url(mut self, url: impl Into<String>) -> Self {
        self.instance_url = Some(url.into());
        self
    }

    /// Set the API version (e.g. "62.0"). Defaults to [`DEFAULT_API_VERSION`].
    pub fn api_version(mut self, version: impl ToString) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Set the connected app consumer key.
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    /// Set the connected app consumer secret.
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Select the payload representation for decoded success bodies.
    pub fn result_shape(mut self, shape: ResultShape) -> Self {
        self.result_shape = shape;
        self
    }

    /// Build the configuration, validating the instance URL.
    pub fn build(self) -> Result<ClientConfig> {
        let instance_url = self
            .instance_url
            .ok_or_else(|| Error::new(ErrorKind::Config("instance_url is required".to_string())))?;

        let parsed = url::Url::parse(&instance_url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::new(ErrorKind::Config(format!(
                "instance_url must be http(s), got '{}'",
                parsed.scheme()
            ))));
        }

        Ok(ClientConfig {
            instance_url: instance_url.trim_end_matches('/').to_string(),
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            client_id: self.client_id.unwrap_or_default(),
            client_secret: self.client_secret.unwrap_or_default(),
            result_shape: self.result_shape,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder()
            .instance_url("https://login.salesforce.com")
            .client_id("key")
            .client_secret("secret")
            .build()
            .unwrap();

        assert_eq!(config.instance_url(), "https://login.salesforce.com");
        assert_eq!(config.api_version(), DEFAULT_API_VERSION);
        assert_eq!(config.result_shape(), ResultShape::Structured);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::builder()
            .instance_url("https://na1.salesforce.com/")
            .build()
            .unwrap();

        assert_eq!(config.instance_url(), "https://na1.salesforce.com");
    }

    #[test]
    fn test_numeric_api_version() {
        let config = ClientConfig::builder()
            .instance_url("https://na1.salesforce.com")
            .api_version(60)
            .build()
            .unwrap();

        assert_eq!(config.api_version(), "60");
    }

    #[test]
    fn test_invalid_instance_url() {
        let err = ClientConfig::builder()
            .instance_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));

        let err = ClientConfig::builder()
            .instance_url("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));

        let err = ClientConfig::builder().build().unwrap_err();
        assert!(err.to_string().contains("instance_url is required"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ClientConfig::builder()
            .instance_url("https://login.salesforce.com")
            .client_secret("super_secret_value")
            .build()
            .unwrap();

        let debug_output = format!("{:?}", config);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_value"));
    }
}
