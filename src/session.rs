//! Authenticated session state.

use serde::{Deserialize, Serialize};

/// State produced by a successful login.
///
/// A session is created only by [`Client::login`](crate::Client::login) and
/// read-only thereafter; there is no token refresh. The access token is
/// redacted in Debug output.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    access_token: String,
    base_url: String,
    resource_root: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("resource_root", &self.resource_root)
            .finish()
    }
}

impl Session {
    /// Create a session from a login response.
    pub(crate) fn new(
        access_token: impl Into<String>,
        instance_url: &str,
        api_version: &str,
    ) -> Self {
        let base_url = instance_url.trim_end_matches('/').to_string();
        let resource_root = format!("{}/services/data/v{}/", base_url, api_version);
        Self {
            access_token: access_token.into(),
            base_url,
            resource_root,
        }
    }

    /// The bearer token issued by the token endpoint.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The instance URL returned by login.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The versioned REST root: `{base_url}/services/data/v{version}/`.
    pub fn resource_root(&self) -> &str {
        &self.resource_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_root() {
        let session = Session::new("token123", "https://na1.salesforce.com", "62.0");
        assert_eq!(session.base_url(), "https://na1.salesforce.com");
        assert_eq!(
            session.resource_root(),
            "https://na1.salesforce.com/services/data/v62.0/"
        );
    }

    #[test]
    fn test_trailing_slash_handling() {
        let session = Session::new("token", "https://na1.salesforce.com/", "60.0");
        assert_eq!(
            session.resource_root(),
            "https://na1.salesforce.com/services/data/v60.0/"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("super_secret_token", "https://na1.salesforce.com", "62.0");
        let debug_output = format!("{:?}", session);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));
    }
}
