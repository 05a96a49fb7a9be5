//! Error types for sfdc-rest.

/// Result type alias for sfdc-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sfdc-rest operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Auth(_))
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation(_))
    }

    /// Returns true if this is a transport-level error.
    pub fn is_transport_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }

    /// Returns the HTTP status code if this is an API error.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the captured request headers if this is an API error.
    ///
    /// The Authorization value is redacted at capture time.
    pub fn request_headers(&self) -> Option<&[(String, String)]> {
        match &self.kind {
            ErrorKind::Api {
                request_headers, ..
            } => Some(request_headers),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Not logged in, or a login response missing required fields.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A caller-supplied argument was malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network, TLS, or timeout failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server returned an error status.
    ///
    /// `message` is the `error_description` field when the body carried a
    /// structured OAuth-style error, otherwise the raw response body.
    #[error("Salesforce API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        request_headers: Vec<(String, String)>,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::with_source(ErrorKind::Transport(err.to_string()), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}
