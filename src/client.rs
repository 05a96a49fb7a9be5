//! The client façade: typed resource operations over the pipeline.

use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::auth::{password_grant, TokenResponse};
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{encode, Method, Params, RequestSpec};
use crate::response::{classify, ApiResult};
use crate::session::Session;
use crate::transport;

/// RFC 1123-style format used for the If-Modified-Since header.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Synchronous Salesforce REST client.
///
/// Every resource operation assembles a [`RequestSpec`] and runs it through
/// the same pipeline: encode, execute, classify. All operations except
/// [`Client::login`] and [`Client::get_api_versions`] require a session and
/// otherwise fail with an authentication error.
///
/// Resource operations take `&self` and are safe to call from multiple
/// threads once a session exists; the transport handle is created inside
/// each call, never shared.
///
/// # Example
///
/// ```rust,ignore
/// let mut client = Client::new(config);
/// client.login("user@example.com", "hunter2", "SECTOKEN")?;
///
/// let account = client.get("Account", "001xx000003DGb2AAG", Some(&["Name", "Id"]))?;
/// let created = client.create("Contact", &serde_json::json!({"LastName": "Doe"}))?;
/// client.delete("Contact", "003xx000004TmiQAAS")?;
/// ```
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    session: Option<Session>,
    /// Last raw successful response body, kept as a debug handle.
    last_response: Mutex<Option<String>>,
}

impl Client {
    /// Create a new, not-yet-authenticated client.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            session: None,
            last_response: Mutex::new(None),
        }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The current session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns true once a login has succeeded.
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// The raw body of the last successful response, for post-hoc inspection.
    pub fn last_response(&self) -> Option<String> {
        self.last_response.lock().ok().and_then(|g| g.clone())
    }

    /// Authenticate with the password grant and populate the session.
    ///
    /// The security token is appended to the password in the grant body.
    /// Returns the full decoded token payload for inspection.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        security_token: &str,
    ) -> Result<TokenResponse> {
        let (session, token) = password_grant(&self.config, username, password, security_token)?;
        self.session = Some(session);
        Ok(token)
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Run a spec through encode → execute → classify against an absolute URL.
    fn dispatch(&self, spec: &RequestSpec, url: &str, token: Option<&str>) -> Result<ApiResult> {
        let encoded = encode(spec, url, token)?;
        let raw = transport::execute(&encoded, &spec.method)?;
        let result = classify(
            raw.status,
            &raw.body,
            self.config.result_shape(),
            &encoded.redacted_headers(),
        )?;

        if result.is_success() {
            if let Ok(mut last) = self.last_response.lock() {
                *last = Some(raw.body);
            }
        }

        Ok(result)
    }

    /// Run a spec under the session resource root, with the bearer token.
    fn call(&self, spec: RequestSpec) -> Result<ApiResult> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::Auth("not logged in".to_string())))?;

        let url = format!("{}{}", session.resource_root(), spec.path);
        self.dispatch(&spec, &url, Some(session.access_token()))
    }

    // =========================================================================
    // Metadata Operations
    // =========================================================================

    /// List the API versions available on the configured instance.
    ///
    /// The one operation addressed to the unversioned data-services root,
    /// sent without an Authorization header; it works before login.
    #[instrument(skip(self))]
    pub fn get_api_versions(&self) -> Result<ApiResult> {
        let spec = RequestSpec::new(Method::Get, "");
        let url = format!("{}/services/data/", self.config.instance_url());
        self.dispatch(&spec, &url, None)
    }

    /// Get the org limits.
    #[instrument(skip(self))]
    pub fn get_org_limits(&self) -> Result<ApiResult> {
        self.call(RequestSpec::new(Method::Get, "limits/"))
    }

    /// List the resources available under the versioned root.
    #[instrument(skip(self))]
    pub fn get_available_resources(&self) -> Result<ApiResult> {
        self.call(RequestSpec::new(Method::Get, ""))
    }

    /// List all sobjects in the org.
    #[instrument(skip(self))]
    pub fn get_all_objects(&self) -> Result<ApiResult> {
        self.call(RequestSpec::new(Method::Get, "sobjects/"))
    }

    /// Get metadata for one sobject.
    ///
    /// With `all` the full describe is requested, otherwise only the basic
    /// object information. `since`, when given, must parse as a date/time
    /// (RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM:SS`, or `YYYY-MM-DD`) and is
    /// sent as an If-Modified-Since header; a 304 answer classifies as
    /// [`ApiResult::NotModified`]. An unparseable `since` fails with a
    /// validation error before any request is sent.
    #[instrument(skip(self))]
    pub fn get_object_metadata(
        &self,
        object_name: &str,
        all: bool,
        since: Option<&str>,
    ) -> Result<ApiResult> {
        let path = if all {
            format!("sobjects/{}/describe/", object_name)
        } else {
            format!("sobjects/{}", object_name)
        };

        let mut spec = RequestSpec::new(Method::Get, path);
        if let Some(since) = since {
            let timestamp = parse_since(since)?;
            spec = spec.header(
                "If-Modified-Since",
                timestamp.format(HTTP_DATE_FORMAT).to_string(),
            );
        }

        self.call(spec)
    }

    // =========================================================================
    // CRUD Operations
    // =========================================================================

    /// Create a record.
    #[instrument(skip(self, data))]
    pub fn create<T: Serialize>(&self, object_name: &str, data: &T) -> Result<ApiResult> {
        let spec = RequestSpec::new(Method::Post, format!("sobjects/{}", object_name))
            .params(record_params(data)?);
        self.call(spec)
    }

    /// Upsert a record keyed by an external id.
    ///
    /// The `field/value` external-id segment is embedded in `object_name` by
    /// the caller; upsert semantics are a server-side contract and the client
    /// performs no special handling.
    #[instrument(skip(self, data))]
    pub fn upsert<T: Serialize>(&self, object_name: &str, data: &T) -> Result<ApiResult> {
        let spec = RequestSpec::new(Method::Patch, format!("sobjects/{}", object_name))
            .params(record_params(data)?);
        self.call(spec)
    }

    /// Update a record by id.
    #[instrument(skip(self, data))]
    pub fn update<T: Serialize>(
        &self,
        object_name: &str,
        id: &str,
        data: &T,
    ) -> Result<ApiResult> {
        let spec = RequestSpec::new(Method::Patch, format!("sobjects/{}/{}", object_name, id))
            .params(record_params(data)?);
        self.call(spec)
    }

    /// Delete a record by id. Sends no body.
    #[instrument(skip(self))]
    pub fn delete(&self, object_name: &str, id: &str) -> Result<ApiResult> {
        self.call(RequestSpec::new(
            Method::Delete,
            format!("sobjects/{}/{}", object_name, id),
        ))
    }

    /// Get a record by id, optionally restricted to the given fields.
    #[instrument(skip(self))]
    pub fn get(
        &self,
        object_name: &str,
        id: &str,
        fields: Option<&[&str]>,
    ) -> Result<ApiResult> {
        let mut spec = RequestSpec::new(Method::Get, format!("sobjects/{}/{}", object_name, id));
        if let Some(fields) = fields {
            spec = spec.param("fields", fields.join(","));
        }
        self.call(spec)
    }

    // =========================================================================
    // Query Operations
    // =========================================================================

    /// Run a SOQL query.
    ///
    /// `all` routes to `queryAll/` (includes deleted/archived records).
    /// With `explain` the query string is sent under the `explain` parameter
    /// instead of `q` and the server returns the query plan.
    #[instrument(skip(self, query))]
    pub fn search_soql(&self, query: &str, all: bool, explain: bool) -> Result<ApiResult> {
        let path = if all { "queryAll/" } else { "query/" };
        let key = if explain { "explain" } else { "q" };
        self.call(RequestSpec::new(Method::Get, path).param(key, query))
    }
}

/// Serialize a record into the body parameter mapping.
fn record_params<T: Serialize>(data: &T) -> Result<Params> {
    match serde_json::to_value(data)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::new(ErrorKind::Validation(format!(
            "record data must be a JSON object, got {}",
            json_type_name(&other)
        )))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a caller-supplied `since` value into a UTC timestamp.
fn parse_since(since: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(since) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(since) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(since, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(since, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    Err(Error::new(ErrorKind::Validation(format!(
        "'{}' is not a recognized date/time value",
        since
    ))))
}
