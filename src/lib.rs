//! # sfdc-rest
//!
//! A synchronous Salesforce REST API client.
//!
//! The crate is organized around a single request execution pipeline: a
//! logical operation (verb, resource path, parameters, extra headers) is
//! encoded into a concrete HTTP request, executed over a blocking transport,
//! and the HTTP response is classified into a success payload, an
//! empty-success marker, a not-modified marker, or a typed API error.
//! The operation methods on [`Client`] are thin façades over that pipeline.
//!
//! ```text
//! Client op ──▶ RequestSpec ──▶ encode() ──▶ transport::execute()
//!                                                    │
//!            caller ◀── ApiResult / Error ◀── classify()
//! ```
//!
//! ## Security
//!
//! - Access tokens and client secrets are redacted in Debug output
//! - The Authorization header is redacted in captured diagnostic headers
//! - Tracing spans skip credential parameters
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfdc_rest::{Client, ClientConfig};
//!
//! fn main() -> Result<(), sfdc_rest::Error> {
//!     let config = ClientConfig::builder()
//!         .instance_url("https://login.salesforce.com")
//!         .client_id("consumer_key")
//!         .client_secret("consumer_secret")
//!         .build()?;
//!
//!     let mut client = Client::new(config);
//!     client.login("user@example.com", "hunter2", "SECTOKEN")?;
//!
//!     let accounts = client.search_soql("SELECT Id, Name FROM Account", false, false)?;
//!     println!("{}", accounts.into_value());
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod config;
mod error;
mod request;
mod response;
mod session;
mod transport;

pub use auth::TokenResponse;
pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder, ResultShape};
pub use error::{Error, ErrorKind, Result};
pub use request::{EncodedRequest, Method, Params, RequestSpec};
pub use response::{ApiResult, Payload, NOT_MODIFIED_MESSAGE};
pub use session::Session;
pub use transport::RawResponse;

/// Default Salesforce API version.
pub const DEFAULT_API_VERSION: &str = "62.0";

/// User-Agent string for the client.
pub const USER_AGENT: &str = concat!("sfdc-rest/", env!("CARGO_PKG_VERSION"));
