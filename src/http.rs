//! Authenticated HTTP client construction
//!
//! In a deployed login flow the bearer-carrying client comes from the OAuth
//! code exchange. The binary builds an equivalent client from a raw access
//! token so the gate can be driven directly from the command line.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use url::Url;

use crate::config::HttpConfig;
use crate::error::GateError;

/// Builds a client that attaches `Authorization: Bearer <token>` to every
/// request it issues.
///
/// The authorization header is marked sensitive so it is redacted from
/// debug output.
///
/// # Errors
///
/// Returns [`GateError::Client`] if the token is not a valid header value or
/// the client cannot be constructed.
///
/// # Examples
///
/// ```
/// use authgate::config::HttpConfig;
/// use authgate::http::authenticated_client;
///
/// let client = authenticated_client("glpat-example", &HttpConfig::default());
/// assert!(client.is_ok());
///
/// let bad = authenticated_client("line\nbreak", &HttpConfig::default());
/// assert!(bad.is_err());
/// ```
pub fn authenticated_client(token: &str, config: &HttpConfig) -> Result<Client, GateError> {
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
        .map_err(|e| GateError::Client(format!("invalid access token: {e}")))?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .default_headers(headers)
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()
        .map_err(|e| GateError::Client(format!("failed to build HTTP client: {e}")))
}

/// Issues one GET and reads the whole body.
///
/// Non-success statuses are turned into errors before the body is read, so
/// an error document is never decoded as a valid payload. The response is
/// consumed on every path.
pub(crate) async fn get(client: &Client, url: Url) -> Result<(HeaderMap, Bytes), reqwest::Error> {
    tracing::debug!("GET {}", url);
    let response = client.get(url).send().await?.error_for_status()?;
    let headers = response.headers().clone();
    let body = response.bytes().await?;
    Ok((headers, body))
}

/// Appends `segment` to an API base URL, keeping any base path such as
/// `/api/v4`.
pub(crate) fn endpoint(base: &Url, segment: &str) -> Result<Url, GateError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        segment.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| GateError::Config(format!("invalid endpoint {joined}: {e}")))
}
