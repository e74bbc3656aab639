//! HTTP client for the Metabase REST API.
//!
//! Every request is JSON, carries the `x-api-key` header, and fails with a typed
//! [`ProviderError`] when the response status is not 2xx. Successful responses
//! are handed back untouched so each repository decodes its own DTO.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Maximum length of an error body written to the log.
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Authenticated client bound to one Metabase host.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct MetabaseClient {
    http: Client,
    host: String,
    api_key: String,
}

impl std::fmt::Debug for MetabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetabaseClient")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl MetabaseClient {
    /// Create a client for the configured host.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("metabase-provider/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http_client(config, http))
    }

    /// Create a client that sends requests through an existing `reqwest::Client`.
    pub fn with_http_client(config: &ProviderConfig, http: Client) -> Self {
        Self {
            http,
            host: config.host.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// The base URL requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Send a POST with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Send a GET.
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.request::<()>(Method::GET, path, None).await
    }

    /// Send a PUT with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Send a DELETE.
    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.request::<()>(Method::DELETE, path, None).await
    }

    /// Decode a successful response body.
    ///
    /// `operation` names the call in the error, e.g. `create` gives
    /// `failed to decode create response`.
    pub async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ProviderError::decode(operation, e))
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.host, path);
        debug!(method = %method, url = %url, "Sending Metabase request");

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key);
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            debug!(method = %method, url = %url, status = status.as_u16(), "Metabase request succeeded");
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        warn!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            body = %truncate_for_log(&message),
            "Metabase request failed"
        );
        Err(ProviderError::from_status(status.as_u16(), message))
    }
}

fn truncate_for_log(body: &str) -> String {
    if body.len() <= MAX_LOG_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_LOG_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
}
