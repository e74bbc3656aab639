//! Provider configuration.
//!
//! The host supplies `host` and `api_key` once, at configure time. The same
//! values can be read from `METABASE_HOST` and `METABASE_API_KEY`.

use serde::Deserialize;
use std::fmt;

use crate::error::{ProviderError, Result};
use crate::schema::{Attribute, Schema};

/// Environment variable holding the Metabase base URL.
pub const HOST_ENV: &str = "METABASE_HOST";

/// Environment variable holding the Metabase API key.
pub const API_KEY_ENV: &str = "METABASE_API_KEY";

/// Connection settings for a Metabase instance.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Base URL, e.g. `https://metabase.example.com`.
    pub host: String,
    /// API key sent in the `x-api-key` header.
    pub api_key: String,
}

// Keeps the key out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ProviderConfig {
    /// Create a configuration, normalising the host.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self {
            host: host.into(),
            api_key: api_key.into(),
        }
        .normalized()
    }

    /// Parse the configuration object supplied by the host.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)
            .map_err(|e| ProviderError::Configuration(format!("invalid provider config: {}", e)))?;
        config.normalized()
    }

    /// Read the configuration from `METABASE_HOST` and `METABASE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var(HOST_ENV)
            .map_err(|_| ProviderError::Configuration(format!("{} is not set", HOST_ENV)))?;
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| ProviderError::Configuration(format!("{} is not set", API_KEY_ENV)))?;
        Self::new(host, api_key)
    }

    /// Schema of the provider configuration block.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_description("Metabase provider configuration")
            .with_attribute(
                "host",
                Attribute::required_string().with_description("Metabase API host URL"),
            )
            .with_attribute(
                "api_key",
                Attribute::required_string()
                    .with_description("Metabase API Key")
                    .sensitive(),
            )
    }

    fn normalized(mut self) -> Result<Self> {
        self.host = self.host.trim().trim_end_matches('/').to_string();
        if self.host.is_empty() {
            return Err(ProviderError::Configuration(
                "host must not be empty".to_string(),
            ));
        }
        if !(self.host.starts_with("http://") || self.host.starts_with("https://")) {
            return Err(ProviderError::Configuration(format!(
                "host must start with http:// or https://, got '{}'",
                self.host
            )));
        }
        if self.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "api_key must not be empty".to_string(),
            ));
        }
        Ok(self)
    }
}
