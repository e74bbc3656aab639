//! Error types for the Metabase provider.

use thiserror::Error;

use crate::schema::Diagnostic;

/// Errors that can occur while talking to Metabase or driving a resource.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested entity was not found (HTTP 404, or a failed list scan).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The request conflicts with existing state (HTTP 409).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The API rejected the request payload (HTTP 400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The API key was missing or invalid (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The API key lacks permission for the operation (HTTP 403).
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Any other non-2xx response.
    #[error("{message} (status code: {status})")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Response body text.
        message: String,
    },

    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A value could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A response body did not match the expected DTO.
    #[error("{context}: {source}")]
    Decode {
        /// What was being decoded, e.g. `failed to decode create response`.
        context: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A locally enforced rule was violated. No request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider is missing or has invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// The operation is not supported by this resource.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),
}

impl ProviderError {
    /// Build the typed error for a non-2xx response.
    ///
    /// `message` is the response body read as text.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            400 => Self::BadRequest(message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            status => Self::Api { status, message },
        }
    }

    /// Wrap a JSON decode failure with the operation it belongs to.
    pub fn decode(operation: &str, source: serde_json::Error) -> Self {
        Self::Decode {
            context: format!("failed to decode {} response", operation),
            source,
        }
    }

    /// The HTTP status code behind this error, if it came from an API response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::BadRequest(_) => Some(400),
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this error means the entity no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Get the error message as a string.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::Validation(msg)
            | Self::Configuration(msg)
            | Self::UnknownResource(msg)
            | Self::Unimplemented(msg) => msg,
            Self::Api { message, .. } => message,
            Self::Decode { context, .. } => context,
            Self::Http(_err) => "HTTP error (see Debug output)",
            Self::Serialization(_err) => "serialization error (see Debug output)",
        }
    }

    /// Render this error as an error diagnostic with the given summary.
    pub fn to_diagnostic(&self, summary: impl Into<String>) -> Diagnostic {
        Diagnostic::error(summary).with_detail(self.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProviderError>;
