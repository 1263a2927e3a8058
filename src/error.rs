//! Error types for the catalog admin

use std::sync::Arc;

use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Prompt(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure recorded in a cache entry, shared by every reader
    #[error(transparent)]
    Fetch(Arc<Error>),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl Error {
    /// The store error behind this error, looking through cached failures
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Error::Remote(err) => Some(err),
            Error::Fetch(inner) => inner.remote(),
            _ => None,
        }
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt(err.to_string())
    }
}

/// Product field a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    Price,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Price => "price",
        };
        f.write_str(name)
    }
}

/// Client-side validation errors, raised before any network call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,

    #[error("Name must be at most {max} characters (got {len})")]
    NameTooLong { len: usize, max: usize },

    #[error("Description is required")]
    EmptyDescription,

    #[error("Description must be at most {max} characters (got {len})")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("Valid price is required: {0}")]
    InvalidPrice(String),
}

impl ValidationError {
    /// The product field this error is about
    pub fn field(&self) -> Field {
        match self {
            ValidationError::EmptyName | ValidationError::NameTooLong { .. } => Field::Name,
            ValidationError::EmptyDescription | ValidationError::DescriptionTooLong { .. } => {
                Field::Description
            }
            ValidationError::InvalidPrice(_) => Field::Price,
        }
    }
}

/// Remote store errors. Each carries a human-readable message; none carry a retry hint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("Authentication failed. Check the configured API key.")]
    Unauthorized,

    #[error("Access denied. You don't have permission to access this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            RemoteError::Network("Failed to connect to the product store".to_string())
        } else {
            RemoteError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Pass --api-url or create ~/.catalog/config.yaml.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("API URL not configured. Pass --api-url or set CATALOG_API_URL.")]
    MissingApiUrl,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
