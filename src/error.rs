//! Error types returned across the library boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reading or writing the local key/value store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The stored text exists but is not valid for the slot.
    /// Treat as data corruption, not as a missing value.
    #[error("could not parse stored `{key}`: {source}")]
    Corrupt {
        key: String,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage backend failed for `{key}`: {source:#}")]
    Backend {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

/// The `error` object of a failed API envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Failures talking to the recipe API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{method} requests cannot have a body")]
    BodyNotAllowed { method: reqwest::Method },

    #[error("invalid endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// The server could not be reached at all.
    #[error("could not reach the server: {message}")]
    Transport { message: String },

    /// The server answered with `{"success": false, ...}`.
    #[error("server could not handle `{endpoint}`: {}", .error.message.as_deref().unwrap_or("no message"))]
    Api {
        endpoint: String,
        error: ApiErrorBody,
    },

    /// The body was not JSON, or not the expected shape. `raw` keeps the text.
    #[error("invalid JSON response from `{endpoint}`: {source}")]
    InvalidResponse {
        endpoint: String,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize request body for `{endpoint}`: {source}")]
    Serialize {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Server-supplied message of an [`ApiError::Api`] failure.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Api { error, .. } => error.message.as_deref(),
            _ => None,
        }
    }

    /// Server-supplied data of an [`ApiError::Api`] failure.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            ApiError::Api { error, .. } => error.data.as_ref(),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    #[error("rating must be between 0 and 5, got {0}")]
    OutOfRange(f64),
    #[error("rating must be a multiple of 0.5, got {0}")]
    NotHalfStep(f64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported environment: {0} (expected development or production)")]
    UnknownEnvironment(String),
    #[error("don't know what the server address is in production; set RECIPEBOOK_API_URL")]
    MissingServerAddress,
    #[error("invalid server address `{0}`")]
    InvalidServerAddress(String),
    #[error("could not determine a data directory; set RECIPEBOOK_DATA_DIR")]
    MissingDataDir,
}
