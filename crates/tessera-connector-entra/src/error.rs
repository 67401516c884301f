//! Error types for the Graph transport layer.
//!
//! These describe *what went wrong on the wire*; the sync client's request
//! funnel translates them into the [`tessera_sync::SyncError`] taxonomy.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for Graph transport operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// A failure raised by the Graph transport or token layer.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Provider configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Token acquisition or refresh failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A structured OData error carried by a response without a usable
    /// HTTP error status (for example an error envelope in a 200 body).
    #[error("graph api error {code}: {message}")]
    OData { code: String, message: String },

    /// Network-level request or response failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Error response from the Graph API, keyed by its HTTP status.
    #[error("graph api returned {status}: {message}")]
    Api {
        status: StatusCode,
        headers: HeaderMap,
        code: Option<String>,
        message: String,
    },

    /// A mutating request was stopped by the dry-run gate before dispatch.
    #[error("dry-run rejected {method} {url}")]
    DryRun {
        url: String,
        method: String,
        body: String,
    },

    /// A response or request body could not be encoded or decoded.
    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),
}
