//! Sync error taxonomy.
//!
//! Error definitions with transient/fatal classification for retry
//! decisions made by callers.

use reqwest::header::HeaderMap;
use thiserror::Error;

/// Result type for outgoing-sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Outcome of a failed outgoing-sync operation.
///
/// Every transport- or remote-side failure a connector encounters is
/// translated into exactly one of these variants at a single funnel point.
/// Remote statuses this taxonomy does not recognize are carried unmodified
/// in [`SyncError::Unmapped`] rather than swallowed.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A mutating request was attempted while the provider is in dry-run
    /// mode. No network I/O occurred; the rejected request is captured for
    /// audit.
    #[error("dry-run rejected {method} {url}")]
    DryRunRejected {
        url: String,
        method: String,
        body: String,
    },

    /// Fatal failure. The whole sync run must stop.
    #[error("stopping sync: {message}")]
    StopSync {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transient failure. The operation may succeed if retried.
    #[error("transient sync failure: {message}")]
    Transient {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The remote object does not exist.
    #[error("object not found: {message}")]
    NotFound { message: String },

    /// The remote rejected the request as malformed.
    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        headers: Option<HeaderMap>,
    },

    /// The remote already holds an object with the same identity.
    #[error("object exists: {message}")]
    ObjectExists {
        message: String,
        headers: Option<HeaderMap>,
    },

    /// A remote error with a status this layer does not map. The original
    /// error propagates unchanged so callers see the real failure.
    #[error("unmapped remote error: {0}")]
    Unmapped(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SyncError {
    /// Whether the operation may be retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, SyncError::Transient { .. })
    }

    /// Whether the failure terminates the whole sync run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::StopSync { .. })
    }

    // Convenience constructors

    /// Create a fatal stop-sync error.
    pub fn stop_sync(message: impl Into<String>) -> Self {
        SyncError::StopSync {
            message: message.into(),
            source: None,
        }
    }

    /// Create a fatal stop-sync error with the originating error attached.
    pub fn stop_sync_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SyncError::StopSync {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a transient error.
    pub fn transient(message: impl Into<String>) -> Self {
        SyncError::Transient {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transient error with the originating error attached.
    pub fn transient_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SyncError::Transient {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        SyncError::NotFound {
            message: message.into(),
        }
    }

    /// Create a bad-request error without response headers.
    pub fn bad_request(message: impl Into<String>) -> Self {
        SyncError::BadRequest {
            message: message.into(),
            headers: None,
        }
    }

    /// Create an object-exists error without response headers.
    pub fn object_exists(message: impl Into<String>) -> Self {
        SyncError::ObjectExists {
            message: message.into(),
            headers: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(SyncError::transient("connection reset").is_transient());
        assert!(!SyncError::transient("connection reset").is_fatal());

        for err in [
            SyncError::stop_sync("bad credentials"),
            SyncError::not_found("user gone"),
            SyncError::bad_request("malformed"),
            SyncError::object_exists("duplicate"),
        ] {
            assert!(!err.is_transient());
        }
    }

    #[test]
    fn fatal_classification() {
        assert!(SyncError::stop_sync("bad credentials").is_fatal());
        assert!(!SyncError::not_found("user gone").is_fatal());
        assert!(!SyncError::DryRunRejected {
            url: "https://example.test/users".into(),
            method: "POST".into(),
            body: "{}".into(),
        }
        .is_fatal());
    }

    #[test]
    fn display_messages() {
        let err = SyncError::DryRunRejected {
            url: "https://example.test/users".into(),
            method: "POST".into(),
            body: "{}".into(),
        };
        assert_eq!(err.to_string(), "dry-run rejected POST https://example.test/users");

        let err = SyncError::bad_request("invalid email domain: a@b.c");
        assert_eq!(err.to_string(), "bad request: invalid email domain: a@b.c");
    }

    #[test]
    fn source_is_preserved() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = SyncError::transient_with_source("request failed", inner);
        assert!(std::error::Error::source(&err).is_some());
    }
}
