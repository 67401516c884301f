//! Generic outgoing-sync client base.
//!
//! Connectors that push organizational objects (users, groups) to a remote
//! directory build on this crate: it defines the sync error taxonomy with
//! transient/fatal classification, the safe-method set used for dry-run
//! gating, the client contract connectors implement, a caller-side retry
//! policy, and a sanitizer for log-safe diagnostic capture.
//!
//! The adapter layer itself never retries; a caller that receives a
//! [`SyncError`] classified as transient decides whether to retry, usually
//! through [`RetryPolicy`].

mod base;
mod error;
mod retry;
mod sanitize;

pub use base::{is_safe_method, OutgoingSyncClient, SAFE_METHODS};
pub use error::{SyncError, SyncResult};
pub use retry::RetryPolicy;
pub use sanitize::sanitize_value;
