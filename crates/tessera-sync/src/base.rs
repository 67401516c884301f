//! Outgoing-sync client contract.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use crate::error::SyncResult;

/// Request methods that never mutate remote state.
///
/// In dry-run mode these are forwarded; everything else is rejected before
/// any network I/O happens.
pub const SAFE_METHODS: &[Method] = &[Method::GET, Method::HEAD, Method::OPTIONS];

/// Whether a request method is read-only.
#[must_use]
pub fn is_safe_method(method: &Method) -> bool {
    SAFE_METHODS.contains(method)
}

/// Contract for a client that pushes one kind of local object to a remote
/// directory.
///
/// Implementations translate every transport failure into a
/// [`SyncError`](crate::SyncError) at a single funnel point; callers decide
/// what a per-object outcome (not-found, bad-request, object-exists) means
/// for their run, and stop entirely on a fatal error.
#[async_trait]
pub trait OutgoingSyncClient: Send + Sync {
    /// The local model type being synced outward.
    type Model: Send + Sync;
    /// The remote wire schema the model maps to.
    type Schema: Serialize + Send + Sync;

    /// Convert a local model into the remote wire schema, validating
    /// whatever the remote will not accept (for example email domains).
    fn to_schema(&self, model: &Self::Model) -> SyncResult<Self::Schema>;

    /// Create the remote counterpart of a local model.
    ///
    /// Returns the remote object identifier.
    async fn create(&self, model: &Self::Model) -> SyncResult<String>;

    /// Update the remote counterpart of a local model.
    async fn update(&self, model: &Self::Model, remote_id: &str) -> SyncResult<()>;

    /// Delete the remote object.
    async fn delete(&self, remote_id: &str) -> SyncResult<()>;
}
