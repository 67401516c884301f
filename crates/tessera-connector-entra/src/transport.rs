//! Request adapter between the typed Graph client and the HTTP stack.
//!
//! Every outbound request passes through [`GraphTransport::send`], which
//! enforces the dry-run gate before any network I/O and injects the bearer
//! token afterwards.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use tracing::{debug, warn};

use tessera_sync::is_safe_method;

use crate::auth::TokenCache;
use crate::error::{GraphError, GraphResult};

/// Thin wrapper over [`reqwest::Client`] that authenticates requests and
/// rejects mutating ones while the provider is in dry-run mode.
#[derive(Debug, Clone)]
pub struct GraphTransport {
    http: reqwest::Client,
    tokens: Arc<TokenCache>,
    dry_run: bool,
}

impl GraphTransport {
    pub(crate) fn new(http: reqwest::Client, tokens: Arc<TokenCache>, dry_run: bool) -> Self {
        Self {
            http,
            tokens,
            dry_run,
        }
    }

    /// Dispatch one Graph request.
    ///
    /// In dry-run mode a request whose method is not read-only is rejected
    /// here, before any network I/O, carrying the target URL, method, and
    /// encoded body for audit.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> GraphResult<reqwest::Response> {
        if self.dry_run && !is_safe_method(&method) {
            let body_text = match body {
                Some(b) => serde_json::to_string(b)?,
                None => String::new(),
            };
            warn!(%method, url, "dry-run: rejecting mutating request");
            return Err(GraphError::DryRun {
                url: url.to_string(),
                method: method.to_string(),
                body: body_text,
            });
        }

        let token = self.tokens.get_token().await?;

        debug!(%method, url, "dispatching graph request");
        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(b) = body {
            request = request.json(b);
        }

        request.send().await.map_err(GraphError::Request)
    }
}
