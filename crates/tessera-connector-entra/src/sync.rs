//! The Entra sync client: authenticated requests, domain validation, and
//! the single error-translation funnel.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use tessera_sync::{sanitize_value, SyncError, SyncResult};

use crate::auth::TokenCache;
use crate::client::{GraphClient, ODataPage};
use crate::config::EntraProvider;
use crate::error::GraphError;
use crate::transport::GraphTransport;

/// Kiota-style clients keep a non-serializable store reference under this
/// key; it must never reach diagnostic output.
const BACKING_STORE_KEY: &str = "backing_store";

/// An organization object from `GET /organization`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub verified_domains: Vec<VerifiedDomain>,
}

/// A domain verified for the tenant.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedDomain {
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Client for one outgoing sync run against an Entra tenant.
///
/// Constructed per run: resolves credentials, prefetches the tenant's
/// verified domains once, then serves a bounded sequence of requests. It
/// holds no state across runs and performs no internal parallelism; each
/// [`request`](Self::request) awaits exactly one operation.
#[derive(Debug)]
pub struct EntraSyncClient {
    provider: EntraProvider,
    http: reqwest::Client,
    tokens: Arc<TokenCache>,
    domains: Vec<String>,
}

impl EntraSyncClient {
    /// Build a sync client and prefetch the verified-domain set.
    ///
    /// # Errors
    ///
    /// Fails with [`SyncError::StopSync`] when credentials are rejected and
    /// with [`SyncError::Transient`] when the prefetch cannot reach the
    /// directory.
    #[instrument(skip(provider), fields(tenant_id = %provider.tenant_id()))]
    pub async fn new(provider: EntraProvider) -> SyncResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SyncError::stop_sync(format!("failed to build http client: {e}")))?;
        let tokens = Arc::new(TokenCache::new(&provider));

        let mut client = Self {
            provider,
            http,
            tokens,
            domains: Vec::new(),
        };
        client.prefetch_domains().await?;
        Ok(client)
    }

    /// A freshly constructed, authenticated Graph client handle.
    #[must_use]
    pub fn client(&self) -> GraphClient {
        GraphClient::new(
            GraphTransport::new(
                self.http.clone(),
                Arc::clone(&self.tokens),
                self.provider.dry_run(),
            ),
            self.provider.cloud().graph_endpoint(),
        )
    }

    /// The provider configuration this client was built from.
    #[must_use]
    pub fn provider(&self) -> &EntraProvider {
        &self.provider
    }

    /// Verified domains prefetched at construction.
    #[must_use]
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Run one Graph operation and translate any failure into the sync
    /// taxonomy.
    ///
    /// This is the single funnel point: authentication failures and
    /// structured non-HTTP errors stop the run, network failures are
    /// transient, 404/400/409 become per-object outcomes, and any other
    /// remote status propagates unmodified.
    pub async fn request<T>(
        &self,
        operation: impl Future<Output = Result<T, GraphError>>,
    ) -> SyncResult<T> {
        operation.await.map_err(map_graph_error)
    }

    /// Accumulate `verifiedDomains[].name` from every page of the
    /// organization listing. A page without domains but with a
    /// continuation link is a normal iteration step.
    async fn prefetch_domains(&mut self) -> SyncResult<()> {
        let client = self.client();
        let mut url = format!("{}/organization", client.base_url());

        loop {
            let page: ODataPage<Organization> = self.request(client.get(&url)).await?;
            for org in &page.value {
                debug!(organization = %org.id, domains = org.verified_domains.len(), "collected verified domains");
            }
            self.domains.extend(
                page.value
                    .into_iter()
                    .flat_map(|org| org.verified_domains)
                    .map(|domain| domain.name),
            );

            match page.next_link {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(())
    }

    /// Check that every address belongs to a verified domain.
    ///
    /// All-or-nothing: the first mismatch fails the whole call with a
    /// bad-request error naming the offending address.
    pub fn check_email_valid(&self, emails: &[&str]) -> SyncResult<()> {
        for email in emails {
            let valid = self
                .domains
                .iter()
                .any(|domain| email.ends_with(&format!("@{domain}")));
            if !valid {
                return Err(SyncError::bad_request(format!(
                    "invalid email domain: {email}"
                )));
            }
        }
        Ok(())
    }

    /// Serialize a Graph entity into a plain map for diagnostic capture,
    /// stripping the backing-store reference and scrubbing the values for
    /// structured logging.
    pub fn entity_as_dict<E: serde::Serialize>(&self, entity: &E) -> SyncResult<Map<String, Value>> {
        let value = serde_json::to_value(entity)
            .map_err(|e| SyncError::stop_sync_with_source("entity is not serializable", e))?;
        let Value::Object(mut map) = value else {
            return Err(SyncError::stop_sync("entity did not serialize to an object"));
        };
        map.remove(BACKING_STORE_KEY);

        match sanitize_value(Value::Object(map)) {
            Value::Object(sanitized) => Ok(sanitized),
            _ => Err(SyncError::stop_sync("sanitizer did not return an object")),
        }
    }
}

/// Translate a transport failure into the sync taxonomy.
fn map_graph_error(err: GraphError) -> SyncError {
    match err {
        GraphError::DryRun { url, method, body } => {
            SyncError::DryRunRejected { url, method, body }
        }
        GraphError::Auth(_) | GraphError::OData { .. } | GraphError::Config(_) => {
            let message = err.to_string();
            SyncError::StopSync {
                message,
                source: Some(Box::new(err)),
            }
        }
        GraphError::Request(_) | GraphError::Decode(_) => SyncError::Transient {
            message: "failed to send request".to_string(),
            source: Some(Box::new(err)),
        },
        GraphError::Api {
            status,
            headers,
            code,
            message,
        } => match status {
            StatusCode::NOT_FOUND => SyncError::NotFound { message },
            StatusCode::BAD_REQUEST => SyncError::BadRequest {
                message,
                headers: Some(headers),
            },
            StatusCode::CONFLICT => SyncError::ObjectExists {
                message,
                headers: Some(headers),
            },
            _ => SyncError::Unmapped(Box::new(GraphError::Api {
                status,
                headers,
                code,
                message,
            })),
        },
    }
}
