//! OAuth2 client-credentials authentication for the Graph API.

use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::config::EntraProvider;
use crate::error::{GraphError, GraphResult};

/// Token response from the authority.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Cached access token with its expiry.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// True once the token is expired or will expire within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Acquires and caches access tokens for one tenant.
#[derive(Debug)]
pub struct TokenCache {
    client_id: String,
    client_secret: secrecy::SecretString,
    token_url: String,
    scope: String,
    http: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
    /// Refresh this long before actual expiry.
    grace_period: Duration,
}

impl TokenCache {
    /// Create a token cache for the provider's tenant.
    #[must_use]
    pub fn new(provider: &EntraProvider) -> Self {
        let cloud = provider.cloud();
        Self {
            client_id: provider.credentials().client_id.clone(),
            client_secret: provider.credentials().client_secret.clone(),
            token_url: format!(
                "{}/{}/oauth2/v2.0/token",
                cloud.login_endpoint(),
                provider.tenant_id()
            ),
            scope: format!("{}/.default", cloud.graph_endpoint()),
            http: reqwest::Client::new(),
            cached: RwLock::new(None),
            grace_period: Duration::minutes(5),
        }
    }

    /// Get a valid access token, refreshing when necessary.
    #[instrument(skip(self))]
    pub async fn get_token(&self) -> GraphResult<String> {
        {
            let cache = self.cached.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.grace_period) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        debug!("refreshing access token");
        let token = self.acquire().await?;

        let access_token = token.access_token.clone();
        *self.cached.write().await = Some(token);
        Ok(access_token)
    }

    /// Drop the cached token, forcing a refresh on next use.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    /// Acquire a new token with the client-credentials flow.
    async fn acquire(&self) -> GraphResult<CachedToken> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", &self.client_id),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", &self.scope),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| GraphError::Auth(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Auth(format!(
                "token request returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GraphError::Auth(format!("malformed token response: {e}")))?;

        let expires_at = Utc::now() + Duration::seconds(token.expires_in);
        debug!(%expires_at, "acquired access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}
