//! Provider configuration for the Entra connector.

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

use crate::error::{GraphError, GraphResult};

/// Client-secret credentials scoped to a directory tenant.
#[derive(Debug, Clone, Deserialize)]
pub struct EntraCredentials {
    /// Application (client) ID.
    pub client_id: String,
    /// Client secret. Never printed by `Debug` and never logged.
    pub client_secret: SecretString,
}

/// National-cloud endpoints for Entra.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntraCloud {
    /// Worldwide commercial cloud.
    Commercial,
    /// US Government (GCC High / DoD).
    UsGovernment,
    /// China (operated by 21Vianet).
    China,
    /// Explicit endpoints, used for private deployments and tests.
    Custom { graph_url: String, login_url: String },
}

impl Default for EntraCloud {
    fn default() -> Self {
        EntraCloud::Commercial
    }
}

impl EntraCloud {
    /// Base URL of the Graph API for this cloud, without API version.
    #[must_use]
    pub fn graph_endpoint(&self) -> &str {
        match self {
            EntraCloud::Commercial => "https://graph.microsoft.com",
            EntraCloud::UsGovernment => "https://graph.microsoft.us",
            EntraCloud::China => "https://microsoftgraph.chinacloudapi.cn",
            EntraCloud::Custom { graph_url, .. } => graph_url,
        }
    }

    /// Base URL of the token authority for this cloud.
    #[must_use]
    pub fn login_endpoint(&self) -> &str {
        match self {
            EntraCloud::Commercial => "https://login.microsoftonline.com",
            EntraCloud::UsGovernment => "https://login.microsoftonline.us",
            EntraCloud::China => "https://login.chinacloudapi.cn",
            EntraCloud::Custom { login_url, .. } => login_url,
        }
    }
}

/// Long-lived configuration describing how outgoing sync should behave.
///
/// Owned by the surrounding application and read-only from the adapter's
/// perspective. When `dry_run` is set, every mutating request is rejected
/// before network I/O.
#[derive(Debug, Clone)]
pub struct EntraProvider {
    tenant_id: String,
    credentials: EntraCredentials,
    dry_run: bool,
    cloud: EntraCloud,
}

impl EntraProvider {
    /// Start building a provider configuration.
    #[must_use]
    pub fn builder() -> EntraProviderBuilder {
        EntraProviderBuilder::default()
    }

    /// Directory (tenant) ID.
    #[must_use]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Tenant credentials for the client-credentials flow.
    #[must_use]
    pub fn credentials(&self) -> &EntraCredentials {
        &self.credentials
    }

    /// Whether mutating requests are gated off.
    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Cloud endpoints to talk to.
    #[must_use]
    pub fn cloud(&self) -> &EntraCloud {
        &self.cloud
    }
}

/// Builder for [`EntraProvider`].
#[derive(Debug, Default)]
pub struct EntraProviderBuilder {
    tenant_id: Option<String>,
    credentials: Option<EntraCredentials>,
    dry_run: bool,
    cloud: EntraCloud,
}

impl EntraProviderBuilder {
    /// Set the directory (tenant) ID.
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the tenant credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: EntraCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Gate mutating requests off without performing them.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Select the cloud endpoints (defaults to the commercial cloud).
    #[must_use]
    pub fn cloud(mut self, cloud: EntraCloud) -> Self {
        self.cloud = cloud;
        self
    }

    /// Validate and build the provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Config`] when the tenant ID or client ID is
    /// empty, or when custom cloud endpoints are not valid URLs.
    pub fn build(self) -> GraphResult<EntraProvider> {
        let tenant_id = self
            .tenant_id
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GraphError::Config("tenant_id must not be empty".into()))?;

        let credentials = self
            .credentials
            .ok_or_else(|| GraphError::Config("credentials are required".into()))?;
        if credentials.client_id.is_empty() {
            return Err(GraphError::Config("client_id must not be empty".into()));
        }

        if let EntraCloud::Custom {
            graph_url,
            login_url,
        } = &self.cloud
        {
            for url in [graph_url, login_url] {
                Url::parse(url)
                    .map_err(|e| GraphError::Config(format!("invalid endpoint {url}: {e}")))?;
            }
        }

        Ok(EntraProvider {
            tenant_id,
            credentials,
            dry_run: self.dry_run,
            cloud: self.cloud,
        })
    }
}
