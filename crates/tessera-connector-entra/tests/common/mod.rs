//! Shared helpers for Entra connector integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

use tessera_connector_entra::{EntraCloud, EntraCredentials, EntraProvider, EntraSyncClient};

pub const TENANT: &str = "test-tenant";

/// Credentials accepted by the mocked token endpoint.
pub fn test_credentials() -> EntraCredentials {
    EntraCredentials {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string().into(),
    }
}

/// Provider whose graph and login endpoints both point at the mock server.
pub fn test_provider(server_uri: &str, dry_run: bool) -> EntraProvider {
    EntraProvider::builder()
        .tenant_id(TENANT)
        .credentials(test_credentials())
        .dry_run(dry_run)
        .cloud(EntraCloud::Custom {
            graph_url: server_uri.to_string(),
            login_url: server_uri.to_string(),
        })
        .build()
        .expect("valid test provider")
}

/// Mounts the client-credentials token endpoint.
pub async fn mock_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/{TENANT}/oauth2/v2.0/token")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "mock-access-token",
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}

pub fn verified_domain(name: &str) -> Value {
    json!({ "name": name, "isDefault": false })
}

pub fn organization(id: &str, domains: &[&str]) -> Value {
    json!({
        "id": id,
        "verifiedDomains": domains.iter().map(|d| verified_domain(d)).collect::<Vec<_>>(),
    })
}

/// Wraps items in an `OData` page, optionally with a continuation link.
pub fn odata_page(items: Vec<Value>, next_link: Option<&str>) -> Value {
    let mut page = json!({ "value": items });
    if let Some(link) = next_link {
        page["@odata.nextLink"] = json!(link);
    }
    page
}

pub fn odata_error(code: &str, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message } })
}

/// Replays a fixed sequence of pages, one per request.
pub struct PaginatedResponder {
    pages: Vec<Value>,
    current: AtomicUsize,
}

impl PaginatedResponder {
    pub fn new(pages: Vec<Value>) -> Self {
        Self {
            pages,
            current: AtomicUsize::new(0),
        }
    }
}

impl Respond for PaginatedResponder {
    fn respond(&self, _request: &wiremock::Request) -> ResponseTemplate {
        let idx = self.current.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(idx) {
            Some(page) => ResponseTemplate::new(200).set_body_json(page.clone()),
            None => ResponseTemplate::new(200).set_body_json(json!({ "value": [] })),
        }
    }
}

/// Mounts a single-page organization listing.
pub async fn mock_organization(server: &MockServer, domains: &[&str]) {
    let page = odata_page(vec![organization("org-1", domains)], None);
    Mock::given(method("GET"))
        .and(path("/v1.0/organization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page))
        .mount(server)
        .await;
}

/// Fully mocked sync client whose tenant verifies `domains`.
pub async fn sync_client(server: &MockServer, dry_run: bool, domains: &[&str]) -> EntraSyncClient {
    mock_token_endpoint(server).await;
    mock_organization(server, domains).await;
    EntraSyncClient::new(test_provider(&server.uri(), dry_run))
        .await
        .expect("sync client")
}
