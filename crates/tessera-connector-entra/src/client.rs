//! Typed Graph API client with OData pagination support.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::transport::GraphTransport;

/// Graph API version this connector speaks.
const API_VERSION: &str = "v1.0";

/// `OData` error envelope returned by Graph.
#[derive(Debug, Deserialize)]
pub(crate) struct ODataErrorEnvelope {
    pub error: ODataErrorBody,
}

/// `OData` error body.
#[derive(Debug, Deserialize)]
pub(crate) struct ODataErrorBody {
    pub code: String,
    pub message: String,
}

/// One page of a paginated Graph collection.
#[derive(Debug, Deserialize)]
pub struct ODataPage<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Typed HTTP client for the Graph API.
///
/// A handle is cheap to construct; the sync client yields a fresh one per
/// access. All verbs funnel their responses through a single status check
/// that decodes `OData` error envelopes.
#[derive(Debug, Clone)]
pub struct GraphClient {
    transport: GraphTransport,
    base_url: String,
}

impl GraphClient {
    pub(crate) fn new(transport: GraphTransport, graph_endpoint: &str) -> Self {
        Self {
            transport,
            base_url: format!("{}/{}", graph_endpoint.trim_end_matches('/'), API_VERSION),
        }
    }

    /// Base URL for request building, including the API version.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a resource.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> GraphResult<T> {
        let response = self.transport.send(Method::GET, url, None::<&()>).await?;
        Self::decode_response(response).await
    }

    /// POST a payload and decode the created resource.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> GraphResult<T> {
        let response = self.transport.send(Method::POST, url, Some(body)).await?;
        Self::decode_response(response).await
    }

    /// POST a payload where success carries no body (for example `$ref`
    /// membership links).
    pub async fn post_no_content<B: Serialize>(&self, url: &str, body: &B) -> GraphResult<()> {
        let response = self.transport.send(Method::POST, url, Some(body)).await?;
        Self::expect_no_content(response).await
    }

    /// PATCH a resource; Graph answers `204 No Content`.
    pub async fn patch<B: Serialize>(&self, url: &str, body: &B) -> GraphResult<()> {
        let response = self.transport.send(Method::PATCH, url, Some(body)).await?;
        Self::expect_no_content(response).await
    }

    /// DELETE a resource; Graph answers `204 No Content`.
    pub async fn delete(&self, url: &str) -> GraphResult<()> {
        let response = self.transport.send(Method::DELETE, url, None::<&()>).await?;
        Self::expect_no_content(response).await
    }

    async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> GraphResult<T> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(GraphError::Request)?;

        if !status.is_success() {
            return Err(Self::api_error(status, headers, body));
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(decode_err) => {
                // Some endpoints answer 2xx with an error envelope instead
                // of the expected resource.
                if let Ok(envelope) = serde_json::from_str::<ODataErrorEnvelope>(&body) {
                    Err(GraphError::OData {
                        code: envelope.error.code,
                        message: envelope.error.message,
                    })
                } else {
                    Err(GraphError::Decode(decode_err))
                }
            }
        }
    }

    async fn expect_no_content(response: reqwest::Response) -> GraphResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let headers = response.headers().clone();
        let body = response.text().await.map_err(GraphError::Request)?;
        Err(Self::api_error(status, headers, body))
    }

    fn api_error(
        status: reqwest::StatusCode,
        headers: reqwest::header::HeaderMap,
        body: String,
    ) -> GraphError {
        let (code, message) = match serde_json::from_str::<ODataErrorEnvelope>(&body) {
            Ok(envelope) => (Some(envelope.error.code), envelope.error.message),
            Err(_) if body.is_empty() => (None, status.to_string()),
            Err(_) => (None, body),
        };
        GraphError::Api {
            status,
            headers,
            code,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odata_error_parsing() {
        let json = r#"{
            "error": {
                "code": "Request_ResourceNotFound",
                "message": "Resource not found"
            }
        }"#;

        let envelope: ODataErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.code, "Request_ResourceNotFound");
        assert_eq!(envelope.error.message, "Resource not found");
    }

    #[test]
    fn odata_page_parsing() {
        let json = r#"{
            "value": [{"id": "1"}, {"id": "2"}],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/organization?$skiptoken=xxx"
        }"#;

        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Item {
            id: String,
        }

        let page: ODataPage<Item> = serde_json::from_str(json).unwrap();
        assert_eq!(page.value.len(), 2);
        assert!(page.next_link.is_some());
    }

    #[test]
    fn api_error_prefers_odata_body() {
        let body = r#"{"error": {"code": "Request_BadRequest", "message": "nope"}}"#.to_string();
        let err = GraphClient::api_error(
            reqwest::StatusCode::BAD_REQUEST,
            reqwest::header::HeaderMap::new(),
            body,
        );
        match err {
            GraphError::Api { code, message, .. } => {
                assert_eq!(code.as_deref(), Some("Request_BadRequest"));
                assert_eq!(message, "nope");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        let err = GraphClient::api_error(
            reqwest::StatusCode::BAD_GATEWAY,
            reqwest::header::HeaderMap::new(),
            "upstream unhappy".to_string(),
        );
        match err {
            GraphError::Api { code, message, .. } => {
                assert!(code.is_none());
                assert_eq!(message, "upstream unhappy");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
