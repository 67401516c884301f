//! Group create/update/delete forwarding and membership links.

mod common;

use common::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tessera_connector_entra::{EntraGroupClient, GroupRecord};
use tessera_sync::{OutgoingSyncClient, SyncError};

fn group() -> GroupRecord {
    GroupRecord {
        name: "Engineering".to_string(),
        description: Some("Product engineering".to_string()),
    }
}

#[tokio::test]
async fn create_group_posts_security_group() {
    let server = MockServer::start().await;
    let client = EntraGroupClient::new(sync_client(&server, false, &["contoso.com"]).await);

    Mock::given(method("POST"))
        .and(path("/v1.0/groups"))
        .and(body_partial_json(json!({
            "displayName": "Engineering",
            "mailNickname": "engineering",
            "mailEnabled": false,
            "securityEnabled": true,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "g-1",
            "displayName": "Engineering",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client.create(&group()).await.unwrap();
    assert_eq!(id, "g-1");
}

#[tokio::test]
async fn update_group_patches_fields() {
    let server = MockServer::start().await;
    let client = EntraGroupClient::new(sync_client(&server, false, &["contoso.com"]).await);

    Mock::given(method("PATCH"))
        .and(path("/v1.0/groups/g-1"))
        .and(body_partial_json(json!({
            "displayName": "Engineering",
            "description": "Product engineering",
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.update(&group(), "g-1").await.unwrap();
}

#[tokio::test]
async fn delete_group_issues_delete() {
    let server = MockServer::start().await;
    let client = EntraGroupClient::new(sync_client(&server, false, &["contoso.com"]).await);

    Mock::given(method("DELETE"))
        .and(path("/v1.0/groups/g-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete("g-1").await.unwrap();
}

#[tokio::test]
async fn add_member_links_directory_object() {
    let server = MockServer::start().await;
    let client = EntraGroupClient::new(sync_client(&server, false, &["contoso.com"]).await);

    let expected_ref = format!("{}/v1.0/directoryObjects/u-1", server.uri());
    Mock::given(method("POST"))
        .and(path("/v1.0/groups/g-1/members/$ref"))
        .and(body_partial_json(json!({ "@odata.id": expected_ref })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.add_member("g-1", "u-1").await.unwrap();
}

#[tokio::test]
async fn remove_member_unlinks_directory_object() {
    let server = MockServer::start().await;
    let client = EntraGroupClient::new(sync_client(&server, false, &["contoso.com"]).await);

    Mock::given(method("DELETE"))
        .and(path("/v1.0/groups/g-1/members/u-1/$ref"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.remove_member("g-1", "u-1").await.unwrap();
}

#[tokio::test]
async fn membership_changes_are_gated_in_dry_run() {
    let server = MockServer::start().await;
    let client = EntraGroupClient::new(sync_client(&server, true, &["contoso.com"]).await);

    Mock::given(method("POST"))
        .and(path("/v1.0/groups/g-1/members/$ref"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.add_member("g-1", "u-1").await.unwrap_err();
    match err {
        SyncError::DryRunRejected { method, body, .. } => {
            assert_eq!(method, "POST");
            assert!(body.contains("directoryObjects/u-1"));
        }
        other => panic!("expected DryRunRejected, got {other:?}"),
    }
}
