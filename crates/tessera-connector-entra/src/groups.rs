//! Outgoing group sync.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use tessera_sync::{OutgoingSyncClient, SyncResult};

use crate::config::EntraProvider;
use crate::sync::EntraSyncClient;
use crate::users::mail_nickname;

/// Local group record handed to the connector by the owning application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    pub name: String,
    pub description: Option<String>,
}

/// Payload for `POST /groups`.
///
/// Synced groups are plain security groups: not mail-enabled, no dynamic
/// membership.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub display_name: String,
    pub mail_nickname: String,
    pub mail_enabled: bool,
    pub security_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for `PATCH /groups/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response to a group creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGroup {
    pub id: String,
    pub display_name: String,
}

/// Pushes local groups and their memberships to the directory.
pub struct EntraGroupClient {
    sync: EntraSyncClient,
}

impl EntraGroupClient {
    /// Wrap an already-constructed sync client.
    #[must_use]
    pub fn new(sync: EntraSyncClient) -> Self {
        Self { sync }
    }

    /// Build a sync client for the provider and wrap it.
    pub async fn connect(provider: EntraProvider) -> SyncResult<Self> {
        Ok(Self::new(EntraSyncClient::new(provider).await?))
    }

    /// The underlying sync client.
    #[must_use]
    pub fn sync(&self) -> &EntraSyncClient {
        &self.sync
    }

    /// Add a directory user to a group.
    #[instrument(skip(self))]
    pub async fn add_member(&self, group_id: &str, member_id: &str) -> SyncResult<()> {
        let client = self.sync.client();
        let url = format!("{}/groups/{group_id}/members/$ref", client.base_url());
        let body = serde_json::json!({
            "@odata.id": format!("{}/directoryObjects/{member_id}", client.base_url()),
        });

        self.sync.request(client.post_no_content(&url, &body)).await?;
        info!(group = group_id, member = member_id, "member added");
        Ok(())
    }

    /// Remove a directory user from a group.
    #[instrument(skip(self))]
    pub async fn remove_member(&self, group_id: &str, member_id: &str) -> SyncResult<()> {
        let client = self.sync.client();
        let url = format!(
            "{}/groups/{group_id}/members/{member_id}/$ref",
            client.base_url()
        );

        self.sync.request(client.delete(&url)).await?;
        info!(group = group_id, member = member_id, "member removed");
        Ok(())
    }
}

#[async_trait]
impl OutgoingSyncClient for EntraGroupClient {
    type Model = GroupRecord;
    type Schema = CreateGroupRequest;

    fn to_schema(&self, model: &GroupRecord) -> SyncResult<CreateGroupRequest> {
        Ok(CreateGroupRequest {
            display_name: model.name.clone(),
            mail_nickname: mail_nickname(&model.name),
            mail_enabled: false,
            security_enabled: true,
            description: model.description.clone(),
        })
    }

    #[instrument(skip(self, model), fields(group = %model.name))]
    async fn create(&self, model: &GroupRecord) -> SyncResult<String> {
        let schema = self.to_schema(model)?;
        let client = self.sync.client();
        let url = format!("{}/groups", client.base_url());

        let created: CreatedGroup = self.sync.request(client.post(&url, &schema)).await?;
        info!(group = %created.display_name, id = %created.id, "group created");
        Ok(created.id)
    }

    #[instrument(skip(self, model), fields(group = %model.name))]
    async fn update(&self, model: &GroupRecord, remote_id: &str) -> SyncResult<()> {
        let patch = UpdateGroupRequest {
            display_name: Some(model.name.clone()),
            description: model.description.clone(),
        };

        let client = self.sync.client();
        let url = format!("{}/groups/{remote_id}", client.base_url());
        self.sync.request(client.patch(&url, &patch)).await?;
        info!(group = remote_id, "group updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, remote_id: &str) -> SyncResult<()> {
        let client = self.sync.client();
        let url = format!("{}/groups/{remote_id}", client.base_url());
        self.sync.request(client.delete(&url)).await?;
        info!(group = remote_id, "group deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_serializes_camel_case() {
        let request = CreateGroupRequest {
            display_name: "Engineering".to_string(),
            mail_nickname: "engineering".to_string(),
            mail_enabled: false,
            security_enabled: true,
            description: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["displayName"], "Engineering");
        assert_eq!(json["mailEnabled"], false);
        assert_eq!(json["securityEnabled"], true);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn update_request_skips_unset_fields() {
        let request = UpdateGroupRequest {
            description: Some("on-call".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["description"], "on-call");
        assert!(json.get("displayName").is_none());
    }
}
