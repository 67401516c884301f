//! Outgoing user sync.

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use tessera_sync::{OutgoingSyncClient, SyncResult};

use crate::config::EntraProvider;
use crate::sync::EntraSyncClient;

/// Local user record handed to the connector by the owning application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub active: bool,
}

/// Payload for `POST /users`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub account_enabled: bool,
    pub display_name: String,
    /// Must be unique in the tenant and use a verified domain.
    pub user_principal_name: String,
    pub mail_nickname: String,
    pub password_profile: PasswordProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
}

/// Password profile for user creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProfile {
    pub password: String,
    pub force_change_password_next_sign_in: bool,
}

/// Payload for `PATCH /users/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
}

/// Response to a user creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    pub id: String,
    pub user_principal_name: String,
}

/// Directory user as returned by the Graph API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub id: String,
    pub user_principal_name: String,
    pub display_name: Option<String>,
    pub account_enabled: Option<bool>,
    /// Fields this connector does not model, kept for diagnostics.
    #[serde(flatten)]
    pub additional: serde_json::Map<String, serde_json::Value>,
}

/// Pushes local users to the directory.
pub struct EntraUserClient {
    sync: EntraSyncClient,
}

impl EntraUserClient {
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

    /// Fetch a directory user by object ID.
    pub async fn get(&self, remote_id: &str) -> SyncResult<DirectoryUser> {
        let client = self.sync.client();
        let url = format!("{}/users/{remote_id}", client.base_url());
        self.sync.request(client.get(&url)).await
    }

    /// Disable the account without deleting it.
    #[instrument(skip(self))]
    pub async fn disable(&self, remote_id: &str) -> SyncResult<()> {
        let patch = UpdateUserRequest {
            account_enabled: Some(false),
            ..Default::default()
        };
        let client = self.sync.client();
        let url = format!("{}/users/{remote_id}", client.base_url());
        self.sync.request(client.patch(&url, &patch)).await?;
        info!(user = remote_id, "user disabled");
        Ok(())
    }

    fn display_name(model: &UserRecord) -> String {
        match (&model.first_name, &model.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => model.username.clone(),
        }
    }
}

#[async_trait]
impl OutgoingSyncClient for EntraUserClient {
    type Model = UserRecord;
    type Schema = CreateUserRequest;

    fn to_schema(&self, model: &UserRecord) -> SyncResult<CreateUserRequest> {
        self.sync.check_email_valid(&[&model.email])?;
        Ok(CreateUserRequest {
            account_enabled: model.active,
            display_name: Self::display_name(model),
            user_principal_name: model.email.clone(),
            mail_nickname: mail_nickname(&model.username),
            password_profile: PasswordProfile {
                password: initial_password(),
                force_change_password_next_sign_in: true,
            },
            given_name: model.first_name.clone(),
            surname: model.last_name.clone(),
        })
    }

    #[instrument(skip(self, model), fields(user = %model.username))]
    async fn create(&self, model: &UserRecord) -> SyncResult<String> {
        let schema = self.to_schema(model)?;
        let client = self.sync.client();
        let url = format!("{}/users", client.base_url());

        let created: CreatedUser = self.sync.request(client.post(&url, &schema)).await?;
        info!(user = %created.user_principal_name, id = %created.id, "user created");
        Ok(created.id)
    }

    #[instrument(skip(self, model), fields(user = %model.username))]
    async fn update(&self, model: &UserRecord, remote_id: &str) -> SyncResult<()> {
        self.sync.check_email_valid(&[&model.email])?;
        let patch = UpdateUserRequest {
            account_enabled: Some(model.active),
            display_name: Some(Self::display_name(model)),
            given_name: model.first_name.clone(),
            surname: model.last_name.clone(),
        };

        let client = self.sync.client();
        let url = format!("{}/users/{remote_id}", client.base_url());
        self.sync.request(client.patch(&url, &patch)).await?;
        info!(user = remote_id, "user updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, remote_id: &str) -> SyncResult<()> {
        let client = self.sync.client();
        let url = format!("{}/users/{remote_id}", client.base_url());
        self.sync.request(client.delete(&url)).await?;
        info!(user = remote_id, "user deleted");
        Ok(())
    }
}

/// Nickname accepted by Graph: ASCII alphanumerics only.
pub(crate) fn mail_nickname(name: &str) -> String {
    let nickname: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    if nickname.is_empty() {
        "account".to_string()
    } else {
        nickname
    }
}

/// Random throwaway password; the user is forced to change it at first
/// sign-in.
fn initial_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
