//! Microsoft Entra ID outgoing-sync connector.
//!
//! Authenticates against an Entra tenant with client-secret credentials
//! and forwards create/update/delete operations for users and groups to
//! the Graph API. Transport failures are translated into the
//! [`tessera_sync::SyncError`] taxonomy at a single funnel point; in
//! dry-run mode every mutating request is rejected before network I/O.
//!
//! # Example
//!
//! ```no_run
//! use tessera_connector_entra::{EntraCredentials, EntraProvider, EntraSyncClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = EntraProvider::builder()
//!     .tenant_id("your-tenant-id")
//!     .credentials(EntraCredentials {
//!         client_id: "your-client-id".to_string(),
//!         client_secret: "your-client-secret".to_string().into(),
//!     })
//!     .build()?;
//!
//! let client = EntraSyncClient::new(provider).await?;
//! client.check_email_valid(&["jo@contoso.com"])?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod config;
mod error;
mod groups;
mod sync;
mod transport;
mod users;

// Re-exports
pub use auth::TokenCache;
pub use client::{GraphClient, ODataPage};
pub use config::{EntraCloud, EntraCredentials, EntraProvider, EntraProviderBuilder};
pub use error::{GraphError, GraphResult};
pub use groups::{
    CreateGroupRequest, CreatedGroup, EntraGroupClient, GroupRecord, UpdateGroupRequest,
};
pub use sync::{EntraSyncClient, Organization, VerifiedDomain};
pub use users::{
    CreateUserRequest, CreatedUser, DirectoryUser, EntraUserClient, PasswordProfile,
    UpdateUserRequest, UserRecord,
};
