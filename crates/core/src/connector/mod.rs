//! The Tableau connector: an authenticated client plus one syncer per
//! resource type.

pub mod group;
pub mod site;
pub mod syncer;
pub mod user;

use serde::Serialize;
use tracing::info;

pub use group::GroupSyncer;
pub use site::SiteSyncer;
pub use syncer::{ResourceProvisioner, ResourceSyncer, Syncer};
pub use user::UserSyncer;

use crate::config::TableauConfig;
use crate::errors::{SyncError, TableauError};
use crate::models::ResourceType;
use crate::tableau::TableauClient;

#[derive(Debug, Clone, Serialize)]
pub struct ConnectorMetadata {
    pub display_name: String,
}

/// Entry point for the governance engine.
#[derive(Clone)]
pub struct TableauConnector {
    client: TableauClient,
}

impl TableauConnector {
    /// Sign in and build the connector. A sign-in failure is fatal.
    pub async fn connect(config: &TableauConfig) -> Result<Self, TableauError> {
        let client = TableauClient::connect(config).await?;
        info!(site_id = %client.session().site_id, "Tableau connector ready");
        Ok(Self::new(client))
    }

    pub fn new(client: TableauClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &TableauClient {
        &self.client
    }

    pub fn metadata(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            display_name: "Tableau".into(),
        }
    }

    /// Confirm the session can still read the signed-in user.
    pub async fn validate(&self) -> Result<(), SyncError> {
        self.client
            .verify_current_user()
            .await
            .map_err(SyncError::api("authorize current user"))
    }

    pub fn resource_types(&self) -> &'static [ResourceType] {
        &ResourceType::ALL
    }

    pub fn resource_syncers(&self) -> Vec<Syncer> {
        vec![
            Syncer::User(UserSyncer::new(self.client.clone())),
            Syncer::Site(SiteSyncer::new(self.client.clone())),
            Syncer::Group(GroupSyncer::new(self.client.clone())),
        ]
    }
}
