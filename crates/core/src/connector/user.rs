//! User syncer. Users are leaf principals: they hold no entitlements of their
//! own, and their grants are reported by the site and group syncers.

use async_trait::async_trait;

use super::syncer::ResourceSyncer;
use crate::errors::SyncError;
use crate::models::{Entitlement, Grant, ListPage, Resource, ResourceId, ResourceType};
use crate::projection;
use crate::tableau::TableauClient;

#[derive(Clone)]
pub struct UserSyncer {
    client: TableauClient,
}

impl UserSyncer {
    pub fn new(client: TableauClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for UserSyncer {
    fn resource_type(&self) -> ResourceType {
        ResourceType::User
    }

    async fn list(
        &self,
        parent: Option<&ResourceId>,
        _page_token: Option<&str>,
    ) -> Result<ListPage<Resource>, SyncError> {
        // Users are never top-level.
        let Some(parent) = parent else {
            return Ok(ListPage::empty());
        };

        let users = self
            .client
            .get_all_users()
            .await
            .map_err(SyncError::api("list users"))?;
        Ok(ListPage::complete(
            users
                .iter()
                .map(|user| projection::user_resource(user, parent))
                .collect(),
        ))
    }

    async fn entitlements(
        &self,
        _resource: &Resource,
        _page_token: Option<&str>,
    ) -> Result<ListPage<Entitlement>, SyncError> {
        Ok(ListPage::empty())
    }

    async fn grants(
        &self,
        _resource: &Resource,
        _page_token: Option<&str>,
    ) -> Result<ListPage<Grant>, SyncError> {
        Ok(ListPage::empty())
    }
}
