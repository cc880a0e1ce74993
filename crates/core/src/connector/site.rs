//! Site syncer: the single site of the session and its role grants.

use async_trait::async_trait;
use tracing::debug;

use super::syncer::ResourceSyncer;
use crate::errors::SyncError;
use crate::models::{Entitlement, Grant, ListPage, Resource, ResourceId, ResourceType};
use crate::projection;
use crate::tableau::TableauClient;

#[derive(Clone)]
pub struct SiteSyncer {
    client: TableauClient,
}

impl SiteSyncer {
    pub fn new(client: TableauClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for SiteSyncer {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Site
    }

    /// Always exactly one resource, whatever the parent.
    async fn list(
        &self,
        _parent: Option<&ResourceId>,
        _page_token: Option<&str>,
    ) -> Result<ListPage<Resource>, SyncError> {
        let site = self
            .client
            .get_site()
            .await
            .map_err(SyncError::api("get site"))?;
        Ok(ListPage::complete(vec![projection::site_resource(&site)]))
    }

    async fn entitlements(
        &self,
        resource: &Resource,
        _page_token: Option<&str>,
    ) -> Result<ListPage<Entitlement>, SyncError> {
        Ok(ListPage::complete(projection::site_entitlements(resource)))
    }

    async fn grants(
        &self,
        resource: &Resource,
        _page_token: Option<&str>,
    ) -> Result<ListPage<Grant>, SyncError> {
        let users = self
            .client
            .get_all_users()
            .await
            .map_err(SyncError::api("list users"))?;
        let grants = projection::site_grants(resource, &users);
        debug!(site = %resource.id, count = grants.len(), "built site role grants");
        Ok(ListPage::complete(grants))
    }
}
