//! Group syncer: groups, their member entitlement, membership grants, and
//! the only mutations in the system (add and remove a member).

use async_trait::async_trait;
use tracing::{debug, warn};

use super::syncer::{ResourceProvisioner, ResourceSyncer};
use crate::errors::SyncError;
use crate::models::{Entitlement, Grant, ListPage, Resource, ResourceId, ResourceType};
use crate::projection;
use crate::tableau::TableauClient;

#[derive(Clone)]
pub struct GroupSyncer {
    client: TableauClient,
}

impl GroupSyncer {
    pub fn new(client: TableauClient) -> Self {
        Self { client }
    }
}

/// Only users can be members of a group.
fn ensure_user_principal(principal: &ResourceId) -> Result<(), SyncError> {
    if principal.resource_type == ResourceType::User {
        return Ok(());
    }
    warn!(
        principal = %principal,
        "group membership can only be granted to users"
    );
    Err(SyncError::TypeMismatch {
        expected: ResourceType::User,
        actual: principal.resource_type,
    })
}

#[async_trait]
impl ResourceSyncer for GroupSyncer {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Group
    }

    async fn list(
        &self,
        parent: Option<&ResourceId>,
        _page_token: Option<&str>,
    ) -> Result<ListPage<Resource>, SyncError> {
        // Groups are never top-level.
        let Some(parent) = parent else {
            return Ok(ListPage::empty());
        };

        let groups = self
            .client
            .get_all_groups()
            .await
            .map_err(SyncError::api("list groups"))?;
        Ok(ListPage::complete(
            groups
                .iter()
                .map(|group| projection::group_resource(group, parent))
                .collect(),
        ))
    }

    async fn entitlements(
        &self,
        resource: &Resource,
        _page_token: Option<&str>,
    ) -> Result<ListPage<Entitlement>, SyncError> {
        Ok(ListPage::complete(projection::group_entitlements(resource)))
    }

    async fn grants(
        &self,
        resource: &Resource,
        _page_token: Option<&str>,
    ) -> Result<ListPage<Grant>, SyncError> {
        let group_id = projection::group_id(resource)?;
        let members = self
            .client
            .get_all_group_users(group_id)
            .await
            .map_err(SyncError::api("list group users"))?;
        let grants = projection::group_grants(resource, &members);
        debug!(group_id, count = grants.len(), "built group membership grants");
        Ok(ListPage::complete(grants))
    }
}

#[async_trait]
impl ResourceProvisioner for GroupSyncer {
    async fn grant(&self, principal: &Resource, entitlement: &Entitlement) -> Result<(), SyncError> {
        ensure_user_principal(&principal.id)?;
        let group_id = projection::group_id(&entitlement.resource)?;

        self.client
            .add_user_to_group(group_id, &principal.id.resource)
            .await
            .map_err(SyncError::api("add user to group"))
    }

    async fn revoke(&self, grant: &Grant) -> Result<(), SyncError> {
        ensure_user_principal(&grant.principal)?;
        let group_id = projection::group_id(&grant.resource)?;

        self.client
            .remove_user_from_group(group_id, &grant.principal.resource)
            .await
            .map_err(SyncError::api("remove user from group"))
    }
}
