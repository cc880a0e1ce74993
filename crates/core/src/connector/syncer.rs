//! The interface the governance engine drives, one implementer per resource
//! type.

use async_trait::async_trait;

use super::group::GroupSyncer;
use super::site::SiteSyncer;
use super::user::UserSyncer;
use crate::errors::SyncError;
use crate::models::{Entitlement, Grant, ListPage, Resource, ResourceId, ResourceType};

/// Read side of a resource type.
///
/// `page_token` is accepted for contract compatibility; listings are always
/// fetched exhaustively and returned as a single complete page.
#[async_trait]
pub trait ResourceSyncer: Send + Sync {
    fn resource_type(&self) -> ResourceType;

    async fn list(
        &self,
        parent: Option<&ResourceId>,
        page_token: Option<&str>,
    ) -> Result<ListPage<Resource>, SyncError>;

    async fn entitlements(
        &self,
        resource: &Resource,
        page_token: Option<&str>,
    ) -> Result<ListPage<Entitlement>, SyncError>;

    async fn grants(
        &self,
        resource: &Resource,
        page_token: Option<&str>,
    ) -> Result<ListPage<Grant>, SyncError>;
}

/// Write side, for resource types whose entitlements can be granted.
#[async_trait]
pub trait ResourceProvisioner: ResourceSyncer {
    async fn grant(&self, principal: &Resource, entitlement: &Entitlement) -> Result<(), SyncError>;

    async fn revoke(&self, grant: &Grant) -> Result<(), SyncError>;
}

/// The closed set of syncers this connector provides.
#[derive(Clone)]
pub enum Syncer {
    Site(SiteSyncer),
    User(UserSyncer),
    Group(GroupSyncer),
}

impl Syncer {
    /// The provisioning half, if this resource type supports it.
    pub fn provisioner(&self) -> Option<&GroupSyncer> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }
}

#[async_trait]
impl ResourceSyncer for Syncer {
    fn resource_type(&self) -> ResourceType {
        match self {
            Self::Site(s) => s.resource_type(),
            Self::User(s) => s.resource_type(),
            Self::Group(s) => s.resource_type(),
        }
    }

    async fn list(
        &self,
        parent: Option<&ResourceId>,
        page_token: Option<&str>,
    ) -> Result<ListPage<Resource>, SyncError> {
        match self {
            Self::Site(s) => s.list(parent, page_token).await,
            Self::User(s) => s.list(parent, page_token).await,
            Self::Group(s) => s.list(parent, page_token).await,
        }
    }

    async fn entitlements(
        &self,
        resource: &Resource,
        page_token: Option<&str>,
    ) -> Result<ListPage<Entitlement>, SyncError> {
        match self {
            Self::Site(s) => s.entitlements(resource, page_token).await,
            Self::User(s) => s.entitlements(resource, page_token).await,
            Self::Group(s) => s.entitlements(resource, page_token).await,
        }
    }

    async fn grants(
        &self,
        resource: &Resource,
        page_token: Option<&str>,
    ) -> Result<ListPage<Grant>, SyncError> {
        match self {
            Self::Site(s) => s.grants(resource, page_token).await,
            Self::User(s) => s.grants(resource, page_token).await,
            Self::Group(s) => s.grants(resource, page_token).await,
        }
    }
}
