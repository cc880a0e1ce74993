//! Tableau site roles and the permission entitlements they map to.

use serde::{Deserialize, Serialize};

/// A site-wide permission level as enumerated by Tableau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteRole {
    SiteAdministrator,
    SiteAdministratorCreator,
    SiteAdministratorExplorer,
    ServerAdministrator,
    Creator,
    Explorer,
    ExplorerCanPublish,
    Viewer,
    Unlicensed,
    ReadOnly,
}

impl SiteRole {
    pub const ALL: [SiteRole; 10] = [
        Self::SiteAdministrator,
        Self::SiteAdministratorCreator,
        Self::SiteAdministratorExplorer,
        Self::ServerAdministrator,
        Self::Creator,
        Self::Explorer,
        Self::ExplorerCanPublish,
        Self::Viewer,
        Self::Unlicensed,
        Self::ReadOnly,
    ];

    /// The role string as it appears in a user's `siteRole` field.
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::SiteAdministrator => "SiteAdministrator",
            Self::SiteAdministratorCreator => "SiteAdministratorCreator",
            Self::SiteAdministratorExplorer => "SiteAdministratorExplorer",
            Self::ServerAdministrator => "ServerAdministrator",
            Self::Creator => "Creator",
            Self::Explorer => "Explorer",
            Self::ExplorerCanPublish => "ExplorerCanPublish",
            Self::Viewer => "Viewer",
            Self::Unlicensed => "Unlicensed",
            Self::ReadOnly => "ReadOnly",
        }
    }

    /// Slug of the site permission entitlement for this role.
    pub fn entitlement_slug(&self) -> &'static str {
        match self {
            Self::SiteAdministrator => "site administrator",
            Self::SiteAdministratorCreator => "site administrator creator",
            Self::SiteAdministratorExplorer => "site administrator explorer",
            Self::ServerAdministrator => "server administrator",
            Self::Creator => "creator",
            Self::Explorer => "explorer",
            Self::ExplorerCanPublish => "explorer can publish",
            Self::Viewer => "viewer",
            Self::Unlicensed => "unlicensed",
            Self::ReadOnly => "readonly",
        }
    }

    /// Look up a raw `siteRole` string. Matching is exact.
    pub fn from_api_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.api_name() == name)
    }
}

impl std::fmt::Display for SiteRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_name())
    }
}
