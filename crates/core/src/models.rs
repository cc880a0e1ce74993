//! Identity-graph model types: resources, entitlements and grants.
//!
//! These are the shapes handed to the governance engine. Ids follow the
//! `type:id` / `type:id:slug` conventions so that entitlements and grants can
//! be joined back to their resources without extra lookups.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resource types
// ---------------------------------------------------------------------------

/// The closed set of resource types this connector syncs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Site,
    User,
    Group,
}

/// Capability traits a resource type advertises to the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceTypeTrait {
    User,
    Group,
}

impl ResourceTypeTrait {
    pub fn id(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [Self::Site, Self::User, Self::Group];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::User => "user",
            Self::Group => "group",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Site => "Site",
            Self::User => "User",
            Self::Group => "Group",
        }
    }

    pub fn traits(&self) -> &'static [ResourceTypeTrait] {
        match self {
            Self::Site => &[],
            Self::User => &[ResourceTypeTrait::User],
            Self::Group => &[ResourceTypeTrait::Group],
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Typed reference to a resource: its type plus the remote entity id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    pub resource_type: ResourceType,
    pub resource: String,
}

impl ResourceId {
    pub fn new(resource_type: ResourceType, resource: impl Into<String>) -> Self {
        Self {
            resource_type,
            resource: resource.into(),
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.resource)
    }
}

/// Profile stored on a user resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub user_id: String,
}

/// Profile stored on a group resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProfile {
    pub group_id: String,
    pub group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEmail {
    pub address: String,
    pub is_primary: bool,
}

/// Type-specific trait data carried by a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceTraits {
    None,
    User {
        profile: UserProfile,
        emails: Vec<UserEmail>,
    },
    Group {
        profile: GroupProfile,
    },
}

/// A node in the identity graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub display_name: String,
    pub parent_resource_id: Option<ResourceId>,
    /// Resource types that may be listed with this resource as their parent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_resource_types: Vec<ResourceType>,
    pub traits: ResourceTraits,
}

impl Resource {
    pub fn new(resource_type: ResourceType, id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(resource_type, id),
            display_name: display_name.into(),
            parent_resource_id: None,
            child_resource_types: Vec::new(),
            traits: ResourceTraits::None,
        }
    }

    pub fn with_parent(mut self, parent: &ResourceId) -> Self {
        self.parent_resource_id = Some(parent.clone());
        self
    }

    pub fn with_child_types(mut self, child_types: &[ResourceType]) -> Self {
        self.child_resource_types = child_types.to_vec();
        self
    }

    pub fn with_traits(mut self, traits: ResourceTraits) -> Self {
        self.traits = traits;
        self
    }

    pub fn resource_type(&self) -> ResourceType {
        self.id.resource_type
    }

    pub fn user_profile(&self) -> Option<&UserProfile> {
        match &self.traits {
            ResourceTraits::User { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn group_profile(&self) -> Option<&GroupProfile> {
        match &self.traits {
            ResourceTraits::Group { profile } => Some(profile),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entitlements
// ---------------------------------------------------------------------------

/// Whether an entitlement models membership or a permission level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementPurpose {
    Assignment,
    Permission,
}

/// An assignable capability defined on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub id: String,
    pub resource: Resource,
    pub slug: String,
    pub display_name: String,
    pub description: String,
    pub purpose: EntitlementPurpose,
    pub grantable_to: Vec<ResourceType>,
}

/// Builds the `type:id:slug` entitlement id.
pub fn entitlement_id(resource: &ResourceId, slug: &str) -> String {
    format!("{}:{}", resource, slug)
}

impl Entitlement {
    fn new(resource: &Resource, slug: &str, purpose: EntitlementPurpose) -> Self {
        Self {
            id: entitlement_id(&resource.id, slug),
            resource: resource.clone(),
            slug: slug.to_string(),
            display_name: slug.to_string(),
            description: String::new(),
            purpose,
            grantable_to: Vec::new(),
        }
    }

    pub fn assignment(resource: &Resource, slug: &str) -> Self {
        Self::new(resource, slug, EntitlementPurpose::Assignment)
    }

    pub fn permission(resource: &Resource, slug: &str) -> Self {
        Self::new(resource, slug, EntitlementPurpose::Permission)
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_grantable_to(mut self, resource_types: &[ResourceType]) -> Self {
        self.grantable_to = resource_types.to_vec();
        self
    }
}

// ---------------------------------------------------------------------------
// Grants
// ---------------------------------------------------------------------------

/// Asserts that `principal` holds entitlement `entitlement_slug` on `resource`.
///
/// An empty slug marks an unresolved entitlement (e.g. a site role we do not
/// recognise); the grant is still reported so listings stay complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub id: String,
    pub resource: Resource,
    pub entitlement_slug: String,
    pub principal: ResourceId,
}

impl Grant {
    pub fn new(resource: &Resource, entitlement_slug: &str, principal: ResourceId) -> Self {
        let id = format!(
            "{}:{}",
            entitlement_id(&resource.id, entitlement_slug),
            principal
        );
        Self {
            id,
            resource: resource.clone(),
            entitlement_slug: entitlement_slug.to_string(),
            principal,
        }
    }

    pub fn entitlement_id(&self) -> String {
        entitlement_id(&self.resource.id, &self.entitlement_slug)
    }

    pub fn is_resolved(&self) -> bool {
        !self.entitlement_slug.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// One page of a host-engine listing.
///
/// `next_page_token` of `None` means the listing is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

impl<T> ListPage<T> {
    /// A final page holding every item.
    pub fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            next_page_token: None,
        }
    }

    pub fn empty() -> Self {
        Self::complete(Vec::new())
    }
}

/// Everything one sync cycle learned about the remote system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityGraph {
    pub resources: Vec<Resource>,
    pub entitlements: Vec<Entitlement>,
    pub grants: Vec<Grant>,
}
