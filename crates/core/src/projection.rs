//! Mapping from Tableau entities to identity-graph resources, entitlements
//! and grants.
//!
//! Everything here is pure. The only diagnostic is the warning logged for a
//! `siteRole` we do not recognise; that case still yields a grant.

use tracing::warn;

use crate::errors::SyncError;
use crate::models::{
    Entitlement, Grant, GroupProfile, Resource, ResourceId, ResourceTraits, ResourceType,
    UserEmail, UserProfile,
};
use crate::roles::SiteRole;
use crate::tableau::{Group, Site, User};

/// Slug of the single assignment entitlement on every group.
pub const MEMBER_ENTITLEMENT: &str = "member";

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// The site resource. It declares users and groups as child types.
pub fn site_resource(site: &Site) -> Resource {
    Resource::new(ResourceType::Site, &site.id, &site.name)
        .with_child_types(&[ResourceType::User, ResourceType::Group])
}

/// Split a full name on the first space. A single token has no last name.
pub fn split_full_name(full_name: &str) -> (String, String) {
    match full_name.split_once(' ') {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => (full_name.to_string(), String::new()),
    }
}

pub fn user_resource(user: &User, parent: &ResourceId) -> Resource {
    let (first_name, last_name) = split_full_name(&user.full_name);
    let profile = UserProfile {
        first_name,
        last_name,
        login: user.email.clone(),
        user_id: user.id.clone(),
    };
    let emails = vec![UserEmail {
        address: user.email.clone(),
        is_primary: true,
    }];

    Resource::new(ResourceType::User, &user.id, &user.full_name)
        .with_parent(parent)
        .with_traits(ResourceTraits::User { profile, emails })
}

pub fn group_resource(group: &Group, parent: &ResourceId) -> Resource {
    let profile = GroupProfile {
        group_id: group.id.clone(),
        group_name: group.name.clone(),
    };

    Resource::new(ResourceType::Group, &group.id, &group.name)
        .with_parent(parent)
        .with_traits(ResourceTraits::Group { profile })
}

/// The remote group id stored in a group resource's profile.
pub fn group_id(resource: &Resource) -> Result<&str, SyncError> {
    resource
        .group_profile()
        .map(|profile| profile.group_id.as_str())
        .ok_or_else(|| SyncError::ProfileLookup {
            field: "group_id",
            resource: resource.id.to_string(),
        })
}

fn user_principal(user: &User) -> ResourceId {
    ResourceId::new(ResourceType::User, &user.id)
}

// ---------------------------------------------------------------------------
// Site
// ---------------------------------------------------------------------------

/// One permission entitlement per known site role, grantable to users.
pub fn site_entitlements(site: &Resource) -> Vec<Entitlement> {
    SiteRole::ALL
        .iter()
        .map(|role| {
            let slug = role.entitlement_slug();
            Entitlement::permission(site, slug)
                .with_grantable_to(&[ResourceType::User])
                .with_description(format!("Role in {} Tableau site", site.display_name))
                .with_display_name(format!("{} Site {}", site.display_name, slug))
        })
        .collect()
}

/// One role grant per user.
///
/// Unknown role strings produce a grant with an empty entitlement slug and a
/// warning, never an error.
pub fn site_grants(site: &Resource, users: &[User]) -> Vec<Grant> {
    users
        .iter()
        .map(|user| {
            let slug = match SiteRole::from_api_name(&user.site_role) {
                Some(role) => role.entitlement_slug(),
                None => {
                    warn!(
                        role_name = %user.site_role,
                        user = %user.full_name,
                        "unknown Tableau role name"
                    );
                    ""
                }
            };
            Grant::new(site, slug, user_principal(user))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// The single "member" assignment entitlement, grantable to users.
pub fn group_entitlements(group: &Resource) -> Vec<Entitlement> {
    vec![member_entitlement(group)]
}

pub fn member_entitlement(group: &Resource) -> Entitlement {
    Entitlement::assignment(group, MEMBER_ENTITLEMENT)
        .with_grantable_to(&[ResourceType::User])
        .with_description(format!("Member of {} Group in Tableau", group.display_name))
        .with_display_name(format!(
            "{} Group {}",
            group.display_name, MEMBER_ENTITLEMENT
        ))
}

/// One "member" grant per group member.
pub fn group_grants(group: &Resource, members: &[User]) -> Vec<Grant> {
    members
        .iter()
        .map(|user| Grant::new(group, MEMBER_ENTITLEMENT, user_principal(user)))
        .collect()
}
