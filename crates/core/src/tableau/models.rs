//! Wire types for Tableau REST API payloads.
//!
//! Tableau omits empty fields freely, so every string defaults to empty
//! rather than failing the decode.

use serde::{Deserialize, Serialize};

use crate::errors::TableauError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub content_url: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site_role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Pagination block returned with every collection response.
///
/// Tableau encodes the numbers as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page_number: String,
    #[serde(default)]
    pub page_size: String,
    #[serde(default)]
    pub total_available: String,
}

impl Pagination {
    pub fn page_size(&self) -> Result<u64, TableauError> {
        parse_count("pageSize", &self.page_size)
    }

    pub fn total_available(&self) -> Result<u64, TableauError> {
        parse_count("totalAvailable", &self.total_available)
    }
}

fn parse_count(field: &'static str, value: &str) -> Result<u64, TableauError> {
    value
        .trim()
        .parse()
        .map_err(|_| TableauError::InvalidPagination {
            field,
            value: value.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct SiteResponse {
    pub site: Site,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    pub user: User,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserList {
    #[serde(default)]
    pub user: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersResponse {
    pub pagination: Pagination,
    #[serde(default)]
    pub users: UserList,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GroupList {
    #[serde(default)]
    pub group: Vec<Group>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupsResponse {
    pub pagination: Pagination,
    #[serde(default)]
    pub groups: GroupList,
}

// ---------------------------------------------------------------------------
// Sign-in
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct IdRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Credentials {
    pub site: IdRef,
    pub user: IdRef,
    pub token: String,
    #[serde(default)]
    pub estimated_time_to_expiration: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignInResponse {
    pub credentials: Credentials,
}
