//! Shared fixtures for tests that run the real client against a mock
//! Tableau server.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tabsync_core::tableau::{Session, TableauClient};

pub const TOKEN: &str = "test-session-token";
pub const SITE_ID: &str = "site-1";
pub const CURRENT_USER_ID: &str = "me";
pub const API_PREFIX: &str = "/api/3.19";

pub fn api_base(server: &MockServer) -> String {
    format!("{}{}", server.uri(), API_PREFIX)
}

/// A client with an already-established session, skipping sign-in.
pub fn client_for(server: &MockServer) -> TableauClient {
    let session = Session {
        token: TOKEN.into(),
        site_id: SITE_ID.into(),
        current_user_id: CURRENT_USER_ID.into(),
        base_url: api_base(server),
    };
    TableauClient::new(session, reqwest::Client::new())
}

/// Absolute request path for a site-scoped endpoint.
pub fn site_path(suffix: &str) -> String {
    format!("{}/sites/{}{}", API_PREFIX, SITE_ID, suffix)
}

pub fn user_json(id: &str, full_name: &str, site_role: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{}@example.com", id),
        "fullName": full_name,
        "name": id,
        "siteRole": site_role,
    })
}

pub fn numbered_users(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| user_json(&format!("user-{:03}", i), &format!("User {}", i), "Viewer"))
        .collect()
}

pub fn pagination_json(page_number: usize, page_size: usize, total: usize) -> Value {
    json!({
        "pageNumber": page_number.to_string(),
        "pageSize": page_size.to_string(),
        "totalAvailable": total.to_string(),
    })
}

pub fn users_page(users: &[Value], page_number: usize, total: usize) -> Value {
    json!({
        "pagination": pagination_json(page_number, 100, total),
        "users": { "user": users },
    })
}

pub fn groups_page(groups: &[(&str, &str)], total: usize) -> Value {
    let groups: Vec<Value> = groups
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    json!({
        "pagination": pagination_json(1, 100, total),
        "groups": { "group": groups },
    })
}

pub fn site_json() -> Value {
    json!({ "site": { "id": SITE_ID, "contentUrl": "marketing", "name": "Marketing" } })
}

pub async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(site_path("")))
        .and(header("X-Tableau-Auth", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(site_json()))
        .mount(server)
        .await;
}

/// Serve `users` from a collection endpoint in pages of 100, one mock per
/// page, each expected exactly once.
pub async fn mount_user_pages(server: &MockServer, endpoint: &str, users: &[Value]) {
    let total = users.len();
    let chunks: Vec<&[Value]> = if users.is_empty() {
        vec![users]
    } else {
        users.chunks(100).collect()
    };

    for (idx, chunk) in chunks.into_iter().enumerate() {
        let page_number = idx + 1;
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(query_param("pageSize", "100"))
            .and(query_param("pageNumber", page_number.to_string()))
            .and(header("X-Tableau-Auth", TOKEN))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(users_page(chunk, page_number, total)),
            )
            .expect(1)
            .mount(server)
            .await;
    }
}

pub async fn mount_groups(server: &MockServer, groups: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path(site_path("/groups")))
        .and(query_param("pageNumber", "1"))
        .and(header("X-Tableau-Auth", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(groups_page(groups, groups.len())))
        .mount(server)
        .await;
}
