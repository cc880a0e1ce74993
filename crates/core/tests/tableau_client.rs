//! Tableau client behaviour against a mock REST API: sign-in, pagination,
//! status handling, and membership mutations.

mod common;

use common::*;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tabsync_core::errors::TableauError;
use tabsync_core::tableau::Session;

// ===========================================================================
// Sign-in
// ===========================================================================

#[tokio::test]
async fn test_login_returns_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/auth/signin", API_PREFIX)))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "credentials": {
                "personalAccessTokenName": "sync-bot",
                "personalAccessTokenSecret": "pat-secret",
                "site": { "contentUrl": "marketing" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "credentials": {
                "site": { "id": "site-1", "contentUrl": "marketing" },
                "user": { "id": "me" },
                "token": "issued-token",
                "estimatedTimeToExpiration": "361:50:12"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::login(
        &reqwest::Client::new(),
        &api_base(&server),
        "marketing",
        "pat-secret",
        "sync-bot",
    )
    .await
    .expect("login should succeed");

    assert_eq!(session.token, "issued-token");
    assert_eq!(session.site_id, "site-1");
    assert_eq!(session.current_user_id, "me");
    assert_eq!(session.base_url, api_base(&server));
}

#[tokio::test]
async fn test_login_rejected_status_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/auth/signin", API_PREFIX)))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": "401001", "summary": "Signin Error" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = Session::login(&reqwest::Client::new(), &api_base(&server), "", "bad", "bot").await;
    assert!(matches!(result, Err(TableauError::AuthenticationFailed(_))));
}

#[tokio::test]
async fn test_login_unreadable_body_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/auth/signin", API_PREFIX)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<tsResponse/>"))
        .mount(&server)
        .await;

    let result = Session::login(&reqwest::Client::new(), &api_base(&server), "", "s", "bot").await;
    assert!(matches!(result, Err(TableauError::AuthenticationFailed(_))));
}

// ===========================================================================
// Pagination
// ===========================================================================

#[tokio::test]
async fn test_get_all_users_fetches_three_pages() {
    let server = MockServer::start().await;
    let users = numbered_users(250);
    mount_user_pages(&server, &site_path("/users"), &users).await;

    let client = client_for(&server);
    let fetched = client.get_all_users().await.unwrap();

    assert_eq!(fetched.len(), 250);
    assert_eq!(fetched[0].id, "user-000");
    assert_eq!(fetched[249].id, "user-249");
    // Each page mock expects exactly one hit; verified when the server drops.
}

#[tokio::test]
async fn test_get_all_users_is_repeatable() {
    let server = MockServer::start().await;
    let users = numbered_users(120);
    let total = users.len();
    for (idx, chunk) in users.chunks(100).enumerate() {
        let page_number = idx + 1;
        Mock::given(method("GET"))
            .and(path(site_path("/users")))
            .and(query_param("pageNumber", page_number.to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(users_page(chunk, page_number, total)),
            )
            .expect(2)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let first: Vec<String> = client.get_all_users().await.unwrap().into_iter().map(|u| u.id).collect();
    let second: Vec<String> = client.get_all_users().await.unwrap().into_iter().map(|u| u.id).collect();

    assert_eq!(first.len(), 120);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_group_list_is_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(site_path("/groups")))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pagination": pagination_json(1, 100, 0),
            "groups": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let groups = client_for(&server).get_all_groups().await.unwrap();
    assert!(groups.is_empty());
}

#[tokio::test]
async fn test_failed_page_aborts_listing() {
    let server = MockServer::start().await;
    let users = numbered_users(100);

    Mock::given(method("GET"))
        .and(path(site_path("/users")))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_page(&users, 1, 300)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(site_path("/users")))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).get_all_users().await;
    assert!(matches!(result, Err(TableauError::ApiError { status: 503, .. })));
}

#[tokio::test]
async fn test_malformed_page_aborts_listing() {
    let server = MockServer::start().await;
    let users = numbered_users(100);

    Mock::given(method("GET"))
        .and(path(site_path("/users")))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_page(&users, 1, 200)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(site_path("/users")))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"pagination\": "))
        .mount(&server)
        .await;

    let result = client_for(&server).get_all_users().await;
    assert!(matches!(result, Err(TableauError::ParseError(_))));
}

#[tokio::test]
async fn test_non_integer_total_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(site_path("/groups")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pagination": { "pageNumber": "1", "pageSize": "100", "totalAvailable": "many" },
            "groups": { "group": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).get_all_groups().await;
    assert!(matches!(
        result,
        Err(TableauError::InvalidPagination { field: "totalAvailable", .. })
    ));
}

#[tokio::test]
async fn test_group_members_are_scoped_to_group() {
    let server = MockServer::start().await;
    let members = vec![user_json("u1", "Ada Lovelace", "Creator")];
    mount_user_pages(&server, &site_path("/groups/g-42/users"), &members).await;

    let fetched = client_for(&server).get_all_group_users("g-42").await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].full_name, "Ada Lovelace");
}

// ===========================================================================
// Single-entity calls
// ===========================================================================

#[tokio::test]
async fn test_get_site() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let site = client_for(&server).get_site().await.unwrap();
    assert_eq!(site.id, SITE_ID);
    assert_eq!(site.name, "Marketing");
    assert_eq!(site.content_url, "marketing");
}

#[tokio::test]
async fn test_verify_current_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(site_path(&format!("/users/{}", CURRENT_USER_ID))))
        .and(header("X-Tableau-Auth", TOKEN))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user": user_json("me", "Sync Bot", "SiteAdministratorCreator") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).verify_current_user().await.unwrap();
}

#[tokio::test]
async fn test_forbidden_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(site_path(&format!("/users/{}", CURRENT_USER_ID))))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client_for(&server).verify_current_user().await;
    assert!(matches!(result, Err(TableauError::ApiError { status: 403, .. })));
}

// ===========================================================================
// Membership mutations
// ===========================================================================

#[tokio::test]
async fn test_add_user_to_group_posts_user_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(site_path("/groups/g1/users")))
        .and(header("X-Tableau-Auth", TOKEN))
        .and(body_json(json!({ "user": { "id": "u1" } })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user": user_json("u1", "Ada", "Viewer") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).add_user_to_group("g1", "u1").await.unwrap();
}

#[tokio::test]
async fn test_add_user_to_group_accepts_empty_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(site_path("/groups/g1/users")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).add_user_to_group("g1", "u1").await.unwrap();
}

#[tokio::test]
async fn test_remove_user_from_group_ignores_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(site_path("/groups/g1/users/u1")))
        .and(header("X-Tableau-Auth", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .remove_user_from_group("g1", "u1")
        .await
        .expect("DELETE must not try to decode the body");
}

#[tokio::test]
async fn test_remove_user_from_group_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(site_path("/groups/g1/users/u1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).remove_user_from_group("g1", "u1").await.unwrap();
}

#[tokio::test]
async fn test_remove_user_from_group_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(site_path("/groups/g1/users/ghost")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client_for(&server).remove_user_from_group("g1", "ghost").await;
    assert!(matches!(result, Err(TableauError::ApiError { status: 404, .. })));
}
