//! Tableau REST API client.
//!
//! Every call is scoped to the signed-in site and carries the session token
//! in `X-Tableau-Auth`. Nothing here retries; a non-2xx status or transport
//! failure is returned to the caller immediately.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use super::models::{
    Group, GroupsResponse, Pagination, Site, SiteResponse, User, UserResponse, UsersResponse,
};
use super::pagination::fetch_all;
use super::session::Session;
use crate::config::TableauConfig;
use crate::errors::TableauError;

const AUTH_HEADER: &str = "X-Tableau-Auth";

/// Asynchronous Tableau REST API client bound to one signed-in site.
#[derive(Clone)]
pub struct TableauClient {
    http: reqwest::Client,
    session: Session,
}

/// Builds the shared HTTP transport used for sign-in and all later calls.
pub fn build_http_client() -> Result<reqwest::Client, TableauError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("tabsync/", env!("CARGO_PKG_VERSION"))),
    );
    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

impl TableauClient {
    /// Wrap an existing session and transport.
    pub fn new(session: Session, http: reqwest::Client) -> Self {
        info!(base_url = %session.base_url, site_id = %session.site_id, "created TableauClient");
        Self { http, session }
    }

    /// Sign in with the configured personal access token and build a client
    /// for the resulting session.
    pub async fn connect(config: &TableauConfig) -> Result<Self, TableauError> {
        let http = build_http_client()?;
        let secret = config.access_token_secret.as_deref().unwrap_or_default();
        let session = Session::login(
            &http,
            &config.api_base_url(),
            &config.content_url,
            secret,
            &config.access_token_name,
        )
        .await?;
        Ok(Self::new(session, http))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn site_url(&self, path: &str) -> String {
        format!("{}/sites/{}{}", self.session.base_url, self.session.site_id, path)
    }

    // -- Site -----------------------------------------------------------------

    /// Details of the signed-in site.
    #[instrument(skip(self))]
    pub async fn get_site(&self) -> Result<Site, TableauError> {
        let res: SiteResponse = self.request(Method::GET, &self.site_url(""), None, None).await?;
        debug!(site = %res.site.name, "fetched site");
        Ok(res.site)
    }

    // -- Users ----------------------------------------------------------------

    /// One page of users on the site.
    #[instrument(skip(self))]
    pub async fn get_users(
        &self,
        page_size: u32,
        page_number: u32,
    ) -> Result<(Vec<User>, Pagination), TableauError> {
        let url = self.site_url("/users");
        let res: UsersResponse = self
            .request(Method::GET, &url, Some((page_size, page_number)), None)
            .await?;
        Ok((res.users.user, res.pagination))
    }

    /// Every user on the site.
    pub async fn get_all_users(&self) -> Result<Vec<User>, TableauError> {
        let users = fetch_all(|size, number| self.get_users(size, number)).await?;
        debug!(count = users.len(), "fetched all users");
        Ok(users)
    }

    // -- Groups ---------------------------------------------------------------

    /// One page of groups on the site.
    #[instrument(skip(self))]
    pub async fn get_groups(
        &self,
        page_size: u32,
        page_number: u32,
    ) -> Result<(Vec<Group>, Pagination), TableauError> {
        let url = self.site_url("/groups");
        let res: GroupsResponse = self
            .request(Method::GET, &url, Some((page_size, page_number)), None)
            .await?;
        Ok((res.groups.group, res.pagination))
    }

    /// Every group on the site.
    pub async fn get_all_groups(&self) -> Result<Vec<Group>, TableauError> {
        let groups = fetch_all(|size, number| self.get_groups(size, number)).await?;
        debug!(count = groups.len(), "fetched all groups");
        Ok(groups)
    }

    /// One page of a group's members.
    #[instrument(skip(self))]
    pub async fn get_group_users(
        &self,
        group_id: &str,
        page_size: u32,
        page_number: u32,
    ) -> Result<(Vec<User>, Pagination), TableauError> {
        let url = self.site_url(&format!("/groups/{}/users", group_id));
        let res: UsersResponse = self
            .request(Method::GET, &url, Some((page_size, page_number)), None)
            .await?;
        Ok((res.users.user, res.pagination))
    }

    /// Every member of a group.
    pub async fn get_all_group_users(&self, group_id: &str) -> Result<Vec<User>, TableauError> {
        let users = fetch_all(|size, number| self.get_group_users(group_id, size, number)).await?;
        debug!(group_id, count = users.len(), "fetched all group members");
        Ok(users)
    }

    // -- Current user ---------------------------------------------------------

    /// Fetch the signed-in user, as a connectivity and authorization check.
    #[instrument(skip(self))]
    pub async fn verify_current_user(&self) -> Result<(), TableauError> {
        let url = self.site_url(&format!("/users/{}", self.session.current_user_id));
        let res: UserResponse = self.request(Method::GET, &url, None, None).await?;
        debug!(user = %res.user.name, "verified current user");
        Ok(())
    }

    // -- Membership -----------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn add_user_to_group(&self, group_id: &str, user_id: &str) -> Result<(), TableauError> {
        let url = self.site_url(&format!("/groups/{}/users", group_id));
        let payload = serde_json::json!({ "user": { "id": user_id } });
        // Any JSON body is accepted; Tableau may echo the user or send `{}`.
        let _: serde_json::Value = self
            .request(Method::POST, &url, None, Some(&payload))
            .await?;
        info!(group_id, user_id, "added user to group");
        Ok(())
    }

    /// Remove a member. The DELETE response body is never read.
    #[instrument(skip(self))]
    pub async fn remove_user_from_group(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<(), TableauError> {
        let url = self.site_url(&format!("/groups/{}/users/{}", group_id, user_id));
        self.send(Method::DELETE, &url, None, None).await?;
        info!(group_id, user_id, "removed user from group");
        Ok(())
    }

    // -- Plumbing -------------------------------------------------------------

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        page: Option<(u32, u32)>,
        body: Option<&serde_json::Value>,
    ) -> Result<T, TableauError> {
        let resp = self.send(method, url, page, body).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        page: Option<(u32, u32)>,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, TableauError> {
        let mut req = self
            .http
            .request(method, url)
            .header(AUTH_HEADER, &self.session.token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some((page_size, page_number)) = page {
            req = req.query(&[("pageSize", page_size), ("pageNumber", page_number)]);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        check_response(&resp)?;
        Ok(resp)
    }
}

fn check_response(resp: &reqwest::Response) -> Result<(), TableauError> {
    let status = resp.status();
    if status.as_u16() < 300 {
        return Ok(());
    }
    Err(TableauError::ApiError {
        status: status.as_u16(),
        url: resp.url().to_string(),
    })
}
