//! Personal-access-token sign-in.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{info, instrument, warn};

use super::models::SignInResponse;
use crate::errors::TableauError;

/// Values obtained from a successful sign-in.
///
/// Immutable once created; every authenticated call reads the token and site
/// id from here. There is no explicit sign-out.
#[derive(Clone)]
pub struct Session {
    pub token: String,
    pub site_id: String,
    pub current_user_id: String,
    pub base_url: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("site_id", &self.site_id)
            .field("current_user_id", &self.current_user_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Session {
    /// Exchange a personal access token for a session token.
    ///
    /// Sends a single `POST {base_url}/auth/signin`. A status of 300 or above,
    /// or a body without `credentials.token`, `credentials.site.id` and
    /// `credentials.user.id`, fails with [`TableauError::AuthenticationFailed`].
    /// There is no retry.
    #[instrument(skip(http, token_secret))]
    pub async fn login(
        http: &reqwest::Client,
        base_url: &str,
        content_url: &str,
        token_secret: &str,
        token_name: &str,
    ) -> Result<Self, TableauError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let url = format!("{}/auth/signin", base_url);
        let payload = serde_json::json!({
            "credentials": {
                "personalAccessTokenName": token_name,
                "personalAccessTokenSecret": token_secret,
                "site": { "contentUrl": content_url },
            }
        });

        let resp = http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() >= 300 {
            warn!(status = %status, "sign-in rejected");
            return Err(TableauError::AuthenticationFailed(format!("HTTP {}", status)));
        }

        let body = resp.bytes().await?;
        let signed_in: SignInResponse = serde_json::from_slice(&body).map_err(|e| {
            TableauError::AuthenticationFailed(format!("unreadable sign-in response: {}", e))
        })?;
        let credentials = signed_in.credentials;

        info!(
            site_id = %credentials.site.id,
            user_id = %credentials.user.id,
            expires_in = credentials.estimated_time_to_expiration.as_deref().unwrap_or("unknown"),
            "signed in to Tableau"
        );

        Ok(Self {
            token: credentials.token,
            site_id: credentials.site.id,
            current_user_id: credentials.user.id,
            base_url,
        })
    }
}
