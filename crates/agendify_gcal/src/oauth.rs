//! OAuth plumbing for connecting a staff member's Google account.
//!
//! The consent flow runs per staff member: we send them to Google with
//! `access_type=offline` so the callback code can be exchanged for a refresh
//! token, which is what the staff repository stores. Event operations later
//! rebuild short-lived access tokens from it.

use agendify_common::http::HTTP_CLIENT;
use agendify_config::GoogleConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to encode query: {0}")]
    UrlEncode(#[from] serde_urlencoded::ser::Error),
    #[error("Token exchange rejected: {0}")]
    TokenExchange(String),
}

/// Body of a successful response from the token endpoint. Google omits
/// `refresh_token` when the account already granted offline access earlier.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) refresh_token: Option<String>,
}

/// The Google consent page URL for one staff member.
///
/// `state` is echoed back on the callback; callers use it to tie the
/// callback to the session that started the flow.
pub fn consent_url(google: &GoogleConfig, state: &str) -> Result<String, OAuthError> {
    let query = serde_urlencoded::to_string([
        ("client_id", google.client_id.as_str()),
        ("redirect_uri", google.redirect_uri.as_str()),
        ("response_type", "code"),
        ("scope", CALENDAR_SCOPE),
        ("access_type", "offline"),
        ("prompt", "consent"),
        ("state", state),
    ])?;

    Ok(format!("{AUTH_ENDPOINT}?{query}"))
}

/// Exchange an authorization code for a refresh token.
///
/// # Returns
///
/// The refresh token to store, or `None` when Google issued no new one,
/// which means the account is already connected.
pub async fn exchange_code(
    google: &GoogleConfig,
    code: &str,
) -> Result<Option<String>, OAuthError> {
    debug!("Exchanging authorization code for tokens");

    let form = [
        ("code", code),
        ("client_id", google.client_id.as_str()),
        ("client_secret", google.client_secret.as_str()),
        ("redirect_uri", google.redirect_uri.as_str()),
        ("grant_type", "authorization_code"),
    ];

    let response = HTTP_CLIENT.post(TOKEN_ENDPOINT).form(&form).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(OAuthError::TokenExchange(format!("{status}: {body}")));
    }

    let token: TokenResponse = response.json().await?;
    Ok(token.refresh_token)
}
