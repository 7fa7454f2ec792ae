// File: crates/agendify_gcal/src/auth.rs
use agendify_config::GoogleConfig;
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{authorized_user::AuthorizedUserSecret, AuthorizedUserAuthenticator},
    CalendarHub,
};
use std::error::Error;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Build a calendar client acting as one staff member, from the refresh
/// token stored when they connected their Google account.
pub async fn create_staff_hub(
    google: &GoogleConfig,
    refresh_token: &str,
) -> Result<HubType, Box<dyn Error + Send + Sync>> {
    let secret = AuthorizedUserSecret {
        client_id: google.client_id.clone(),
        client_secret: google.client_secret.clone(),
        refresh_token: refresh_token.to_string(),
        key_type: "authorized_user".to_string(),
    };

    let auth = AuthorizedUserAuthenticator::builder(secret).build().await?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    // Create client without specifying body type
    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    let hub = CalendarHub::new(client, auth);

    Ok(hub)
}
