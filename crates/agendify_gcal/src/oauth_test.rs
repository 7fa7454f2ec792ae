#[cfg(test)]
mod tests {
    use crate::oauth::{consent_url, TokenResponse};
    use agendify_config::GoogleConfig;

    fn google_config() -> GoogleConfig {
        GoogleConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_uri: "https://booking.example.com/auth/google/callback".to_string(),
        }
    }

    #[test]
    fn test_consent_url_carries_offline_access() {
        let url = consent_url(&google_config(), "staff-42").unwrap();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("state=staff-42"));
        // the secret never leaves the server
        assert!(!url.contains("test-secret"));
    }

    #[test]
    fn test_consent_url_percent_encodes_the_redirect() {
        let url = consent_url(&google_config(), "s").unwrap();

        assert!(url.contains(
            "redirect_uri=https%3A%2F%2Fbooking.example.com%2Fauth%2Fgoogle%2Fcallback"
        ));
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcalendar"));
    }

    #[test]
    fn test_token_response_tolerates_a_missing_refresh_token() {
        let with_token: TokenResponse = serde_json::from_str(
            r#"{"access_token":"ya29.x","expires_in":3599,"refresh_token":"1//abc","scope":"https://www.googleapis.com/auth/calendar","token_type":"Bearer"}"#,
        )
        .unwrap();
        assert_eq!(with_token.refresh_token.as_deref(), Some("1//abc"));

        // Google omits refresh_token when offline access was granted before
        let without_token: TokenResponse = serde_json::from_str(
            r#"{"access_token":"ya29.x","expires_in":3599,"scope":"https://www.googleapis.com/auth/calendar","token_type":"Bearer"}"#,
        )
        .unwrap();
        assert!(without_token.refresh_token.is_none());
    }
}
