//! Access tokens and the OAuth token endpoint.
//!
//! Every grant this crate uses (refresh token, authorization code, JWT
//! bearer) is a form-encoded `POST` to a token URI answered by the same JSON
//! shape, so they all go through [`request_token`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::auth::AuthError;

/// Default Google OAuth token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens are renewed this long before their nominal expiry.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// A bearer token with an optional expiry.
///
/// The token value is hidden from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a token.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Creates a token from a token endpoint response received at `now`.
    ///
    /// An `expires_in` too large to represent yields a token without expiry.
    #[must_use]
    pub fn from_response(response: &TokenResponse, now: DateTime<Utc>) -> Self {
        let expires_at = response.expires_in.and_then(|seconds| {
            let expires_at = Duration::try_seconds(seconds)
                .and_then(|lifetime| now.checked_add_signed(lifetime));
            if expires_at.is_none() {
                tracing::warn!("Ignoring out-of-range token lifetime of {seconds} seconds");
            }
            expires_at
        });
        Self::new(response.access_token.clone(), expires_at)
    }

    /// Returns the bearer value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Returns when the token expires, if known.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns `true` if the token expires within the next minute.
    ///
    /// Tokens without an expiry never expire.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| {
            expires_at <= Utc::now() + Duration::seconds(EXPIRY_LEEWAY_SECS)
        })
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"*****")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Response of the OAuth token endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// The new access token.
    pub access_token: String,
    /// A refresh token, only sent for offline authorization-code grants.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Token type, normally `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
}

/// Posts a form-encoded grant to `token_uri`.
///
/// # Errors
///
/// Returns [`AuthError::TokenRequestFailed`] if the request cannot be sent,
/// the endpoint answers with a non-success status, or the body is not a
/// token response.
pub(crate) async fn request_token(
    client: &reqwest::Client,
    token_uri: &str,
    params: &[(&str, &str)],
) -> Result<TokenResponse, AuthError> {
    tracing::debug!("Requesting access token from {token_uri}");

    let response = client
        .post(token_uri)
        .form(params)
        .send()
        .await
        .map_err(|e| AuthError::network(&e))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| AuthError::network(&e))?;

    if !(200..300).contains(&status) {
        return Err(AuthError::TokenRequestFailed {
            status,
            message: body,
        });
    }

    serde_json::from_str(&body).map_err(|e| AuthError::TokenRequestFailed {
        status,
        message: format!("Failed to parse token response: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_token_without_expiry_never_expires() {
        let token = AccessToken::new("abc", None);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_token_expiring_within_leeway_is_expired() {
        let soon = AccessToken::new("abc", Some(Utc::now() + Duration::seconds(30)));
        assert!(soon.is_expired());

        let later = AccessToken::new("abc", Some(Utc::now() + Duration::seconds(3600)));
        assert!(!later.is_expired());
    }

    #[test]
    fn test_from_response_computes_expiry() {
        let response = TokenResponse {
            access_token: "ya29.token".to_string(),
            refresh_token: None,
            expires_in: Some(3599),
            token_type: Some("Bearer".to_string()),
            scope: None,
        };
        let now = Utc::now();
        let token = AccessToken::from_response(&response, now);
        assert_eq!(token.as_str(), "ya29.token");
        assert_eq!(token.expires_at(), Some(now + Duration::seconds(3599)));
    }

    #[test]
    fn test_out_of_range_lifetime_means_no_expiry() {
        let response = TokenResponse {
            access_token: "ya29.token".to_string(),
            refresh_token: None,
            expires_in: Some(i64::MAX),
            token_type: None,
            scope: None,
        };
        let token = AccessToken::from_response(&response, Utc::now());
        assert!(token.expires_at().is_none());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_debug_hides_token() {
        let token = AccessToken::new("super-secret", None);
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("*****"));
    }

    #[tokio::test]
    async fn test_request_token_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new-token",
                "expires_in": 3600,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let response = request_token(
            &client,
            &format!("{}/token", server.uri()),
            &[("grant_type", "refresh_token"), ("refresh_token", "r")],
        )
        .await
        .unwrap();

        assert_eq!(response.access_token, "new-token");
        assert_eq!(response.expires_in, Some(3600));
    }

    #[tokio::test]
    async fn test_request_token_reports_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let result = request_token(&client, &format!("{}/token", server.uri()), &[]).await;

        assert!(matches!(
            result,
            Err(AuthError::TokenRequestFailed { status: 400, ref message }) if message.contains("invalid_grant")
        ));
    }
}
