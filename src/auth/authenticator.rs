//! Self-refreshing bearer tokens.

use chrono::Utc;
use tokio::sync::Mutex;

use crate::auth::oauth::refresh_access_token;
use crate::auth::token::AccessToken;
use crate::auth::{AuthError, Credentials};

/// Hands out access tokens for a set of credentials, renewing them when they
/// are about to expire.
///
/// The cached token sits behind a [`tokio::sync::Mutex`], so concurrent
/// callers wait for a single renewal instead of racing.
///
/// # Thread Safety
///
/// `Authenticator` is `Send + Sync`.
#[derive(Debug)]
pub struct Authenticator {
    credentials: Credentials,
    scope: String,
    http: reqwest::Client,
    cached: Mutex<Option<AccessToken>>,
}

// Verify Authenticator is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Authenticator>();
};

impl Authenticator {
    /// Creates an authenticator without a cached token.
    #[must_use]
    pub fn new(credentials: Credentials, scope: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            credentials,
            scope: scope.into(),
            http,
            cached: Mutex::new(None),
        }
    }

    /// Seeds the cache with a token obtained during credential resolution.
    #[must_use]
    pub fn with_token(mut self, token: AccessToken) -> Self {
        *self.cached.get_mut() = Some(token);
        self
    }

    /// Returns the underlying credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the OAuth scope tokens are requested for.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Returns a valid bearer token, renewing the cached one if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingRefreshToken`] if a user token expired
    /// without a refresh token, and the token request errors otherwise.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| !token.is_expired()) {
            return Ok(token.as_str().to_string());
        }

        let token = self.fetch().await?;
        let value = token.as_str().to_string();
        *cached = Some(token);
        Ok(value)
    }

    async fn fetch(&self) -> Result<AccessToken, AuthError> {
        match &self.credentials {
            Credentials::ServiceAccount(key) => key.fetch_token(&self.http, &self.scope).await,
            Credentials::AuthorizedUser(user) => {
                let refresh_token = user
                    .refresh_token
                    .as_deref()
                    .ok_or(AuthError::MissingRefreshToken)?;
                let issued_at = Utc::now();
                let response = refresh_access_token(&self.http, &user.client, refresh_token).await?;
                tracing::debug!("Refreshed access token for client {}", user.client.client_id);
                Ok(AccessToken::from_response(&response, issued_at))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::oauth::OAuthClient;
    use crate::auth::RefreshCredentials;
    use chrono::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_credentials(token_uri: &str, refresh_token: Option<&str>) -> Credentials {
        let mut client = OAuthClient::new("id", "secret");
        client.token_uri = token_uri.to_string();
        Credentials::AuthorizedUser(RefreshCredentials {
            client,
            refresh_token: refresh_token.map(String::from),
        })
    }

    async fn token_server(expected_calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh-token",
                "expires_in": 3600
            })))
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_seeded_token_is_reused() {
        let server = token_server(0).await;
        let authenticator = Authenticator::new(
            user_credentials(&format!("{}/token", server.uri()), Some("r")),
            "scope",
            reqwest::Client::new(),
        )
        .with_token(AccessToken::new(
            "seeded",
            Some(Utc::now() + Duration::seconds(3600)),
        ));

        assert_eq!(authenticator.access_token().await.unwrap(), "seeded");
        assert_eq!(authenticator.access_token().await.unwrap(), "seeded");
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_once() {
        let server = token_server(1).await;
        let authenticator = Authenticator::new(
            user_credentials(&format!("{}/token", server.uri()), Some("r")),
            "scope",
            reqwest::Client::new(),
        )
        .with_token(AccessToken::new("stale", Some(Utc::now() - Duration::seconds(1))));

        assert_eq!(authenticator.access_token().await.unwrap(), "fresh-token");
        assert_eq!(authenticator.access_token().await.unwrap(), "fresh-token");
    }

    #[tokio::test]
    async fn test_missing_refresh_token_is_reported() {
        let authenticator = Authenticator::new(
            user_credentials("http://127.0.0.1:9/token", None),
            "scope",
            reqwest::Client::new(),
        );

        assert!(matches!(
            authenticator.access_token().await,
            Err(AuthError::MissingRefreshToken)
        ));
    }
}
