//! The OAuth2 installed-application (out-of-band) flow.
//!
//! # Overview
//!
//! 1. [`authorization_url`] builds the consent URL with
//!    `redirect_uri=urn:ietf:wg:oauth:2.0:oob` and `access_type=offline`
//! 2. The operator logs in and pastes the code shown by Google
//! 3. [`exchange_code`] trades the code for an access and refresh token
//! 4. Later runs call [`refresh_access_token`] with the stored refresh token
//!
//! # Example
//!
//! ```rust
//! use shopping_content::auth::oauth::{authorization_url, OAuthClient};
//!
//! let client = OAuthClient::new("my-client-id", "my-secret");
//! let url = authorization_url(&client, "https://www.googleapis.com/auth/content");
//!
//! assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
//! assert!(url.contains("access_type=offline"));
//! assert!(url.contains("redirect_uri=urn%3Aietf%3Awg%3Aoauth%3A2.0%3Aoob"));
//! ```

use crate::auth::oauth::OAuthClient;
use crate::auth::token::{request_token, TokenResponse};
use crate::auth::AuthError;

/// Redirect URI that makes Google display the code instead of redirecting.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Builds the consent URL for `scope`.
#[must_use]
pub fn authorization_url(client: &OAuthClient, scope: &str) -> String {
    let params = [
        ("response_type", "code"),
        ("access_type", "offline"),
        ("client_id", client.client_id.as_str()),
        ("redirect_uri", OOB_REDIRECT_URI),
        ("scope", scope),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if client.auth_uri.contains('?') { '&' } else { '?' };
    format!("{}{separator}{query_string}", client.auth_uri)
}

/// Exchanges an authorization code for tokens.
///
/// # Errors
///
/// Returns [`AuthError::TokenRequestFailed`] if the token endpoint rejects
/// the code.
pub async fn exchange_code(
    http: &reqwest::Client,
    client: &OAuthClient,
    code: &str,
) -> Result<TokenResponse, AuthError> {
    request_token(
        http,
        &client.token_uri,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("redirect_uri", OOB_REDIRECT_URI),
        ],
    )
    .await
}

/// Exchanges a refresh token for a new access token.
///
/// # Errors
///
/// Returns [`AuthError::TokenRequestFailed`] if the refresh token was revoked
/// or the token endpoint cannot be reached.
pub async fn refresh_access_token(
    http: &reqwest::Client,
    client: &OAuthClient,
    refresh_token: &str,
) -> Result<TokenResponse, AuthError> {
    request_token(
        http,
        &client.token_uri,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
        ],
    )
    .await
}
