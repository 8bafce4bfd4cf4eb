//! Service-account keys and the JWT bearer grant.
//!
//! A service account never needs a cached refresh token: each time its access
//! token runs out, a fresh RS256 assertion is signed with the private key and
//! exchanged at the key's `token_uri`.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::auth::token::{request_token, AccessToken, DEFAULT_TOKEN_URI};
use crate::auth::AuthError;
use crate::error::ConfigError;

/// Grant type of the JWT bearer flow (RFC 7523).
const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// A Google service-account key, as found in `service-account.json` or in an
/// application default credentials file of type `service_account`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAccountKey {
    /// The account's e-mail address, used as the assertion issuer.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// Key id, sent as the JWT `kid` header.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// Token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

impl ServiceAccountKey {
    /// Loads a key file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::InvalidCredentialsFile`] if it is not a service-account
    /// key.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, &e))?;
        Self::from_json(&content).map_err(|reason| ConfigError::InvalidCredentialsFile {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub(crate) fn from_json(json: &str) -> Result<Self, String> {
        let key: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        if key.client_email.trim().is_empty() {
            return Err("client_email must not be empty".to_string());
        }
        if key.private_key.trim().is_empty() {
            return Err("private_key must not be empty".to_string());
        }
        Ok(key)
    }

    /// Signs an assertion for `scope`, issued at `now`.
    ///
    /// The PEM key is only parsed here, so a malformed key surfaces on the
    /// first token request rather than when the file is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if the private key is not a valid RSA
    /// key.
    pub fn assertion(&self, scope: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let signing_error = |e: jsonwebtoken::errors::Error| AuthError::Signing {
            reason: e.to_string(),
        };

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(signing_error)?;
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.private_key_id);

        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: scope.to_string(),
            aud: self.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        encode(&header, &claims, &key).map_err(signing_error)
    }

    /// Exchanges a freshly signed assertion for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if the assertion cannot be signed and
    /// [`AuthError::TokenRequestFailed`] if the token endpoint rejects it.
    pub async fn fetch_token(
        &self,
        client: &reqwest::Client,
        scope: &str,
    ) -> Result<AccessToken, AuthError> {
        let now = Utc::now();
        let assertion = self.assertion(scope, now)?;
        let response = request_token(
            client,
            &self.token_uri,
            &[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", assertion.as_str()),
            ],
        )
        .await?;

        tracing::debug!("Obtained service account token for {}", self.client_email);
        Ok(AccessToken::from_response(&response, now))
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"*****")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
