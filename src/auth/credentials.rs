//! Credential discovery.
//!
//! [`CredentialResolver`] finds credentials in a fixed order and stops at the
//! first source that works:
//!
//! 1. Application default credentials, when a file was located by
//!    [`ContentConfig::from_env`](crate::ContentConfig::from_env) or set on
//!    the builder
//! 2. `service-account.json` in the configuration directory
//! 3. `client-secrets.json` in the configuration directory, combined with the
//!    refresh token from `stored-token.json` or, failing that, the
//!    interactive installed-application flow
//!
//! Without a configuration directory only the first source is available.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use crate::auth::oauth::{
    authorization_url, exchange_code, refresh_access_token, AuthorizationPrompt, OAuthClient,
};
use crate::auth::token::{AccessToken, TokenResponse};
use crate::auth::token_store::{StoredToken, TokenStore};
use crate::auth::{AuthError, Authenticator, ServiceAccountKey};
use crate::config::{ContentConfig, CONTENT_SCOPE};
use crate::error::ConfigError;

/// An OAuth client together with the refresh token issued to it.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshCredentials {
    /// The OAuth client the refresh token belongs to.
    pub client: OAuthClient,
    /// Refresh token; `None` when the token endpoint did not issue one, in
    /// which case the first access token cannot be renewed.
    pub refresh_token: Option<String>,
}

impl fmt::Debug for RefreshCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCredentials")
            .field("client", &self.client)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "*****"))
            .finish()
    }
}

/// Credentials able to mint access tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    /// A service-account key, exchanged through the JWT bearer grant.
    ServiceAccount(ServiceAccountKey),
    /// A user authorization, renewed through the refresh token grant.
    AuthorizedUser(RefreshCredentials),
}

/// Layout of an application default credentials file.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApplicationDefaultFile {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        #[serde(default)]
        token_uri: Option<String>,
    },
}

impl Credentials {
    /// Loads an application default credentials file.
    ///
    /// Both `service_account` and `authorized_user` (as written by
    /// `gcloud auth application-default login`) files are supported.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::InvalidCredentialsFile`] if it has an unsupported
    /// `type` or is missing fields.
    pub fn from_application_default_file(path: &Path) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidCredentialsFile {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, &e))?;
        let file: ApplicationDefaultFile =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        match file {
            ApplicationDefaultFile::ServiceAccount(key) => {
                if key.client_email.trim().is_empty() || key.private_key.trim().is_empty() {
                    return Err(invalid(
                        "service account file needs client_email and private_key".to_string(),
                    ));
                }
                Ok(Self::ServiceAccount(key))
            }
            ApplicationDefaultFile::AuthorizedUser {
                client_id,
                client_secret,
                refresh_token,
                token_uri,
            } => {
                let mut client = OAuthClient::new(client_id, client_secret);
                if let Some(token_uri) = token_uri {
                    client.token_uri = token_uri;
                }
                Ok(Self::AuthorizedUser(RefreshCredentials {
                    client,
                    refresh_token: Some(refresh_token),
                }))
            }
        }
    }
}

/// Where the credentials of a session came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    /// An application default credentials file.
    ApplicationDefault(PathBuf),
    /// `service-account.json` in the configuration directory.
    ServiceAccountFile(PathBuf),
    /// `client-secrets.json` in the configuration directory.
    OAuthClientFile {
        /// The client file.
        path: PathBuf,
        /// `true` if the operator had to authorize interactively because no
        /// usable stored token was found.
        interactive: bool,
    },
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplicationDefault(path) => {
                write!(f, "application default credentials ({})", path.display())
            }
            Self::ServiceAccountFile(path) => write!(f, "service account ({})", path.display()),
            Self::OAuthClientFile { path, .. } => write!(f, "OAuth2 client ({})", path.display()),
        }
    }
}

/// Outcome of [`CredentialResolver::resolve`].
#[derive(Debug)]
pub struct ResolvedCredentials {
    /// The source that won.
    pub source: CredentialSource,
    /// Token provider for the resolved credentials.
    pub authenticator: Authenticator,
}

/// Locates credentials for a configuration.
pub struct CredentialResolver<'a> {
    config: &'a ContentConfig,
    prompt: Arc<dyn AuthorizationPrompt>,
    http: reqwest::Client,
}

impl fmt::Debug for CredentialResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> CredentialResolver<'a> {
    /// Creates a resolver.
    ///
    /// `prompt` is only consulted when interactive authorization is needed;
    /// `http` is used for token requests.
    #[must_use]
    pub fn new(
        config: &'a ContentConfig,
        prompt: Arc<dyn AuthorizationPrompt>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            config,
            prompt,
            http,
        }
    }

    /// Resolves credentials, first success wins.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingConfigDirectory`] if application default
    ///   credentials are unavailable and no configuration path is set
    /// - [`ConfigError::MissingCredentials`] if no source exists
    /// - [`ConfigError::InvalidCredentialsFile`] if a present file is malformed
    /// - [`AuthError`] variants if interactive authorization fails
    pub async fn resolve(&self) -> Result<ResolvedCredentials, AuthError> {
        if let Some(resolved) = self.application_default()? {
            return Ok(resolved);
        }

        let (Some(service_account), Some(oauth_client)) = (
            self.config.service_account_path(),
            self.config.oauth_client_path(),
        ) else {
            return Err(ConfigError::MissingConfigDirectory.into());
        };

        if service_account.exists() {
            tracing::info!(
                "Loading service account credentials from {}.",
                service_account.display()
            );
            let key = ServiceAccountKey::from_file(&service_account)?;
            return Ok(self.resolved(
                CredentialSource::ServiceAccountFile(service_account),
                Credentials::ServiceAccount(key),
                None,
            ));
        }

        if oauth_client.exists() {
            tracing::info!("Loading OAuth2 credentials from {}.", oauth_client.display());
            let client = OAuthClient::from_file(&oauth_client)?;
            return self.authorize_with_client(oauth_client, client).await;
        }

        Err(ConfigError::MissingCredentials {
            service_account,
            oauth_client,
        }
        .into())
    }

    fn application_default(&self) -> Result<Option<ResolvedCredentials>, AuthError> {
        let Some(path) = self.config.application_default_credentials() else {
            return Ok(None);
        };
        if !path.is_file() {
            tracing::debug!(
                "Application default credentials file {} not found",
                path.display()
            );
            return Ok(None);
        }

        let credentials = Credentials::from_application_default_file(path)?;
        tracing::info!("Using Google Application Default Credentials.");
        Ok(Some(self.resolved(
            CredentialSource::ApplicationDefault(path.to_path_buf()),
            credentials,
            None,
        )))
    }

    async fn authorize_with_client(
        &self,
        path: PathBuf,
        client: OAuthClient,
    ) -> Result<ResolvedCredentials, AuthError> {
        let Some(token_path) = self.config.token_path() else {
            return Err(ConfigError::MissingConfigDirectory.into());
        };
        let store = TokenStore::new(token_path);

        if let Some(refresh_token) = store.load().and_then(|stored| stored.refresh_token) {
            match refresh_access_token(&self.http, &client, &refresh_token).await {
                Ok(response) => {
                    tracing::info!("Successfully loaded token from '{}'.", store.path().display());
                    let token = AccessToken::from_response(&response, Utc::now());
                    return Ok(self.resolved(
                        CredentialSource::OAuthClientFile {
                            path,
                            interactive: false,
                        },
                        Credentials::AuthorizedUser(RefreshCredentials {
                            client,
                            refresh_token: Some(refresh_token),
                        }),
                        Some(token),
                    ));
                }
                Err(e) => tracing::warn!("Stored token could not be refreshed: {e}"),
            }
        }

        let issued_at = Utc::now();
        let response = self.authorize_interactively(&client, &store).await?;
        let token = AccessToken::from_response(&response, issued_at);
        Ok(self.resolved(
            CredentialSource::OAuthClientFile {
                path,
                interactive: true,
            },
            Credentials::AuthorizedUser(RefreshCredentials {
                client,
                refresh_token: response.refresh_token,
            }),
            Some(token),
        ))
    }

    async fn authorize_interactively(
        &self,
        client: &OAuthClient,
        store: &TokenStore,
    ) -> Result<TokenResponse, AuthError> {
        tracing::info!("Your token was missing or invalid, fetching a new one");

        let url = authorization_url(client, CONTENT_SCOPE);
        let prompt = Arc::clone(&self.prompt);
        let code = tokio::task::spawn_blocking(move || prompt.request_code(&url))
            .await
            .map_err(|e| AuthError::Prompt {
                reason: e.to_string(),
            })??;

        let response = exchange_code(&self.http, client, &code).await?;
        store.save(&StoredToken::from_response(&response))?;
        Ok(response)
    }

    fn resolved(
        &self,
        source: CredentialSource,
        credentials: Credentials,
        token: Option<AccessToken>,
    ) -> ResolvedCredentials {
        let mut authenticator =
            Authenticator::new(credentials, CONTENT_SCOPE, self.http.clone());
        if let Some(token) = token {
            authenticator = authenticator.with_token(token);
        }
        ResolvedCredentials {
            source,
            authenticator,
        }
    }
}
