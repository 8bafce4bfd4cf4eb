//! Authentication for the Content API.
//!
//! This module discovers credentials and turns them into bearer tokens.
//!
//! # Overview
//!
//! - [`CredentialResolver`]: Finds credentials in the documented order
//! - [`Credentials`]: A service-account key or an authorized user
//! - [`Authenticator`]: Caches the access token and renews it on expiry
//! - [`ServiceAccountKey`]: Key file contents and the JWT bearer grant
//! - [`TokenStore`]: Reads and writes `stored-token.json`
//! - [`oauth`]: The OAuth2 installed-application flow
//!
//! # Credential Order
//!
//! 1. Application default credentials
//! 2. `<config_path>/content/service-account.json`
//! 3. `<config_path>/content/client-secrets.json` plus `stored-token.json`,
//!    or interactive authorization when no usable token is stored
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopping_content::auth::{oauth::StdinPrompt, CredentialResolver};
//! use shopping_content::ContentConfig;
//!
//! let config = ContentConfig::from_env(Some("/home/me/shopping-samples"))?;
//! let resolved = CredentialResolver::new(&config, Arc::new(StdinPrompt), reqwest::Client::new())
//!     .resolve()
//!     .await?;
//!
//! println!("Authenticated with {}", resolved.source);
//! let bearer = resolved.authenticator.access_token().await?;
//! ```

mod authenticator;
mod credentials;
mod error;
pub mod oauth;
mod service_account;
mod token;
mod token_store;

pub use authenticator::Authenticator;
pub use credentials::{
    CredentialResolver, CredentialSource, Credentials, RefreshCredentials, ResolvedCredentials,
};
pub use error::AuthError;
pub use service_account::ServiceAccountKey;
pub use token::{AccessToken, TokenResponse, DEFAULT_TOKEN_URI};
pub use token_store::{StoredToken, TokenStore};
