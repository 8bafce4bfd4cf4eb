//! OAuth 2.0 installed-application support.
//!
//! This module implements the parts of Google's OAuth 2.0 flow used when
//! credentials come from an OAuth client file:
//!
//! - [`OAuthClient`]: The client loaded from `client-secrets.json`
//! - [`authorization_url`]: The out-of-band consent URL shown to the operator
//! - [`exchange_code`]: Authorization code grant
//! - [`refresh_access_token`]: Refresh token grant
//! - [`AuthorizationPrompt`]: How the consent URL is shown and the code read
//!
//! # Example: Refreshing a Stored Token
//!
//! ```rust,ignore
//! use shopping_content::auth::oauth::{refresh_access_token, OAuthClient};
//!
//! let client = OAuthClient::from_file(&secrets_path)?;
//! let response = refresh_access_token(&reqwest::Client::new(), &client, &refresh_token).await?;
//! println!("Token valid for {:?} seconds", response.expires_in);
//! ```

mod client_secrets;
mod flow;
mod prompt;

pub use client_secrets::{OAuthClient, DEFAULT_AUTH_URI};
pub use flow::{authorization_url, exchange_code, refresh_access_token, OOB_REDIRECT_URI};
pub use prompt::{AuthorizationPrompt, StdinPrompt};
