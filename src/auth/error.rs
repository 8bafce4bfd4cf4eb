//! Authentication error types.
//!
//! # Error Types
//!
//! - [`AuthError::TokenRequestFailed`]: The OAuth token endpoint rejected a grant
//! - [`AuthError::Signing`]: A service-account assertion could not be signed
//! - [`AuthError::Prompt`]: The operator did not supply an authorization code
//! - [`AuthError::MissingRefreshToken`]: A token expired and cannot be renewed
//! - [`AuthError::TokenStore`]: The token file could not be written
//! - [`AuthError::Config`]: A credentials file is missing or malformed
//!
//! # Example
//!
//! ```rust
//! use shopping_content::auth::AuthError;
//!
//! let error = AuthError::TokenRequestFailed {
//!     status: 400,
//!     message: r#"{"error":"invalid_grant"}"#.to_string(),
//! };
//! assert!(error.to_string().contains("400"));
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::error::ConfigError;

/// Errors that can occur while obtaining or refreshing access tokens.
///
/// # Thread Safety
///
/// `AuthError` is `Send + Sync`, making it safe to use across async boundaries.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint returned a non-success status, could not be
    /// reached (status `0`), or returned an unreadable body.
    #[error("Token request failed with status {status}: {message}")]
    TokenRequestFailed {
        /// The HTTP status code returned, or `0` for network failures.
        status: u16,
        /// The error body or a description of the failure.
        message: String,
    },

    /// The service-account key could not sign the JWT assertion.
    #[error("Could not sign service account assertion: {reason}")]
    Signing {
        /// Underlying signing error.
        reason: String,
    },

    /// Reading the authorization code from the operator failed.
    #[error("Could not read authorization code: {reason}")]
    Prompt {
        /// What went wrong.
        reason: String,
    },

    /// The cached access token expired and no refresh token is available.
    #[error("Access token expired and no refresh token is available; delete the stored token and authorize again")]
    MissingRefreshToken,

    /// The token file could not be written.
    #[error("Could not save token to {path}: {reason}")]
    TokenStore {
        /// The token file.
        path: PathBuf,
        /// The underlying error message.
        reason: String,
    },

    /// A credentials file is missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AuthError {
    pub(crate) fn network(error: &reqwest::Error) -> Self {
        Self::TokenRequestFailed {
            status: 0,
            message: format!("Network error: {error}"),
        }
    }
}

// Verify AuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthError>();
};
