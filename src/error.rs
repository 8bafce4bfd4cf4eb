//! Error types for the Shopping Content client.
//!
//! This module contains the configuration error type used while loading
//! configuration and credential files, and the top-level [`ContentError`]
//! returned by session bootstrap and product operations.
//!
//! # Error Handling
//!
//! Configuration constructors return `Result<T, ConfigError>` so invalid
//! values are rejected before any network traffic happens. Everything that
//! reaches the caller from a session or a product workflow is folded into
//! [`ContentError`].
//!
//! # Example
//!
//! ```rust
//! use shopping_content::{ConfigError, ServiceEndpoint};
//!
//! let result = ServiceEndpoint::parse("not-a-url");
//! assert!(matches!(result, Err(ConfigError::InvalidEndpoint { .. })));
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::auth::AuthError;
use crate::clients::HttpError;
use crate::retry::{RetryError, RetryExhaustedError};

/// Errors that can occur while loading or validating configuration.
///
/// Each variant names the offending file or value so the message is
/// actionable without a debugger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The merchant info file exists but could not be parsed.
    #[error("The config file at {path} is not valid JSON ({reason}). You can use the merchant-info.json file in the samples root as a template.")]
    InvalidConfigFile {
        /// Path of the rejected file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The endpoint override is not an absolute URL.
    #[error("Expected absolute endpoint URL: {url}")]
    InvalidEndpoint {
        /// The rejected URL.
        url: String,
    },

    /// A merchant id is empty or not numeric.
    #[error("Invalid merchant id '{id}'. Expected a numeric Merchant Center account id.")]
    InvalidMerchantId {
        /// The rejected id.
        id: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected 'v2' or 'v2.1'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A credentials file exists but is unusable.
    #[error("Could not read credentials from {path}: {reason}")]
    InvalidCredentialsFile {
        /// Path of the rejected file.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// No credential source could be found.
    #[error("Could not find or read credentials from either the Google Application Default credentials, {service_account}, or {oauth_client}.")]
    MissingCredentials {
        /// Candidate service-account key file.
        service_account: PathBuf,
        /// Candidate OAuth2 client file.
        oauth_client: PathBuf,
    },

    /// Application default credentials are unavailable and there is no
    /// configuration directory to fall back on.
    #[error("Must use Google Application Default Credentials if running without a configuration directory")]
    MissingConfigDirectory,

    /// A file could not be read or written.
    #[error("I/O error on {path}: {reason}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error message.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

/// Errors surfaced by session bootstrap and product operations.
///
/// Configuration and authorization problems abort immediately. Transient
/// remote failures are only surfaced once the retry helper gives up, as
/// [`ContentError::RetryExhausted`]. Per-item errors reported by the remote
/// service for a product call are *not* errors at this level; they are
/// captured in the operation outcome instead.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Configuration or credential files are missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Obtaining or refreshing an access token failed.
    #[error(transparent)]
    Auth(AuthError),

    /// The authenticated identity cannot access any Merchant Center account.
    #[error("{message}")]
    Authorization {
        /// Description of the missing access.
        message: String,
    },

    /// An account gate (MCA / non-MCA / website URL) was violated.
    #[error("{message}")]
    Precondition {
        /// The gate's message.
        message: String,
    },

    /// A remote call failed and was not retried.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A remote call kept failing transiently until the retry budget ran out.
    #[error(transparent)]
    RetryExhausted(#[from] RetryExhaustedError<HttpError>),
}

impl From<AuthError> for ContentError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Config(e) => Self::Config(e),
            other => Self::Auth(other),
        }
    }
}

impl From<RetryError<HttpError>> for ContentError {
    fn from(error: RetryError<HttpError>) -> Self {
        match error {
            RetryError::Permanent(e) => Self::Http(e),
            RetryError::Exhausted(e) => Self::RetryExhausted(e),
        }
    }
}

impl ContentError {
    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }
}

// Verify ContentError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ContentError>();
};
