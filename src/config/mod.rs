//! Configuration types for the Shopping Content client.
//!
//! This module provides the process-wide configuration used to locate
//! credential files, pick the API endpoint and tune retries.
//!
//! # Overview
//!
//! - [`ContentConfig`]: Immutable configuration shared by every component
//! - [`ContentConfigBuilder`]: A builder for constructing [`ContentConfig`] instances
//! - [`MerchantId`]: A validated, string-typed Merchant Center account id
//! - [`ServiceEndpoint`]: A root URL / base path pair for the API
//! - [`ApiVersion`]: The Content API version to target
//! - [`MerchantInfo`]: The optional `merchant-info.json` file
//!
//! # Files
//!
//! All files live under `<config_path>/content/`:
//!
//! | File | Purpose |
//! |---|---|
//! | `merchant-info.json` | optional `merchantId` override |
//! | `service-account.json` | service-account key |
//! | `client-secrets.json` | OAuth2 installed-app client |
//! | `stored-token.json` | cached OAuth2 token (written by this crate) |
//!
//! # Example
//!
//! ```rust
//! use shopping_content::{ContentConfig, ApiVersion};
//!
//! let config = ContentConfig::builder()
//!     .config_path("/etc/shopping")
//!     .api_version(ApiVersion::V2)
//!     .build();
//!
//! assert!(config.config_dir().unwrap().ends_with("content"));
//! ```

mod merchant_info;
mod newtypes;
mod version;

pub use merchant_info::MerchantInfo;
pub use newtypes::{MerchantId, ServiceEndpoint};
pub use version::ApiVersion;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::retry::RetryPolicy;

/// Name of the directory below `config_path` holding the files.
pub const CONFIG_SUBDIRECTORY: &str = "content";
/// Merchant info file name.
pub const CONFIG_FILE_NAME: &str = "merchant-info.json";
/// Service-account key file name.
pub const SERVICE_ACCOUNT_FILE_NAME: &str = "service-account.json";
/// OAuth2 client file name.
pub const OAUTH_CLIENT_FILE_NAME: &str = "client-secrets.json";
/// Cached OAuth2 token file name.
pub const OAUTH_TOKEN_FILE_NAME: &str = "stored-token.json";
/// Environment variable overriding the API endpoint.
pub const ENDPOINT_ENV_VAR: &str = "GOOGLE_SHOPPING_SAMPLES_ENDPOINT";
/// Environment variable naming an application default credentials file.
pub const CREDENTIALS_ENV_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// OAuth scope granting Content API access.
pub const CONTENT_SCOPE: &str = "https://www.googleapis.com/auth/content";

const DEFAULT_APPLICATION_NAME: &str = "Content API for Shopping Samples";

/// Configuration for the Shopping Content client.
///
/// `ContentConfig` is built once at startup and passed by reference to the
/// components that need it. It never reads the environment by itself; use
/// [`ContentConfig::from_env`] for that.
///
/// # Thread Safety
///
/// `ContentConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ContentConfig {
    config_path: Option<PathBuf>,
    merchant_id: Option<MerchantId>,
    endpoint: Option<ServiceEndpoint>,
    api_version: ApiVersion,
    application_default_credentials: Option<PathBuf>,
    retry_policy: Option<RetryPolicy>,
    application_name: String,
}

impl ContentConfig {
    /// Creates a new builder for constructing a `ContentConfig`.
    #[must_use]
    pub fn builder() -> ContentConfigBuilder {
        ContentConfigBuilder::new()
    }

    /// Builds a configuration from the process environment.
    ///
    /// Reads [`ENDPOINT_ENV_VAR`] for an endpoint override and locates
    /// application default credentials through [`CREDENTIALS_ENV_VAR`] or
    /// the gcloud well-known file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the endpoint override is
    /// not an absolute URL.
    pub fn from_env(config_path: Option<impl Into<PathBuf>>) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Some(path) = config_path {
            builder = builder.config_path(path);
        }

        if let Some(endpoint) = non_empty_env(ENDPOINT_ENV_VAR) {
            builder = builder.endpoint(ServiceEndpoint::parse(&endpoint)?);
        }

        let adc = non_empty_env(CREDENTIALS_ENV_VAR)
            .map(PathBuf::from)
            .or_else(|| well_known_adc_file().filter(|path| path.is_file()));
        builder = builder.application_default_credentials(adc);

        Ok(builder.build())
    }

    /// Returns the root configuration path, if configured.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Returns the directory holding the configuration files.
    #[must_use]
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.config_path
            .as_ref()
            .map(|path| path.join(CONFIG_SUBDIRECTORY))
    }

    /// Path of `merchant-info.json`.
    #[must_use]
    pub fn merchant_info_path(&self) -> Option<PathBuf> {
        self.file_in_config_dir(CONFIG_FILE_NAME)
    }

    /// Path of `service-account.json`.
    #[must_use]
    pub fn service_account_path(&self) -> Option<PathBuf> {
        self.file_in_config_dir(SERVICE_ACCOUNT_FILE_NAME)
    }

    /// Path of `client-secrets.json`.
    #[must_use]
    pub fn oauth_client_path(&self) -> Option<PathBuf> {
        self.file_in_config_dir(OAUTH_CLIENT_FILE_NAME)
    }

    /// Path of `stored-token.json`.
    #[must_use]
    pub fn token_path(&self) -> Option<PathBuf> {
        self.file_in_config_dir(OAUTH_TOKEN_FILE_NAME)
    }

    /// Returns the explicitly configured merchant id, if any.
    #[must_use]
    pub const fn merchant_id(&self) -> Option<&MerchantId> {
        self.merchant_id.as_ref()
    }

    /// Returns the endpoint override, if any.
    #[must_use]
    pub const fn endpoint_override(&self) -> Option<&ServiceEndpoint> {
        self.endpoint.as_ref()
    }

    /// Returns the endpoint to use: the override, or the default for the
    /// configured API version.
    #[must_use]
    pub fn endpoint(&self) -> ServiceEndpoint {
        self.endpoint
            .clone()
            .unwrap_or_else(|| ServiceEndpoint::default_for(&self.api_version))
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the application default credentials file, if one was found.
    #[must_use]
    pub fn application_default_credentials(&self) -> Option<&Path> {
        self.application_default_credentials.as_deref()
    }

    /// Returns the retry policy applied to product calls, if enabled.
    #[must_use]
    pub const fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.retry_policy.as_ref()
    }

    /// Returns the application name sent in the `User-Agent` header.
    #[must_use]
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    fn file_in_config_dir(&self, name: &str) -> Option<PathBuf> {
        self.config_dir().map(|dir| dir.join(name))
    }
}

// Verify ContentConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ContentConfig>();
};

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Location where `gcloud auth application-default login` stores credentials.
fn well_known_adc_file() -> Option<PathBuf> {
    let base = if cfg!(windows) {
        PathBuf::from(std::env::var_os("APPDATA")?)
    } else {
        PathBuf::from(std::env::var_os("HOME")?).join(".config")
    };
    Some(
        base.join("gcloud")
            .join("application_default_credentials.json"),
    )
}

/// Builder for constructing [`ContentConfig`] instances.
///
/// # Defaults
///
/// - `config_path`: `None` (only application default credentials can be used)
/// - `merchant_id`: `None` (taken from `merchant-info.json` or the account list)
/// - `endpoint`: `None` (default endpoint for the API version)
/// - `api_version`: [`ApiVersion::V2`]
/// - `application_default_credentials`: `None`
/// - `retry_policy`: [`RetryPolicy::default`]
/// - `application_name`: `"Content API for Shopping Samples"`
#[derive(Debug, Default)]
pub struct ContentConfigBuilder {
    config_path: Option<PathBuf>,
    merchant_id: Option<MerchantId>,
    endpoint: Option<ServiceEndpoint>,
    api_version: Option<ApiVersion>,
    application_default_credentials: Option<PathBuf>,
    retry_policy: Option<Option<RetryPolicy>>,
    application_name: Option<String>,
}

impl ContentConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root configuration path; files are read from its `content/`
    /// subdirectory.
    #[must_use]
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Pins the merchant id. Takes precedence over `merchant-info.json`.
    #[must_use]
    pub fn merchant_id(mut self, id: MerchantId) -> Self {
        self.merchant_id = Some(id);
        self
    }

    /// Overrides the API endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: ServiceEndpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the API version used for the default endpoint.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets (or clears) the application default credentials file.
    #[must_use]
    pub fn application_default_credentials(mut self, path: Option<PathBuf>) -> Self {
        self.application_default_credentials = path;
        self
    }

    /// Sets the retry policy for product calls; `None` disables retries.
    #[must_use]
    pub fn retry_policy(mut self, policy: Option<RetryPolicy>) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets the application name used in the `User-Agent` header.
    #[must_use]
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Builds the [`ContentConfig`].
    #[must_use]
    pub fn build(self) -> ContentConfig {
        ContentConfig {
            config_path: self.config_path,
            merchant_id: self.merchant_id,
            endpoint: self.endpoint,
            api_version: self.api_version.unwrap_or_default(),
            application_default_credentials: self.application_default_credentials,
            retry_policy: self.retry_policy.unwrap_or_else(|| Some(RetryPolicy::default())),
            application_name: self
                .application_name
                .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.to_string()),
        }
    }
}
