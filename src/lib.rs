//! # Google Shopping Content client
//!
//! A Rust client for the Google Shopping Content API. It authenticates
//! against a Merchant Center account, opens a session on it and inserts,
//! fetches and deletes products built from the application's own data.
//!
//! ## Overview
//!
//! This crate provides:
//! - Configuration via [`ContentConfig`] and [`ContentConfigBuilder`]
//! - Credential discovery (application default credentials, service account
//!   key, OAuth2 client with stored or interactively obtained token) via
//!   [`auth`]
//! - Self-refreshing bearer tokens via [`auth::Authenticator`]
//! - An async HTTP client and typed API handle via [`clients`] and [`content`]
//! - Session bootstrap (merchant id, MCA status, website, sandbox endpoint)
//!   via [`session::ContentSession`]
//! - Quadratic back-off for transient failures via [`retry`]
//! - The product workflow via [`products::GoogleShopping`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopping_content::{ApiVersion, ContentConfig, MerchantId};
//!
//! let config = ContentConfig::builder()
//!     .config_path("/home/me/shopping-samples")
//!     .merchant_id(MerchantId::new("1234567").unwrap())
//!     .api_version(ApiVersion::V2)
//!     .build();
//!
//! assert_eq!(config.merchant_id().unwrap().as_ref(), "1234567");
//! ```
//!
//! ## Product Workflow
//!
//! ```rust,ignore
//! use shopping_content::products::{GoogleShopping, PriceRecord, ProductRecord};
//! use shopping_content::ContentConfig;
//!
//! let mut shopping = GoogleShopping::new(ContentConfig::from_env(Some("/home/me/samples"))?);
//!
//! let outcome = shopping.send_product(&book, &price).await?;
//! for warning in shopping.warnings() {
//!     println!("{warning}");
//! }
//!
//! let stored = shopping.retrieve_product(&book).await?;
//! let removed = shopping.remove_product(&book).await?;
//! assert!(removed.is_success());
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`] and installs no subscriber. Operator
//! notices (credential source, merchant id, MCA status) are emitted at
//! `info`, retries and degraded modes at `warn`.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Newtypes and endpoints validate on construction
//! - **Thread-safe**: Sessions and clients are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod content;
pub mod error;
pub mod products;
pub mod retry;
pub mod session;

// Re-export public types at crate root for convenience
pub use config::{
    ApiVersion, ContentConfig, ContentConfigBuilder, MerchantId, MerchantInfo, ServiceEndpoint,
};
pub use error::{ConfigError, ContentError};

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError,
};

pub use products::{GoogleShopping, OperationOutcome};
pub use retry::{RetryError, RetryExhaustedError, RetryPolicy};
pub use session::ContentSession;
