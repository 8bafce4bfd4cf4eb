//! HTTP client types for Content API communication.
//!
//! This module provides the transport layer for authenticated requests to
//! the Content API.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, DELETE)
//! - [`HttpError`]: Everything that can go wrong with a single attempt
//!
//! # Example
//!
//! ```rust,ignore
//! use shopping_content::clients::{build_transport, HttpClient, HttpMethod, HttpRequest};
//!
//! let client = HttpClient::new(build_transport()?, config.endpoint(), authenticator, "my-app");
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "accounts/authinfo")
//!     .build()
//!     .unwrap();
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! The client never retries on its own. [`HttpError`] implements
//! [`crate::retry::Retryable`], so callers wrap calls in
//! [`crate::retry::with_retry`] when they want 429, 5xx and network
//! failures retried with quadratic backoff.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{ErrorDetail, HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{build_transport, HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
