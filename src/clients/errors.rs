//! HTTP-specific error types.
//!
//! This module contains error types for HTTP operations against the Content
//! API: error responses, request validation failures and transport errors.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: Non-2xx responses, decoded from Google's error envelope
//! - [`InvalidHttpRequestError`]: A request failed validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! [`HttpError`] implements [`Retryable`]: rate limiting (429), server errors
//! (5xx) and network failures are transient, everything else is permanent.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopping_content::clients::HttpError;
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => {
//!         for detail in &e.errors {
//!             println!("{:?}: {:?}", detail.reason, detail.message);
//!         }
//!     }
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthError;
use crate::retry::Retryable;

/// One entry of the `errors` array in Google's error envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Error domain, e.g. `global`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Machine-readable reason, e.g. `invalid` or `notFound`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error returned when a request receives a non-successful response.
///
/// # Example
///
/// ```rust
/// use shopping_content::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: "item not found".to_string(),
///     errors: Vec::new(),
/// };
///
/// assert_eq!(error.to_string(), "HTTP 404: item not found");
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Top-level error message.
    pub message: String,
    /// Individual errors reported by the service.
    pub errors: Vec<ErrorDetail>,
}

impl HttpResponseError {
    /// Returns `true` for rate limiting and server errors.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.code == 429 || self.code >= 500
    }
}

/// Error returned when a request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A GET or DELETE request carries a body.
    #[error("Cannot send data with {method}.")]
    UnexpectedBody {
        /// The HTTP method that forbids a body.
        method: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// No access token could be obtained for the request.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A request body could not be encoded as JSON.
    #[error("Could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// A successful response body did not have the expected shape.
    #[error("Unexpected response body: {reason}")]
    InvalidResponse {
        /// The decoding error.
        reason: String,
    },
}

impl Retryable for HttpError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Response(e) => e.is_transient(),
            Self::Network(_) => true,
            Self::InvalidRequest(_)
            | Self::Auth(_)
            | Self::Encode(_)
            | Self::InvalidResponse { .. } => false,
        }
    }
}
