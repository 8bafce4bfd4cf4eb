//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] type and the decoding of
//! Google's JSON error envelope:
//!
//! ```json
//! {"error": {"code": 400, "message": "...", "errors": [{"domain": "global", "reason": "invalid", "message": "..."}]}}
//! ```

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::clients::errors::{ErrorDetail, HttpError, HttpResponseError};

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

/// An HTTP response from the Content API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body. Empty bodies parse as `{}`.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Decodes the body into a typed resource.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidResponse`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_value(self.body.clone()).map_err(|e| HttpError::InvalidResponse {
            reason: e.to_string(),
        })
    }

    /// Converts a non-2xx response into an [`HttpResponseError`].
    ///
    /// The message and details come from the error envelope when the body
    /// has one. Otherwise the raw body (or an empty message) is used.
    #[must_use]
    pub fn to_error(&self) -> HttpResponseError {
        match serde_json::from_value::<ErrorEnvelope>(self.body.clone()) {
            Ok(envelope) => HttpResponseError {
                code: self.code,
                message: envelope.error.message.unwrap_or_default(),
                errors: envelope.error.errors,
            },
            Err(_) => HttpResponseError {
                code: self.code,
                message: self
                    .body
                    .get("raw_body")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                errors: Vec::new(),
            },
        }
    }
}
