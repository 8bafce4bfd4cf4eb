//! HTTP client for Content API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests against a [`ServiceEndpoint`]. Each call is a single attempt;
//! retries are layered on top by [`crate::retry::with_retry`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::Authenticator;
use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ServiceEndpoint;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds the shared transport used for token and API requests.
///
/// # Errors
///
/// Returns [`HttpError::Network`] if the TLS backend cannot be initialized.
pub fn build_transport() -> Result<reqwest::Client, HttpError> {
    Ok(reqwest::Client::builder().use_rustls_tls().build()?)
}

/// HTTP client for making requests to the Content API.
///
/// The client handles:
/// - URL construction from the service endpoint
/// - Default headers including User-Agent
/// - A bearer token per request, taken from the [`Authenticator`]
/// - Decoding Google's error envelope for non-2xx responses
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use shopping_content::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::new(transport, config.endpoint(), authenticator, "my-app");
///
/// let request = HttpRequest::builder(HttpMethod::Get, "accounts/authinfo")
///     .build()
///     .unwrap();
///
/// let response = client.request(request).await?;
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    endpoint: ServiceEndpoint,
    authenticator: Arc<Authenticator>,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Arguments
    ///
    /// * `client` - The shared reqwest transport
    /// * `endpoint` - Where resource paths are resolved
    /// * `authenticator` - Source of bearer tokens
    /// * `application_name` - Prefix for the User-Agent header
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        endpoint: ServiceEndpoint,
        authenticator: Arc<Authenticator>,
        application_name: &str,
    ) -> Self {
        let user_agent = format!("{application_name} google-shopping-content/{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        Self {
            client,
            endpoint,
            authenticator,
            default_headers,
        }
    }

    /// Returns a copy of this client that targets another endpoint.
    ///
    /// The transport and authenticator are shared with the original.
    #[must_use]
    pub fn with_endpoint(&self, endpoint: ServiceEndpoint) -> Self {
        Self {
            endpoint,
            ..self.clone()
        }
    }

    /// Returns the endpoint this client targets.
    #[must_use]
    pub const fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Returns the authenticator.
    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the Content API.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - No access token can be obtained (`Auth`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.endpoint.url_for(&request.path);
        let token = self.authenticator.access_token().await?;

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        req_builder = req_builder.bearer_auth(token);

        if let Some(body) = &request.body {
            req_builder = req_builder
                .header("Content-Type", "application/json")
                .body(body.to_string());
        }

        tracing::debug!("{} {}", request.http_method, url);
        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        let body = if body_text.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&body_text)
                .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
        };

        let response = HttpResponse::new(code, res_headers, body);
        if response.is_ok() {
            return Ok(response);
        }

        let error = response.to_error();
        tracing::debug!("{} {} failed: {}", request.http_method, request.path, error);
        Err(HttpError::Response(error))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
