//! Typed handle for the Content API.
//!
//! [`ShoppingContent`] binds an [`HttpClient`] to an endpoint and exposes the
//! resources this crate uses:
//!
//! - [`Accounts`]: `accounts/authinfo` and `{merchantId}/accounts/{accountId}`
//! - [`Products`]: insert, get and delete under `{merchantId}/products`
//!
//! The endpoint is chosen when the handle is built. [`ShoppingContent::with_endpoint`]
//! derives a handle for another endpoint (e.g. the sandbox) that shares the
//! transport and the authenticator.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopping_content::content::ShoppingContent;
//!
//! let service = ShoppingContent::new(client);
//! let info = service.accounts().authinfo().await?;
//!
//! let sandbox = service.with_endpoint(service.endpoint().sandbox().unwrap());
//! let product = sandbox.products().get(&merchant_id, "online:en:US:book-1").await?;
//! ```

mod accounts;
pub mod models;
mod products;

pub use accounts::Accounts;
pub use products::Products;

use crate::clients::HttpClient;
use crate::config::ServiceEndpoint;

/// A Content API handle bound to one endpoint.
#[derive(Clone, Debug)]
pub struct ShoppingContent {
    client: HttpClient,
}

// Verify ShoppingContent is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ShoppingContent>();
};

impl ShoppingContent {
    /// Creates a handle that sends requests through `client`.
    #[must_use]
    pub const fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Returns a handle for `endpoint` sharing this handle's transport and
    /// credentials.
    ///
    /// Applying the same endpoint twice yields the same handle.
    #[must_use]
    pub fn with_endpoint(&self, endpoint: ServiceEndpoint) -> Self {
        Self {
            client: self.client.with_endpoint(endpoint),
        }
    }

    /// Returns the endpoint requests are sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &ServiceEndpoint {
        self.client.endpoint()
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &HttpClient {
        &self.client
    }

    /// The `accounts` resource.
    #[must_use]
    pub const fn accounts(&self) -> Accounts<'_> {
        Accounts::new(&self.client)
    }

    /// The `products` resource.
    #[must_use]
    pub const fn products(&self) -> Products<'_> {
        Products::new(&self.client)
    }
}
