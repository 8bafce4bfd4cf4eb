//! The `products` resource.

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest};
use crate::config::MerchantId;
use crate::content::models::Product;

/// Calls on the `products` resource of one merchant.
///
/// Product ids are percent-encoded into the path, so `online:en:US:1`
/// becomes `online%3Aen%3AUS%3A1`.
#[derive(Clone, Copy, Debug)]
pub struct Products<'a> {
    client: &'a HttpClient,
}

impl<'a> Products<'a> {
    pub(crate) const fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Inserts (or replaces) a product.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn insert(
        self,
        merchant_id: &MerchantId,
        product: &Product,
    ) -> Result<Product, HttpError> {
        let body = serde_json::to_value(product)?;
        let request = HttpRequest::builder(HttpMethod::Post, format!("{merchant_id}/products"))
            .body(body)
            .build()?;
        self.client.request(request).await?.json()
    }

    /// Fetches a product by REST id.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn get(self, merchant_id: &MerchantId, product_id: &str) -> Result<Product, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, Self::path(merchant_id, product_id))
            .build()?;
        self.client.request(request).await?.json()
    }

    /// Deletes a product by REST id. A successful response has no body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn delete(self, merchant_id: &MerchantId, product_id: &str) -> Result<(), HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, Self::path(merchant_id, product_id))
            .build()?;
        self.client.request(request).await?;
        Ok(())
    }

    fn path(merchant_id: &MerchantId, product_id: &str) -> String {
        format!("{merchant_id}/products/{}", urlencoding::encode(product_id))
    }
}
