//! Mapping application product data onto the wire [`Product`].
//!
//! Applications describe their catalogue through [`ProductRecord`] and
//! [`PriceRecord`]; [`adapt`] copies those fields into a request body.

use crate::content::models::{Price, Product};

pub use crate::content::models::build_product_id;

/// Read-only view of an application's product.
///
/// The optional fields default to `None`.
pub trait ProductRecord: Send + Sync {
    /// Merchant-assigned identifier.
    fn offer_id(&self) -> &str;
    /// Title of the item.
    fn title(&self) -> &str;
    /// Description of the item.
    fn description(&self) -> &str;
    /// URL of the item's page.
    fn link(&self) -> &str;
    /// URL of the item's main image.
    fn image_link(&self) -> &str;
    /// Two-letter language code.
    fn content_language(&self) -> &str;
    /// Target country code.
    fn target_country(&self) -> &str;
    /// `online` or `local`.
    fn channel(&self) -> &str;
    /// Availability status.
    fn availability(&self) -> &str;
    /// Condition of the item.
    fn condition(&self) -> &str;

    /// Google's category of the item.
    fn google_product_category(&self) -> Option<&str> {
        None
    }

    /// Global Trade Item Number.
    fn gtin(&self) -> Option<&str> {
        None
    }

    /// The merchant's own category of the item.
    fn product_type(&self) -> Option<&str> {
        None
    }
}

/// Read-only view of an application's price.
pub trait PriceRecord: Send + Sync {
    /// Decimal amount, e.g. `"15.00"`.
    fn value(&self) -> &str;
    /// ISO 4217 currency code.
    fn currency(&self) -> &str;
}

/// Builds the wire product for `product`, attaching `price` when given.
///
/// A non-empty GTIN is copied over; otherwise `identifierExists` is set to
/// `false`. The two are never both set.
#[must_use]
pub fn adapt(product: &dyn ProductRecord, price: Option<&dyn PriceRecord>) -> Product {
    let gtin = product
        .gtin()
        .filter(|gtin| !gtin.is_empty())
        .map(String::from);
    let identifier_exists = if gtin.is_some() { None } else { Some(false) };

    Product {
        offer_id: Some(product.offer_id().to_string()),
        title: Some(product.title().to_string()),
        description: Some(product.description().to_string()),
        link: Some(product.link().to_string()),
        image_link: Some(product.image_link().to_string()),
        content_language: Some(product.content_language().to_string()),
        target_country: Some(product.target_country().to_string()),
        channel: Some(product.channel().to_string()),
        availability: Some(product.availability().to_string()),
        condition: Some(product.condition().to_string()),
        google_product_category: product.google_product_category().map(String::from),
        gtin,
        identifier_exists,
        product_type: product.product_type().map(String::from),
        price: price.map(|price| Price {
            value: Some(price.value().to_string()),
            currency: Some(price.currency().to_string()),
        }),
        ..Product::default()
    }
}
