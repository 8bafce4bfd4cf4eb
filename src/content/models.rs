//! Wire-level resources of the Content API.
//!
//! Field names serialize in camelCase and unset fields are omitted from
//! request bodies. Read-only fields (`id`, `warnings`) are never sent.

use serde::{Deserialize, Serialize};

use crate::clients::ErrorDetail;
use crate::config::MerchantId;

/// A product price.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// The price as a decimal string, e.g. `"15.00"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// ISO 4217 currency code, e.g. `"USD"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// A product in a Merchant Center account.
///
/// # Fields
///
/// ## Identity
/// - `channel`, `content_language`, `target_country`, `offer_id` together
///   make up the REST id (see [`Product::rest_id`])
///
/// ## Read-Only Fields
/// - `id` - The REST id assigned by the service
/// - `warnings` - Non-fatal issues reported for this item
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Resource kind, `content#product`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// The REST id of the product.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub id: Option<String>,

    /// Merchant-assigned identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,

    /// Title of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Description of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// URL directly linking to the item's page on the merchant's website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// URL of the item's main image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,

    /// Two-letter ISO 639-1 language code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_language: Option<String>,

    /// CLDR territory code of the target country.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_country: Option<String>,

    /// `online` or `local`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Availability status, e.g. `in stock`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,

    /// Condition, e.g. `new`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Google's category of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_product_category: Option<String>,

    /// Global Trade Item Number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtin: Option<String>,

    /// `false` when the item has no unique product identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_exists: Option<bool>,

    /// The merchant's own category of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,

    /// Price of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,

    /// Warnings reported for this item.
    /// Read-only field.
    #[serde(default, skip_serializing)]
    pub warnings: Vec<ErrorDetail>,
}

impl Product {
    /// Returns the REST id `channel:contentLanguage:targetCountry:offerId`.
    ///
    /// Unset parts render as empty strings.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shopping_content::content::models::Product;
    ///
    /// let product = Product {
    ///     channel: Some("online".to_string()),
    ///     content_language: Some("en".to_string()),
    ///     target_country: Some("US".to_string()),
    ///     offer_id: Some("book-1".to_string()),
    ///     ..Product::default()
    /// };
    /// assert_eq!(product.rest_id(), "online:en:US:book-1");
    /// ```
    #[must_use]
    pub fn rest_id(&self) -> String {
        build_product_id(
            self.channel.as_deref().unwrap_or_default(),
            self.content_language.as_deref().unwrap_or_default(),
            self.target_country.as_deref().unwrap_or_default(),
            self.offer_id.as_deref().unwrap_or_default(),
        )
    }
}

/// Builds a product REST id from its four parts.
///
/// # Example
///
/// ```rust
/// use shopping_content::content::models::build_product_id;
///
/// assert_eq!(build_product_id("ebay", "en", "US", "offer1"), "ebay:en:US:offer1");
/// ```
#[must_use]
pub fn build_product_id(
    channel: &str,
    content_language: &str,
    target_country: &str,
    offer_id: &str,
) -> String {
    format!("{channel}:{content_language}:{target_country}:{offer_id}")
}

/// A merchant/aggregator pair the authenticated user has access to.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountIdentifier {
    /// Set for direct access to a standalone or sub-account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<MerchantId>,

    /// Set when access goes through a multi-client account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregator_id: Option<MerchantId>,
}

/// Response of `accounts/authinfo`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountsAuthInfoResponse {
    /// Resource kind, `content#accountsAuthInfoResponse`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Accounts the authenticated user can access.
    #[serde(default)]
    pub account_identifiers: Vec<AccountIdentifier>,
}

/// A Merchant Center account.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Merchant Center account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MerchantId>,

    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The merchant's website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_serializes_camel_case_without_unset_fields() {
        let product = Product {
            offer_id: Some("book-1".to_string()),
            image_link: Some("https://example.com/1.jpg".to_string()),
            identifier_exists: Some(false),
            price: Some(Price {
                value: Some("2.50".to_string()),
                currency: Some("USD".to_string()),
            }),
            ..Product::default()
        };

        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            json!({
                "offerId": "book-1",
                "imageLink": "https://example.com/1.jpg",
                "identifierExists": false,
                "price": {"value": "2.50", "currency": "USD"}
            })
        );
    }

    #[test]
    fn test_read_only_fields_are_not_sent() {
        let product = Product {
            id: Some("online:en:US:book-1".to_string()),
            warnings: vec![ErrorDetail::default()],
            ..Product::default()
        };

        assert_eq!(serde_json::to_value(&product).unwrap(), json!({}));
    }

    #[test]
    fn test_product_deserializes_warnings() {
        let product: Product = serde_json::from_value(json!({
            "kind": "content#product",
            "id": "online:en:US:book-1",
            "offerId": "book-1",
            "warnings": [{"domain": "content.ContentErrorDomain", "reason": "validation/missing_recommended", "message": "Missing brand"}]
        }))
        .unwrap();

        assert_eq!(product.id.as_deref(), Some("online:en:US:book-1"));
        assert_eq!(product.warnings.len(), 1);
        assert_eq!(product.warnings[0].message.as_deref(), Some("Missing brand"));
    }

    #[test]
    fn test_rest_id_of_empty_product() {
        assert_eq!(Product::default().rest_id(), ":::");
    }

    #[test]
    fn test_auth_info_accepts_string_and_numeric_ids() {
        let response: AccountsAuthInfoResponse = serde_json::from_value(json!({
            "kind": "content#accountsAuthInfoResponse",
            "accountIdentifiers": [
                {"merchantId": "123"},
                {"aggregatorId": 456, "merchantId": "789"}
            ]
        }))
        .unwrap();

        let ids = &response.account_identifiers;
        assert_eq!(ids[0].merchant_id.as_ref().unwrap().as_ref(), "123");
        assert!(ids[0].aggregator_id.is_none());
        assert_eq!(ids[1].aggregator_id.as_ref().unwrap().as_ref(), "456");
    }

    #[test]
    fn test_auth_info_without_identifiers() {
        let response: AccountsAuthInfoResponse =
            serde_json::from_value(json!({"kind": "content#accountsAuthInfoResponse"})).unwrap();
        assert!(response.account_identifiers.is_empty());
    }

    #[test]
    fn test_account_website_url_is_optional() {
        let account: Account = serde_json::from_value(json!({"id": "123", "name": "Shop"})).unwrap();
        assert!(account.website_url.is_none());
    }
}
