//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::config::ApiVersion;
use crate::error::ConfigError;

/// A validated Merchant Center account id.
///
/// The Content API transports 64-bit account ids as decimal strings, so the
/// id is kept as a string. It deserializes from either a JSON string or a
/// JSON number, since hand-written `merchant-info.json` files use both.
///
/// # Example
///
/// ```rust
/// use shopping_content::MerchantId;
///
/// let id = MerchantId::new("1234567").unwrap();
/// assert_eq!(id.as_ref(), "1234567");
///
/// let from_number: MerchantId = serde_json::from_str("1234567").unwrap();
/// assert_eq!(from_number, id);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MerchantId(String);

impl MerchantId {
    /// Creates a new validated merchant id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMerchantId`] if the id is empty or
    /// contains anything other than ASCII digits.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidMerchantId { id });
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for MerchantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MerchantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for MerchantId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MerchantId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MerchantIdVisitor;

        impl de::Visitor<'_> for MerchantIdVisitor {
            type Value = MerchantId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a merchant id as a string or unsigned integer")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                MerchantId::new(value.to_string()).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                MerchantId::new(value.to_string()).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                MerchantId::new(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MerchantIdVisitor)
    }
}

/// A Content API endpoint: a root URL plus a base path.
///
/// The root URL always ends with `/`; the base path is either empty or ends
/// with `/`. Request URLs are `root_url + base_path + resource path`.
///
/// # Example
///
/// ```rust
/// use shopping_content::ServiceEndpoint;
///
/// let endpoint = ServiceEndpoint::parse("http://localhost:8080/content/v2").unwrap();
/// assert_eq!(endpoint.root_url(), "http://localhost:8080/");
/// assert_eq!(endpoint.base_path(), "content/v2/");
///
/// let sandbox = endpoint.sandbox().unwrap();
/// assert_eq!(sandbox.base_path(), "content/v2sandbox/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEndpoint {
    root_url: String,
    base_path: String,
}

impl ServiceEndpoint {
    /// Default API host.
    pub const DEFAULT_ROOT_URL: &'static str = "https://www.googleapis.com/";

    const PRODUCTION_SEGMENT: &'static str = "v2";
    const SANDBOX_SEGMENT: &'static str = "v2sandbox";

    /// Parses an absolute endpoint URL.
    ///
    /// The scheme, host and (explicit, non-default) port form the root URL;
    /// the path, stripped of surrounding slashes, forms the base path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the URL cannot be parsed
    /// or lacks a scheme or host.
    pub fn parse(endpoint: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidEndpoint {
            url: endpoint.to_string(),
        };

        let url = url::Url::parse(endpoint.trim()).map_err(|_| invalid())?;
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(invalid)?;

        let mut root_url = format!("{}://{host}", url.scheme());
        if let Some(port) = url.port() {
            root_url.push_str(&format!(":{port}"));
        }
        root_url.push('/');

        Ok(Self::from_parts(root_url, url.path()))
    }

    /// Builds an endpoint from a root URL and a base path, normalizing the
    /// trailing slashes.
    #[must_use]
    pub fn from_parts(root_url: impl Into<String>, base_path: &str) -> Self {
        let mut root_url = root_url.into();
        if !root_url.ends_with('/') {
            root_url.push('/');
        }
        let trimmed = base_path.trim_matches('/');
        let base_path = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}/")
        };
        Self {
            root_url,
            base_path,
        }
    }

    /// Returns the compiled-in endpoint for an API version.
    #[must_use]
    pub fn default_for(version: &ApiVersion) -> Self {
        Self::from_parts(Self::DEFAULT_ROOT_URL, &format!("content/{version}"))
    }

    /// Returns the root URL (ends with `/`).
    #[must_use]
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// Returns the base path (empty or ends with `/`).
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the full URL for a resource path relative to the base path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.root_url,
            self.base_path,
            path.trim_start_matches('/')
        )
    }

    /// Derives the sandbox endpoint.
    ///
    /// When the last base-path segment is exactly `v2` it is replaced with
    /// `v2sandbox`. Returns `None` for any other base path, in which case
    /// sandbox calls have to share this endpoint.
    #[must_use]
    pub fn sandbox(&self) -> Option<Self> {
        let trimmed = self.base_path.trim_end_matches('/');
        let mut segments: Vec<&str> = trimmed.split('/').collect();
        if segments.last() != Some(&Self::PRODUCTION_SEGMENT) {
            return None;
        }
        segments.pop();
        segments.push(Self::SANDBOX_SEGMENT);
        Some(Self {
            root_url: self.root_url.clone(),
            base_path: format!("{}/", segments.join("/")),
        })
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root_url, self.base_path)
    }
}
