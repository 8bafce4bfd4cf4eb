//! Content API version definitions.
//!
//! This module provides the [`ApiVersion`] enum for specifying which version
//! of the Content API for Shopping to target.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Content API version.
///
/// `v2` is the default because it is the only version with a parallel
/// `v2sandbox` surface; sandbox handles built against `v2.1` share the
/// production endpoint.
///
/// # Example
///
/// ```rust
/// use shopping_content::ApiVersion;
///
/// let version: ApiVersion = "v2.1".parse().unwrap();
/// assert_eq!(version, ApiVersion::V2_1);
/// assert_eq!(ApiVersion::default().to_string(), "v2");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// Content API v2, with a `v2sandbox` mirror.
    #[default]
    V2,
    /// Content API v2.1.
    V2_1,
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version_str = match self {
            Self::V2 => "v2",
            Self::V2_1 => "v2.1",
        };
        f.write_str(version_str)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "v2" | "2" => Ok(Self::V2),
            "v2.1" | "2.1" => Ok(Self::V2_1),
            _ => Err(ConfigError::InvalidApiVersion { version: s }),
        }
    }
}
