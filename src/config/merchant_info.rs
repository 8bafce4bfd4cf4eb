//! The optional `merchant-info.json` file.

use std::path::Path;

use serde::Deserialize;

use crate::config::MerchantId;
use crate::error::ConfigError;

/// Contents of `merchant-info.json`.
///
/// Only `merchantId` is interpreted; other keys are ignored so the samples'
/// template file can be used unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantInfo {
    /// Merchant Center account to operate on.
    #[serde(default)]
    pub merchant_id: Option<MerchantId>,
}

impl MerchantInfo {
    /// Loads the file at `path`.
    ///
    /// A missing file (or no path at all) yields an empty `MerchantInfo`,
    /// and the session falls back on the authenticated user's accounts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfigFile`] if the file exists but is
    /// not a valid JSON object, and [`ConfigError::Io`] if it cannot be read.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path.filter(|path| path.exists()) else {
            match path {
                Some(path) => tracing::info!(
                    "No configuration file found at {}. Falling back on configuration based on authenticated user.",
                    path.display()
                ),
                None => tracing::info!(
                    "No configuration directory given. Falling back on configuration based on authenticated user."
                ),
            }
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, &e))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
