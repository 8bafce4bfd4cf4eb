//! Persistence of OAuth tokens in `stored-token.json`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::token::TokenResponse;
use crate::auth::AuthError;

/// The token file contents.
///
/// Field names follow the token endpoint response, plus `created` (Unix
/// seconds) so the file stays compatible with other Google client libraries.
/// Only `refresh_token` matters on load; a file holding nothing else is
/// valid.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    /// Last access token obtained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Long-lived refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Token type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Granted scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// When the access token was issued.
    #[serde(default)]
    pub created: i64,
}

impl StoredToken {
    /// Builds the file contents from a token endpoint response.
    #[must_use]
    pub fn from_response(response: &TokenResponse) -> Self {
        Self {
            access_token: Some(response.access_token.clone()),
            refresh_token: response.refresh_token.clone(),
            expires_in: response.expires_in,
            token_type: response.token_type.clone(),
            scope: response.scope.clone(),
            created: Utc::now().timestamp(),
        }
    }
}

impl std::fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredToken")
            .field("access_token", &self.access_token.as_ref().map(|_| "*****"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "*****"))
            .field("expires_in", &self.expires_in)
            .field("created", &self.created)
            .finish_non_exhaustive()
    }
}

/// Reads and writes the token file.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the token file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored token.
    ///
    /// A missing, unreadable or malformed file yields `None`: the caller
    /// then falls back on interactive authorization, which rewrites it.
    #[must_use]
    pub fn load(&self) -> Option<StoredToken> {
        if !self.path.exists() {
            return None;
        }
        tracing::info!("Loading stored token from '{}'.", self.path.display());

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Could not read {}: {e}", self.path.display());
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("Ignoring malformed token file {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Overwrites the token file with pretty-printed JSON.
    ///
    /// The file is written to a temporary sibling first and renamed into
    /// place. On Unix the temporary file is owner-only from the start.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenStore`] if the file cannot be written.
    pub fn save(&self, token: &StoredToken) -> Result<(), AuthError> {
        let store_error = |reason: String| AuthError::TokenStore {
            path: self.path.clone(),
            reason,
        };

        let content = serde_json::to_string_pretty(token).map_err(|e| store_error(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| store_error(e.to_string()))?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        write_owner_only(&temp_path, &content).map_err(|e| store_error(e.to_string()))?;
        fs::rename(&temp_path, &self.path).map_err(|e| store_error(e.to_string()))?;

        tracing::info!("Token saved to {}", self.path.display());
        Ok(())
    }
}

/// Writes `content` to a file only the owner can read.
///
/// On Unix the file is created with mode 0600, and an existing file is
/// narrowed to 0600 before anything is written to it.
#[cfg(unix)]
fn write_owner_only(path: &Path, content: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Could not restrict permissions of {}: {e}", path.display());
    }
    file.write_all(content.as_bytes())?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_owner_only(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, content)
}
