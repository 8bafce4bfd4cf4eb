//! The OAuth2 client file, `client-secrets.json`.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::auth::token::DEFAULT_TOKEN_URI;
use crate::error::ConfigError;

/// Default Google consent page.
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// An OAuth2 installed-application client.
///
/// The client secret is hidden from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthClient {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Consent page URL.
    pub auth_uri: String,
    /// Token endpoint URL.
    pub token_uri: String,
}

/// Accepted layouts: the Cloud Console download with an `installed` or `web`
/// section, or the flat form with the fields at the root.
#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSection>,
    web: Option<ClientSection>,
    client_id: Option<String>,
    client_secret: Option<String>,
    auth_uri: Option<String>,
    token_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSection {
    client_id: String,
    client_secret: String,
    auth_uri: Option<String>,
    token_uri: Option<String>,
}

impl OAuthClient {
    /// Creates a client against the default Google endpoints.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_uri: DEFAULT_AUTH_URI.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
        }
    }

    /// Loads a client file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::InvalidCredentialsFile`] if it holds no client.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, &e))?;
        Self::from_json(&content).map_err(|reason| ConfigError::InvalidCredentialsFile {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parses a client file's contents.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the JSON is invalid or
    /// contains neither an `installed`/`web` section nor root-level
    /// `client_id`/`client_secret`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shopping_content::auth::oauth::OAuthClient;
    ///
    /// let client = OAuthClient::from_json(
    ///     r#"{"installed": {"client_id": "id", "client_secret": "secret"}}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(client.client_id, "id");
    /// assert_eq!(client.token_uri, "https://oauth2.googleapis.com/token");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, String> {
        let file: ClientSecretsFile = serde_json::from_str(json)
            .map_err(|e| format!("failed to parse client secrets JSON: {e}"))?;

        let (client_id, client_secret, auth_uri, token_uri) =
            if let Some(section) = file.installed.or(file.web) {
                (
                    section.client_id,
                    section.client_secret,
                    section.auth_uri,
                    section.token_uri,
                )
            } else if let (Some(client_id), Some(client_secret)) =
                (file.client_id, file.client_secret)
            {
                (client_id, client_secret, file.auth_uri, file.token_uri)
            } else {
                return Err("client secrets must contain an 'installed'/'web' section or 'client_id'/'client_secret' at root level".to_string());
            };

        if client_id.trim().is_empty() {
            return Err("client_id must not be empty".to_string());
        }

        let mut client = Self::new(client_id, client_secret);
        if let Some(auth_uri) = auth_uri {
            client.auth_uri = auth_uri;
        }
        if let Some(token_uri) = token_uri {
            client.token_uri = token_uri;
        }
        Ok(client)
    }
}

impl fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClient")
            .field("client_id", &self.client_id)
            .field("client_secret", &"*****")
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_section_with_endpoints() {
        let json = r#"{
            "installed": {
                "client_id": "123.apps.googleusercontent.com",
                "client_secret": "s3cret",
                "auth_uri": "https://auth.example.com/o/oauth2/auth",
                "token_uri": "https://auth.example.com/token",
                "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob", "http://localhost"]
            }
        }"#;

        let client = OAuthClient::from_json(json).unwrap();
        assert_eq!(client.client_id, "123.apps.googleusercontent.com");
        assert_eq!(client.client_secret, "s3cret");
        assert_eq!(client.auth_uri, "https://auth.example.com/o/oauth2/auth");
        assert_eq!(client.token_uri, "https://auth.example.com/token");
    }

    #[test]
    fn test_web_section() {
        let json = r#"{"web": {"client_id": "web-id", "client_secret": "web-secret"}}"#;
        let client = OAuthClient::from_json(json).unwrap();
        assert_eq!(client.client_id, "web-id");
        assert_eq!(client.auth_uri, DEFAULT_AUTH_URI);
    }

    #[test]
    fn test_flat_format() {
        let json = r#"{"client_id": "flat-id", "client_secret": "flat-secret"}"#;
        let client = OAuthClient::from_json(json).unwrap();
        assert_eq!(client.client_id, "flat-id");
        assert_eq!(client.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_missing_client_is_rejected() {
        assert!(OAuthClient::from_json(r#"{"project_id": "p"}"#).is_err());
        assert!(OAuthClient::from_json("not json").is_err());
        assert!(OAuthClient::from_json(r#"{"client_id": "", "client_secret": "s"}"#).is_err());
    }

    #[test]
    fn test_from_file_wraps_errors() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("client-secrets.json");
        std::fs::write(&file, "{}").unwrap();

        assert!(matches!(
            OAuthClient::from_file(&file),
            Err(ConfigError::InvalidCredentialsFile { .. })
        ));
        assert!(matches!(
            OAuthClient::from_file(&dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", OAuthClient::new("id", "very-secret"));
        assert!(!debug.contains("very-secret"));
    }
}
