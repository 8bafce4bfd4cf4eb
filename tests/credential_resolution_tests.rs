//! Integration tests for credential discovery.
//!
//! These tests lay out configuration directories on disk and point the OAuth
//! token endpoint at a mock server to verify the order in which credential
//! sources are tried and what gets persisted.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use shopping_content::auth::oauth::AuthorizationPrompt;
use shopping_content::auth::{
    AuthError, CredentialResolver, CredentialSource, Credentials, StoredToken,
};
use shopping_content::{ConfigError, ContentConfig};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRIVATE_KEY: &str = include_str!("fixtures/service_account_key.pem");

/// Prompt that answers with a fixed code and records what it was shown.
struct FixedCodePrompt {
    code: Result<String, String>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl FixedCodePrompt {
    fn answering(code: &str) -> Arc<Self> {
        Arc::new(Self {
            code: Ok(code.to_string()),
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            code: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AuthorizationPrompt for FixedCodePrompt {
    fn request_code(&self, authorization_url: &str) -> Result<String, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(authorization_url.to_string());
        self.code
            .clone()
            .map_err(|reason| AuthError::Prompt { reason })
    }
}

/// Creates `<root>/content` and returns it.
fn content_dir(root: &Path) -> PathBuf {
    let dir = root.join("content");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_json(path: &Path, value: &serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn write_client_secrets(dir: &Path, token_uri: &str) {
    write_json(
        &dir.join("client-secrets.json"),
        &json!({
            "installed": {
                "client_id": "client-123.apps.googleusercontent.com",
                "client_secret": "secret-456",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": token_uri
            }
        }),
    );
}

fn write_service_account(dir: &Path, token_uri: &str) {
    write_json(
        &dir.join("service-account.json"),
        &json!({
            "type": "service_account",
            "client_email": "samples@project.iam.gserviceaccount.com",
            "private_key_id": "key-1",
            "private_key": PRIVATE_KEY,
            "token_uri": token_uri
        }),
    );
}

fn config_for(root: &Path) -> ContentConfig {
    ContentConfig::builder()
        .config_path(root)
        .application_default_credentials(None)
        .retry_policy(None)
        .build()
}

async fn token_server() -> MockServer {
    MockServer::start().await
}

// ============================================================================
// Precedence
// ============================================================================

#[tokio::test]
async fn test_service_account_file_wins_over_oauth_client() {
    let server = token_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let dir = content_dir(root.path());
    let token_uri = format!("{}/token", server.uri());
    write_service_account(&dir, &token_uri);
    write_client_secrets(&dir, &token_uri);

    let prompt = FixedCodePrompt::answering("unused");
    let config = config_for(root.path());
    let resolved = CredentialResolver::new(&config, prompt.clone(), reqwest::Client::new())
        .resolve()
        .await
        .unwrap();

    assert_eq!(
        resolved.source,
        CredentialSource::ServiceAccountFile(dir.join("service-account.json"))
    );
    assert!(matches!(
        resolved.authenticator.credentials(),
        Credentials::ServiceAccount(key) if key.client_email == "samples@project.iam.gserviceaccount.com"
    ));
    assert_eq!(prompt.calls(), 0);
    assert!(!dir.join("stored-token.json").exists());
}

#[tokio::test]
async fn test_application_default_credentials_come_first() {
    let root = tempfile::tempdir().unwrap();
    let dir = content_dir(root.path());
    write_service_account(&dir, "https://oauth2.googleapis.com/token");

    let adc = root.path().join("application_default_credentials.json");
    write_json(
        &adc,
        &json!({
            "type": "authorized_user",
            "client_id": "gcloud-client",
            "client_secret": "gcloud-secret",
            "refresh_token": "1//adc"
        }),
    );

    let config = ContentConfig::builder()
        .config_path(root.path())
        .application_default_credentials(Some(adc.clone()))
        .build();
    let resolved = CredentialResolver::new(
        &config,
        FixedCodePrompt::answering("unused"),
        reqwest::Client::new(),
    )
    .resolve()
    .await
    .unwrap();

    assert_eq!(resolved.source, CredentialSource::ApplicationDefault(adc));
}

#[tokio::test]
async fn test_missing_application_default_file_falls_through() {
    let root = tempfile::tempdir().unwrap();
    let dir = content_dir(root.path());
    write_service_account(&dir, "https://oauth2.googleapis.com/token");

    let config = ContentConfig::builder()
        .config_path(root.path())
        .application_default_credentials(Some(root.path().join("missing.json")))
        .build();
    let resolved = CredentialResolver::new(
        &config,
        FixedCodePrompt::answering("unused"),
        reqwest::Client::new(),
    )
    .resolve()
    .await
    .unwrap();

    assert!(matches!(
        resolved.source,
        CredentialSource::ServiceAccountFile(_)
    ));
}

// ============================================================================
// OAuth2 client file
// ============================================================================

#[tokio::test]
async fn test_stored_refresh_token_is_exchanged() {
    let server = token_server().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=stored-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "refreshed-access",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let dir = content_dir(root.path());
    write_client_secrets(&dir, &format!("{}/token", server.uri()));
    write_json(
        &dir.join("stored-token.json"),
        &json!({
            "access_token": "old-access",
            "refresh_token": "stored-refresh",
            "expires_in": 3600,
            "created": 0
        }),
    );

    let prompt = FixedCodePrompt::answering("unused");
    let config = config_for(root.path());
    let resolved = CredentialResolver::new(&config, prompt.clone(), reqwest::Client::new())
        .resolve()
        .await
        .unwrap();

    assert_eq!(
        resolved.source,
        CredentialSource::OAuthClientFile {
            path: dir.join("client-secrets.json"),
            interactive: false,
        }
    );
    assert_eq!(prompt.calls(), 0);
    // The refreshed token is cached; no second token request.
    assert_eq!(
        resolved.authenticator.access_token().await.unwrap(),
        "refreshed-access"
    );
}

#[tokio::test]
async fn test_refresh_only_token_file_is_exchanged() {
    let server = token_server().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=stored-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "refreshed-access",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let dir = content_dir(root.path());
    write_client_secrets(&dir, &format!("{}/token", server.uri()));
    write_json(
        &dir.join("stored-token.json"),
        &json!({"refresh_token": "stored-refresh"}),
    );

    let prompt = FixedCodePrompt::answering("unused");
    let config = config_for(root.path());
    let resolved = CredentialResolver::new(&config, prompt.clone(), reqwest::Client::new())
        .resolve()
        .await
        .unwrap();

    assert!(matches!(
        resolved.source,
        CredentialSource::OAuthClientFile { interactive: false, .. }
    ));
    assert_eq!(prompt.calls(), 0);
    assert_eq!(
        resolved.authenticator.access_token().await.unwrap(),
        "refreshed-access"
    );
}

#[tokio::test]
async fn test_failed_refresh_falls_back_to_interactive_flow() {
    let server = token_server().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=pasted-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "interactive-access",
            "refresh_token": "new-refresh",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let dir = content_dir(root.path());
    write_client_secrets(&dir, &format!("{}/token", server.uri()));
    write_json(
        &dir.join("stored-token.json"),
        &json!({"access_token": "old", "refresh_token": "revoked"}),
    );

    let prompt = FixedCodePrompt::answering("pasted-code");
    let config = config_for(root.path());
    let resolved = CredentialResolver::new(&config, prompt.clone(), reqwest::Client::new())
        .resolve()
        .await
        .unwrap();

    assert!(matches!(
        resolved.source,
        CredentialSource::OAuthClientFile { interactive: true, .. }
    ));
    assert_eq!(prompt.calls(), 1);

    let url = prompt.urls.lock().unwrap()[0].clone();
    assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
    assert!(url.contains("client_id=client-123.apps.googleusercontent.com"));
    assert!(url.contains("access_type=offline"));

    let stored: StoredToken = serde_json::from_str(
        &std::fs::read_to_string(dir.join("stored-token.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(stored.access_token.as_deref(), Some("interactive-access"));
    assert_eq!(stored.refresh_token.as_deref(), Some("new-refresh"));
}

#[tokio::test]
async fn test_missing_token_file_starts_interactive_flow() {
    let server = token_server().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "first-access",
            "refresh_token": "first-refresh",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let dir = content_dir(root.path());
    write_client_secrets(&dir, &format!("{}/token", server.uri()));

    let prompt = FixedCodePrompt::answering("first-code");
    let config = config_for(root.path());
    let resolved = CredentialResolver::new(&config, prompt.clone(), reqwest::Client::new())
        .resolve()
        .await
        .unwrap();

    assert_eq!(prompt.calls(), 1);
    assert_eq!(
        resolved.authenticator.access_token().await.unwrap(),
        "first-access"
    );
    assert!(dir.join("stored-token.json").exists());
}

#[tokio::test]
async fn test_prompt_failure_is_reported() {
    let root = tempfile::tempdir().unwrap();
    let dir = content_dir(root.path());
    write_client_secrets(&dir, "http://127.0.0.1:9/token");

    let config = config_for(root.path());
    let result = CredentialResolver::new(
        &config,
        FixedCodePrompt::failing("stdin closed"),
        reqwest::Client::new(),
    )
    .resolve()
    .await;

    assert!(matches!(result, Err(AuthError::Prompt { ref reason }) if reason == "stdin closed"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_no_credential_files_names_both_paths() {
    let root = tempfile::tempdir().unwrap();
    let dir = content_dir(root.path());

    let config = config_for(root.path());
    let result = CredentialResolver::new(
        &config,
        FixedCodePrompt::answering("unused"),
        reqwest::Client::new(),
    )
    .resolve()
    .await;

    match result {
        Err(AuthError::Config(ConfigError::MissingCredentials {
            service_account,
            oauth_client,
        })) => {
            assert_eq!(service_account, dir.join("service-account.json"));
            assert_eq!(oauth_client, dir.join("client-secrets.json"));
        }
        other => panic!("expected MissingCredentials, got {other:?}"),
    }
}

#[tokio::test]
async fn test_without_config_path_only_application_default_is_possible() {
    let config = ContentConfig::builder()
        .application_default_credentials(None)
        .build();
    let result = CredentialResolver::new(
        &config,
        FixedCodePrompt::answering("unused"),
        reqwest::Client::new(),
    )
    .resolve()
    .await;

    assert!(matches!(
        result,
        Err(AuthError::Config(ConfigError::MissingConfigDirectory))
    ));
}

#[tokio::test]
async fn test_malformed_service_account_file_is_config_error() {
    let root = tempfile::tempdir().unwrap();
    let dir = content_dir(root.path());
    std::fs::write(dir.join("service-account.json"), "{not json").unwrap();

    let config = config_for(root.path());
    let result = CredentialResolver::new(
        &config,
        FixedCodePrompt::answering("unused"),
        reqwest::Client::new(),
    )
    .resolve()
    .await;

    assert!(matches!(result, Err(AuthError::Config(_))));
}
