//! Session bootstrap.
//!
//! A [`ContentSession`] holds everything product operations need: the
//! Merchant Center account to act on, whether it is a multi-client account
//! (MCA), its website URL and two API handles, one for production calls and
//! one for sandbox calls.
//!
//! # Bootstrap Steps
//!
//! 1. Load `merchant-info.json` (absent is fine, malformed is not)
//! 2. Resolve credentials (see [`CredentialResolver`])
//! 3. Build the primary handle on the configured or default endpoint
//! 4. Derive the sandbox handle (`.../v2/` becomes `.../v2sandbox/`)
//! 5. Ask `accounts/authinfo` which accounts the identity can reach
//! 6. Pick the merchant id and detect MCA status
//! 7. Read the account's website URL
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopping_content::auth::oauth::StdinPrompt;
//! use shopping_content::session::ContentSession;
//! use shopping_content::ContentConfig;
//!
//! let config = ContentConfig::from_env(Some("/home/me/shopping-samples"))?;
//! let session = ContentSession::open(&config, Arc::new(StdinPrompt)).await?;
//!
//! session.require_non_mca(None)?;
//! println!("Working on {}", session.merchant_id());
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::auth::oauth::AuthorizationPrompt;
use crate::auth::{CredentialResolver, CredentialSource};
use crate::clients::{build_transport, HttpClient, HttpError};
use crate::config::{ContentConfig, MerchantId, MerchantInfo};
use crate::content::models::AccountIdentifier;
use crate::content::ShoppingContent;
use crate::error::ContentError;
use crate::retry::{with_optional_retry, RetryPolicy};

/// Default message of [`ContentSession::require_mca`].
pub const MCA_MSG: &str = "This operation can only be run on multi-client accounts.";

/// Default message of [`ContentSession::require_non_mca`].
pub const NON_MCA_MSG: &str = "This operation cannot be run on multi-client accounts.";

/// Message of the error returned when `accounts/authinfo` lists nothing.
pub const NO_ACCOUNT_ACCESS_MSG: &str =
    "Authenticated user has no access to any Merchant Center accounts";

/// An authenticated session bound to one Merchant Center account.
///
/// The merchant id and MCA status are resolved once in [`ContentSession::open`]
/// and never change afterwards.
///
/// # Thread Safety
///
/// `ContentSession` is `Send + Sync`.
#[derive(Debug)]
pub struct ContentSession {
    merchant_id: MerchantId,
    is_mca: bool,
    website_url: Option<String>,
    service: ShoppingContent,
    sandbox_service: ShoppingContent,
    credential_source: CredentialSource,
    retry_policy: Option<RetryPolicy>,
}

// Verify ContentSession is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ContentSession>();
};

impl ContentSession {
    /// Opens a session.
    ///
    /// `prompt` is used only if interactive OAuth2 authorization is needed.
    ///
    /// # Errors
    ///
    /// - [`ContentError::Config`] for malformed configuration or credential
    ///   files, or when no credential source exists
    /// - [`ContentError::Auth`] if a token cannot be obtained
    /// - [`ContentError::Authorization`] if the identity has no Merchant
    ///   Center account
    /// - [`ContentError::Http`] / [`ContentError::RetryExhausted`] if the
    ///   account lookups fail
    pub async fn open(
        config: &ContentConfig,
        prompt: Arc<dyn AuthorizationPrompt>,
    ) -> Result<Self, ContentError> {
        let merchant_info = MerchantInfo::load(config.merchant_info_path().as_deref())?;

        let transport = build_transport()?;
        let resolved = CredentialResolver::new(config, prompt, transport.clone())
            .resolve()
            .await?;
        tracing::debug!("Authenticated with {}", resolved.source);

        let endpoint = config.endpoint();
        if config.endpoint_override().is_some() {
            tracing::info!("Using non-standard API endpoint: {endpoint}");
        }
        let sandbox_endpoint = endpoint.sandbox().unwrap_or_else(|| {
            tracing::warn!("Using same endpoint for sandbox methods.");
            endpoint.clone()
        });

        let client = HttpClient::new(
            transport,
            endpoint,
            Arc::new(resolved.authenticator),
            config.application_name(),
        );
        let service = ShoppingContent::new(client);
        let sandbox_service = service.with_endpoint(sandbox_endpoint);

        let retry_policy = config.retry_policy().cloned();

        tracing::info!("Retrieving account access information for authenticated user.");
        let auth_info = with_optional_retry(retry_policy.as_ref(), "accounts.authinfo", || {
            service.accounts().authinfo()
        })
        .await?;
        let identifiers = auth_info.account_identifiers;

        let configured = config
            .merchant_id()
            .or(merchant_info.merchant_id.as_ref());
        let merchant_id = resolve_merchant_id(configured, &identifiers)?;
        if configured.is_none() {
            tracing::info!("Running samples on Merchant Center {merchant_id}.");
        }

        let is_mca = detect_mca(&merchant_id, &identifiers);
        tracing::info!(
            "Merchant Center {merchant_id} is{} an MCA.",
            if is_mca { "" } else { " not" }
        );

        let account = with_optional_retry(retry_policy.as_ref(), "accounts.get", || {
            service.accounts().get(&merchant_id, &merchant_id)
        })
        .await?;
        let website_url = account.website_url;
        match &website_url {
            Some(url) => tracing::info!("Website for Merchant Center {merchant_id}: {url}"),
            None => tracing::info!("No website listed for Merchant Center {merchant_id}."),
        }

        Ok(Self {
            merchant_id,
            is_mca,
            website_url,
            service,
            sandbox_service,
            credential_source: resolved.source,
            retry_policy,
        })
    }

    /// Returns the Merchant Center account operations act on.
    #[must_use]
    pub const fn merchant_id(&self) -> &MerchantId {
        &self.merchant_id
    }

    /// Returns `true` if the account is a multi-client account.
    #[must_use]
    pub const fn is_mca(&self) -> bool {
        self.is_mca
    }

    /// Returns the account's website URL, if one is configured.
    #[must_use]
    pub fn website_url(&self) -> Option<&str> {
        self.website_url.as_deref()
    }

    /// Returns the production API handle.
    #[must_use]
    pub const fn service(&self) -> &ShoppingContent {
        &self.service
    }

    /// Returns the sandbox API handle.
    ///
    /// It targets the same endpoint as [`service`](Self::service) when no
    /// sandbox endpoint could be derived.
    #[must_use]
    pub const fn sandbox_service(&self) -> &ShoppingContent {
        &self.sandbox_service
    }

    /// Returns where the credentials came from.
    #[must_use]
    pub const fn credential_source(&self) -> &CredentialSource {
        &self.credential_source
    }

    /// Returns the retry policy applied to remote calls, if any.
    #[must_use]
    pub const fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.retry_policy.as_ref()
    }

    /// Fails unless the account is a multi-client account.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Precondition`] with `message`, or
    /// [`MCA_MSG`] when `None`.
    pub fn require_mca(&self, message: Option<&str>) -> Result<(), ContentError> {
        if self.is_mca {
            Ok(())
        } else {
            Err(ContentError::precondition(message.unwrap_or(MCA_MSG)))
        }
    }

    /// Fails if the account is a multi-client account.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Precondition`] with `message`, or
    /// [`NON_MCA_MSG`] when `None`.
    pub fn require_non_mca(&self, message: Option<&str>) -> Result<(), ContentError> {
        if self.is_mca {
            Err(ContentError::precondition(message.unwrap_or(NON_MCA_MSG)))
        } else {
            Ok(())
        }
    }

    /// Runs a remote call under the session's retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Http`] for permanent failures and
    /// [`ContentError::RetryExhausted`] when retries run out.
    pub async fn execute<T, F, Fut>(&self, operation_name: &str, operation: F) -> Result<T, ContentError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, HttpError>>,
    {
        Ok(with_optional_retry(self.retry_policy.as_ref(), operation_name, operation).await?)
    }
}

/// Picks the merchant id to operate on.
///
/// A configured id always wins. Otherwise the first identifier's merchant id
/// is used, or its aggregator id when it only grants aggregator access.
///
/// # Errors
///
/// Returns [`ContentError::Authorization`] if `identifiers` is empty, or if
/// the first identifier carries no id at all and nothing is configured.
pub fn resolve_merchant_id(
    configured: Option<&MerchantId>,
    identifiers: &[AccountIdentifier],
) -> Result<MerchantId, ContentError> {
    let Some(first) = identifiers.first() else {
        return Err(ContentError::Authorization {
            message: NO_ACCOUNT_ACCESS_MSG.to_string(),
        });
    };

    if let Some(id) = configured {
        return Ok(id.clone());
    }

    first
        .merchant_id
        .as_ref()
        .or(first.aggregator_id.as_ref())
        .cloned()
        .ok_or_else(|| ContentError::Authorization {
            message: NO_ACCOUNT_ACCESS_MSG.to_string(),
        })
}

/// Decides whether `merchant_id` is a multi-client account.
///
/// Identifiers are scanned in order. The first one whose aggregator id
/// matches makes the account an MCA; the first one whose own merchant id
/// matches ends the scan with a negative answer.
#[must_use]
pub fn detect_mca(merchant_id: &MerchantId, identifiers: &[AccountIdentifier]) -> bool {
    for identifier in identifiers {
        if identifier.aggregator_id.as_ref() == Some(merchant_id) {
            return true;
        }
        if identifier.merchant_id.as_ref() == Some(merchant_id) {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> MerchantId {
        MerchantId::new(value).unwrap()
    }

    fn merchant(value: &str) -> AccountIdentifier {
        AccountIdentifier {
            merchant_id: Some(id(value)),
            aggregator_id: None,
        }
    }

    fn aggregator(value: &str) -> AccountIdentifier {
        AccountIdentifier {
            merchant_id: None,
            aggregator_id: Some(id(value)),
        }
    }

    #[test]
    fn test_configured_merchant_id_wins() {
        let identifiers = vec![merchant("111"), aggregator("222")];
        let resolved = resolve_merchant_id(Some(&id("999")), &identifiers).unwrap();
        assert_eq!(resolved, id("999"));
    }

    #[test]
    fn test_first_merchant_id_is_used() {
        let identifiers = vec![merchant("111"), merchant("222")];
        assert_eq!(resolve_merchant_id(None, &identifiers).unwrap(), id("111"));
    }

    #[test]
    fn test_aggregator_only_identifier_falls_back_to_aggregator_id() {
        let identifiers = vec![aggregator("333"), merchant("111")];
        assert_eq!(resolve_merchant_id(None, &identifiers).unwrap(), id("333"));
    }

    #[test]
    fn test_no_identifiers_is_authorization_error() {
        let result = resolve_merchant_id(Some(&id("1")), &[]);
        assert!(matches!(
            result,
            Err(ContentError::Authorization { ref message }) if message == NO_ACCOUNT_ACCESS_MSG
        ));
    }

    #[test]
    fn test_identifier_without_ids_is_authorization_error() {
        let result = resolve_merchant_id(None, &[AccountIdentifier::default()]);
        assert!(matches!(result, Err(ContentError::Authorization { .. })));
    }

    #[test]
    fn test_mca_when_aggregator_matches() {
        let identifiers = vec![merchant("111"), aggregator("222")];
        assert!(detect_mca(&id("222"), &identifiers));
    }

    #[test]
    fn test_not_mca_when_own_merchant_match_comes_first() {
        let identifiers = vec![merchant("222"), aggregator("222")];
        assert!(!detect_mca(&id("222"), &identifiers));
    }

    #[test]
    fn test_same_identifier_checks_aggregator_first() {
        let identifiers = vec![AccountIdentifier {
            merchant_id: Some(id("222")),
            aggregator_id: Some(id("222")),
        }];
        assert!(detect_mca(&id("222"), &identifiers));
    }

    #[test]
    fn test_not_mca_without_any_match() {
        let identifiers = vec![merchant("111"), aggregator("333")];
        assert!(!detect_mca(&id("222"), &identifiers));
        assert!(!detect_mca(&id("222"), &[]));
    }
}
