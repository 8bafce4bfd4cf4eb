//! Product workflow.
//!
//! This module turns application product data into Content API calls.
//!
//! # Overview
//!
//! - [`ProductRecord`] / [`PriceRecord`]: What an application implements
//! - [`adapt`]: Builds the wire [`Product`] from those records
//! - [`ProductOperation`]: [`InsertProduct`], [`GetProduct`], [`DeleteProduct`]
//! - [`OperationOutcome`]: The result plus the service's [`Diagnostic`]s
//! - [`GoogleShopping`]: Opens a session on first use and runs operations
//!
//! # Example
//!
//! ```rust,ignore
//! use shopping_content::products::GoogleShopping;
//! use shopping_content::ContentConfig;
//!
//! let mut shopping = GoogleShopping::new(ContentConfig::from_env(Some("/home/me/samples"))?);
//!
//! let outcome = shopping.send_product(&book, &price).await?;
//! if !outcome.is_success() {
//!     for error in shopping.errors() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```

mod adapter;
mod operations;
mod outcome;

pub use adapter::{adapt, build_product_id, PriceRecord, ProductRecord};
pub use operations::{
    DeleteProduct, GetProduct, InsertProduct, ProductOperation, MISSING_WEBSITE_MSG,
};
pub use outcome::{Diagnostic, OperationOutcome};

use std::fmt;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::auth::oauth::{AuthorizationPrompt, StdinPrompt};
use crate::config::ContentConfig;
use crate::content::models::Product;
use crate::error::ContentError;
use crate::session::ContentSession;

/// Insert, get and delete products on the configured Merchant Center
/// account.
///
/// The session is opened on the first call and reused afterwards. If opening
/// fails, the next call tries again.
///
/// After each call [`warnings`](Self::warnings) and [`errors`](Self::errors)
/// hold that call's diagnostics; earlier ones are discarded.
pub struct GoogleShopping {
    config: ContentConfig,
    prompt: Arc<dyn AuthorizationPrompt>,
    session: OnceCell<ContentSession>,
    warnings: Vec<Diagnostic>,
    errors: Vec<Diagnostic>,
}

impl fmt::Debug for GoogleShopping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleShopping")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("warnings", &self.warnings)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl GoogleShopping {
    /// Creates a facade that asks for OAuth2 codes on standard input.
    #[must_use]
    pub fn new(config: ContentConfig) -> Self {
        Self::with_prompt(config, Arc::new(StdinPrompt))
    }

    /// Creates a facade with a custom authorization prompt.
    #[must_use]
    pub fn with_prompt(config: ContentConfig, prompt: Arc<dyn AuthorizationPrompt>) -> Self {
        Self {
            config,
            prompt,
            session: OnceCell::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Returns the session, opening it if needed.
    ///
    /// # Errors
    ///
    /// Returns the error of [`ContentSession::open`].
    pub async fn session(&self) -> Result<&ContentSession, ContentError> {
        self.session
            .get_or_try_init(|| ContentSession::open(&self.config, Arc::clone(&self.prompt)))
            .await
    }

    /// Inserts `product` with `price`.
    ///
    /// # Errors
    ///
    /// See [`ProductOperation::run`]; session bootstrap errors are returned
    /// as well.
    pub async fn send_product(
        &mut self,
        product: &dyn ProductRecord,
        price: &dyn PriceRecord,
    ) -> Result<OperationOutcome<Product>, ContentError> {
        let operation = InsertProduct {
            product: adapt(product, Some(price)),
        };
        self.perform(&operation).await
    }

    /// Fetches the stored version of `product`.
    ///
    /// # Errors
    ///
    /// See [`send_product`](Self::send_product).
    pub async fn retrieve_product(
        &mut self,
        product: &dyn ProductRecord,
    ) -> Result<OperationOutcome<Product>, ContentError> {
        let operation = GetProduct {
            product_id: adapt(product, None).rest_id(),
        };
        self.perform(&operation).await
    }

    /// Deletes `product`.
    ///
    /// # Errors
    ///
    /// See [`send_product`](Self::send_product).
    pub async fn remove_product(
        &mut self,
        product: &dyn ProductRecord,
    ) -> Result<OperationOutcome<()>, ContentError> {
        let operation = DeleteProduct {
            product_id: adapt(product, None).rest_id(),
        };
        self.perform(&operation).await
    }

    /// Warnings of the most recent call.
    #[must_use]
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Errors of the most recent call.
    #[must_use]
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    async fn perform<O: ProductOperation>(
        &mut self,
        operation: &O,
    ) -> Result<OperationOutcome<O::Output>, ContentError> {
        let result = match self.session().await {
            Ok(session) => operation.run(session).await,
            Err(error) => Err(error),
        };

        match &result {
            Ok(outcome) => {
                self.warnings.clone_from(&outcome.warnings);
                self.errors.clone_from(&outcome.errors);
            }
            Err(_) => {
                self.warnings.clear();
                self.errors.clear();
            }
        }
        result
    }
}
