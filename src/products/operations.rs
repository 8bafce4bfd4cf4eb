//! Product operations.
//!
//! Every operation implements [`ProductOperation`] and receives the session
//! as a parameter. Operations refuse to run on accounts without a website
//! URL.

use crate::content::models::Product;
use crate::error::ContentError;
use crate::products::outcome::{Diagnostic, OperationOutcome};
use crate::session::ContentSession;

/// Message of the error returned when the account has no website URL.
pub const MISSING_WEBSITE_MSG: &str =
    "Cannot run product workflow without a configured website URL.";

/// A single call on the `products` resource.
#[allow(async_fn_in_trait)]
pub trait ProductOperation {
    /// What a successful call yields.
    type Output;

    /// Name used in retry logs.
    const NAME: &'static str;

    /// Runs the operation against `session`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Precondition`] if the account has no website
    /// URL, and transport, authentication or retry errors as they occur.
    /// Rejections by the service are reported in the outcome instead.
    async fn run(
        &self,
        session: &ContentSession,
    ) -> Result<OperationOutcome<Self::Output>, ContentError>;
}

fn require_website_url(session: &ContentSession) -> Result<(), ContentError> {
    if session.website_url().is_none() {
        return Err(ContentError::precondition(MISSING_WEBSITE_MSG));
    }
    Ok(())
}

/// Inserts a product. Warnings attached to the stored product are reported
/// in the outcome.
#[derive(Clone, Debug)]
pub struct InsertProduct {
    /// The product to insert.
    pub product: Product,
}

impl ProductOperation for InsertProduct {
    type Output = Product;
    const NAME: &'static str = "products.insert";

    async fn run(&self, session: &ContentSession) -> Result<OperationOutcome<Product>, ContentError> {
        require_website_url(session)?;
        let result = session
            .execute(Self::NAME, || {
                session
                    .service()
                    .products()
                    .insert(session.merchant_id(), &self.product)
            })
            .await;

        let outcome = OperationOutcome::capture(result)?;
        let warnings: Vec<Diagnostic> = outcome
            .value
            .as_ref()
            .map(|product| product.warnings.iter().map(Diagnostic::from).collect())
            .unwrap_or_default();
        for warning in &warnings {
            tracing::warn!("{} {warning}", Self::NAME);
        }
        Ok(outcome.with_warnings(warnings))
    }
}

/// Fetches a product by REST id.
#[derive(Clone, Debug)]
pub struct GetProduct {
    /// `channel:contentLanguage:targetCountry:offerId`.
    pub product_id: String,
}

impl ProductOperation for GetProduct {
    type Output = Product;
    const NAME: &'static str = "products.get";

    async fn run(&self, session: &ContentSession) -> Result<OperationOutcome<Product>, ContentError> {
        require_website_url(session)?;
        let result = session
            .execute(Self::NAME, || {
                session
                    .service()
                    .products()
                    .get(session.merchant_id(), &self.product_id)
            })
            .await;
        OperationOutcome::capture(result)
    }
}

/// Deletes a product by REST id.
#[derive(Clone, Debug)]
pub struct DeleteProduct {
    /// `channel:contentLanguage:targetCountry:offerId`.
    pub product_id: String,
}

impl ProductOperation for DeleteProduct {
    type Output = ();
    const NAME: &'static str = "products.delete";

    async fn run(&self, session: &ContentSession) -> Result<OperationOutcome<()>, ContentError> {
        require_website_url(session)?;
        let result = session
            .execute(Self::NAME, || {
                session
                    .service()
                    .products()
                    .delete(session.merchant_id(), &self.product_id)
            })
            .await;
        OperationOutcome::capture(result)
    }
}
