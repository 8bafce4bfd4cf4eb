//! Results of product operations.

use std::fmt;

use crate::clients::{ErrorDetail, HttpError, HttpResponseError};
use crate::error::ContentError;

/// A warning or error reported by the service for one item.
///
/// # Example
///
/// ```rust
/// use shopping_content::products::Diagnostic;
///
/// let warning = Diagnostic::new("validation/missing_recommended", "Missing brand");
/// assert_eq!(warning.to_string(), "[validation/missing_recommended] Missing brand");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostic {
    /// Machine-readable reason.
    pub reason: String,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.reason, self.message)
    }
}

impl From<&ErrorDetail> for Diagnostic {
    fn from(detail: &ErrorDetail) -> Self {
        Self {
            reason: detail.reason.clone().unwrap_or_default(),
            message: detail.message.clone().unwrap_or_default(),
        }
    }
}

/// What a product operation produced, together with the service's
/// diagnostics.
///
/// `value` is `None` whenever `errors` is non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationOutcome<T> {
    /// The operation's result, absent when the service rejected the call.
    pub value: Option<T>,
    /// Non-fatal issues.
    pub warnings: Vec<Diagnostic>,
    /// Reasons the service rejected the call.
    pub errors: Vec<Diagnostic>,
}

impl<T> OperationOutcome<T> {
    /// A successful outcome without diagnostics.
    #[must_use]
    pub const fn success(value: T) -> Self {
        Self {
            value: Some(value),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// An outcome for a call the service rejected.
    ///
    /// Each entry of the error envelope becomes one diagnostic. A response
    /// without entries yields a single diagnostic carrying the status code as
    /// reason.
    #[must_use]
    pub fn rejected(error: &HttpResponseError) -> Self {
        let mut errors: Vec<Diagnostic> = error.errors.iter().map(Diagnostic::from).collect();
        if errors.is_empty() {
            errors.push(Diagnostic::new(error.code.to_string(), error.message.clone()));
        }
        Self {
            value: None,
            warnings: Vec::new(),
            errors,
        }
    }

    /// Replaces the warnings.
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<Diagnostic>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Returns `true` if the service reported no errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` if the service reported warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Turns a call result into an outcome.
    ///
    /// Error responses from the service become a rejected outcome; every
    /// other failure is passed through.
    ///
    /// # Errors
    ///
    /// Returns `result`'s error unless it is a [`HttpError::Response`].
    pub fn capture(result: Result<T, ContentError>) -> Result<Self, ContentError> {
        match result {
            Ok(value) => Ok(Self::success(value)),
            Err(ContentError::Http(HttpError::Response(error))) => Ok(Self::rejected(&error)),
            Err(error) => Err(error),
        }
    }
}
