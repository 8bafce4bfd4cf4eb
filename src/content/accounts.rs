//! The `accounts` resource.

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest};
use crate::config::MerchantId;
use crate::content::models::{Account, AccountsAuthInfoResponse};

/// Calls on the `accounts` resource.
#[derive(Clone, Copy, Debug)]
pub struct Accounts<'a> {
    client: &'a HttpClient,
}

impl<'a> Accounts<'a> {
    pub(crate) const fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Lists the accounts the authenticated user can access.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn authinfo(self) -> Result<AccountsAuthInfoResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, "accounts/authinfo").build()?;
        self.client.request(request).await?.json()
    }

    /// Fetches an account through the account `merchant_id`.
    ///
    /// For standalone accounts both ids are the same.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn get(
        self,
        merchant_id: &MerchantId,
        account_id: &MerchantId,
    ) -> Result<Account, HttpError> {
        let path = format!("{merchant_id}/accounts/{account_id}");
        let request = HttpRequest::builder(HttpMethod::Get, path).build()?;
        self.client.request(request).await?.json()
    }
}
