//! Checkout: exchanging products for download links.
//!
//! The marketplace sells one product per checkout call. A cart with several
//! lines is bought line by line, in cart order, stopping at the first
//! failure. Lines that were bought leave the cart; the rest stay.

use tracing::instrument;

use digishelf_core::ProductId;

use crate::api::{ApiError, Bearer, MarketplaceClient};
use crate::services::cart::CartStore;

/// Message shown when the backend gives no reason for a failed checkout.
pub const CHECKOUT_FALLBACK_MESSAGE: &str = "Checkout error";

/// A bought product and where to download it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub product_id: ProductId,
    pub title: String,
    pub url: String,
}

/// Result of checking out a cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// Products bought, in cart order.
    pub downloads: Vec<Download>,
    /// Why checkout stopped early, if it did.
    pub error: Option<String>,
}

impl CheckoutOutcome {
    /// The single download link when exactly one product was bought and
    /// nothing failed.
    #[must_use]
    pub fn sole_download(&self) -> Option<&str> {
        match (self.downloads.as_slice(), &self.error) {
            ([only], None) => Some(only.url.as_str()),
            _ => None,
        }
    }
}

/// Checkout service for one signed-in visitor.
pub struct CheckoutService<'a> {
    api: &'a MarketplaceClient,
    bearer: Bearer,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(api: &'a MarketplaceClient, bearer: Bearer) -> Self {
        Self { api, bearer }
    }

    /// Buy one product and return its download link.
    ///
    /// # Errors
    ///
    /// Returns the backend's message verbatim when it sent one, otherwise
    /// [`CHECKOUT_FALLBACK_MESSAGE`].
    #[instrument(skip(self))]
    pub async fn buy(&self, product_id: ProductId) -> Result<String, String> {
        self.api
            .checkout(&self.bearer, product_id)
            .await
            .map_err(|e| failure_message(&e))
    }

    /// Buy every line in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session cannot be written; checkout
    /// failures are reported in [`CheckoutOutcome::error`].
    #[instrument(skip(self, cart))]
    pub async fn buy_cart(
        &self,
        cart: &CartStore<'_>,
    ) -> Result<CheckoutOutcome, tower_sessions::session::Error> {
        let mut remaining = cart.load().await;
        let mut outcome = CheckoutOutcome::default();

        let lines = remaining.lines().to_vec();
        for line in lines {
            match self.buy(line.product.id).await {
                Ok(url) => {
                    remaining.remove(line.product.id);
                    outcome.downloads.push(Download {
                        product_id: line.product.id,
                        title: line.product.title,
                        url,
                    });
                }
                Err(message) => {
                    outcome.error = Some(message);
                    break;
                }
            }
        }

        if !outcome.downloads.is_empty() {
            cart.save(&remaining).await?;
        }
        tracing::info!(
            bought = outcome.downloads.len(),
            failed = outcome.error.is_some(),
            "Cart checkout finished"
        );

        Ok(outcome)
    }
}

fn failure_message(err: &ApiError) -> String {
    tracing::warn!("Checkout failed: {err}");
    err.user_message(CHECKOUT_FALLBACK_MESSAGE)
}
