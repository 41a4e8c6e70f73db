//! Product models as exchanged with the marketplace API.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Price, PriceError};

/// A digital product listed on the marketplace.
///
/// Read-only to shoppers; created and given a file by admin actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub cover_image_url: String,
    /// Reference to the downloadable file, once one has been uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl Product {
    /// Whether a downloadable file has been attached.
    #[must_use]
    pub const fn has_file(&self) -> bool {
        self.file_path.is_some()
    }
}

/// Validation failures for a [`NewProduct`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),
}

/// Payload for creating a product through the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub cover_image_url: String,
}

impl NewProduct {
    /// Build a payload from raw form input.
    ///
    /// The title is trimmed and must be non-empty; the price must be a
    /// non-negative whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] describing the first invalid field.
    pub fn from_form(
        title: &str,
        description: &str,
        price: &str,
        cover_image_url: &str,
    ) -> Result<Self, ProductError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ProductError::MissingTitle);
        }

        Ok(Self {
            title: title.to_owned(),
            description: description.trim().to_owned(),
            price: Price::parse_cents(price)?,
            cover_image_url: cover_image_url.trim().to_owned(),
        })
    }
}
