//! The visitor's cart, kept in the session.
//!
//! Merge and quantity rules live in [`digishelf_core::Cart`]; this store
//! only loads the cart from the session and writes it back after each
//! change. Nothing outlives the session.

use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use digishelf_core::{Cart, CartProduct, ProductId};

use crate::models::session_keys;

/// Session-backed cart store.
pub struct CartStore<'a> {
    session: &'a Session,
}

impl<'a> CartStore<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Current cart. Store errors are logged and read as an empty cart.
    pub async fn load(&self) -> Cart {
        match self.session.get::<Cart>(session_keys::CART).await {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Failed to read cart from session: {e}");
                Cart::new()
            }
        }
    }

    /// Add `quantity` units of a product, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn add(&self, product: CartProduct, quantity: u32) -> Result<Cart, SessionError> {
        self.update(|cart| cart.add(product, quantity)).await
    }

    /// Remove one line.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn remove(&self, id: ProductId) -> Result<Cart, SessionError> {
        self.update(|cart| {
            cart.remove(id);
        })
        .await
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn set_quantity(&self, id: ProductId, quantity: u32) -> Result<Cart, SessionError> {
        self.update(|cart| {
            cart.set_quantity(id, quantity);
        })
        .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn clear(&self) -> Result<(), SessionError> {
        self.session.remove::<Cart>(session_keys::CART).await?;
        Ok(())
    }

    /// Replace the stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn save(&self, cart: &Cart) -> Result<(), SessionError> {
        if cart.is_empty() {
            return self.clear().await;
        }
        self.session.insert(session_keys::CART, cart).await
    }

    async fn update(&self, change: impl FnOnce(&mut Cart)) -> Result<Cart, SessionError> {
        let mut cart = self.load().await;
        change(&mut cart);
        self.save(&cart).await?;
        Ok(cart)
    }
}
