use oakline_core::{CartItem, CartItemId, CartItemUpdate, NewCartItem, UserId};
use tracing::instrument;

use crate::client::ApiClient;
use crate::envelope::{ItemEnvelope, ListEnvelope};
use crate::error::ApiError;

/// Shopping cart endpoints under `/cart`.
#[derive(Debug, Clone, Copy)]
pub struct CartService<'a> {
    client: &'a ApiClient,
}

impl<'a> CartService<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Add a product to a user's cart. The server snapshots the price.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, item), fields(user_id = %item.user_id, product_id = %item.product_id))]
    pub async fn add(&self, item: &NewCartItem) -> Result<CartItem, ApiError> {
        let response: ItemEnvelope<CartItem> = self.client.post("/cart/add", item).await?;
        Ok(response.into_inner())
    }

    /// Open cart lines of one user.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn for_user(&self, user: UserId) -> Result<Vec<CartItem>, ApiError> {
        let response: ListEnvelope<CartItem> =
            self.client.get(&format!("/cart/get/{user}"), &[]).await?;
        Ok(response.into_items())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(cart_item_id = %id))]
    pub async fn update_quantity(&self, id: CartItemId, quantity: u32) -> Result<CartItem, ApiError> {
        let response: ItemEnvelope<CartItem> = self
            .client
            .patch(&format!("/cart/update/{id}"), &CartItemUpdate { quantity })
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(cart_item_id = %id))]
    pub async fn remove(&self, id: CartItemId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .delete(&format!("/cart/delete/{id}"), &[])
            .await?;
        Ok(())
    }

    /// Empty a user's cart.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn clear(&self, user: UserId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .delete(&format!("/cart/clear/{user}"), &[])
            .await?;
        Ok(())
    }
}
