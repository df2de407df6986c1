use oakline_core::{
    NewOrder, Order, OrderId, OrderStatus, OrderStatusUpdate, Page, Pagination, RevenuePoint,
    UserId,
};
use tracing::instrument;

use super::{fetch_all, window_query};
use crate::client::ApiClient;
use crate::envelope::{ItemEnvelope, ListEnvelope};
use crate::error::ApiError;

/// Default window for the revenue trend chart.
pub const DEFAULT_REVENUE_DAYS: u32 = 30;

/// Order endpoints under `/order`.
#[derive(Debug, Clone, Copy)]
pub struct OrderService<'a> {
    client: &'a ApiClient,
}

impl<'a> OrderService<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Place an order from cart lines.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, order), fields(user_id = %order.user_id, items = order.cart_item_ids.len()))]
    pub async fn create(&self, order: &NewOrder) -> Result<Order, ApiError> {
        let response: ItemEnvelope<Order> = self.client.post("/order/create", order).await?;
        Ok(response.into_inner())
    }

    /// List one page of orders.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, pagination: Pagination) -> Result<Page<Order>, ApiError> {
        let response: ListEnvelope<Order> = self
            .client
            .get("/order/get-all", &window_query(pagination))
            .await?;
        Ok(response.into_page(pagination))
    }

    /// Fetch every order.
    ///
    /// # Errors
    ///
    /// Returns error if any page request fails.
    pub async fn all(&self) -> Result<Vec<Order>, ApiError> {
        let service = *self;
        fetch_all(move |window| async move { service.list(window).await }).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: OrderId) -> Result<Order, ApiError> {
        let response: ItemEnvelope<Order> =
            self.client.get(&format!("/order/get/{id}"), &[]).await?;
        Ok(response.into_inner())
    }

    /// Orders placed by one user.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn for_user(&self, user: UserId) -> Result<Vec<Order>, ApiError> {
        let response: ListEnvelope<Order> = self
            .client
            .get(&format!("/order/get-by-user/{user}"), &[])
            .await?;
        Ok(response.into_items())
    }

    /// Move an order to `status`.
    ///
    /// Transitions are not checked here; the server owns the workflow.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        let response: ItemEnvelope<Order> = self
            .client
            .patch(
                &format!("/order/update-status/{id}"),
                &OrderStatusUpdate { status },
            )
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete(&self, id: OrderId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .delete(&format!("/order/delete/{id}"), &[])
            .await?;
        Ok(())
    }

    /// Daily revenue for the last `days` days.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn revenue_trend(&self, days: u32) -> Result<Vec<RevenuePoint>, ApiError> {
        let response: ListEnvelope<RevenuePoint> = self
            .client
            .get("/order/revenue-trend", &[("days", days.max(1).to_string())])
            .await?;
        Ok(response.into_items())
    }
}
