//! Orders, cart items, and revenue reporting.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::id::{CartItemId, OrderId, ProductId, UserId};
use super::price::{Price, PriceError};
use super::status::OrderStatus;

/// A line in a shopper's cart.
///
/// `price` is the unit price captured when the item was added, not the live
/// product price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub quantity: u32,
    pub price: Price,
    #[serde(default)]
    pub color: Option<String>,
    /// Set once the item has been attached to an order.
    #[serde(default)]
    pub order_id: Option<OrderId>,
    /// Product details, when the endpoint embeds them.
    #[serde(default)]
    pub product: Option<Product>,
}

impl CartItem {
    /// Snapshot price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the total is out of range.
    pub fn line_total(&self) -> Result<Price, PriceError> {
        self.price.checked_mul(self.quantity)
    }
}

/// Payload for adding a product to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub quantity: u32,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Payload for changing a cart line's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub quantity: u32,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_amount: Price,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub cart_items: Option<Vec<CartItem>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Number of units across all attached cart items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart_items
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|item| item.quantity)
            .sum()
    }
}

/// Customer and shipping details captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for placing an order from cart items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: UserId,
    pub total_amount: Price,
    #[serde(flatten)]
    pub customer: CustomerDetails,
    pub cart_item_ids: Vec<CartItemId>,
}

impl NewOrder {
    /// Build an order from the cart lines, totalling their snapshot prices.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if a line or the total is out of range.
    pub fn from_cart(
        user_id: UserId,
        items: &[CartItem],
        customer: CustomerDetails,
    ) -> Result<Self, PriceError> {
        let total_amount = items.iter().try_fold(Price::ZERO, |total, item| {
            total.checked_add(item.line_total()?)
        })?;
        Ok(Self {
            user_id,
            total_amount,
            customer,
            cart_item_ids: items.iter().map(|item| item.id).collect(),
        })
    }
}

/// Payload for the update-status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// One day of the revenue trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: Price,
    #[serde(default)]
    pub orders: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cart_item(id: i32, quantity: u32, price: &str) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            product_id: ProductId::new(1),
            user_id: UserId::new(9),
            quantity,
            price: Price::parse(price).unwrap(),
            color: None,
            order_id: None,
            product: None,
        }
    }

    #[test]
    fn test_new_order_totals_snapshot_prices() {
        let items = [cart_item(1, 2, "100.50"), cart_item(2, 1, "20")];
        let order =
            NewOrder::from_cart(UserId::new(9), &items, CustomerDetails::default()).unwrap();
        assert_eq!(order.total_amount, Price::parse("221").unwrap());
        assert_eq!(order.cart_item_ids, vec![CartItemId::new(1), CartItemId::new(2)]);
    }

    #[test]
    fn test_new_order_flattens_customer_fields() {
        let order = NewOrder::from_cart(
            UserId::new(1),
            &[],
            CustomerDetails {
                customer_name: "Ada".to_string(),
                city: "Oslo".to_string(),
                ..CustomerDetails::default()
            },
        )
        .unwrap();
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["customerName"], "Ada");
        assert_eq!(value["city"], "Oslo");
        assert_eq!(value["totalAmount"], 0.0);
    }

    #[test]
    fn test_cart_totals_reject_overflow() {
        let mut item = cart_item(1, 2, "1");
        item.price = Price::new(rust_decimal::Decimal::MAX).unwrap();
        assert_eq!(item.line_total(), Err(PriceError::Overflow));

        let result = NewOrder::from_cart(UserId::new(9), &[item], CustomerDetails::default());
        assert_eq!(result, Err(PriceError::Overflow));

        let fine = [cart_item(1, 3, "19.99")];
        assert_eq!(fine[0].line_total().unwrap(), Price::parse("59.97").unwrap());
    }

    #[test]
    fn test_order_decodes_without_optional_fields() {
        let order: Order =
            serde_json::from_str(r#"{"id":1,"userId":2,"totalAmount":99.5,"status":"shipped"}"#)
                .unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.item_count(), 0);
    }
}
