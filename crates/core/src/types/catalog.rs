//! Catalog entities: categories and products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;
use super::status::StockStatus;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial category update; absent fields are left untouched by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An image hosted by the media CDN, owned by a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// CDN identifier, needed to delete the asset.
    #[serde(alias = "public_id")]
    pub public_id: String,
    /// HTTPS URL of the asset.
    #[serde(alias = "secure_url")]
    pub secure_url: String,
}

/// A furniture product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    /// Units on hand; `None` when the API does not report stock.
    #[serde(default)]
    pub quantity: Option<i32>,
    /// Color codes (e.g. `#8B4513`), in display order.
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Stock classification, or `None` when the quantity is unknown.
    #[must_use]
    pub fn stock_status(&self) -> Option<StockStatus> {
        self.quantity.map(StockStatus::classify)
    }

    /// First image, used as the listing thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }
}

/// Payload for creating a product.
///
/// Sent as multipart form fields alongside the image files; see
/// [`crate::forms::ProductForm`] for how user input becomes one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Partial product update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

/// Inventory overview returned by the stock-status endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub in_stock: u64,
    #[serde(default)]
    pub low_stock: u64,
    #[serde(default)]
    pub out_of_stock: u64,
}

impl StockSummary {
    /// Tally an already-fetched product list. Unknown quantities count
    /// towards the total only.
    #[must_use]
    pub fn tally<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        products
            .into_iter()
            .fold(Self::default(), |mut summary, product| {
                summary.total += 1;
                match product.stock_status() {
                    Some(StockStatus::InStock) => summary.in_stock += 1,
                    Some(StockStatus::LowStock) => summary.low_stock += 1,
                    Some(StockStatus::OutOfStock) => summary.out_of_stock += 1,
                    None => {}
                }
                summary
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(quantity: Option<i32>) -> Product {
        Product {
            id: ProductId::new(1),
            category_id: CategoryId::new(1),
            name: "Walnut Desk".to_string(),
            description: None,
            price: Price::parse("450").unwrap(),
            quantity,
            colors: vec![],
            images: vec![],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_product_decodes_api_shape() {
        let json = r##"{
            "id": 3,
            "categoryId": 2,
            "name": "Oak Chair",
            "description": "Solid oak",
            "price": "129.90",
            "quantity": 4,
            "colors": ["#8B4513", "#000000"],
            "images": [{"publicId": "p/1", "secureUrl": "https://cdn/1.jpg"}],
            "createdAt": "2024-03-01T10:00:00Z"
        }"##;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.colors, vec!["#8B4513", "#000000"]);
        assert_eq!(product.stock_status(), Some(StockStatus::LowStock));
        assert_eq!(product.primary_image().unwrap().public_id, "p/1");
        assert!(product.updated_at.is_none());
    }

    #[test]
    fn test_unknown_quantity_has_no_stock_status() {
        assert_eq!(product(None).stock_status(), None);
        assert_eq!(product(Some(0)).stock_status(), Some(StockStatus::OutOfStock));
    }

    #[test]
    fn test_tally() {
        let products = [
            product(Some(0)),
            product(Some(10)),
            product(Some(11)),
            product(None),
        ];
        let summary = StockSummary::tally(&products);
        assert_eq!(
            summary,
            StockSummary {
                total: 4,
                in_stock: 1,
                low_stock: 1,
                out_of_stock: 1,
            }
        );
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let update = ProductUpdate {
            name: Some("Oak Chair II".to_string()),
            ..ProductUpdate::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"name":"Oak Chair II"}"#
        );
    }
}
