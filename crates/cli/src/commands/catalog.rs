//! Category and product management.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use oakline_core::forms::{ImageUpload, ProductForm};
use oakline_core::listing::{self, ProductFilter};
use oakline_core::{CategoryId, CategoryUpdate, NewCategory, Price, ProductId, StockStatus};
use tracing::info;

use super::{Context, ListArgs};
use crate::error::{CliError, RequestExt};
use crate::output::{ListView, print_json};

#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    /// List categories
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show one category
    Show { id: CategoryId },
    /// Create a category
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Rename or re-describe a category
    Update {
        id: CategoryId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a category
    Delete { id: CategoryId },
}

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    /// List products
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Only products in this category
        #[arg(long)]
        category: Option<CategoryId>,
        /// Minimum price (inclusive)
        #[arg(long)]
        min_price: Option<Price>,
        /// Maximum price (inclusive)
        #[arg(long)]
        max_price: Option<Price>,
        /// in-stock, low-stock, or out-of-stock
        #[arg(long)]
        stock: Option<StockStatus>,
    },
    /// Show one product
    Show { id: ProductId },
    /// Inventory summary
    Stock,
    /// Create a product with images
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        price: String,
        #[arg(long, default_value = "")]
        quantity: String,
        /// Comma-separated color codes
        #[arg(long, default_value = "")]
        colors: String,
        /// Image file (repeat up to 5 times)
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Delete a product
    Delete { id: ProductId },
}

pub async fn categories(ctx: &Context, action: CategoryAction) -> Result<(), CliError> {
    ctx.require_admin().await?;
    let service = ctx.client().categories();

    match action {
        CategoryAction::List { list } => {
            let categories = service.all().await.for_action("load categories")?;
            let outcome = listing::apply(&categories, &list.query());
            print_json(&ListView::new(outcome, "categories"))
        }
        CategoryAction::Show { id } => {
            let category = service.get(id).await.for_action("load category")?;
            print_json(&category)
        }
        CategoryAction::Create { name, description } => {
            let name = require_text("name", &name)?;
            let category = service
                .create(&NewCategory {
                    name,
                    description: description.filter(|d| !d.trim().is_empty()),
                })
                .await
                .for_action("create category")?;
            info!(category_id = %category.id, "Category created");
            print_json(&category)
        }
        CategoryAction::Update {
            id,
            name,
            description,
        } => {
            let update = CategoryUpdate {
                name: name.map(|n| require_text("name", &n)).transpose()?,
                description,
            };
            let category = service
                .update(id, &update)
                .await
                .for_action("update category")?;
            print_json(&category)
        }
        CategoryAction::Delete { id } => {
            service.delete(id).await.for_action("delete category")?;
            info!(category_id = %id, "Category deleted");
            print_json(&serde_json::json!({ "deleted": id }))
        }
    }
}

pub async fn products(ctx: &Context, action: ProductAction) -> Result<(), CliError> {
    ctx.require_admin().await?;
    let service = ctx.client().products();

    match action {
        ProductAction::List {
            list,
            category,
            min_price,
            max_price,
            stock,
        } => {
            let products = service.all().await.for_action("load products")?;
            let query = list.query().filtered(ProductFilter {
                category,
                min_price: min_price.map(|p| p.amount()),
                max_price: max_price.map(|p| p.amount()),
                stock,
            });
            let outcome = listing::apply(&products, &query);
            print_json(&ListView::new(outcome, "products"))
        }
        ProductAction::Show { id } => {
            let product = service.get(id).await.for_action("load product")?;
            print_json(&product)
        }
        ProductAction::Stock => {
            let summary = service.stock_status().await.for_action("load stock status")?;
            print_json(&summary)
        }
        ProductAction::Create {
            name,
            description,
            category,
            price,
            quantity,
            colors,
            images,
        } => {
            let mut uploads = Vec::with_capacity(images.len());
            for path in &images {
                uploads.push(read_image(path).await?);
            }
            let form = ProductForm {
                name,
                description,
                category_id: category,
                price,
                quantity,
                colors,
                images: uploads,
            };
            let product = service
                .create_from_form(form)
                .await
                .for_action("create product")?;
            info!(product_id = %product.id, "Product created");
            print_json(&product)
        }
        ProductAction::Delete { id } => {
            service.delete(id).await.for_action("delete product")?;
            info!(product_id = %id, "Product deleted");
            print_json(&serde_json::json!({ "deleted": id }))
        }
    }
}

async fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());
    Ok(ImageUpload::from_bytes(file_name, bytes))
}

fn require_text(field: &'static str, value: &str) -> Result<String, CliError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CliError::InvalidArgument(field, "must not be blank".to_string()))
    } else {
        Ok(value.to_string())
    }
}
