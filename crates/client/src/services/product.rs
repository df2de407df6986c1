use oakline_core::forms::{ImageUpload, ProductForm, ProductSubmission, validate_images};
use oakline_core::{
    CategoryId, NewProduct, Page, Pagination, Product, ProductId, ProductUpdate, StockSummary,
};
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use super::{fetch_all, window_query};
use crate::client::ApiClient;
use crate::envelope::{ItemEnvelope, ListEnvelope};
use crate::error::ApiError;

/// Product endpoints under `/product`.
#[derive(Debug, Clone, Copy)]
pub struct ProductService<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductService<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Create a product with its images in one multipart request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Form` if the images fail validation, otherwise
    /// any API error.
    #[instrument(skip(self, submission), fields(name = %submission.product.name, images = submission.images.len()))]
    pub async fn create(&self, submission: &ProductSubmission) -> Result<Product, ApiError> {
        validate_images(&submission.images)?;
        let form = product_form(&submission.product, &submission.images)?;
        let response: ItemEnvelope<Product> =
            self.client.post_multipart("/product/create", form).await?;
        Ok(response.into_inner())
    }

    /// Validate raw form input, then create the product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Form` without sending anything if the form is
    /// invalid.
    pub async fn create_from_form(&self, form: ProductForm) -> Result<Product, ApiError> {
        let submission = form.into_submission()?;
        self.create(&submission).await
    }

    /// List one page of products.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, pagination: Pagination) -> Result<Page<Product>, ApiError> {
        let response: ListEnvelope<Product> = self
            .client
            .get("/product/get-all", &window_query(pagination))
            .await?;
        Ok(response.into_page(pagination))
    }

    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns error if any page request fails.
    pub async fn all(&self) -> Result<Vec<Product>, ApiError> {
        let service = *self;
        fetch_all(move |window| async move { service.list(window).await }).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<Product, ApiError> {
        let response: ItemEnvelope<Product> = self
            .client
            .get(&format!("/product/get/{id}"), &[])
            .await?;
        Ok(response.into_inner())
    }

    /// List products in one category.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(category_id = %category))]
    pub async fn by_category(
        &self,
        category: CategoryId,
        pagination: Pagination,
    ) -> Result<Page<Product>, ApiError> {
        let response: ListEnvelope<Product> = self
            .client
            .get(
                &format!("/product/get-by-category/{category}"),
                &window_query(pagination),
            )
            .await?;
        Ok(response.into_page(pagination))
    }

    /// Update product fields. Images are managed with
    /// [`ProductService::upload_images`].
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update(&self, id: ProductId, update: &ProductUpdate) -> Result<Product, ApiError> {
        let response: ItemEnvelope<Product> = self
            .client
            .patch(&format!("/product/update/{id}"), update)
            .await?;
        Ok(response.into_inner())
    }

    /// Attach additional images to an existing product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Form` if the images fail validation, otherwise
    /// any API error.
    #[instrument(skip(self, images), fields(product_id = %id, images = images.len()))]
    pub async fn upload_images(
        &self,
        id: ProductId,
        images: &[ImageUpload],
    ) -> Result<Product, ApiError> {
        validate_images(images)?;
        let form = attach_images(Form::new(), images)?;
        let response: ItemEnvelope<Product> = self
            .client
            .post_multipart(&format!("/product/upload-images/{id}"), form)
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .delete(&format!("/product/delete/{id}"), &[])
            .await?;
        Ok(())
    }

    /// Server-side counts of in/low/out-of-stock products.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn stock_status(&self) -> Result<StockSummary, ApiError> {
        let response: ItemEnvelope<StockSummary> =
            self.client.get("/product/stock-status", &[]).await?;
        Ok(response.into_inner())
    }
}

/// Text fields for a product create request.
fn product_form(product: &NewProduct, images: &[ImageUpload]) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("name", product.name.clone())
        .text("description", product.description.clone())
        .text("categoryId", product.category_id.to_string())
        .text("price", product.price.to_string());
    if let Some(quantity) = product.quantity {
        form = form.text("quantity", quantity.to_string());
    }
    if !product.colors.is_empty() {
        let colors = serde_json::to_string(&product.colors)
            .map_err(|e| ApiError::Parse(format!("Failed to encode colors: {e}")))?;
        form = form.text("colors", colors);
    }
    attach_images(form, images)
}

fn attach_images(mut form: Form, images: &[ImageUpload]) -> Result<Form, ApiError> {
    for image in images {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        form = form.part("images", part);
    }
    Ok(form)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use oakline_core::Price;

    use super::*;

    #[test]
    fn test_product_form_builds_with_images() {
        let product = NewProduct {
            category_id: CategoryId::new(2),
            name: "Oak Bench".to_string(),
            description: "Solid oak".to_string(),
            price: Price::parse("349.00").unwrap(),
            quantity: Some(4),
            colors: vec!["#8B5A2B".to_string()],
        };
        let images = vec![ImageUpload::from_bytes("front.jpg", vec![0xFF, 0xD8])];

        let form = product_form(&product, &images).unwrap();
        assert!(form.boundary().len() > 10);
    }

    #[test]
    fn test_attach_rejects_bad_mime() {
        let image = ImageUpload {
            file_name: "x".to_string(),
            content_type: "not a mime".to_string(),
            bytes: vec![],
        };
        assert!(attach_images(Form::new(), &[image]).is_err());
    }
}
