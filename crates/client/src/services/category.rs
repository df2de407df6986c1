use oakline_core::{Category, CategoryId, CategoryUpdate, NewCategory, Page, Pagination};
use tracing::instrument;

use super::{fetch_all, window_query};
use crate::client::ApiClient;
use crate::envelope::{ItemEnvelope, ListEnvelope};
use crate::error::ApiError;

/// Category endpoints under `/category`.
#[derive(Debug, Clone, Copy)]
pub struct CategoryService<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoryService<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, category), fields(name = %category.name))]
    pub async fn create(&self, category: &NewCategory) -> Result<Category, ApiError> {
        let response: ItemEnvelope<Category> =
            self.client.post("/category/create", category).await?;
        Ok(response.into_inner())
    }

    /// List one page of categories.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, pagination: Pagination) -> Result<Page<Category>, ApiError> {
        let response: ListEnvelope<Category> = self
            .client
            .get("/category/get-all", &window_query(pagination))
            .await?;
        Ok(response.into_page(pagination))
    }

    /// Fetch every category.
    ///
    /// # Errors
    ///
    /// Returns error if any page request fails.
    pub async fn all(&self) -> Result<Vec<Category>, ApiError> {
        let service = *self;
        fetch_all(move |window| async move { service.list(window).await }).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the category does not exist.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn get(&self, id: CategoryId) -> Result<Category, ApiError> {
        let response: ItemEnvelope<Category> = self
            .client
            .get(&format!("/category/get/{id}"), &[])
            .await?;
        Ok(response.into_inner())
    }

    /// Update a category's name or description.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, update), fields(category_id = %id))]
    pub async fn update(
        &self,
        id: CategoryId,
        update: &CategoryUpdate,
    ) -> Result<Category, ApiError> {
        let response: ItemEnvelope<Category> = self
            .client
            .patch(&format!("/category/update/{id}"), update)
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete(&self, id: CategoryId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .delete(&format!("/category/delete/{id}"), &[])
            .await?;
        Ok(())
    }
}
