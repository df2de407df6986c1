use oakline_core::{Page, Pagination, Product};
use tracing::{debug, instrument};

use super::window_query;
use crate::client::ApiClient;
use crate::envelope::ListEnvelope;
use crate::error::ApiError;

/// Server-side product search under `/search`.
#[derive(Debug, Clone, Copy)]
pub struct SearchService<'a> {
    client: &'a ApiClient,
}

impl<'a> SearchService<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Full-text product search. A blank query returns an empty page
    /// without a request.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        query: &str,
        pagination: Pagination,
    ) -> Result<Page<Product>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Skipping blank product search");
            return Ok(Page::new(Vec::new(), Some(0), pagination));
        }

        let mut params = vec![("query", query.to_string())];
        params.extend(window_query(pagination));
        let response: ListEnvelope<Product> =
            self.client.get("/search/products", &params).await?;
        Ok(response.into_page(pagination))
    }

    /// Autocomplete suggestions for a partial query.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn suggestions(&self, query: &str) -> Result<Vec<String>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let response: ListEnvelope<String> = self
            .client
            .get("/search/suggestions", &[("query", query.to_string())])
            .await?;
        Ok(response.into_items())
    }
}
