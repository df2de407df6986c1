use oakline_core::{
    ApplicationLog, LogCleanup, LogId, LogLevel, LogSource, LogStats, LogTimeframe, Page,
    Pagination,
};
use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::envelope::{ItemEnvelope, LogListEnvelope};
use crate::error::ApiError;

/// Server-side filters for the log listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub level: Option<LogLevel>,
    pub source: Option<LogSource>,
    pub search: Option<String>,
}

impl LogQuery {
    /// Query pairs for `/log/get-all`, translating the offset window into the
    /// 1-based `page` the endpoint expects.
    fn params(&self, pagination: Pagination) -> Vec<(&'static str, String)> {
        let limit = pagination.limit.max(1);
        let mut params = vec![
            ("page", (pagination.offset / limit + 1).to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(level) = self.level {
            params.push(("level", level.as_str().to_string()));
        }
        if let Some(source) = self.source.filter(|s| *s != LogSource::Unknown) {
            params.push(("source", source.as_str().to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        params
    }
}

/// Application log endpoints under `/log`.
#[derive(Debug, Clone, Copy)]
pub struct LogService<'a> {
    client: &'a ApiClient,
}

impl<'a> LogService<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List one page of log records.
    ///
    /// The offset is rounded down to a page boundary, so callers should pass
    /// offsets that are multiples of the limit.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, query))]
    pub async fn list(
        &self,
        query: &LogQuery,
        pagination: Pagination,
    ) -> Result<Page<ApplicationLog>, ApiError> {
        let response: LogListEnvelope = self
            .client
            .get("/log/get-all", &query.params(pagination))
            .await?;
        let limit = pagination.limit.max(1);
        let aligned = Pagination::new(limit, pagination.offset / limit * limit);
        Ok(response.into_page(aligned))
    }

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the record does not exist.
    #[instrument(skip(self), fields(log_id = %id))]
    pub async fn get(&self, id: LogId) -> Result<ApplicationLog, ApiError> {
        let response: ItemEnvelope<ApplicationLog> =
            self.client.get(&format!("/log/get/{id}"), &[]).await?;
        Ok(response.into_inner())
    }

    /// Counts by level and source over a timeframe.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn stats(&self, timeframe: LogTimeframe) -> Result<LogStats, ApiError> {
        let response: ItemEnvelope<LogStats> = self
            .client
            .get("/log/stats", &[("timeframe", timeframe.as_str().to_string())])
            .await?;
        Ok(response.into_inner())
    }

    /// Delete records older than `older_than_days`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cleanup(&self, older_than_days: u32) -> Result<LogCleanup, ApiError> {
        let response: ItemEnvelope<LogCleanup> = self
            .client
            .delete("/log/cleanup", &[("days", older_than_days.to_string())])
            .await?;
        let cleanup = response.into_inner();
        info!(deleted = cleanup.deleted_count, "Cleaned up application logs");
        Ok(cleanup)
    }
}
