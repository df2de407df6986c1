//! Response shapes returned by the store API.
//!
//! Endpoints are inconsistent: some return a bare array or entity, others wrap
//! it in `{ "data": ... }`, and the log listing uses its own pagination block.
//! Everything is normalized here so services hand out [`Page`] and plain
//! entities.

use oakline_core::{ApplicationLog, Page, Pagination};
use serde::Deserialize;

/// A list response in any of the shapes the API produces.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Wrapped {
        #[serde(alias = "items", alias = "rows")]
        data: Vec<T>,
        #[serde(default, alias = "count")]
        total: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub(crate) fn into_page(self, pagination: Pagination) -> Page<T> {
        match self {
            Self::Wrapped { data, total } => Page::new(data, total, pagination),
            Self::Bare(items) => Page::new(items, None, pagination),
        }
    }

    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            Self::Wrapped { data, .. } | Self::Bare(data) => data,
        }
    }
}

/// A single entity, optionally wrapped in `{ "data": ..., "message": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ItemEnvelope<T> {
    Wrapped {
        data: T,
        #[allow(dead_code)]
        #[serde(default)]
        message: Option<String>,
    },
    Bare(T),
}

impl<T> ItemEnvelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data, .. } | Self::Bare(data) => data,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogPagination {
    #[allow(dead_code)]
    pub page: u32,
    #[allow(dead_code)]
    pub limit: u32,
    pub total: u64,
}

/// Log listing: `{ "logs": [...], "pagination": {...} }`, or a generic list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LogListEnvelope {
    Paged {
        logs: Vec<ApplicationLog>,
        #[serde(default)]
        pagination: Option<LogPagination>,
    },
    Other(ListEnvelope<ApplicationLog>),
}

impl LogListEnvelope {
    pub(crate) fn into_page(self, pagination: Pagination) -> Page<ApplicationLog> {
        match self {
            Self::Paged { logs, pagination: meta } => {
                Page::new(logs, meta.map(|m| m.total), pagination)
            }
            Self::Other(list) => list.into_page(pagination),
        }
    }
}
