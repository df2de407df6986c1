//! The single pagination contract used across every list.
//!
//! Callers always speak `limit`/`offset`. Endpoints that paginate by page
//! number get the page derived from the offset at the client boundary, and
//! client-side slicing of an already-fetched list uses the same type.

use serde::{Deserialize, Serialize};

/// Default number of rows per list request.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A window into a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl Pagination {
    /// A window of `limit` rows starting at `offset`.
    #[must_use]
    pub const fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// A window for a 1-based page number. Page 0 is treated as page 1.
    #[must_use]
    pub const fn from_page(page: u32, per_page: u32) -> Self {
        let page = if page == 0 { 1 } else { page };
        Self {
            limit: per_page,
            offset: (page - 1).saturating_mul(per_page),
        }
    }

    /// The 1-based page containing `offset`.
    #[must_use]
    pub const fn page(&self) -> u32 {
        if self.limit == 0 {
            1
        } else {
            self.offset / self.limit + 1
        }
    }

    /// The window immediately after this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }

    /// Slice an already-fetched collection.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.offset as usize).min(items.len());
        let end = start.saturating_add(self.limit as usize).min(items.len());
        items.get(start..end).unwrap_or_default()
    }
}

/// One page of a list response, normalized from whatever envelope the
/// endpoint used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matching rows, when the endpoint reports it.
    pub total: Option<u64>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(items: Vec<T>, total: Option<u64>, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            pagination,
        }
    }

    /// Whether rows exist beyond this page. Without a reported total, a full
    /// page is taken to mean there may be more.
    #[must_use]
    pub fn has_more(&self) -> bool {
        let seen = u64::from(self.pagination.offset) + self.items.len() as u64;
        self.total.map_or_else(
            || self.items.len() as u64 >= u64::from(self.pagination.limit),
            |total| seen < total,
        )
    }

    /// Total number of pages, when the total is known.
    #[must_use]
    pub fn total_pages(&self) -> Option<u64> {
        let limit = u64::from(self.pagination.limit.max(1));
        self.total.map(|total| total.div_ceil(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset_conversion() {
        let window = Pagination::from_page(3, 25);
        assert_eq!(window, Pagination::new(25, 50));
        assert_eq!(window.page(), 3);
        assert_eq!(Pagination::from_page(0, 10).offset, 0);
    }

    #[test]
    fn test_slice_clamps() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(Pagination::new(2, 1).slice(&items), &[2, 3]);
        assert_eq!(Pagination::new(10, 4).slice(&items), &[5]);
        assert!(Pagination::new(2, 9).slice(&items).is_empty());
    }

    #[test]
    fn test_has_more() {
        let page = Page {
            items: vec![1, 2],
            total: Some(5),
            pagination: Pagination::new(2, 2),
        };
        assert!(page.has_more());
        assert_eq!(page.total_pages(), Some(3));

        let last = Page {
            items: vec![5],
            total: None,
            pagination: Pagination::new(2, 4),
        };
        assert!(!last.has_more());
    }
}
