//! Sort keys and the comparison rules behind them.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Listable;

/// Column a list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Sort by display name, ignoring case.
    Name,
    /// Sort by price.
    Price,
    /// Sort by creation date.
    #[default]
    CreatedAt,
}

impl SortKey {
    /// Parse a sort key from a query parameter string.
    #[must_use]
    pub fn from_str_param(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" | "title" => Some(Self::Name),
            "price" | "total" => Some(Self::Price),
            "created_at" | "createdat" | "created" | "date" | "newest" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    /// Get the query parameter string for this sort key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A sort key paired with a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    /// Ascending by `key`.
    #[must_use]
    pub const fn asc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    /// Descending by `key`.
    #[must_use]
    pub const fn desc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }

    /// Compare two items under this sort.
    pub fn compare<T: Listable + ?Sized>(&self, a: &T, b: &T) -> Ordering {
        let ordering = match self.key {
            SortKey::Name => compare_text(a.sort_name(), b.sort_name()),
            SortKey::Price => a.sort_price().cmp(&b.sort_price()),
            SortKey::CreatedAt => created_or_epoch(a).cmp(&created_or_epoch(b)),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

fn created_or_epoch<T: Listable + ?Sized>(item: &T) -> DateTime<Utc> {
    item.sort_created_at().unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Case-folded comparison, falling back to the raw text so that distinct
/// strings never compare equal.
fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.unwrap_or_default();
    let b = b.unwrap_or_default();
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable in-place sort of borrowed items.
pub(super) fn sort_refs<T: Listable>(items: &mut [&T], sort: Sort) {
    items.sort_by(|a, b| sort.compare(*a, *b));
}
