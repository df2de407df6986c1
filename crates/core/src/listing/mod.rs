//! Client-side list pipeline.
//!
//! Every list screen runs the same steps over a collection it fetched once:
//!
//! 1. search - case-insensitive substring match over a few text fields
//! 2. field filters - equality and range predicates ([`ListFilter`])
//! 3. sort - by [`SortKey`] and [`SortDirection`]
//! 4. pagination - optional slicing with [`Pagination`]
//!
//! The pipeline borrows the base collection and returns references into it;
//! the base is never reordered or modified, so it can be re-run on every
//! input change.
//!
//! ```
//! use oakline_core::listing::{self, ListQuery, Sort, SortKey};
//! use oakline_core::{Category, CategoryId};
//!
//! let categories = vec![
//!     Category { id: CategoryId::new(1), name: "Sofas".into(), description: None, created_at: None, updated_at: None },
//!     Category { id: CategoryId::new(2), name: "Beds".into(), description: None, created_at: None, updated_at: None },
//! ];
//!
//! let query = ListQuery::new().sorted(Sort::asc(SortKey::Name));
//! let names: Vec<_> = listing::apply(&categories, &query)
//!     .items()
//!     .iter()
//!     .map(|c| c.name.as_str())
//!     .collect();
//! assert_eq!(names, ["Beds", "Sofas"]);
//! ```

mod filter;
mod sort;

pub use filter::{ListFilter, LogFilter, OrderFilter, ProductFilter};
pub use sort::{Sort, SortDirection, SortKey};

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::types::{ApplicationLog, Category, Order, Pagination, Product, User};

/// An entity that list screens can search and sort.
pub trait Listable {
    /// Text fields consulted by the search filter. Non-text fields such as
    /// ids are rendered to strings.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Value used for [`SortKey::Name`].
    fn sort_name(&self) -> Option<&str> {
        None
    }

    /// Value used for [`SortKey::Price`].
    fn sort_price(&self) -> Option<Decimal> {
        None
    }

    /// Value used for [`SortKey::CreatedAt`]. Missing dates sort as the epoch.
    fn sort_created_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Everything a list screen can ask of the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery<F = ()> {
    pub search: Option<String>,
    pub filter: F,
    pub sort: Option<Sort>,
    pub page: Option<Pagination>,
}

impl ListQuery<()> {
    /// A query with no search, filter, sort, or pagination.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F> ListQuery<F> {
    /// Replace the field filter.
    #[must_use]
    pub fn filtered<G>(self, filter: G) -> ListQuery<G> {
        ListQuery {
            search: self.search,
            filter,
            sort: self.sort,
            page: self.page,
        }
    }

    /// Set the search term. Blank terms disable the search step.
    #[must_use]
    pub fn searching(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Set the sort order.
    #[must_use]
    pub const fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Slice the result client-side.
    #[must_use]
    pub const fn paged(mut self, page: Pagination) -> Self {
        self.page = Some(page);
        self
    }
}

/// What a list screen should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome<'a, T> {
    /// Nothing was fetched at all.
    Empty,
    /// Items were fetched but search and filters excluded all of them.
    NoResults,
    /// Matching items, sorted and (optionally) sliced.
    Items {
        items: Vec<&'a T>,
        /// Matches before pagination, for page counts.
        matched: usize,
    },
}

impl<'a, T> ListOutcome<'a, T> {
    /// The items to render; empty for [`ListOutcome::Empty`] and
    /// [`ListOutcome::NoResults`].
    #[must_use]
    pub fn items(&self) -> &[&'a T] {
        match self {
            Self::Items { items, .. } => items,
            Self::Empty | Self::NoResults => &[],
        }
    }

    /// Number of matches before pagination.
    #[must_use]
    pub const fn matched(&self) -> usize {
        match self {
            Self::Items { matched, .. } => *matched,
            Self::Empty | Self::NoResults => 0,
        }
    }

    /// Whether the "no results" state should be shown.
    #[must_use]
    pub const fn is_no_results(&self) -> bool {
        matches!(self, Self::NoResults)
    }

    /// Consume the outcome, returning the items.
    #[must_use]
    pub fn into_items(self) -> Vec<&'a T> {
        match self {
            Self::Items { items, .. } => items,
            Self::Empty | Self::NoResults => Vec::new(),
        }
    }
}

/// Whether `item` matches a search term, ignoring case.
///
/// Blank terms match everything.
#[must_use]
pub fn matches_search<T: Listable + ?Sized>(item: &T, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Run the full pipeline over `items`.
pub fn apply<'a, T, F>(items: &'a [T], query: &ListQuery<F>) -> ListOutcome<'a, T>
where
    T: Listable,
    F: ListFilter<T>,
{
    if items.is_empty() {
        return ListOutcome::Empty;
    }

    let mut matching: Vec<&T> = items
        .iter()
        .filter(|item| {
            query
                .search
                .as_deref()
                .is_none_or(|term| matches_search(*item, term))
        })
        .filter(|item| query.filter.matches(item))
        .collect();

    if matching.is_empty() {
        return ListOutcome::NoResults;
    }

    if let Some(sort) = query.sort {
        sort::sort_refs(&mut matching, sort);
    }

    let matched = matching.len();
    let items = match query.page {
        Some(page) => page.slice(&matching).to_vec(),
        None => matching,
    };

    ListOutcome::Items { items, matched }
}

impl Listable for Category {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![Cow::from(self.name.as_str())];
        fields.extend(self.description.as_deref().map(Cow::from));
        fields
    }

    fn sort_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn sort_created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Listable for Product {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![Cow::from(self.name.as_str())];
        fields.extend(self.description.as_deref().map(Cow::from));
        fields
    }

    fn sort_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn sort_price(&self) -> Option<Decimal> {
        Some(self.price.amount())
    }

    fn sort_created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Listable for Order {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        [self.customer_name.as_deref(), self.customer_email.as_deref()]
            .into_iter()
            .flatten()
            .map(Cow::from)
            .chain([Cow::from(self.id.to_string())])
            .collect()
    }

    fn sort_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    fn sort_price(&self) -> Option<Decimal> {
        Some(self.total_amount.amount())
    }

    fn sort_created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Listable for ApplicationLog {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        [
            Some(self.message.as_str()),
            self.endpoint.as_deref(),
            self.ip.as_deref(),
            self.user_id.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(Cow::from)
        .collect()
    }

    fn sort_name(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn sort_created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

impl Listable for User {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        [
            self.name.as_deref(),
            self.email.as_deref(),
            self.phone.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(Cow::from)
        .collect()
    }

    fn sort_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn sort_created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{CategoryId, Price, ProductId, StockStatus};

    fn product(id: i32, name: &str, price: &str, quantity: i32) -> Product {
        Product {
            id: ProductId::new(id),
            category_id: CategoryId::new(id % 2),
            name: name.to_string(),
            description: Some(format!("{name} in solid wood")),
            price: Price::parse(price).unwrap(),
            quantity: Some(quantity),
            colors: vec![],
            images: vec![],
            created_at: None,
            updated_at: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Oak Table", "899", 3),
            product(2, "birch shelf", "129.5", 40),
            product(3, "Armchair", "450", 0),
            product(4, "Walnut Desk", "1200", 12),
        ]
    }

    fn names<'a>(outcome: &ListOutcome<'a, Product>) -> Vec<&'a str> {
        outcome.items().iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_empty_base_is_empty_not_no_results() {
        let products: Vec<Product> = vec![];
        let outcome = apply(&products, &ListQuery::new().searching("oak"));
        assert_eq!(outcome, ListOutcome::Empty);
    }

    #[test]
    fn test_unmatched_search_yields_no_results() {
        let products = catalog();
        let outcome = apply(&products, &ListQuery::new().searching("mahogany"));
        assert!(outcome.is_no_results());
        assert!(outcome.items().is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_and_covers_description() {
        let products = catalog();
        let outcome = apply(&products, &ListQuery::new().searching("SOLID WOOD"));
        assert_eq!(outcome.matched(), 4);

        let outcome = apply(&products, &ListQuery::new().searching("  oak "));
        assert_eq!(names(&outcome), ["Oak Table"]);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let products = catalog();
        assert_eq!(apply(&products, &ListQuery::new().searching("   ")).matched(), 4);
    }

    #[test]
    fn test_name_sort_desc_is_reverse_of_asc() {
        let products = catalog();
        let asc = apply(&products, &ListQuery::new().sorted(Sort::asc(SortKey::Name)));
        let desc = apply(&products, &ListQuery::new().sorted(Sort::desc(SortKey::Name)));
        let mut reversed = names(&desc);
        reversed.reverse();
        assert_eq!(names(&asc), reversed);
        assert_eq!(names(&asc), ["Armchair", "birch shelf", "Oak Table", "Walnut Desk"]);
    }

    #[test]
    fn test_price_sort_is_monotonic() {
        let products = catalog();
        let outcome = apply(&products, &ListQuery::new().sorted(Sort::asc(SortKey::Price)));
        let prices: Vec<_> = outcome.items().iter().map(|p| p.price).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));

        let outcome = apply(&products, &ListQuery::new().sorted(Sort::desc(SortKey::Price)));
        let prices: Vec<_> = outcome.items().iter().map(|p| p.price).collect();
        assert!(prices.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_base_collection_is_untouched() {
        let products = catalog();
        let before = products.clone();
        let _ = apply(&products, &ListQuery::new().sorted(Sort::desc(SortKey::Price)));
        assert_eq!(products, before);
    }

    #[test]
    fn test_filter_then_sort_then_page() {
        let products = catalog();
        let query = ListQuery::new()
            .filtered(ProductFilter {
                stock: Some(StockStatus::InStock),
                ..ProductFilter::default()
            })
            .sorted(Sort::asc(SortKey::Price))
            .paged(Pagination::new(1, 1));
        let outcome = apply(&products, &query);
        assert_eq!(outcome.matched(), 2);
        assert_eq!(names(&outcome), ["Walnut Desk"]);
    }

    #[test]
    fn test_order_search_covers_customer_and_id() {
        let order: Order = serde_json::from_str(
            r#"{"id":4821,"userId":3,"totalAmount":"640","customerName":"Ada Lovelace",
                "customerEmail":"ada@example.com","city":"Oslo","status":"pending"}"#,
        )
        .unwrap();
        let orders = vec![order];

        let by_id = apply(&orders, &ListQuery::new().searching("4821"));
        assert_eq!(by_id.matched(), 1);
        assert_eq!(apply(&orders, &ListQuery::new().searching("LOVELACE")).matched(), 1);
        assert_eq!(apply(&orders, &ListQuery::new().searching("ada@example")).matched(), 1);
        assert!(apply(&orders, &ListQuery::new().searching("oslo")).is_no_results());
    }

    #[test]
    fn test_log_search_fields() {
        let log: ApplicationLog = serde_json::from_str(
            r#"{"id":1,"level":"warn","message":"slow query","endpoint":"/order/get-all","ip":"10.1.2.3","userId":"42"}"#,
        )
        .unwrap();
        assert!(matches_search(&log, "ORDER/get"));
        assert!(matches_search(&log, "10.1.2"));
        assert!(matches_search(&log, "42"));
        assert!(!matches_search(&log, "payment"));
    }
}
