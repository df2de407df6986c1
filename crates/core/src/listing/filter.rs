//! Field filters: equality and range predicates per entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::types::{
    ApplicationLog, CategoryId, LogLevel, LogSource, Order, OrderStatus, Product, StockStatus,
};

/// A predicate over list items.
pub trait ListFilter<T: ?Sized> {
    /// Whether `item` passes the filter.
    fn matches(&self, item: &T) -> bool;
}

/// No field filter.
impl<T: ?Sized> ListFilter<T> for () {
    fn matches(&self, _item: &T) -> bool {
        true
    }
}

/// Inclusive date range check. Items without a date fail any bounded range.
fn within(date: Option<DateTime<Utc>>, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }
    date.is_some_and(|date| from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to))
}

/// Product list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Products with unknown quantity never match a stock filter.
    pub stock: Option<StockStatus>,
}

impl ListFilter<Product> for ProductFilter {
    fn matches(&self, item: &Product) -> bool {
        let price = item.price.amount();
        self.category.is_none_or(|category| item.category_id == category)
            && self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
            && self.stock.is_none_or(|stock| item.stock_status() == Some(stock))
    }
}

/// Order list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ListFilter<Order> for OrderFilter {
    fn matches(&self, item: &Order) -> bool {
        self.status.is_none_or(|status| item.status == status)
            && within(item.created_at, self.from, self.to)
    }
}

/// Log list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub level: Option<LogLevel>,
    pub source: Option<LogSource>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ListFilter<ApplicationLog> for LogFilter {
    fn matches(&self, item: &ApplicationLog) -> bool {
        self.level.is_none_or(|level| item.level == level)
            && self.source.is_none_or(|source| item.source == source)
            && within(item.timestamp, self.from, self.to)
    }
}
