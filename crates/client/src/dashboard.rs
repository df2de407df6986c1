//! Admin dashboard: one snapshot assembled from five concurrent requests.

use oakline_core::listing::{self, ListQuery, OrderFilter, Sort, SortKey};
use oakline_core::{
    LogLevel, LogStats, LogTimeframe, Order, OrderStatus, Pagination, RevenuePoint, StockSummary,
};
use serde::Serialize;
use tracing::instrument;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::services::DEFAULT_REVENUE_DAYS;

/// Orders shown in the "recent orders" panel.
pub const RECENT_ORDER_COUNT: u32 = 5;

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stock: StockSummary,
    pub category_count: usize,
    pub order_count: usize,
    pub pending_orders: usize,
    /// Newest first.
    pub recent_orders: Vec<Order>,
    pub revenue: Vec<RevenuePoint>,
    pub log_stats: LogStats,
    pub recent_errors: u64,
}

/// Load the dashboard.
///
/// All requests run concurrently and the snapshot is all-or-nothing: the
/// first failure cancels the rest and is returned.
///
/// # Errors
///
/// Returns the first `ApiError` raised by any of the underlying requests.
#[instrument(skip(client))]
pub async fn load_dashboard(client: &ApiClient) -> Result<DashboardSnapshot, ApiError> {
    let products = client.products();
    let categories = client.categories();
    let orders = client.orders();
    let logs = client.logs();

    let (stock, categories, orders, revenue, log_stats) = tokio::try_join!(
        products.stock_status(),
        categories.all(),
        orders.all(),
        orders.revenue_trend(DEFAULT_REVENUE_DAYS),
        logs.stats(LogTimeframe::LastDay),
    )?;

    Ok(summarize(stock, categories.len(), &orders, revenue, log_stats))
}

fn summarize(
    stock: StockSummary,
    category_count: usize,
    orders: &[Order],
    revenue: Vec<RevenuePoint>,
    log_stats: LogStats,
) -> DashboardSnapshot {
    let pending = ListQuery::new().filtered(OrderFilter {
        status: Some(OrderStatus::Pending),
        ..OrderFilter::default()
    });
    let recent = ListQuery::new()
        .sorted(Sort::desc(SortKey::CreatedAt))
        .paged(Pagination::new(RECENT_ORDER_COUNT, 0));

    DashboardSnapshot {
        stock,
        category_count,
        order_count: orders.len(),
        pending_orders: listing::apply(orders, &pending).matched(),
        recent_orders: listing::apply(orders, &recent)
            .into_items()
            .into_iter()
            .cloned()
            .collect(),
        revenue,
        recent_errors: log_stats.level_count(LogLevel::Error),
        log_stats,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(id: i32, status: &str, created_at: &str) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "userId": 1,
            "totalAmount": 100,
            "status": status,
            "createdAt": created_at,
        }))
        .unwrap()
    }

    #[test]
    fn test_summarize_counts_and_orders_newest_first() {
        let orders: Vec<Order> = (1..=7)
            .map(|day| {
                let status = if day % 2 == 0 { "pending" } else { "shipped" };
                order(day, status, &format!("2026-05-0{day}T12:00:00Z"))
            })
            .collect();
        let log_stats = LogStats {
            total: 12,
            by_level: [("error".to_string(), 3)].into_iter().collect(),
            ..LogStats::default()
        };

        let snapshot = summarize(StockSummary::default(), 4, &orders, Vec::new(), log_stats);

        assert_eq!(snapshot.category_count, 4);
        assert_eq!(snapshot.order_count, 7);
        assert_eq!(snapshot.pending_orders, 3);
        assert_eq!(snapshot.recent_errors, 3);
        let ids: Vec<i32> = snapshot.recent_orders.iter().map(|o| o.id.as_i32()).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_summarize_without_orders() {
        let snapshot = summarize(StockSummary::default(), 0, &[], Vec::new(), LogStats::default());
        assert_eq!(snapshot.pending_orders, 0);
        assert!(snapshot.recent_orders.is_empty());
    }
}
