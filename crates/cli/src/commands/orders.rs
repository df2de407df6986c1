//! Order management.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use oakline_client::services::DEFAULT_REVENUE_DAYS;
use oakline_core::listing::{self, OrderFilter};
use oakline_core::{OrderId, OrderStatus};
use tracing::{info, warn};

use super::{Context, ListArgs, parse_date, parse_end_date};
use crate::error::{CliError, RequestExt};
use crate::output::{ListView, print_json};

#[derive(Debug, Subcommand)]
pub enum OrderAction {
    /// List orders
    List {
        #[command(flatten)]
        list: ListArgs,
        /// pending, confirmed, processing, shipped, delivered, or cancelled
        #[arg(long)]
        status: Option<OrderStatus>,
        /// Placed on or after this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<DateTime<Utc>>,
        /// Placed on or before this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_end_date)]
        to: Option<DateTime<Utc>>,
    },
    /// Show one order with its items
    Show { id: OrderId },
    /// Change an order's status
    SetStatus { id: OrderId, status: OrderStatus },
    /// Daily revenue
    Revenue {
        #[arg(long, default_value_t = DEFAULT_REVENUE_DAYS)]
        days: u32,
    },
}

pub async fn run(ctx: &Context, action: OrderAction) -> Result<(), CliError> {
    ctx.require_admin().await?;
    let service = ctx.client().orders();

    match action {
        OrderAction::List {
            list,
            status,
            from,
            to,
        } => {
            let orders = service.all().await.for_action("load orders")?;
            let query = list.query().filtered(OrderFilter { status, from, to });
            let outcome = listing::apply(&orders, &query);
            print_json(&ListView::new(outcome, "orders"))
        }
        OrderAction::Show { id } => {
            let order = service.get(id).await.for_action("load order")?;
            print_json(&order)
        }
        OrderAction::SetStatus { id, status } => {
            let current = service.get(id).await.for_action("load order")?;
            if current.status.is_terminal() {
                warn!(
                    order_id = %id,
                    from = %current.status,
                    to = %status,
                    "Order is already in a terminal state"
                );
            } else if status != OrderStatus::Cancelled && current.status.next() != Some(status) {
                warn!(
                    order_id = %id,
                    from = %current.status,
                    to = %status,
                    "Status change skips the usual progression"
                );
            }
            let order = service
                .update_status(id, status)
                .await
                .for_action("update order status")?;
            info!(order_id = %id, status = %order.status, "Order status updated");
            print_json(&order)
        }
        OrderAction::Revenue { days } => {
            let trend = service
                .revenue_trend(days)
                .await
                .for_action("load revenue trend")?;
            print_json(&trend)
        }
    }
}
