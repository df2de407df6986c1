//! Application log browsing and housekeeping.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use oakline_client::services::LogQuery;
use oakline_core::listing::{self, ListQuery, LogFilter, Sort, SortKey};
use oakline_core::{DEFAULT_PAGE_SIZE, LogLevel, LogSource, LogTimeframe, Pagination};
use serde::Serialize;

use super::{Context, parse_date, parse_end_date};
use crate::error::{CliError, RequestExt};
use crate::output::{ListView, print_json};

const DEFAULT_RETENTION_DAYS: u32 = 30;

#[derive(Debug, Subcommand)]
pub enum LogAction {
    /// List log records, newest first
    List {
        /// error, warn, info, debug, or http
        #[arg(long)]
        level: Option<LogLevel>,
        /// api, database, auth, payment, email, or system
        #[arg(long)]
        source: Option<LogSource>,
        /// Text search over message, endpoint, IP, and user
        #[arg(long, short)]
        search: Option<String>,
        /// Only records on or after this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<DateTime<Utc>>,
        /// Only records on or before this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_end_date)]
        to: Option<DateTime<Utc>>,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Records per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
    },
    /// Counts by level and source
    Stats {
        /// 1h, 24h, 7d, or 30d
        #[arg(long, default_value = "24h")]
        timeframe: LogTimeframe,
    },
    /// Delete old records
    Cleanup {
        /// Delete records older than this many days
        #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
        days: u32,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogPageView<'a, T> {
    page: u32,
    total: Option<u64>,
    total_pages: Option<u64>,
    #[serde(flatten)]
    view: ListView<'a, T>,
}

pub async fn run(ctx: &Context, action: LogAction) -> Result<(), CliError> {
    ctx.require_admin().await?;
    let service = ctx.client().logs();

    match action {
        LogAction::List {
            level,
            source,
            search,
            from,
            to,
            page,
            limit,
        } => {
            let window = Pagination::from_page(page, limit.max(1));
            let server_query = LogQuery {
                level,
                source,
                search,
            };
            let result = service
                .list(&server_query, window)
                .await
                .for_action("load logs")?;

            // The endpoint has no date filter; narrow the fetched page locally.
            let local = ListQuery::new()
                .sorted(Sort::desc(SortKey::CreatedAt))
                .filtered(LogFilter {
                    from,
                    to,
                    ..LogFilter::default()
                });
            let outcome = listing::apply(&result.items, &local);
            print_json(&LogPageView {
                page: result.pagination.page(),
                total: result.total,
                total_pages: result.total_pages(),
                view: ListView::new(outcome, "log records"),
            })
        }
        LogAction::Stats { timeframe } => {
            let stats = service.stats(timeframe).await.for_action("load log stats")?;
            print_json(&stats)
        }
        LogAction::Cleanup { days } => {
            let cleanup = service.cleanup(days).await.for_action("clean up logs")?;
            print_json(&cleanup)
        }
    }
}
