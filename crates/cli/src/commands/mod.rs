//! Command implementations and the state they share.

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod logs;
pub mod orders;
pub mod search;

use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use oakline_client::{AdminAuth, ApiClient, AuthSession, AuthStatus, ClientConfig};
use oakline_core::listing::{ListQuery, Sort, SortKey};
use oakline_core::{Admin, DEFAULT_PAGE_SIZE, Pagination};

use crate::error::CliError;

/// Client, session and configuration for one invocation.
pub struct Context {
    pub config: ClientConfig,
    pub auth: AdminAuth,
}

impl Context {
    /// Open the persisted session and build a client carrying its token.
    ///
    /// # Errors
    ///
    /// Returns error if the session file is unreadable or the HTTP client
    /// fails to build.
    pub fn new(config: ClientConfig) -> Result<Self, CliError> {
        let session = AuthSession::file(&config.session_file);
        let client = ApiClient::with_session(&config, &session)?;
        Ok(Self {
            auth: AdminAuth::new(client, session),
            config,
        })
    }

    pub const fn client(&self) -> &ApiClient {
        self.auth.client()
    }

    /// Verify the stored token before an admin-only command.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::LoginRequired`] when there is no valid session.
    pub async fn require_admin(&self) -> Result<Admin, CliError> {
        match self.auth.require_admin().await {
            AuthStatus::Authenticated(admin) => Ok(admin),
            AuthStatus::LoginRequired { redirect_to } => Err(CliError::LoginRequired(redirect_to)),
        }
    }
}

/// Search, sort and paging flags shared by list commands.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Case-insensitive text search
    #[arg(long, short)]
    pub search: Option<String>,

    /// Sort key: name, price, or created
    #[arg(long, value_parser = parse_sort_key)]
    pub sort: Option<SortKey>,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,

    /// Maximum number of rows to print
    #[arg(long)]
    pub limit: Option<u32>,

    /// Rows to skip before printing
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

impl ListArgs {
    /// Pipeline query with no field filter.
    pub fn query(&self) -> ListQuery {
        let mut query = ListQuery::new();
        if let Some(term) = &self.search {
            query = query.searching(term.clone());
        }
        let key = self
            .sort
            .or_else(|| self.desc.then_some(SortKey::CreatedAt));
        if let Some(key) = key {
            query = query.sorted(if self.desc {
                Sort::desc(key)
            } else {
                Sort::asc(key)
            });
        }
        if let Some(window) = self.window() {
            query = query.paged(window);
        }
        query
    }

    /// Client-side window, if any paging flag was given.
    pub fn window(&self) -> Option<Pagination> {
        (self.limit.is_some() || self.offset > 0).then(|| {
            Pagination::new(self.limit.unwrap_or(DEFAULT_PAGE_SIZE), self.offset)
        })
    }
}

fn parse_sort_key(raw: &str) -> Result<SortKey, String> {
    SortKey::from_str_param(raw)
        .ok_or_else(|| format!("unknown sort key {raw:?} (expected name, price, or created)"))
}

/// Parse `YYYY-MM-DD` as midnight UTC, or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("invalid date {raw:?} (expected YYYY-MM-DD or RFC 3339)"))
}

/// Parse `YYYY-MM-DD` as the last instant of that day, so `--to` is inclusive.
pub fn parse_end_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_milli_opt(23, 59, 59, 999)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("invalid date {raw:?}"));
    }
    parse_date(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_without_key_sorts_newest_first() {
        let args = ListArgs {
            desc: true,
            ..ListArgs::default()
        };
        assert_eq!(args.query().sort, Some(Sort::desc(SortKey::CreatedAt)));
        assert!(args.query().page.is_none());
    }

    #[test]
    fn test_window_only_when_requested() {
        let args = ListArgs {
            offset: 40,
            ..ListArgs::default()
        };
        assert_eq!(args.window(), Some(Pagination::new(DEFAULT_PAGE_SIZE, 40)));
        assert_eq!(ListArgs::default().window(), None);
    }

    #[test]
    fn test_date_parsing() {
        let start = parse_date("2026-04-01").unwrap();
        assert_eq!(start.to_rfc3339(), "2026-04-01T00:00:00+00:00");

        let end = parse_end_date("2026-04-01").unwrap();
        assert!(end > start);
        assert_eq!(end.date_naive(), start.date_naive());

        assert!(parse_date("01/04/2026").is_err());
        assert!(parse_date("2026-04-01T08:30:00+02:00").is_ok());
    }

    #[test]
    fn test_sort_key_parser() {
        assert_eq!(parse_sort_key("Price"), Ok(SortKey::Price));
        assert!(parse_sort_key("colour").is_err());
    }
}
