//! Oakline CLI - store administration from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password from OAKLINE_ADMIN_PASSWORD or stdin)
//! oak login -e admin@example.com
//!
//! # Overview
//! oak dashboard
//!
//! # Low-stock products, cheapest first
//! oak products list --stock low-stock --sort price
//!
//! # Move an order along
//! oak orders set-status 42 shipped
//!
//! # Errors from the last day
//! oak logs list --level error
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.
//!
//! # Environment Variables
//!
//! See [`oakline_client::config`]; `OAKLINE_API_BASE_URL` is required.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use oakline_client::ClientConfig;
use oakline_core::{DEFAULT_PAGE_SIZE, Email, Pagination};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod error;
mod output;

use commands::Context;
use commands::catalog::{CategoryAction, ProductAction};
use commands::logs::LogAction;
use commands::orders::OrderAction;
use error::CliError;

#[derive(Parser)]
#[command(name = "oak")]
#[command(author, version, about = "Oakline store administration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as an admin and remember the session
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: Email,

        /// Admin password (read from stdin when omitted)
        #[arg(long, env = "OAKLINE_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// Stock, orders, revenue and log overview
    Dashboard,
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Browse and clean up application logs
    Logs {
        #[command(subcommand)]
        action: LogAction,
    },
    /// Search products
    Search {
        /// Search terms (omit with --interactive)
        #[arg(required_unless_present = "interactive")]
        query: Option<String>,

        /// Read queries line by line from stdin, debounced
        #[arg(long, short)]
        interactive: bool,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

/// Initialize Sentry error tracking if `SENTRY_DSN` is configured.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Sentry must be initialized before the tracing subscriber
    let config = ClientConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "oakline_cli=info,oakline_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        // Flush Sentry before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), CliError> {
    let ctx = Context::new(config)?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&ctx, &email, password).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Dashboard => commands::dashboard::run(&ctx).await,
        Commands::Categories { action } => commands::catalog::categories(&ctx, action).await,
        Commands::Products { action } => commands::catalog::products(&ctx, action).await,
        Commands::Orders { action } => commands::orders::run(&ctx, action).await,
        Commands::Logs { action } => commands::logs::run(&ctx, action).await,
        Commands::Search {
            query,
            interactive,
            limit,
            offset,
        } => {
            let window = Pagination::new(limit, offset);
            match query {
                Some(query) if !interactive => commands::search::once(&ctx, &query, window).await,
                _ => commands::search::interactive(&ctx, window).await,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;
    use oakline_core::{OrderStatus, StockStatus};

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_product_filters() {
        let cli = Cli::try_parse_from([
            "oak", "products", "list", "--stock", "low-stock", "--sort", "price", "--desc",
            "--min-price", "10.50",
        ])
        .unwrap();
        let Commands::Products {
            action:
                ProductAction::List {
                    list,
                    stock,
                    min_price,
                    ..
                },
        } = cli.command
        else {
            panic!("expected products list");
        };
        assert_eq!(stock, Some(StockStatus::LowStock));
        assert!(list.desc);
        assert_eq!(min_price.unwrap().to_string(), "10.50");
    }

    #[test]
    fn test_parses_set_status() {
        let cli = Cli::try_parse_from(["oak", "orders", "set-status", "42", "shipped"]).unwrap();
        let Commands::Orders {
            action: OrderAction::SetStatus { id, status },
        } = cli.command
        else {
            panic!("expected orders set-status");
        };
        assert_eq!(id.as_i32(), 42);
        assert_eq!(status, OrderStatus::Shipped);
    }

    #[test]
    fn test_rejects_bad_email_and_status() {
        assert!(Cli::try_parse_from(["oak", "login", "-e", "not-an-email"]).is_err());
        assert!(Cli::try_parse_from(["oak", "orders", "set-status", "1", "lost"]).is_err());
    }

    #[test]
    fn test_search_requires_query_or_interactive() {
        assert!(Cli::try_parse_from(["oak", "search"]).is_err());
        assert!(Cli::try_parse_from(["oak", "search", "--interactive"]).is_ok());
        assert!(Cli::try_parse_from(["oak", "search", "oak chair"]).is_ok());
    }
}
