//! Product search, one-shot or interactive.

use oakline_client::Debouncer;
use oakline_core::Pagination;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::debug;

use super::Context;
use crate::error::{CliError, RequestExt};
use crate::output::print_json;

/// Run a single search and print the matching page.
pub async fn once(ctx: &Context, query: &str, window: Pagination) -> Result<(), CliError> {
    let page = ctx
        .client()
        .search()
        .products(query, window)
        .await
        .for_action("search products")?;
    print_json(&page)
}

/// Read queries from stdin, one per line, and search once input settles.
///
/// Lines arriving within the debounce delay of each other collapse into a
/// single request for the last one.
pub async fn interactive(ctx: &Context, window: Pagination) -> Result<(), CliError> {
    let debouncer = Debouncer::new(ctx.config.search_debounce);
    let (tx, mut rx) = watch::channel(String::new());

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if tx.send(line).is_err() {
                break;
            }
        }
        Ok::<_, std::io::Error>(())
    });

    while let Some(query) = debouncer.settled(&mut rx).await {
        let query = query.trim();
        if query.is_empty() {
            continue;
        }
        debug!(query, "Search input settled");
        let search = ctx.client().search();
        let (suggestions, products) =
            tokio::try_join!(search.suggestions(query), search.products(query, window))
                .for_action("search products")?;
        print_json(&serde_json::json!({
            "query": query,
            "suggestions": suggestions,
            "results": products,
        }))?;
    }

    match reader.await {
        Ok(result) => result.map_err(CliError::from),
        Err(err) => Err(CliError::Io(std::io::Error::other(err))),
    }
}
