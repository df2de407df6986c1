//! Resource services: one async method per REST endpoint.
//!
//! Each service borrows the [`ApiClient`] and is obtained through an accessor
//! such as [`ApiClient::categories`].

mod admin;
mod cart;
mod category;
mod log;
mod order;
mod product;
mod search;
mod user;

pub use admin::AdminService;
pub use cart::CartService;
pub use category::CategoryService;
pub use log::{LogQuery, LogService};
pub use order::{DEFAULT_REVENUE_DAYS, OrderService};
pub use product::ProductService;
pub use search::SearchService;
pub use user::UserService;

use std::future::Future;

use oakline_core::{Page, Pagination};
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Page size used when walking a whole collection.
pub const FETCH_ALL_PAGE_SIZE: u32 = 100;

/// Hard stop for servers that ignore `offset` and never report a total.
const MAX_PAGES: u32 = 200;

impl ApiClient {
    #[must_use]
    pub const fn admin(&self) -> AdminService<'_> {
        AdminService::new(self)
    }

    #[must_use]
    pub const fn cart(&self) -> CartService<'_> {
        CartService::new(self)
    }

    #[must_use]
    pub const fn categories(&self) -> CategoryService<'_> {
        CategoryService::new(self)
    }

    #[must_use]
    pub const fn logs(&self) -> LogService<'_> {
        LogService::new(self)
    }

    #[must_use]
    pub const fn orders(&self) -> OrderService<'_> {
        OrderService::new(self)
    }

    #[must_use]
    pub const fn products(&self) -> ProductService<'_> {
        ProductService::new(self)
    }

    #[must_use]
    pub const fn search(&self) -> SearchService<'_> {
        SearchService::new(self)
    }

    #[must_use]
    pub const fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }
}

/// `limit`/`offset` query pairs for a list endpoint.
pub(crate) fn window_query(pagination: Pagination) -> Vec<(&'static str, String)> {
    vec![
        ("limit", pagination.limit.to_string()),
        ("offset", pagination.offset.to_string()),
    ]
}

/// Walk a paginated endpoint until it runs dry.
pub(crate) async fn fetch_all<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, ApiError>
where
    T: PartialEq,
    F: FnMut(Pagination) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    let mut window = Pagination::new(FETCH_ALL_PAGE_SIZE, 0);
    let mut items: Vec<T> = Vec::new();
    let mut previous_len = 0;

    for _ in 0..MAX_PAGES {
        let page = fetch(window).await?;
        // Bare-array endpoints report no total. A server that ignores the
        // window either returns more than was asked for or repeats the
        // previous page; either way the collection is already complete.
        if page.total.is_none() {
            let oversized = page.items.len() > window.limit as usize;
            let repeated = previous_len > 0
                && page.items.len() == previous_len
                && items
                    .get(items.len() - previous_len..)
                    .is_some_and(|last| last == page.items.as_slice());
            if repeated {
                debug!(offset = window.offset, "Page repeats the previous one; stopping");
                return Ok(items);
            }
            if oversized {
                items.extend(page.items);
                return Ok(items);
            }
        }

        let more = page.has_more() && !page.items.is_empty();
        previous_len = page.items.len();
        items.extend(page.items);
        if !more {
            return Ok(items);
        }
        window = window.next();
    }

    warn!(pages = MAX_PAGES, "Stopped paging after reaching the page limit");
    Ok(items)
}
