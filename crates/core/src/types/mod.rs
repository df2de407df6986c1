//! Domain types for Oakline.
//!
//! Plain records mirroring the store API, plus type-safe wrappers for ids,
//! prices, and emails.

pub mod account;
pub mod catalog;
pub mod email;
pub mod id;
pub mod log;
pub mod order;
pub mod pagination;
pub mod price;
pub mod status;

pub use account::{Admin, LoginResponse, NewGuestUser, User, UserUpdate};
pub use catalog::{
    Category, CategoryUpdate, NewCategory, NewProduct, Product, ProductImage, ProductUpdate,
    StockSummary,
};
pub use email::{Email, EmailError};
pub use id::*;
pub use log::{ApplicationLog, LogCleanup, LogStats, LogTimeframe};
pub use order::{
    CartItem, CartItemUpdate, CustomerDetails, NewCartItem, NewOrder, Order, OrderStatusUpdate,
    RevenuePoint,
};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, Pagination};
pub use price::{Price, PriceError};
pub use status::*;
