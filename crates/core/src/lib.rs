//! Oakline Core - Shared types library.
//!
//! This crate provides the pieces of the furniture store that need no I/O:
//! - [`types`] - Entities, typed ids, prices, statuses, and pagination
//! - [`listing`] - The search → filter → sort → paginate pipeline run over
//!   already-fetched lists
//! - [`forms`] - Turning admin form input into API payloads
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP clients,
//! no storage. The API client lives in `oakline-client`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod forms;
pub mod listing;
pub mod types;

pub use types::*;
