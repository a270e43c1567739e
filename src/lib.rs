//! stockup library
//!
//! Client-side core of a small-shop inventory app: comma-grouped numeric
//! inputs that keep the caret in place, a bulk product entry list that grows
//! as rows are filled, the sales cart and dashboard, and session handling.
//! No network I/O happens here; requests are described and handed to the
//! host.

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod input;
pub mod inventory;
pub mod logging;
pub mod notify;
pub mod sales;
pub mod text;
