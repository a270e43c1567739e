//! CLI commands

pub mod bulk_add;
pub mod cart;
pub mod dashboard;
pub mod format;
pub mod products;
pub mod session;
pub mod utils;
