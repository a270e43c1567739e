//! Recording sales and reading them back

pub mod cart;
pub mod dashboard;

pub use cart::{CartItem, SaleRecord, SalesCart};
pub use dashboard::{DashboardState, SalesSummary, Tab};
