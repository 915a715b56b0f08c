//! Policy data structures and portfolio loading

mod data;
pub mod loader;

pub use data::{Gender, PolicyRecord, ProductType};
pub use loader::{load_portfolio, load_portfolio_from_reader};
