//! Reserve valuation, solvency and regulatory compliance
//!
//! A [`ReserveEngine`] values an inforce portfolio at a fixed date:
//! - **Policy reserves**: prospective net premium reserve, floored per product
//! - **Unearned premium**: pro-rata premium to the next anniversary
//! - **Claims reserves**: flat factor of coverage
//!
//! Totals are then tested against the solvency margin and risk-based capital.
//! The same engine checks a single quote for regulatory compliance.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use premium_engine::{load_portfolio, ReserveEngine, Tables};
//!
//! let tables = Arc::new(Tables::from_default_path()?);
//! let policies = load_portfolio("data/sample_portfolio.csv")?;
//! let engine = ReserveEngine::new(tables, valuation_date);
//! let calc = engine.calculate_portfolio_reserves(&policies);
//! println!("{}", calc.compliance_notes);
//! ```

mod compliance;
mod engine;
mod solvency;
mod types;

pub use engine::{ReserveEngine, DAYS_PER_YEAR};
pub use solvency::{capital_adequate, reserves_adequate, risk_based_capital, solvency_margin};
pub use types::{PolicyReserve, RegulatoryCompliance, ReserveCalculation};
