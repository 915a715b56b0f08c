//! Premium calculation and product quoting

mod calculator;
mod manager;
mod quote;

pub use calculator::{PremiumCalculator, RiskFactors, CRITICAL_ILLNESS_TERM};
pub use manager::{
    ProductManager, ProductQuote, ProductRequest, DEFAULT_POLICY_TERM, DEFAULT_WAITING_PERIOD_DAYS,
    QUOTE_VALIDITY_DAYS,
};
pub use quote::QuoteResult;
