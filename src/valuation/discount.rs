//! Annual discounting for present value calculations

use crate::error::{PricingError, Result};
use serde::{Deserialize, Serialize};

/// Valuation interest rate used when no table supplies one
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.035;

/// Annual discount rate, validated to lie in `[0, 1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DiscountRate(f64);

impl DiscountRate {
    pub fn new(annual_rate: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&annual_rate) {
            return Err(PricingError::InvalidConfiguration(format!(
                "discount rate {} outside [0, 1)",
                annual_rate
            )));
        }
        Ok(Self(annual_rate))
    }

    pub fn rate(&self) -> f64 {
        self.0
    }

    /// Discount factor `(1 + r)^-year` for a cashflow `year` years out
    pub fn discount_factor(&self, year: u32) -> f64 {
        1.0 / (1.0 + self.0).powi(year as i32)
    }

    /// Present value of an amount paid `year` years out
    pub fn present_value(&self, amount: f64, year: u32) -> f64 {
        amount * self.discount_factor(year)
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        Self(DEFAULT_DISCOUNT_RATE)
    }
}

impl TryFrom<f64> for DiscountRate {
    type Error = PricingError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DiscountRate> for f64 {
    fn from(rate: DiscountRate) -> f64 {
        rate.0
    }
}
