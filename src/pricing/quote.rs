//! Quote output structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tables::ProductDefinition;

/// Breakdown entries that are dollar amounts of the gross premium
const PREMIUM_DERIVED_KEYS: [&str; 6] = [
    "gross_premium",
    "monthly_premium",
    "annual_premium",
    "expense_loading",
    "profit_margin",
    "commission",
];

/// Priced premium for one product
///
/// `expense_load`, `profit_margin` and `commission` are the load fractions the
/// gross premium was built from. Dollar amounts for each load are in the
/// breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub gross_premium: f64,
    pub net_premium: f64,
    pub expense_load: f64,
    pub profit_margin: f64,
    pub commission: f64,
    pub reserves: f64,
    pub risk_multiplier: f64,
    pub breakdown: BTreeMap<String, f64>,
    pub explanation: String,
}

impl QuoteResult {
    /// Copy of this quote with the gross premium scaled by an underwriting multiplier
    ///
    /// Premium dollar amounts in the breakdown scale with it; the net premium,
    /// load fractions and rating inputs are left as priced.
    #[must_use]
    pub fn apply_risk_adjustment(&self, multiplier: f64) -> Self {
        let mut breakdown = self.breakdown.clone();
        for key in PREMIUM_DERIVED_KEYS {
            if let Some(amount) = breakdown.get_mut(key) {
                *amount *= multiplier;
            }
        }

        Self {
            gross_premium: self.gross_premium * multiplier,
            risk_multiplier: multiplier,
            breakdown,
            ..self.clone()
        }
    }

    /// Zero-premium quote for a declined application
    pub fn declined(risk_multiplier: f64) -> Self {
        Self {
            gross_premium: 0.0,
            net_premium: 0.0,
            expense_load: 0.0,
            profit_margin: 0.0,
            commission: 0.0,
            reserves: 0.0,
            risk_multiplier,
            breakdown: BTreeMap::from([("declined".to_string(), 1.0)]),
            explanation: "Application declined due to excessive risk factors.".to_string(),
        }
    }

    pub fn is_declined(&self) -> bool {
        self.breakdown.contains_key("declined")
    }

    /// Gross premium expressed per year; term life premiums are quoted monthly
    pub fn annual_premium(&self) -> f64 {
        self.breakdown
            .get("annual_premium")
            .copied()
            .unwrap_or(self.gross_premium)
    }
}

/// Split of a gross premium into expense, profit and commission dollars
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LoadAmounts {
    pub expense: f64,
    pub profit: f64,
    pub commission: f64,
}

impl LoadAmounts {
    /// Each load's share of `gross`, i.e. `gross × load / (1 + total load)`
    pub fn from_gross(gross: f64, product: &ProductDefinition) -> Self {
        let factor = product.load_factor();
        Self {
            expense: gross * product.expense_load / factor,
            profit: gross * product.profit_margin / factor,
            commission: gross * product.commission / factor,
        }
    }
}
