//! Core types for reserve and compliance results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::policy::ProductType;

/// Reserve components for one policy at the valuation date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyReserve {
    pub policy_id: Option<String>,
    pub product_type: ProductType,

    /// PV of future benefits, before the premium offset
    pub benefits_pv: f64,

    /// PV of future premiums
    pub premiums_pv: f64,

    /// `max(benefits_pv - premiums_pv, coverage × minimum reserve ratio)`
    pub policy_reserve: f64,

    pub unearned_premium: f64,
    pub claims_reserve: f64,
}

impl PolicyReserve {
    pub fn total(&self) -> f64 {
        self.policy_reserve + self.unearned_premium + self.claims_reserve
    }
}

/// Portfolio reserves with solvency and capital requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReserveCalculation {
    pub valuation_date: NaiveDate,
    pub policy_reserves: f64,
    pub unearned_premium_reserves: f64,
    pub claims_reserves: f64,
    pub total_reserves: f64,
    pub solvency_margin: f64,
    pub risk_based_capital: f64,
    /// Total reserves cover both the solvency margin and RBC
    pub regulatory_requirements_met: bool,
    pub compliance_notes: String,
    /// Per-policy detail in input order
    pub policies: Vec<PolicyReserve>,
}

impl ReserveCalculation {
    /// `(total reserves + solvency margin) / RBC`, with RBC floored at 1 for display
    pub fn capital_ratio(&self) -> f64 {
        (self.total_reserves + self.solvency_margin) / self.risk_based_capital.max(1.0)
    }
}

/// Regulatory compliance of one quoted product against a reserve position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryCompliance {
    pub reserve_adequacy: bool,
    pub capital_adequacy: bool,
    pub pricing_compliance: bool,
    pub underwriting_compliance: bool,
    pub overall_compliance: bool,
    pub regulatory_notes: Vec<String>,
    pub required_actions: Vec<String>,
}
