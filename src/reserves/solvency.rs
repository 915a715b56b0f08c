//! Solvency margin, risk-based capital and adequacy tests

use std::collections::BTreeMap;

use crate::policy::PolicyRecord;
use crate::tables::{RegulatoryStandards, SolvencyBucket};

/// Σ over solvency buckets of bucket coverage × bucket margin rate
pub fn solvency_margin(standards: &RegulatoryStandards, policies: &[PolicyRecord]) -> f64 {
    let mut exposure: BTreeMap<SolvencyBucket, f64> = BTreeMap::new();
    for policy in policies {
        *exposure.entry(SolvencyBucket::from(policy.product_type)).or_default() += policy.coverage_amount;
    }

    exposure
        .into_iter()
        .map(|(bucket, coverage)| coverage * standards.solvency_margins.rate(bucket))
        .sum()
}

/// Risk-based capital: `sqrt(C1² + C2² + C3²) + C4`
///
/// C1, C2 and C4 scale with total coverage, C3 with total reserves.
pub fn risk_based_capital(standards: &RegulatoryStandards, total_coverage: f64, total_reserves: f64) -> f64 {
    let factors = &standards.risk_based_capital;
    let c1 = total_coverage * factors.c1_asset_risk;
    let c2 = total_coverage * factors.c2_insurance_risk;
    let c3 = total_reserves * factors.c3_interest_rate_risk;
    let c4 = total_coverage * factors.c4_business_risk;

    (c1 * c1 + c2 * c2 + c3 * c3).sqrt() + c4
}

/// Reserves must cover the larger of the solvency margin and RBC; equality passes
pub fn reserves_adequate(total_reserves: f64, solvency_margin: f64, risk_based_capital: f64) -> bool {
    total_reserves >= solvency_margin.max(risk_based_capital)
}

/// `(reserves + solvency margin) / RBC` must reach the minimum ratio; no RBC always passes
pub fn capital_adequate(
    total_reserves: f64,
    solvency_margin: f64,
    risk_based_capital: f64,
    minimum_ratio: f64,
) -> bool {
    if risk_based_capital <= 0.0 {
        return true;
    }
    (total_reserves + solvency_margin) / risk_based_capital >= minimum_ratio
}
