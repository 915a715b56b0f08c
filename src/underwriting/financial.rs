//! Financial underwriting: income limits, net worth tiers and debt load
//!
//! The result is a score rather than a premium multiplier. The income check and
//! the net worth check each set the score outright, so a later rule replaces an
//! earlier one instead of compounding with it. Only the debt adjustment
//! multiplies.

use super::{Applicant, FactorAssessment};
use crate::format;
use crate::policy::ProductType;
use crate::tables::FinancialRules;

/// Score for coverage beyond income or net worth limits
pub const ELEVATED_SCORE: f64 = 2.0;

/// Score for coverage of 5M or more without the required net worth
pub const DECLINE_SCORE: f64 = 3.0;

pub const HIGH_NET_WORTH_TIER: f64 = 1_000_000.0;
pub const VERY_HIGH_NET_WORTH_TIER: f64 = 5_000_000.0;

/// Debt-to-income ratios above this multiply the score
pub const MAX_DEBT_TO_INCOME: f64 = 0.4;
pub const DEBT_ADJUSTMENT: f64 = 1.3;

/// `coverage` is the face amount for life products and the monthly benefit for disability income
pub(super) fn assess(
    rules: &FinancialRules,
    applicant: &Applicant,
    product_type: ProductType,
    coverage: f64,
) -> FactorAssessment {
    let mut assessment = FactorAssessment::neutral();
    let income = applicant.annual_income;

    match product_type {
        ProductType::TermLife | ProductType::WholeLife => {
            let limit = income * rules.max_coverage_income_multiple;
            if coverage > limit {
                assessment.set(
                    ELEVATED_SCORE,
                    format!(
                        "Coverage exceeds {}x annual income limit",
                        format::multiplier(rules.max_coverage_income_multiple)
                    ),
                );
            }
        }
        ProductType::DisabilityIncome => {
            let limit = income / 12.0 * rules.max_benefit_income_share;
            if coverage > limit {
                assessment.set(
                    ELEVATED_SCORE,
                    format!(
                        "Monthly benefit exceeds {}% of monthly income",
                        format::multiplier(rules.max_benefit_income_share * 100.0)
                    ),
                );
            }
        }
        ProductType::CriticalIllness => {}
    }

    let net_worth_floor = if coverage >= VERY_HIGH_NET_WORTH_TIER {
        Some((rules.min_net_worth_5m, DECLINE_SCORE))
    } else if coverage >= HIGH_NET_WORTH_TIER {
        Some((rules.min_net_worth_1m, ELEVATED_SCORE))
    } else {
        None
    };

    if let Some((min_net_worth, score)) = net_worth_floor {
        if applicant.net_worth < min_net_worth {
            assessment.set(
                score,
                format!(
                    "Net worth below {} requirement for {} coverage",
                    format::currency(min_net_worth, 0),
                    format::currency(coverage, 0)
                ),
            );
        }
    }

    if income > 0.0 {
        let debt_to_income = applicant.total_debt / income;
        if debt_to_income > MAX_DEBT_TO_INCOME {
            assessment.apply(
                DEBT_ADJUSTMENT,
                format!("High debt-to-income ratio: {:.1}%", debt_to_income * 100.0),
            );
        }
    }

    assessment
}
