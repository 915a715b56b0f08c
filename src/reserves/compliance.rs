//! Regulatory compliance of a quoted product

use log::{debug, warn};

use crate::policy::ProductType;
use crate::pricing::QuoteResult;
use crate::underwriting::RiskAssessment;
use super::engine::ReserveEngine;
use super::solvency::capital_adequate;
use super::types::{RegulatoryCompliance, ReserveCalculation};

impl ReserveEngine {
    /// Check reserves, capital, pricing loads and underwriting against regulatory limits
    ///
    /// Each failed check adds one note and one required action, in check order.
    pub fn assess_regulatory_compliance(
        &self,
        product_type: ProductType,
        quote: &QuoteResult,
        assessment: &RiskAssessment,
        coverage_amount: f64,
        reserves: &ReserveCalculation,
    ) -> RegulatoryCompliance {
        let standards = &self.tables().regulatory;

        let reserve_adequacy = reserves.total_reserves > 0.0 && reserves.regulatory_requirements_met;
        let capital_adequacy = capital_adequate(
            reserves.total_reserves,
            reserves.solvency_margin,
            reserves.risk_based_capital,
            standards.minimum_capital_ratio,
        );

        let limits = &standards.maximum_premium_rates;
        let pricing_compliance =
            quote.expense_load <= limits.expense_loading && quote.profit_margin <= limits.profit_margin;

        let underwriting = &standards.underwriting_standards;
        let underwriting_compliance = assessment.overall_risk_multiplier <= underwriting.maximum_risk_multiplier
            && coverage_amount <= underwriting.maximum_coverage_without_approval;

        let checks = [
            (
                reserve_adequacy,
                "Reserve levels below regulatory minimums",
                "Increase policy reserves to meet regulatory requirements",
            ),
            (
                capital_adequacy,
                "Capital levels insufficient for solvency requirements",
                "Increase capital or reduce risk exposure",
            ),
            (
                pricing_compliance,
                "Premium rates exceed regulatory maximums",
                "Reduce premium loadings to comply with rate regulations",
            ),
            (
                underwriting_compliance,
                "Underwriting practices do not meet regulatory standards",
                "Review underwriting guidelines and risk assessment procedures",
            ),
        ];

        let mut regulatory_notes = Vec::new();
        let mut required_actions = Vec::new();
        for (passed, note, action) in checks {
            if !passed {
                regulatory_notes.push(note.to_string());
                required_actions.push(action.to_string());
            }
        }

        let overall_compliance = regulatory_notes.is_empty();
        if overall_compliance {
            debug!("{} quote is compliant", product_type);
        } else {
            warn!(
                "{} quote fails {} regulatory check(s): {}",
                product_type,
                regulatory_notes.len(),
                regulatory_notes.join("; ")
            );
        }

        RegulatoryCompliance {
            reserve_adequacy,
            capital_adequacy,
            pricing_compliance,
            underwriting_compliance,
            overall_compliance,
            regulatory_notes,
            required_actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::tables::Tables;
    use crate::underwriting::UnderwritingDecision;

    fn engine() -> ReserveEngine {
        let valuation_date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        ReserveEngine::new(Arc::new(Tables::default_pricing()), valuation_date)
    }

    fn quote(expense_load: f64, profit_margin: f64) -> QuoteResult {
        QuoteResult {
            gross_premium: 100.0,
            net_premium: 70.0,
            expense_load,
            profit_margin,
            commission: 0.10,
            reserves: 10_000.0,
            risk_multiplier: 1.0,
            breakdown: BTreeMap::new(),
            explanation: String::new(),
        }
    }

    fn assessment(overall: f64) -> RiskAssessment {
        RiskAssessment {
            overall_risk_multiplier: overall,
            medical_risk_multiplier: overall,
            lifestyle_risk_multiplier: 1.0,
            occupation_risk_multiplier: 1.0,
            financial_risk_score: 0.0,
            decision: UnderwritingDecision::ApprovedStandard,
            maximum_coverage: 500_000.0,
            risk_factors: Vec::new(),
            underwriting_notes: String::new(),
        }
    }

    fn reserves(total: f64, solvency_margin: f64, rbc: f64) -> ReserveCalculation {
        ReserveCalculation {
            valuation_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            policy_reserves: total,
            unearned_premium_reserves: 0.0,
            claims_reserves: 0.0,
            total_reserves: total,
            solvency_margin,
            risk_based_capital: rbc,
            regulatory_requirements_met: total >= solvency_margin.max(rbc),
            compliance_notes: String::new(),
            policies: Vec::new(),
        }
    }

    #[test]
    fn test_fully_compliant() {
        let result = engine().assess_regulatory_compliance(
            ProductType::TermLife,
            &quote(0.15, 0.08),
            &assessment(1.0),
            500_000.0,
            &reserves(100_000.0, 20_000.0, 30_000.0),
        );

        assert!(result.overall_compliance);
        assert!(result.regulatory_notes.is_empty());
        assert!(result.required_actions.is_empty());
    }

    #[test]
    fn test_every_check_fails_in_order() {
        let result = engine().assess_regulatory_compliance(
            ProductType::WholeLife,
            &quote(0.35, 0.20),
            &assessment(12.0),
            12_000_000.0,
            &reserves(10.0, 20.0, 1_000.0),
        );

        assert!(!result.reserve_adequacy);
        assert!(!result.capital_adequacy);
        assert!(!result.pricing_compliance);
        assert!(!result.underwriting_compliance);
        assert!(!result.overall_compliance);
        assert_eq!(
            result.regulatory_notes,
            vec![
                "Reserve levels below regulatory minimums",
                "Capital levels insufficient for solvency requirements",
                "Premium rates exceed regulatory maximums",
                "Underwriting practices do not meet regulatory standards",
            ]
        );
        assert_eq!(result.required_actions[0], "Increase policy reserves to meet regulatory requirements");
        assert_eq!(
            result.required_actions[3],
            "Review underwriting guidelines and risk assessment procedures"
        );
    }

    #[test]
    fn test_zero_reserves_are_not_adequate() {
        let result = engine().assess_regulatory_compliance(
            ProductType::TermLife,
            &quote(0.15, 0.08),
            &assessment(1.0),
            100_000.0,
            &reserves(0.0, 0.0, 0.0),
        );

        assert!(!result.reserve_adequacy);
        assert!(result.capital_adequacy);
        assert_eq!(result.regulatory_notes, vec!["Reserve levels below regulatory minimums"]);
    }

    #[test]
    fn test_limits_are_inclusive() {
        let result = engine().assess_regulatory_compliance(
            ProductType::DisabilityIncome,
            &quote(0.30, 0.15),
            &assessment(10.0),
            10_000_000.0,
            &reserves(100.0, 100.0, 100.0),
        );

        assert!(result.reserve_adequacy);
        assert!(result.capital_adequacy);
        assert!(result.pricing_compliance);
        assert!(result.underwriting_compliance);
        assert!(result.overall_compliance);
    }

    #[test]
    fn test_declined_quote_passes_pricing() {
        let declined = QuoteResult::declined(7.5);
        let result = engine().assess_regulatory_compliance(
            ProductType::TermLife,
            &declined,
            &assessment(7.5),
            250_000.0,
            &reserves(50_000.0, 5_000.0, 10_000.0),
        );

        assert!(result.pricing_compliance);
        assert!(result.overall_compliance);
    }
}
