//! Risk assessment: medical, lifestyle, occupation and financial underwriting
//!
//! The overall multiplier is `medical × lifestyle × occupation`, capped at 10x.
//! The financial score is reported alongside it and only gates the decision.

mod applicant;
mod decision;
mod financial;
mod lifestyle;
mod medical;
mod occupation;

pub use applicant::Applicant;
pub use decision::{decide, UnderwritingDecision};
pub use medical::{body_mass_index, BmiBand};

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::policy::ProductType;
use crate::tables::Tables;

/// Cap on the combined medical × lifestyle × occupation multiplier
pub const MAX_RISK_MULTIPLIER: f64 = 10.0;

/// Running multiplier plus the factor descriptions that produced it
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FactorAssessment {
    pub multiplier: f64,
    pub factors: Vec<String>,
}

impl FactorAssessment {
    fn neutral() -> Self {
        Self {
            multiplier: 1.0,
            factors: Vec::new(),
        }
    }

    fn apply(&mut self, multiplier: f64, factor: String) {
        self.multiplier *= multiplier;
        self.factors.push(factor);
    }

    fn apply_silently(&mut self, multiplier: f64) {
        self.multiplier *= multiplier;
    }

    /// Replace the running value instead of compounding it
    fn set(&mut self, value: f64, factor: String) {
        self.multiplier = value;
        self.factors.push(factor);
    }
}

/// Outcome of underwriting one application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk_multiplier: f64,
    pub medical_risk_multiplier: f64,
    pub lifestyle_risk_multiplier: f64,
    pub occupation_risk_multiplier: f64,
    pub financial_risk_score: f64,
    pub decision: UnderwritingDecision,
    /// Largest coverage the decision allows, never above the request
    pub maximum_coverage: f64,
    /// Medical, lifestyle, occupation then financial factors, in evaluation order
    pub risk_factors: Vec<String>,
    pub underwriting_notes: String,
}

/// Underwriting engine over shared rule tables
#[derive(Debug, Clone)]
pub struct UnderwritingEngine {
    tables: Arc<Tables>,
}

impl UnderwritingEngine {
    pub fn new(tables: Arc<Tables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Rate an application for `coverage` of `product_type`
    ///
    /// For disability income `coverage` is compared against monthly income in the
    /// financial checks.
    pub fn assess_risk(&self, applicant: &Applicant, product_type: ProductType, coverage: f64) -> RiskAssessment {
        let rules = &self.tables.rules;

        let medical = medical::assess(rules, applicant);
        let lifestyle = lifestyle::assess(rules, applicant);
        let occupation = occupation::assess(rules, applicant);
        let financial = financial::assess(&rules.financial, applicant, product_type, coverage);

        let overall = combine(medical.multiplier, lifestyle.multiplier, occupation.multiplier);
        let (decision, maximum_coverage) = decide(overall, financial.multiplier, coverage);

        let mut risk_factors = medical.factors;
        risk_factors.extend(lifestyle.factors);
        risk_factors.extend(occupation.factors);
        risk_factors.extend(financial.factors);

        log::debug!(
            "Underwrote {} age {} for {:.0}: overall {:.3}x, financial {:.2}, {}",
            product_type,
            applicant.age,
            coverage,
            overall,
            financial.multiplier,
            decision
        );

        let underwriting_notes = underwriting_notes(&risk_factors, overall, decision);

        RiskAssessment {
            overall_risk_multiplier: overall,
            medical_risk_multiplier: medical.multiplier,
            lifestyle_risk_multiplier: lifestyle.multiplier,
            occupation_risk_multiplier: occupation.multiplier,
            financial_risk_score: financial.multiplier,
            decision,
            maximum_coverage,
            risk_factors,
            underwriting_notes,
        }
    }
}

/// Combined multiplier, capped at [`MAX_RISK_MULTIPLIER`]
pub fn combine(medical: f64, lifestyle: f64, occupation: f64) -> f64 {
    (medical * lifestyle * occupation).min(MAX_RISK_MULTIPLIER)
}

fn underwriting_notes(risk_factors: &[String], overall: f64, decision: UnderwritingDecision) -> String {
    let mut notes = String::from("UNDERWRITING ASSESSMENT SUMMARY\n\n");
    let _ = writeln!(notes, "Decision: {}", decision.title());
    let _ = writeln!(notes, "Overall Risk Multiplier: {:.2}x", overall);
    notes.push_str("\nRISK FACTORS IDENTIFIED:\n");

    if risk_factors.is_empty() {
        notes.push_str("No significant risk factors identified.\n");
    } else {
        for (idx, factor) in risk_factors.iter().enumerate() {
            let _ = writeln!(notes, "{}. {}", idx + 1, factor);
        }
    }

    notes.push_str("\nUNDERWRITING RATIONALE:\n");
    let _ = writeln!(
        notes,
        "Risk multiplier of {:.2}x combines the medical, lifestyle and occupation ratings. \
         Financial capacity is scored separately and gates the decision.",
        overall
    );
    notes.push_str("\nRECOMMENDATIONS:\n");
    notes.push_str(decision.recommendation());
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Gender;
    use crate::tables::{AlcoholUse, SmokingStatus};
    use approx::assert_relative_eq;

    fn engine() -> UnderwritingEngine {
        UnderwritingEngine::new(Arc::new(Tables::default_pricing()))
    }

    fn healthy(age: u32) -> Applicant {
        let mut applicant = Applicant::new(age, Gender::Male);
        applicant.annual_income = 150_000.0;
        applicant.net_worth = 400_000.0;
        applicant.total_debt = 20_000.0;
        applicant
    }

    #[test]
    fn test_clean_standard_applicant() {
        let assessment = engine().assess_risk(&healthy(35), ProductType::TermLife, 500_000.0);

        assert_eq!(assessment.overall_risk_multiplier, 1.0);
        assert_eq!(assessment.financial_risk_score, 1.0);
        assert_eq!(assessment.decision, UnderwritingDecision::ApprovedStandard);
        assert_eq!(assessment.maximum_coverage, 500_000.0);
        assert!(assessment.risk_factors.is_empty());
        assert!(assessment.underwriting_notes.contains("No significant risk factors identified."));
    }

    #[test]
    fn test_professional_is_preferred() {
        let mut applicant = healthy(35);
        applicant.occupation_class = 1;
        applicant.occupation_title = "Engineer".into();

        let assessment = engine().assess_risk(&applicant, ProductType::TermLife, 500_000.0);
        assert_relative_eq!(assessment.overall_risk_multiplier, 0.9);
        assert_eq!(assessment.decision, UnderwritingDecision::ApprovedPreferred);
    }

    #[test]
    fn test_overall_capped_at_ten() {
        let mut applicant = healthy(65);
        applicant.medical_conditions = vec!["coronary_artery_disease".into(), "copd".into()];
        applicant.smoking_status = SmokingStatus::CurrentSmoker;
        applicant.alcohol_use = AlcoholUse::HeavyUse;
        applicant.hazardous_activities = vec!["motor_racing".into()];
        applicant.occupation_class = 5;

        let assessment = engine().assess_risk(&applicant, ProductType::WholeLife, 250_000.0);
        assert_eq!(assessment.overall_risk_multiplier, MAX_RISK_MULTIPLIER);
        assert!(assessment.medical_risk_multiplier > 1.0);
        assert_eq!(assessment.decision, UnderwritingDecision::Declined);
        assert_eq!(assessment.maximum_coverage, 0.0);
    }

    #[test]
    fn test_overall_in_range_for_any_inputs() {
        let engine = engine();
        let conditions = ["", "asthma_mild", "diabetes_type_1", "unknown_thing"];
        let smoking = [SmokingStatus::NonSmoker, SmokingStatus::FormerSmoker, SmokingStatus::CurrentSmoker];

        for condition in conditions {
            for status in smoking {
                for class in 0..=6u8 {
                    for age in [20, 55, 70] {
                        let mut applicant = healthy(age);
                        if !condition.is_empty() {
                            applicant.medical_conditions = vec![condition.to_string()];
                        }
                        applicant.smoking_status = status;
                        applicant.occupation_class = class;
                        let overall = engine
                            .assess_risk(&applicant, ProductType::TermLife, 100_000.0)
                            .overall_risk_multiplier;
                        assert!(overall > 0.0 && overall <= MAX_RISK_MULTIPLIER);
                    }
                }
            }
        }
    }

    #[test]
    fn test_financial_decline_overrides_clean_health() {
        let mut applicant = healthy(45);
        applicant.net_worth = 100_000.0;

        let assessment = engine().assess_risk(&applicant, ProductType::TermLife, 6_000_000.0);
        assert!(assessment.financial_risk_score >= 3.0);
        assert_eq!(assessment.overall_risk_multiplier, 1.0);
        assert_eq!(assessment.decision, UnderwritingDecision::Declined);
        assert_eq!(assessment.maximum_coverage, 0.0);
    }

    #[test]
    fn test_substandard_caps_coverage() {
        let mut applicant = healthy(40);
        applicant.medical_conditions = vec!["diabetes_type_2_controlled".into()];
        applicant.annual_income = 1_000_000.0;
        applicant.net_worth = 5_000_000.0;

        let assessment = engine().assess_risk(&applicant, ProductType::TermLife, 3_000_000.0);
        assert_relative_eq!(assessment.overall_risk_multiplier, 1.5);
        assert_eq!(assessment.decision, UnderwritingDecision::ApprovedSubstandard);
        assert_eq!(assessment.maximum_coverage, 2_000_000.0);
    }

    #[test]
    fn test_factor_order_and_notes() {
        let mut applicant = healthy(35);
        applicant.medical_conditions = vec!["asthma_mild".into()];
        applicant.smoking_status = SmokingStatus::FormerSmoker;
        applicant.occupation_class = 3;
        applicant.occupation_title = "Electrician".into();
        applicant.annual_income = 10_000.0;

        let assessment = engine().assess_risk(&applicant, ProductType::TermLife, 500_000.0);
        assert_eq!(
            assessment.risk_factors,
            vec![
                "Medical: asthma_mild (Risk: 1.1x)".to_string(),
                "Smoking: former_smoker (1.3x multiplier)".to_string(),
                "Occupation: Electrician - Class 3 (1.15x)".to_string(),
                "Coverage exceeds 20.0x annual income limit".to_string(),
                "High debt-to-income ratio: 200.0%".to_string(),
            ]
        );

        let notes = &assessment.underwriting_notes;
        assert!(notes.starts_with("UNDERWRITING ASSESSMENT SUMMARY"));
        assert!(notes.contains("Decision: Approved Substandard"));
        assert!(notes.contains("1. Medical: asthma_mild (Risk: 1.1x)"));
        assert!(notes.contains("5. High debt-to-income ratio: 200.0%"));
        assert!(notes.ends_with(UnderwritingDecision::ApprovedSubstandard.recommendation()));
    }
}
