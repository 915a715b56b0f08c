//! Underwriting rule tables: medical, lifestyle, occupation and financial
//!
//! Medical conditions arrive grouped by category. They are flattened once into
//! a single condition map, and a condition listed under several categories
//! keeps the rule from the first category that lists it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};

/// Multiplier applied to any medical condition without a rule
pub const UNKNOWN_CONDITION_MULTIPLIER: f64 = 1.5;

/// One rating rule: a multiplier plus human-readable description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorRule {
    pub multiplier: f64,
    #[serde(default)]
    pub description: String,
}

impl RiskFactorRule {
    pub fn new(multiplier: f64, description: impl Into<String>) -> Self {
        Self {
            multiplier,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicalCategory {
    Cardiovascular,
    Metabolic,
    Respiratory,
    MentalHealth,
    CancerHistory,
    Neurological,
    #[serde(other)]
    Other,
}

/// A medical condition rule tagged with the category it was resolved from
#[derive(Debug, Clone, PartialEq)]
pub struct MedicalRule {
    pub category: MedicalCategory,
    pub multiplier: f64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    #[default]
    NonSmoker,
    FormerSmoker,
    CurrentSmoker,
    /// Any status the rule tables do not know; never rated
    #[serde(other)]
    Unknown,
}

impl SmokingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmokingStatus::NonSmoker => "non_smoker",
            SmokingStatus::FormerSmoker => "former_smoker",
            SmokingStatus::CurrentSmoker => "current_smoker",
            SmokingStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholUse {
    NoUse,
    #[default]
    ModerateUse,
    HeavyUse,
    /// Any value the rule tables do not know; never rated
    #[serde(other)]
    Unknown,
}

impl AlcoholUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlcoholUse::NoUse => "no_use",
            AlcoholUse::ModerateUse => "moderate_use",
            AlcoholUse::HeavyUse => "heavy_use",
            AlcoholUse::Unknown => "unknown",
        }
    }
}

/// Occupation rating class; applicants report a number 1 through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupationClass {
    #[serde(rename = "class_1_professional")]
    Professional,
    #[serde(rename = "class_2_standard")]
    Standard,
    #[serde(rename = "class_3_skilled")]
    Skilled,
    #[serde(rename = "class_4_manual")]
    Manual,
    #[serde(rename = "class_5_hazardous")]
    Hazardous,
}

impl OccupationClass {
    /// Map a reported class number; anything outside 1..=4 rates as hazardous
    pub fn from_number(class: u8) -> Self {
        match class {
            1 => OccupationClass::Professional,
            2 => OccupationClass::Standard,
            3 => OccupationClass::Skilled,
            4 => OccupationClass::Manual,
            _ => OccupationClass::Hazardous,
        }
    }
}

/// Financial underwriting limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRules {
    /// Life coverage may not exceed this multiple of annual income
    pub max_coverage_income_multiple: f64,
    /// Disability benefit may not exceed this share of monthly income
    pub max_benefit_income_share: f64,
    /// Minimum net worth for coverage of 1M or more
    pub min_net_worth_1m: f64,
    /// Minimum net worth for coverage of 5M or more
    pub min_net_worth_5m: f64,
}

impl Default for FinancialRules {
    fn default() -> Self {
        Self {
            max_coverage_income_multiple: 20.0,
            max_benefit_income_share: 0.6,
            min_net_worth_1m: 250_000.0,
            min_net_worth_5m: 1_000_000.0,
        }
    }
}

/// Medical conditions for one category, in file order
pub type CategoryRules = (MedicalCategory, Vec<(String, RiskFactorRule)>);

/// All underwriting rule tables, resolved for direct lookup
#[derive(Debug, Clone, PartialEq)]
pub struct UnderwritingRules {
    medical: HashMap<String, MedicalRule>,
    smoking: HashMap<SmokingStatus, RiskFactorRule>,
    alcohol: HashMap<AlcoholUse, RiskFactorRule>,
    hazardous_activities: HashMap<String, RiskFactorRule>,
    occupation: HashMap<OccupationClass, RiskFactorRule>,
    pub financial: FinancialRules,
}

impl UnderwritingRules {
    /// Resolve categorized medical rules into one flat map, first category wins
    pub fn new(
        medical_categories: Vec<CategoryRules>,
        smoking: HashMap<SmokingStatus, RiskFactorRule>,
        alcohol: HashMap<AlcoholUse, RiskFactorRule>,
        hazardous_activities: HashMap<String, RiskFactorRule>,
        occupation: HashMap<OccupationClass, RiskFactorRule>,
        financial: FinancialRules,
    ) -> Self {
        let mut medical = HashMap::new();
        for (category, conditions) in medical_categories {
            for (condition, rule) in conditions {
                medical.entry(condition).or_insert(MedicalRule {
                    category,
                    multiplier: rule.multiplier,
                    description: rule.description,
                });
            }
        }

        Self {
            medical,
            smoking,
            alcohol,
            hazardous_activities,
            occupation,
            financial,
        }
    }

    /// Built-in rules matching `data/tables/underwriting_rules.json`
    pub fn standard() -> Self {
        fn rules(entries: &[(&str, f64, &str)]) -> Vec<(String, RiskFactorRule)> {
            entries
                .iter()
                .map(|&(name, multiplier, description)| {
                    (name.to_string(), RiskFactorRule::new(multiplier, description))
                })
                .collect()
        }

        let medical = vec![
            (
                MedicalCategory::Cardiovascular,
                rules(&[
                    ("hypertension_controlled", 1.25, "Hypertension controlled with medication"),
                    ("hypertension_uncontrolled", 2.0, "Uncontrolled hypertension"),
                    ("coronary_artery_disease", 3.0, "Coronary artery disease"),
                    ("high_cholesterol", 1.15, "Elevated cholesterol"),
                ]),
            ),
            (
                MedicalCategory::Metabolic,
                rules(&[
                    ("diabetes_type_2_controlled", 1.5, "Type 2 diabetes, controlled"),
                    ("diabetes_type_1", 2.5, "Type 1 diabetes"),
                    ("high_cholesterol", 1.2, "Hyperlipidemia"),
                ]),
            ),
            (
                MedicalCategory::Respiratory,
                rules(&[
                    ("asthma_mild", 1.1, "Mild asthma"),
                    ("sleep_apnea", 1.3, "Treated sleep apnea"),
                    ("copd", 2.5, "Chronic obstructive pulmonary disease"),
                ]),
            ),
            (
                MedicalCategory::MentalHealth,
                rules(&[
                    ("anxiety", 1.1, "Generalized anxiety"),
                    ("depression_controlled", 1.2, "Depression, controlled"),
                ]),
            ),
            (
                MedicalCategory::CancerHistory,
                rules(&[
                    ("cancer_remission_5yr", 1.75, "Cancer in remission over 5 years"),
                    ("cancer_remission_2yr", 3.0, "Cancer in remission 2 to 5 years"),
                ]),
            ),
        ];

        let smoking = HashMap::from([
            (SmokingStatus::NonSmoker, RiskFactorRule::new(1.0, "No tobacco use")),
            (SmokingStatus::FormerSmoker, RiskFactorRule::new(1.3, "Quit tobacco over 12 months ago")),
            (SmokingStatus::CurrentSmoker, RiskFactorRule::new(2.5, "Current tobacco use")),
        ]);

        let alcohol = HashMap::from([
            (AlcoholUse::NoUse, RiskFactorRule::new(1.0, "No alcohol use")),
            (AlcoholUse::ModerateUse, RiskFactorRule::new(1.0, "Moderate alcohol use")),
            (AlcoholUse::HeavyUse, RiskFactorRule::new(1.5, "Heavy alcohol use")),
        ]);

        let hazardous_activities = rules(&[
            ("skydiving", 1.5, "Recreational skydiving"),
            ("scuba_diving", 1.2, "Scuba diving beyond 30m"),
            ("rock_climbing", 1.3, "Technical rock climbing"),
            ("private_aviation", 1.75, "Private pilot"),
            ("motor_racing", 2.0, "Competitive motor racing"),
        ])
        .into_iter()
        .collect();

        let occupation = HashMap::from([
            (OccupationClass::Professional, RiskFactorRule::new(0.9, "Professional and office occupations")),
            (OccupationClass::Standard, RiskFactorRule::new(1.0, "Standard occupations")),
            (OccupationClass::Skilled, RiskFactorRule::new(1.15, "Skilled trades")),
            (OccupationClass::Manual, RiskFactorRule::new(1.4, "Manual labor")),
            (OccupationClass::Hazardous, RiskFactorRule::new(2.0, "Hazardous occupations")),
        ]);

        Self::new(
            medical,
            smoking,
            alcohol,
            hazardous_activities,
            occupation,
            FinancialRules::default(),
        )
    }

    pub fn medical_rule(&self, condition: &str) -> Option<&MedicalRule> {
        self.medical.get(condition)
    }

    /// Condition multiplier, falling back to the conservative unknown-condition rating
    pub fn medical_multiplier(&self, condition: &str) -> f64 {
        self.medical_rule(condition)
            .map_or(UNKNOWN_CONDITION_MULTIPLIER, |rule| rule.multiplier)
    }

    /// `None` for statuses without a rule, including [`SmokingStatus::Unknown`]
    pub fn smoking_rule(&self, status: SmokingStatus) -> Option<&RiskFactorRule> {
        match status {
            SmokingStatus::Unknown => None,
            known => self.smoking.get(&known),
        }
    }

    pub fn alcohol_rule(&self, alcohol_use: AlcoholUse) -> Option<&RiskFactorRule> {
        match alcohol_use {
            AlcoholUse::Unknown => None,
            known => self.alcohol.get(&known),
        }
    }

    pub fn hazardous_activity_rule(&self, activity: &str) -> Option<&RiskFactorRule> {
        self.hazardous_activities.get(activity)
    }

    pub fn occupation_rule(&self, class: OccupationClass) -> Option<&RiskFactorRule> {
        self.occupation.get(&class)
    }

    /// Every multiplier must be finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        let medical = self
            .medical
            .iter()
            .map(|(name, rule)| (format!("medical condition '{}'", name), rule.multiplier));
        let smoking = self
            .smoking
            .iter()
            .map(|(status, rule)| (format!("smoking status '{}'", status.as_str()), rule.multiplier));
        let alcohol = self
            .alcohol
            .iter()
            .map(|(usage, rule)| (format!("alcohol use '{}'", usage.as_str()), rule.multiplier));
        let hazardous = self
            .hazardous_activities
            .iter()
            .map(|(name, rule)| (format!("hazardous activity '{}'", name), rule.multiplier));
        let occupation = self
            .occupation
            .iter()
            .map(|(class, rule)| (format!("occupation {:?}", class), rule.multiplier));

        for (label, multiplier) in medical.chain(smoking).chain(alcohol).chain(hazardous).chain(occupation) {
            if !super::is_positive(multiplier) {
                return Err(PricingError::InvalidConfiguration(format!(
                    "{} has non-positive multiplier {}",
                    label, multiplier
                )));
            }
        }

        let financial = &self.financial;
        for (label, value) in [
            ("max_coverage_income_multiple", financial.max_coverage_income_multiple),
            ("max_benefit_income_share", financial.max_benefit_income_share),
        ] {
            if !super::is_positive(value) {
                return Err(PricingError::InvalidConfiguration(format!(
                    "financial rule {} must be positive, got {}",
                    label, value
                )));
            }
        }

        Ok(())
    }
}
