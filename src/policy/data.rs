//! Policy-level data structures shared by pricing and reserving

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender of the insured, used to select the mortality/morbidity column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// Product lines priced by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    TermLife,
    WholeLife,
    DisabilityIncome,
    CriticalIllness,
}

impl ProductType {
    pub const ALL: [ProductType; 4] = [
        ProductType::TermLife,
        ProductType::WholeLife,
        ProductType::DisabilityIncome,
        ProductType::CriticalIllness,
    ];

    /// Key used in table files
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::TermLife => "term_life",
            ProductType::WholeLife => "whole_life",
            ProductType::DisabilityIncome => "disability_income",
            ProductType::CriticalIllness => "critical_illness",
        }
    }

    /// Display name used in quote explanations, e.g. "Term Life"
    pub fn title(&self) -> &'static str {
        match self {
            ProductType::TermLife => "Term Life",
            ProductType::WholeLife => "Whole Life",
            ProductType::DisabilityIncome => "Disability Income",
            ProductType::CriticalIllness => "Critical Illness",
        }
    }

    /// Term and whole life share mortality-based pricing and one solvency bucket
    pub fn is_life(&self) -> bool {
        matches!(self, ProductType::TermLife | ProductType::WholeLife)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductType::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown product type: {}", s))
    }
}

/// An inforce policy as input to the reserve engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    /// Optional identifier, used only for logging and reports
    #[serde(default)]
    pub policy_id: Option<String>,

    pub product_type: ProductType,

    /// Death benefit, lump sum, or annual benefit for disability income
    pub coverage_amount: f64,

    pub annual_premium: f64,

    /// Attained age at the valuation date
    pub current_age: u32,

    pub gender: Gender,

    /// Years of coverage left from the valuation date
    pub remaining_years: u32,

    /// Any past or future policy anniversary; only month and day are used
    pub policy_anniversary: NaiveDate,
}

impl PolicyRecord {
    pub fn new(
        product_type: ProductType,
        coverage_amount: f64,
        annual_premium: f64,
        current_age: u32,
        gender: Gender,
        remaining_years: u32,
        policy_anniversary: NaiveDate,
    ) -> Self {
        Self {
            policy_id: None,
            product_type,
            coverage_amount,
            annual_premium,
            current_age,
            gender,
            remaining_years,
            policy_anniversary,
        }
    }

    pub fn with_id(mut self, policy_id: impl Into<String>) -> Self {
        self.policy_id = Some(policy_id.into());
        self
    }

    /// Identifier for log lines
    pub fn label(&self) -> &str {
        self.policy_id.as_deref().unwrap_or("<unnamed>")
    }
}
