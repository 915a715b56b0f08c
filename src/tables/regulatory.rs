//! Regulatory standards for reserves, solvency and capital

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};
use crate::policy::ProductType;

/// Minimum reserve ratio for a product with no configured ratio
pub const DEFAULT_MIN_RESERVE_RATIO: f64 = 0.05;

/// Claims reserve factor for a product with no configured factor
pub const DEFAULT_CLAIMS_RESERVE_FACTOR: f64 = 0.001;

/// Product groupings that share a solvency margin rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolvencyBucket {
    Life,
    Disability,
    CriticalIllness,
}

impl From<ProductType> for SolvencyBucket {
    fn from(product_type: ProductType) -> Self {
        match product_type {
            ProductType::TermLife | ProductType::WholeLife => SolvencyBucket::Life,
            ProductType::DisabilityIncome => SolvencyBucket::Disability,
            ProductType::CriticalIllness => SolvencyBucket::CriticalIllness,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvencyMargins {
    pub life_insurance: f64,
    pub disability_insurance: f64,
    pub critical_illness: f64,
}

impl SolvencyMargins {
    pub fn rate(&self, bucket: SolvencyBucket) -> f64 {
        match bucket {
            SolvencyBucket::Life => self.life_insurance,
            SolvencyBucket::Disability => self.disability_insurance,
            SolvencyBucket::CriticalIllness => self.critical_illness,
        }
    }
}

/// Per-unit factors for the four RBC components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBasedCapitalFactors {
    pub c1_asset_risk: f64,
    pub c2_insurance_risk: f64,
    pub c3_interest_rate_risk: f64,
    pub c4_business_risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaximumPremiumRates {
    pub expense_loading: f64,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingStandards {
    pub maximum_risk_multiplier: f64,
    pub maximum_coverage_without_approval: f64,
}

fn default_ci_morbidity_load() -> f64 {
    0.002
}

fn default_minimum_capital_ratio() -> f64 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryStandards {
    pub minimum_reserve_ratios: BTreeMap<ProductType, f64>,
    pub claims_reserve_factors: BTreeMap<ProductType, f64>,
    pub solvency_margins: SolvencyMargins,
    pub risk_based_capital: RiskBasedCapitalFactors,
    pub maximum_premium_rates: MaximumPremiumRates,
    pub underwriting_standards: UnderwritingStandards,
    /// Flat annual morbidity added to critical illness benefit PVs in valuation
    #[serde(default = "default_ci_morbidity_load")]
    pub critical_illness_morbidity_load: f64,
    /// Required (reserves + solvency margin) / RBC
    #[serde(default = "default_minimum_capital_ratio")]
    pub minimum_capital_ratio: f64,
}

impl Default for RegulatoryStandards {
    fn default() -> Self {
        Self {
            minimum_reserve_ratios: BTreeMap::from([
                (ProductType::TermLife, 0.02),
                (ProductType::WholeLife, 0.15),
                (ProductType::DisabilityIncome, 0.25),
                (ProductType::CriticalIllness, 0.10),
            ]),
            claims_reserve_factors: BTreeMap::from([
                (ProductType::TermLife, 0.001),
                (ProductType::WholeLife, 0.002),
                (ProductType::DisabilityIncome, 0.05),
                (ProductType::CriticalIllness, 0.01),
            ]),
            solvency_margins: SolvencyMargins {
                life_insurance: 0.04,
                disability_insurance: 0.08,
                critical_illness: 0.06,
            },
            risk_based_capital: RiskBasedCapitalFactors {
                c1_asset_risk: 0.003,
                c2_insurance_risk: 0.015,
                c3_interest_rate_risk: 0.001,
                c4_business_risk: 0.003,
            },
            maximum_premium_rates: MaximumPremiumRates {
                expense_loading: 0.30,
                profit_margin: 0.15,
            },
            underwriting_standards: UnderwritingStandards {
                maximum_risk_multiplier: 10.0,
                maximum_coverage_without_approval: 10_000_000.0,
            },
            critical_illness_morbidity_load: default_ci_morbidity_load(),
            minimum_capital_ratio: default_minimum_capital_ratio(),
        }
    }
}

impl RegulatoryStandards {
    pub fn min_reserve_ratio(&self, product_type: ProductType) -> f64 {
        self.minimum_reserve_ratios
            .get(&product_type)
            .copied()
            .unwrap_or(DEFAULT_MIN_RESERVE_RATIO)
    }

    pub fn claims_reserve_factor(&self, product_type: ProductType) -> f64 {
        self.claims_reserve_factors
            .get(&product_type)
            .copied()
            .unwrap_or(DEFAULT_CLAIMS_RESERVE_FACTOR)
    }

    pub fn solvency_margin_rate(&self, product_type: ProductType) -> f64 {
        self.solvency_margins.rate(SolvencyBucket::from(product_type))
    }

    /// Every ratio, factor and limit must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        let rbc = &self.risk_based_capital;
        let margins = &self.solvency_margins;
        let mut checks: Vec<(String, f64)> = vec![
            ("solvency margin life_insurance".into(), margins.life_insurance),
            ("solvency margin disability_insurance".into(), margins.disability_insurance),
            ("solvency margin critical_illness".into(), margins.critical_illness),
            ("rbc c1_asset_risk".into(), rbc.c1_asset_risk),
            ("rbc c2_insurance_risk".into(), rbc.c2_insurance_risk),
            ("rbc c3_interest_rate_risk".into(), rbc.c3_interest_rate_risk),
            ("rbc c4_business_risk".into(), rbc.c4_business_risk),
            ("maximum expense_loading".into(), self.maximum_premium_rates.expense_loading),
            ("maximum profit_margin".into(), self.maximum_premium_rates.profit_margin),
            ("critical_illness_morbidity_load".into(), self.critical_illness_morbidity_load),
            ("minimum_capital_ratio".into(), self.minimum_capital_ratio),
        ];
        checks.extend(
            self.minimum_reserve_ratios
                .iter()
                .map(|(product, ratio)| (format!("minimum reserve ratio {}", product), *ratio)),
        );
        checks.extend(
            self.claims_reserve_factors
                .iter()
                .map(|(product, factor)| (format!("claims reserve factor {}", product), *factor)),
        );

        for (label, value) in checks {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PricingError::InvalidConfiguration(format!(
                    "{} must be non-negative, got {}",
                    label, value
                )));
            }
        }
        Ok(())
    }
}
