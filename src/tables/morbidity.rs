//! Morbidity tables for disability income and critical illness
//!
//! Morbidity is tabulated at a handful of ages (25, 35, ... 65). Lookups use
//! the closest tabulated age rather than interpolating; when two ages are
//! equally close the lower one wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};
use crate::policy::Gender;

/// Annual incidence rate for each gender at one tabulated age
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenderRates {
    pub male: f64,
    pub female: f64,
}

impl GenderRates {
    pub fn new(male: f64, female: f64) -> Self {
        Self { male, female }
    }

    pub fn for_gender(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }
}

/// Incidence rates keyed by tabulated age
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgeRateTable {
    rates: BTreeMap<u32, GenderRates>,
}

impl AgeRateTable {
    /// Build from `(age, male, female)` rows
    pub fn from_rows(rows: &[(u32, f64, f64)]) -> Self {
        Self {
            rates: rows
                .iter()
                .map(|&(age, male, female)| (age, GenderRates::new(male, female)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Tabulated age nearest to `age`; ties resolve to the lower age
    pub fn closest_age(&self, age: u32) -> Option<u32> {
        // BTreeMap iterates ascending and min_by_key keeps the first minimum
        self.rates.keys().copied().min_by_key(|&tabulated| tabulated.abs_diff(age))
    }

    /// Rate at an exact tabulated age
    pub fn rate_at(&self, age: u32, gender: Gender) -> Option<f64> {
        self.rates.get(&age).map(|rates| rates.for_gender(gender))
    }

    /// Rate at the tabulated age nearest to `age`
    pub fn closest_rate(&self, age: u32, gender: Gender) -> Option<f64> {
        self.closest_age(age).and_then(|tabulated| self.rate_at(tabulated, gender))
    }

    fn validate(&self, label: &str) -> Result<()> {
        for (age, rates) in &self.rates {
            for rate in [rates.male, rates.female] {
                if !(0.0..=1.0).contains(&rate) {
                    return Err(PricingError::InvalidConfiguration(format!(
                        "{} rate {} at age {} outside [0, 1]",
                        label, rate, age
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Disability incidence for one occupation class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisabilityClass {
    pub name: String,
    pub rates: AgeRateTable,
}

/// Elimination period tiers for disability income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WaitingPeriod {
    #[serde(rename = "30_days")]
    Days30,
    #[serde(rename = "90_days")]
    Days90,
    #[serde(rename = "180_days")]
    Days180,
    #[serde(rename = "365_days")]
    Days365,
}

impl WaitingPeriod {
    /// Bucket a waiting period in days: ≤30, ≤90, ≤180, otherwise 365
    pub fn from_days(days: u32) -> Self {
        match days {
            0..=30 => WaitingPeriod::Days30,
            31..=90 => WaitingPeriod::Days90,
            91..=180 => WaitingPeriod::Days180,
            _ => WaitingPeriod::Days365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WaitingPeriod::Days30 => "30_days",
            WaitingPeriod::Days90 => "90_days",
            WaitingPeriod::Days180 => "180_days",
            WaitingPeriod::Days365 => "365_days",
        }
    }
}

/// Premium adjustment for a waiting period tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitingPeriodAdjustment {
    pub benefit_percentage: f64,
    #[serde(default)]
    pub description: String,
}

/// Disability and critical illness morbidity
#[derive(Debug, Clone, PartialEq)]
pub struct MorbidityTables {
    disability_classes: BTreeMap<u8, DisabilityClass>,
    waiting_periods: BTreeMap<WaitingPeriod, WaitingPeriodAdjustment>,
    critical_illness: BTreeMap<String, AgeRateTable>,
}

impl MorbidityTables {
    pub fn new(
        disability_classes: BTreeMap<u8, DisabilityClass>,
        waiting_periods: BTreeMap<WaitingPeriod, WaitingPeriodAdjustment>,
        critical_illness: BTreeMap<String, AgeRateTable>,
    ) -> Self {
        Self {
            disability_classes,
            waiting_periods,
            critical_illness,
        }
    }

    /// Built-in morbidity matching `data/tables/morbidity_tables.json`
    pub fn standard() -> Self {
        let disability_classes = [
            (1, "Professional", [(0.0018, 0.0024), (0.0026, 0.0034), (0.0041, 0.0052), (0.0068, 0.0081), (0.0105, 0.0118)]),
            (2, "Standard Office", [(0.0024, 0.0031), (0.0034, 0.0044), (0.0053, 0.0067), (0.0087, 0.0104), (0.0134, 0.0151)]),
            (3, "Skilled Trade", [(0.0033, 0.0041), (0.0047, 0.0058), (0.0072, 0.0088), (0.0116, 0.0137), (0.0178, 0.0199)]),
            (4, "Manual Labor", [(0.0046, 0.0055), (0.0065, 0.0078), (0.0099, 0.0117), (0.0158, 0.0182), (0.0241, 0.0264)]),
            (5, "Hazardous Occupation", [(0.0068, 0.0079), (0.0095, 0.0110), (0.0143, 0.0164), (0.0226, 0.0255), (0.0342, 0.0371)]),
        ]
        .into_iter()
        .map(|(class, name, rates)| {
            let rows: Vec<(u32, f64, f64)> = [25, 35, 45, 55, 65]
                .into_iter()
                .zip(rates)
                .map(|(age, (male, female))| (age, male, female))
                .collect();
            let table = DisabilityClass {
                name: name.to_string(),
                rates: AgeRateTable::from_rows(&rows),
            };
            (class, table)
        })
        .collect();

        let waiting_periods = [
            (WaitingPeriod::Days30, 1.25),
            (WaitingPeriod::Days90, 1.0),
            (WaitingPeriod::Days180, 0.8),
            (WaitingPeriod::Days365, 0.65),
        ]
        .into_iter()
        .map(|(tier, benefit_percentage)| {
            let days = tier.as_str().trim_end_matches("_days");
            let adjustment = WaitingPeriodAdjustment {
                benefit_percentage,
                description: format!("{}-day elimination period", days),
            };
            (tier, adjustment)
        })
        .collect();

        let mut critical_illness = BTreeMap::new();
        critical_illness.insert(
            "cancer".to_string(),
            AgeRateTable::from_rows(&[
                (25, 0.0006, 0.0009),
                (35, 0.0011, 0.0017),
                (45, 0.0027, 0.0036),
                (55, 0.0061, 0.0064),
                (65, 0.0118, 0.0097),
            ]),
        );
        critical_illness.insert(
            "heart_attack".to_string(),
            AgeRateTable::from_rows(&[
                (25, 0.0002, 0.0001),
                (35, 0.0006, 0.0002),
                (45, 0.0017, 0.0006),
                (55, 0.0039, 0.0015),
                (65, 0.0072, 0.0034),
            ]),
        );
        critical_illness.insert(
            "stroke".to_string(),
            AgeRateTable::from_rows(&[
                (25, 0.0001, 0.0001),
                (35, 0.0002, 0.0002),
                (45, 0.0006, 0.0005),
                (55, 0.0015, 0.0012),
                (65, 0.0036, 0.0031),
            ]),
        );

        Self::new(disability_classes, waiting_periods, critical_illness)
    }

    pub fn disability_class(&self, occupation_class: u8) -> Option<&DisabilityClass> {
        self.disability_classes.get(&occupation_class)
    }

    pub fn occupation_classes(&self) -> impl Iterator<Item = u8> + '_ {
        self.disability_classes.keys().copied()
    }

    pub fn waiting_period(&self, tier: WaitingPeriod) -> Option<&WaitingPeriodAdjustment> {
        self.waiting_periods.get(&tier)
    }

    pub fn critical_illness_condition(&self, condition: &str) -> Option<&AgeRateTable> {
        self.critical_illness.get(condition)
    }

    /// Check every rate lies in `[0, 1]` and every waiting-period factor is positive
    pub fn validate(&self) -> Result<()> {
        for (class, table) in &self.disability_classes {
            table.rates.validate(&format!("disability class {}", class))?;
        }
        for (condition, table) in &self.critical_illness {
            table.validate(&format!("critical illness '{}'", condition))?;
        }
        for (tier, adjustment) in &self.waiting_periods {
            if !super::is_positive(adjustment.benefit_percentage) {
                return Err(PricingError::InvalidConfiguration(format!(
                    "waiting period {} has non-positive benefit percentage {}",
                    tier.as_str(),
                    adjustment.benefit_percentage
                )));
            }
        }
        Ok(())
    }
}
