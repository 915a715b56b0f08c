//! Actuarial present values of benefits and premium annuities
//!
//! Both calculations step year by year over `[0, term)`:
//! - Benefit PV: `Σ coverage × incidence(age + t) × v^t`. Survival is NOT
//!   carried forward, each year's incidence cost stands on its own.
//! - Premium annuity PV: `Σ survival_t × v^t`, with survival reduced each year
//!   by that year's mortality.
//!
//! The asymmetry is the pricing convention the tables were calibrated against
//! and must not be "corrected" here.

use std::str::FromStr;

use crate::error::{PricingError, Result};
use crate::policy::Gender;
use crate::tables::{MortalityTable, Tables};
use super::discount::DiscountRate;

/// Age at which "to age 65" disability benefits and premiums stop
pub const DISABILITY_END_AGE: u32 = 65;

/// Net premium from benefit and annuity PVs; zero when the annuity is zero
pub fn net_premium(benefit_pv: f64, annuity_pv: f64) -> f64 {
    if annuity_pv > 0.0 {
        benefit_pv / annuity_pv
    } else {
        0.0
    }
}

/// Present value calculator over one mortality table and discount rate
#[derive(Debug, Clone, Copy)]
pub struct PresentValueEngine<'a> {
    mortality: &'a MortalityTable,
    discount: DiscountRate,
}

impl<'a> PresentValueEngine<'a> {
    pub fn new(mortality: &'a MortalityTable, discount: DiscountRate) -> Self {
        Self { mortality, discount }
    }

    pub fn from_tables(tables: &'a Tables) -> Self {
        Self::new(&tables.mortality, tables.discount_rate)
    }

    /// Generic benefit PV: `Σ amount × incidence(t) × v^t` for `t in 0..years`
    pub fn benefit_pv_with<F>(&self, amount: f64, years: u32, incidence: F) -> f64
    where
        F: Fn(u32) -> f64,
    {
        (0..years)
            .map(|year| amount * incidence(year) * self.discount.discount_factor(year))
            .sum()
    }

    /// Discounted sum of annual mortality rates, `Σ q(age + t) × v^t`
    pub fn mortality_cost(&self, age: u32, gender: Gender, term: u32) -> f64 {
        self.benefit_pv_with(1.0, term, |year| {
            self.mortality.annual_rate(age.saturating_add(year), gender)
        })
    }

    /// PV of a death benefit over the term
    pub fn life_benefit_pv(&self, coverage: f64, age: u32, gender: Gender, term: u32) -> f64 {
        coverage * self.mortality_cost(age, gender, term)
    }

    /// PV of a benefit with a constant annual incidence rate
    pub fn level_benefit_pv(&self, annual_benefit: f64, incidence_rate: f64, years: u32) -> f64 {
        self.benefit_pv_with(annual_benefit, years, |_| incidence_rate)
    }

    /// PV of a unit premium paid at the start of each year while alive
    pub fn premium_annuity_pv(&self, age: u32, gender: Gender, term: u32) -> f64 {
        let mut pv = 0.0;
        let mut survival_probability = 1.0;

        for year in 0..term {
            let q = self.mortality.annual_rate(age.saturating_add(year), gender);
            pv += survival_probability * self.discount.discount_factor(year);
            survival_probability *= 1.0 - q;
        }

        pv
    }

    /// Net level premium for a death benefit over the term
    pub fn life_net_premium(&self, coverage: f64, age: u32, gender: Gender, term: u32) -> f64 {
        net_premium(
            self.life_benefit_pv(coverage, age, gender, term),
            self.premium_annuity_pv(age, gender, term),
        )
    }
}

/// How long disability benefits are payable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenefitPeriod {
    ToAge65,
    Years(u32),
}

impl BenefitPeriod {
    /// Number of benefit years for an insured of the given age
    pub fn years(&self, age: u32) -> u32 {
        match self {
            BenefitPeriod::ToAge65 => DISABILITY_END_AGE.saturating_sub(age),
            BenefitPeriod::Years(years) => *years,
        }
    }
}

impl FromStr for BenefitPeriod {
    type Err = PricingError;

    /// Accepts `to_age_65` or a leading year count such as `10_years` or `5 years`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "to_age_65" {
            return Ok(BenefitPeriod::ToAge65);
        }

        s.split(|c: char| c == '_' || c.is_whitespace())
            .next()
            .and_then(|token| token.parse::<u32>().ok())
            .map(BenefitPeriod::Years)
            .ok_or_else(|| PricingError::Validation(format!("Unrecognized benefit period '{}'", s)))
    }
}
