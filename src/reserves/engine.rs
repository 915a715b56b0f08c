//! Portfolio reserve engine
//!
//! Each policy carries three reserve components at the valuation date:
//! - Policy reserve: prospective `PVFB - PVFP`, floored at the product's
//!   minimum reserve ratio of coverage
//! - Unearned premium: the share of the annual premium covering days up to
//!   the next policy anniversary
//! - Claims reserve: a flat factor of coverage for incurred claims
//!
//! Policies are valued in parallel and summed in input order so totals are
//! reproducible run to run.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use rayon::prelude::*;

use crate::format;
use crate::policy::{PolicyRecord, ProductType};
use crate::tables::Tables;
use crate::valuation::PresentValueEngine;
use super::solvency::{reserves_adequate, risk_based_capital, solvency_margin};
use super::types::{PolicyReserve, ReserveCalculation};

/// Days in the unearned premium year
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Reserve calculator pinned to one valuation date
#[derive(Debug, Clone)]
pub struct ReserveEngine {
    tables: Arc<Tables>,
    valuation_date: NaiveDate,
}

impl ReserveEngine {
    pub fn new(tables: Arc<Tables>, valuation_date: NaiveDate) -> Self {
        Self { tables, valuation_date }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn valuation_date(&self) -> NaiveDate {
        self.valuation_date
    }

    fn present_values(&self) -> PresentValueEngine<'_> {
        PresentValueEngine::from_tables(&self.tables)
    }

    /// PV of future benefits over the remaining years
    ///
    /// Mortality drives every product; critical illness also carries a flat
    /// morbidity load per year.
    pub fn future_benefits_pv(&self, policy: &PolicyRecord) -> f64 {
        let mortality = &self.tables.mortality;
        let morbidity_load = match policy.product_type {
            ProductType::CriticalIllness => self.tables.regulatory.critical_illness_morbidity_load,
            _ => 0.0,
        };

        self.present_values()
            .benefit_pv_with(policy.coverage_amount, policy.remaining_years, |year| {
                mortality.annual_rate(policy.current_age.saturating_add(year), policy.gender) + morbidity_load
            })
    }

    /// PV of premiums still to be collected while the insured survives
    pub fn future_premiums_pv(&self, policy: &PolicyRecord) -> f64 {
        policy.annual_premium
            * self
                .present_values()
                .premium_annuity_pv(policy.current_age, policy.gender, policy.remaining_years)
    }

    /// `max(PVFB - PVFP, coverage × minimum reserve ratio)`
    pub fn policy_reserve(&self, policy: &PolicyRecord) -> f64 {
        self.floored_reserve(policy, self.future_benefits_pv(policy), self.future_premiums_pv(policy))
    }

    fn floored_reserve(&self, policy: &PolicyRecord, benefits_pv: f64, premiums_pv: f64) -> f64 {
        let minimum = policy.coverage_amount * self.tables.regulatory.min_reserve_ratio(policy.product_type);
        (benefits_pv - premiums_pv).max(minimum)
    }

    /// First anniversary strictly after the valuation date
    ///
    /// A Feb 29 anniversary falls on Feb 28 in non-leap years.
    pub fn next_anniversary(&self, anniversary: NaiveDate) -> Option<NaiveDate> {
        let year = self.valuation_date.year();
        let this_year = anniversary_in(year, anniversary)?;
        if this_year > self.valuation_date {
            Some(this_year)
        } else {
            anniversary_in(year + 1, anniversary)
        }
    }

    /// Annual premium × days to next anniversary / 365, never negative
    pub fn unearned_premium(&self, policy: &PolicyRecord) -> f64 {
        let days_remaining = self
            .next_anniversary(policy.policy_anniversary)
            .map_or(0, |next| (next - self.valuation_date).num_days());
        (policy.annual_premium * days_remaining as f64 / DAYS_PER_YEAR).max(0.0)
    }

    pub fn claims_reserve(&self, policy: &PolicyRecord) -> f64 {
        policy.coverage_amount * self.tables.regulatory.claims_reserve_factor(policy.product_type)
    }

    /// All reserve components for one policy
    pub fn reserve_policy(&self, policy: &PolicyRecord) -> PolicyReserve {
        let benefits_pv = self.future_benefits_pv(policy);
        let premiums_pv = self.future_premiums_pv(policy);

        let reserve = PolicyReserve {
            policy_id: policy.policy_id.clone(),
            product_type: policy.product_type,
            benefits_pv,
            premiums_pv,
            policy_reserve: self.floored_reserve(policy, benefits_pv, premiums_pv),
            unearned_premium: self.unearned_premium(policy),
            claims_reserve: self.claims_reserve(policy),
        };
        debug!(
            "Policy {}: reserve {:.2}, UPR {:.2}, claims {:.2}",
            policy.label(),
            reserve.policy_reserve,
            reserve.unearned_premium,
            reserve.claims_reserve
        );
        reserve
    }

    /// Reserves, solvency margin and RBC for a whole portfolio
    pub fn calculate_portfolio_reserves(&self, policies: &[PolicyRecord]) -> ReserveCalculation {
        info!(
            "Valuing {} policies as of {}",
            policies.len(),
            self.valuation_date
        );

        let per_policy: Vec<PolicyReserve> = policies
            .par_iter()
            .map(|policy| self.reserve_policy(policy))
            .collect();

        let policy_reserves: f64 = per_policy.iter().map(|r| r.policy_reserve).sum();
        let unearned_premium_reserves: f64 = per_policy.iter().map(|r| r.unearned_premium).sum();
        let claims_reserves: f64 = per_policy.iter().map(|r| r.claims_reserve).sum();
        let total_reserves = policy_reserves + unearned_premium_reserves + claims_reserves;

        let standards = &self.tables.regulatory;
        let total_coverage: f64 = policies.iter().map(|p| p.coverage_amount).sum();
        let solvency_margin = solvency_margin(standards, policies);
        let risk_based_capital = risk_based_capital(standards, total_coverage, total_reserves);
        let regulatory_requirements_met = reserves_adequate(total_reserves, solvency_margin, risk_based_capital);

        info!(
            "Total reserves {:.2}, solvency margin {:.2}, RBC {:.2}, adequate: {}",
            total_reserves, solvency_margin, risk_based_capital, regulatory_requirements_met
        );

        let mut calc = ReserveCalculation {
            valuation_date: self.valuation_date,
            policy_reserves,
            unearned_premium_reserves,
            claims_reserves,
            total_reserves,
            solvency_margin,
            risk_based_capital,
            regulatory_requirements_met,
            compliance_notes: String::new(),
            policies: per_policy,
        };
        calc.compliance_notes = compliance_notes(&calc);
        calc
    }
}

fn anniversary_in(year: i32, anniversary: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, anniversary.month(), anniversary.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, anniversary.month(), 28))
}

fn compliance_notes(calc: &ReserveCalculation) -> String {
    let mut notes = format!(
        "RESERVE ADEQUACY ASSESSMENT\n\n\
         Total Policy Reserves: {}\n\
         Required Solvency Margin: {}\n\
         Risk-Based Capital Requirement: {}\n\n\
         Capital Adequacy Ratio: {:.2}x\n\n",
        format::currency(calc.total_reserves, 2),
        format::currency(calc.solvency_margin, 2),
        format::currency(calc.risk_based_capital, 2),
        calc.capital_ratio(),
    );

    if calc.regulatory_requirements_met {
        notes.push_str(
            "REGULATORY COMPLIANCE: PASSED\n\n\
             All reserve requirements meet or exceed regulatory minimums.\n\
             Capital levels are adequate for current risk profile.\n",
        );
    } else {
        notes.push_str(
            "REGULATORY COMPLIANCE: FAILED\n\n\
             WARNING: Reserve levels below regulatory requirements.\n\
             Immediate action required to increase reserves or reduce risk exposure.\n",
        );
    }
    notes.push_str("\nCalculations follow applicable insurance regulations and actuarial standards.");
    notes
}
