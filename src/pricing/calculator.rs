//! Premium calculator for life, disability income and critical illness
//!
//! Every product follows the same pipeline: validate against the product
//! definition, take the ratio of benefit PV to premium annuity PV as the net
//! premium, adjust it, then gross it up by `1 + expense + profit + commission`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::quote::{LoadAmounts, QuoteResult};
use crate::error::{PricingError, Result};
use crate::format;
use crate::policy::{Gender, ProductType};
use crate::tables::{SmokingStatus, Tables, WaitingPeriod};
use crate::underwriting::{Applicant, RiskAssessment};
use crate::valuation::{net_premium, BenefitPeriod, PresentValueEngine, DISABILITY_END_AGE};

/// Critical illness cover is priced over a fixed 20-year horizon
pub const CRITICAL_ILLNESS_TERM: u32 = 20;

/// Risk factors that feed the life pricing multiplier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    #[serde(default)]
    pub smoking_status: SmokingStatus,
    #[serde(default)]
    pub hazardous_activities: Vec<String>,
}

impl RiskFactors {
    pub fn from_applicant(applicant: &Applicant) -> Self {
        Self {
            medical_conditions: applicant.medical_conditions.clone(),
            smoking_status: applicant.smoking_status,
            hazardous_activities: applicant.hazardous_activities.clone(),
        }
    }
}

/// Prices individual quotes from shared tables
#[derive(Debug, Clone)]
pub struct PremiumCalculator {
    tables: Arc<Tables>,
}

impl PremiumCalculator {
    pub fn new(tables: Arc<Tables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    fn present_values(&self) -> PresentValueEngine<'_> {
        PresentValueEngine::from_tables(&self.tables)
    }

    /// Composite multiplier from medical, smoking and hazardous activity rules
    ///
    /// Unknown medical conditions take the conservative default; unknown
    /// smoking statuses and activities have no effect.
    pub fn risk_multiplier(&self, risk_factors: &RiskFactors) -> f64 {
        let rules = &self.tables.rules;

        let medical: f64 = risk_factors
            .medical_conditions
            .iter()
            .map(|condition| rules.medical_multiplier(condition))
            .product();
        let smoking = rules
            .smoking_rule(risk_factors.smoking_status)
            .map_or(1.0, |rule| rule.multiplier);
        let hazardous: f64 = risk_factors
            .hazardous_activities
            .iter()
            .filter_map(|activity| rules.hazardous_activity_rule(activity))
            .map(|rule| rule.multiplier)
            .product();

        medical * smoking * hazardous
    }

    /// Term or whole life premium
    ///
    /// Term life gross premiums are monthly; the breakdown carries the annual
    /// figure as `annual_premium`.
    pub fn price_life(
        &self,
        age: u32,
        gender: Gender,
        coverage: f64,
        term: u32,
        product_type: ProductType,
        risk_factors: &RiskFactors,
    ) -> Result<QuoteResult> {
        crate::require!(
            product_type.is_life(),
            "{} cannot be priced as life insurance",
            product_type
        );
        let product = self.tables.products.get(product_type)?;
        product.validate_age(age)?;
        product.validate_coverage(coverage)?;
        product.validate_term(term)?;

        let pv = self.present_values();
        let mortality_cost = pv.mortality_cost(age, gender, term);
        let benefit_pv = coverage * mortality_cost;
        let annuity_pv = pv.premium_annuity_pv(age, gender, term);
        let net = net_premium(benefit_pv, annuity_pv);

        let risk_multiplier = self.risk_multiplier(risk_factors);
        let adjusted_net = net * risk_multiplier;
        let gross = adjusted_net * product.load_factor();
        let reserves = coverage * product.reserve_factor();
        let loads = LoadAmounts::from_gross(gross, product);

        let annual_premium = if product_type == ProductType::TermLife {
            gross * 12.0
        } else {
            gross
        };

        let breakdown = BTreeMap::from([
            ("base_mortality_cost".to_string(), mortality_cost),
            ("net_premium".to_string(), net),
            ("risk_adjustment".to_string(), risk_multiplier),
            ("adjusted_net_premium".to_string(), adjusted_net),
            ("expense_loading".to_string(), loads.expense),
            ("profit_margin".to_string(), loads.profit),
            ("commission".to_string(), loads.commission),
            ("policy_reserves".to_string(), reserves),
            ("annual_premium".to_string(), annual_premium),
        ]);

        log::debug!(
            "Priced {} age {} {} for {:.0} over {} years: net {:.4}, gross {:.4}",
            product_type,
            age,
            gender,
            coverage,
            term,
            net,
            gross
        );

        let explanation = format!(
            "Life Insurance Premium Calculation:\n\n\
             Applicant: {}-year-old {}\n\
             Coverage: {} {}\n\
             Term: {} years\n\
             Risk Multiplier: {:.2}x\n\n\
             Premium uses 2017 CSO mortality with actuarial present values. \
             It includes mortality cost, expense loading, profit margin and commission, \
             and holds the statutory reserve for the product.",
            age,
            gender,
            format::currency(coverage, 0),
            product_type.title(),
            term,
            risk_multiplier
        );

        Ok(QuoteResult {
            gross_premium: gross,
            net_premium: net,
            expense_load: product.expense_load,
            profit_margin: product.profit_margin,
            commission: product.commission,
            reserves,
            risk_multiplier,
            breakdown,
            explanation,
        })
    }

    /// Monthly disability income premium
    ///
    /// Benefits run for the benefit period; premiums are payable to age 65.
    pub fn price_disability(
        &self,
        age: u32,
        gender: Gender,
        occupation_class: u8,
        monthly_benefit: f64,
        benefit_period: BenefitPeriod,
        waiting_period_days: u32,
    ) -> Result<QuoteResult> {
        let product = self.tables.products.get(ProductType::DisabilityIncome)?;
        product.validate_age(age)?;
        crate::require!(
            monthly_benefit >= product.min_coverage && monthly_benefit <= product.max_coverage,
            "Monthly benefit {} outside valid range {}-{}",
            format::currency(monthly_benefit, 0),
            format::currency(product.min_coverage, 0),
            format::currency(product.max_coverage, 0)
        );

        let morbidity = &self.tables.morbidity;
        let class = morbidity
            .disability_class(occupation_class)
            .ok_or_else(|| PricingError::Validation(format!("Invalid occupation class {}", occupation_class)))?;
        let morbidity_rate = class.rates.closest_rate(age, gender).ok_or_else(|| {
            PricingError::ConfigurationAbsent(format!("disability rates for occupation class {}", occupation_class))
        })?;

        let tier = WaitingPeriod::from_days(waiting_period_days);
        let waiting = morbidity
            .waiting_period(tier)
            .ok_or_else(|| PricingError::ConfigurationAbsent(format!("waiting period {}", tier.as_str())))?;

        let pv = self.present_values();
        let benefit_years = benefit_period.years(age);
        let benefit_pv = pv.level_benefit_pv(monthly_benefit * 12.0, morbidity_rate, benefit_years);
        let annuity_pv = pv.premium_annuity_pv(age, gender, DISABILITY_END_AGE.saturating_sub(age));
        let net = net_premium(benefit_pv, annuity_pv);

        let adjusted_net = net * waiting.benefit_percentage;
        let gross = adjusted_net * product.load_factor();
        let reserves = monthly_benefit * 12.0 * product.reserve_factor();

        let breakdown = BTreeMap::from([
            ("base_morbidity_rate".to_string(), morbidity_rate),
            ("net_premium".to_string(), net),
            ("waiting_period_adjustment".to_string(), waiting.benefit_percentage),
            ("adjusted_net_premium".to_string(), adjusted_net),
            ("monthly_premium".to_string(), gross),
            ("annual_premium".to_string(), gross * 12.0),
            ("occupation_class".to_string(), f64::from(occupation_class)),
        ]);

        log::debug!(
            "Priced disability income age {} class {} for {:.0}/month: morbidity {:.4}, gross {:.4}",
            age,
            occupation_class,
            monthly_benefit,
            morbidity_rate,
            gross
        );

        let period = match benefit_period {
            BenefitPeriod::ToAge65 => "To Age 65".to_string(),
            BenefitPeriod::Years(years) => format!("{} Years", years),
        };
        let explanation = format!(
            "Disability Income Insurance Calculation:\n\n\
             Applicant: {}-year-old {}\n\
             Occupation: Class {} - {}\n\
             Monthly Benefit: {}\n\
             Benefit Period: {}\n\
             Waiting Period: {} days\n\n\
             Premium uses morbidity rates for the occupation class with actuarial present values.",
            age,
            gender,
            occupation_class,
            class.name,
            format::currency(monthly_benefit, 0),
            period,
            waiting_period_days
        );

        Ok(QuoteResult {
            gross_premium: gross,
            net_premium: net,
            expense_load: product.expense_load,
            profit_margin: product.profit_margin,
            commission: product.commission,
            reserves,
            risk_multiplier: 1.0,
            breakdown,
            explanation,
        })
    }

    /// Critical illness premium over the standard 20-year horizon
    ///
    /// Incidence is the sum over covered conditions at the tabulated age
    /// closest to the applicant's, using the first covered condition's ages.
    /// The underwriting multiplier is applied to the gross premium here.
    pub fn price_critical_illness(
        &self,
        applicant: &Applicant,
        coverage: f64,
        risk_assessment: &RiskAssessment,
    ) -> Result<QuoteResult> {
        let product = self.tables.products.get(ProductType::CriticalIllness)?;
        let age = applicant.age;
        let gender = applicant.gender;
        product.validate_age(age)?;
        product.validate_coverage(coverage)?;

        let morbidity = &self.tables.morbidity;
        let first = product
            .covered_conditions
            .first()
            .ok_or_else(|| PricingError::ConfigurationAbsent("critical illness covered conditions".to_string()))?;
        let target_age = morbidity
            .critical_illness_condition(first)
            .and_then(|table| table.closest_age(age))
            .ok_or_else(|| PricingError::ConfigurationAbsent(format!("critical illness rates for '{}'", first)))?;

        let mut total_rate = 0.0;
        for condition in &product.covered_conditions {
            let Some(table) = morbidity.critical_illness_condition(condition) else {
                log::warn!("No incidence table for covered condition '{}', skipping", condition);
                continue;
            };
            total_rate += table.rate_at(target_age, gender).ok_or_else(|| {
                PricingError::ConfigurationAbsent(format!(
                    "critical illness rate for '{}' at age {}",
                    condition, target_age
                ))
            })?;
        }

        let pv = self.present_values();
        let benefit_pv = pv.level_benefit_pv(coverage, total_rate, CRITICAL_ILLNESS_TERM);
        let annuity_pv = pv.premium_annuity_pv(age, gender, CRITICAL_ILLNESS_TERM);
        let net = net_premium(benefit_pv, annuity_pv);

        let risk_multiplier = risk_assessment.overall_risk_multiplier;
        let gross = net * product.load_factor() * risk_multiplier;
        let reserves = coverage * product.reserve_factor();

        let breakdown = BTreeMap::from([
            ("base_morbidity_rate".to_string(), total_rate),
            ("net_premium".to_string(), net),
            ("gross_premium".to_string(), gross),
            ("annual_premium".to_string(), gross * 12.0),
            ("reserves".to_string(), reserves),
        ]);

        let explanation = format!(
            "Critical Illness Insurance Calculation:\n\n\
             Applicant: {}-year-old {}\n\
             Coverage: {} lump sum benefit\n\
             Covered Conditions: {}\n\
             Combined Morbidity Rate: {:.4}\n\
             Risk Multiplier: {:.2}x\n\n\
             Premium uses critical illness incidence tables with actuarial present values.",
            age,
            gender,
            format::currency(coverage, 0),
            product.covered_conditions.join(", "),
            total_rate,
            risk_multiplier
        );

        Ok(QuoteResult {
            gross_premium: gross,
            net_premium: net,
            expense_load: product.expense_load,
            profit_margin: product.profit_margin,
            commission: product.commission,
            reserves,
            risk_multiplier,
            breakdown,
            explanation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::underwriting::UnderwritingEngine;
    use approx::assert_relative_eq;

    fn calculator() -> PremiumCalculator {
        PremiumCalculator::new(Arc::new(Tables::default_pricing()))
    }

    #[test]
    fn test_term_life_without_risk_factors() {
        let calc = calculator();
        let quote = calc
            .price_life(35, Gender::Male, 500_000.0, 20, ProductType::TermLife, &RiskFactors::default())
            .unwrap();

        assert_eq!(quote.risk_multiplier, 1.0);
        let loads = 1.0 + quote.expense_load + quote.profit_margin + quote.commission;
        assert_relative_eq!(quote.gross_premium, quote.net_premium * loads, max_relative = 1e-12);
        assert_relative_eq!(quote.annual_premium(), quote.gross_premium * 12.0);
        assert_eq!(quote.reserves, 500_000.0 * 0.02);
        assert!(quote.net_premium > 0.0);
        assert!(quote.explanation.contains("Coverage: $500,000 Term Life"));
    }

    #[test]
    fn test_life_net_premium_matches_present_values() {
        let calc = calculator();
        let tables = calc.tables();
        let pv = PresentValueEngine::from_tables(tables);

        let quote = calc
            .price_life(45, Gender::Female, 250_000.0, 10, ProductType::TermLife, &RiskFactors::default())
            .unwrap();
        let expected = pv.life_benefit_pv(250_000.0, 45, Gender::Female, 10) / pv.premium_annuity_pv(45, Gender::Female, 10);
        assert_relative_eq!(quote.net_premium, expected, max_relative = 1e-12);
        assert_relative_eq!(quote.breakdown["base_mortality_cost"], pv.mortality_cost(45, Gender::Female, 10));
    }

    #[test]
    fn test_whole_life_annual_premium_is_gross() {
        let quote = calculator()
            .price_life(50, Gender::Male, 100_000.0, 30, ProductType::WholeLife, &RiskFactors::default())
            .unwrap();
        assert_eq!(quote.annual_premium(), quote.gross_premium);
    }

    #[test]
    fn test_adjusted_term_quote_keeps_annual_premium_in_step() {
        let quote = calculator()
            .price_life(35, Gender::Male, 500_000.0, 20, ProductType::TermLife, &RiskFactors::default())
            .unwrap()
            .apply_risk_adjustment(2.0);

        assert_relative_eq!(quote.annual_premium(), quote.gross_premium * 12.0, max_relative = 1e-12);
        let loads = quote.breakdown["expense_loading"] + quote.breakdown["profit_margin"] + quote.breakdown["commission"];
        assert_relative_eq!(
            loads,
            quote.gross_premium * (quote.expense_load + quote.profit_margin + quote.commission)
                / (1.0 + quote.expense_load + quote.profit_margin + quote.commission),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zero_term_whole_life_prices_to_zero() {
        let quote = calculator()
            .price_life(40, Gender::Female, 100_000.0, 0, ProductType::WholeLife, &RiskFactors::default())
            .unwrap();

        assert_eq!(quote.net_premium, 0.0);
        assert_eq!(quote.gross_premium, 0.0);
        assert_eq!(quote.annual_premium(), 0.0);
    }

    #[test]
    fn test_risk_factors_scale_net_premium() {
        let calc = calculator();
        let factors = RiskFactors {
            medical_conditions: vec!["asthma_mild".into(), "mystery_condition".into()],
            smoking_status: SmokingStatus::CurrentSmoker,
            hazardous_activities: vec!["skydiving".into(), "chess".into()],
        };
        assert_relative_eq!(calc.risk_multiplier(&factors), 1.1 * 1.5 * 2.5 * 1.5, max_relative = 1e-12);

        let base = calc
            .price_life(35, Gender::Male, 500_000.0, 20, ProductType::TermLife, &RiskFactors::default())
            .unwrap();
        let rated = calc
            .price_life(35, Gender::Male, 500_000.0, 20, ProductType::TermLife, &factors)
            .unwrap();
        assert_relative_eq!(rated.net_premium, base.net_premium);
        assert_relative_eq!(
            rated.gross_premium,
            base.gross_premium * calc.risk_multiplier(&factors),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_life_validation() {
        let calc = calculator();
        let none = RiskFactors::default();

        let err = calc
            .price_life(17, Gender::Male, 500_000.0, 20, ProductType::TermLife, &none)
            .unwrap_err();
        assert_eq!(err, PricingError::Validation("Age 17 outside valid range 18-75".to_string()));

        let err = calc
            .price_life(35, Gender::Male, 500_000.0, 12, ProductType::TermLife, &none)
            .unwrap_err();
        assert!(matches!(err, PricingError::Validation(msg) if msg.starts_with("Term 12 not available")));

        assert!(calc
            .price_life(35, Gender::Male, 10_000.0, 20, ProductType::TermLife, &none)
            .is_err());
        assert!(calc
            .price_life(35, Gender::Male, 500_000.0, 20, ProductType::DisabilityIncome, &none)
            .is_err());
    }

    #[test]
    fn test_missing_product_definition() {
        let mut tables = Tables::default_pricing();
        tables.products = crate::tables::ProductCatalog::new(Default::default(), 0.5);
        let calc = PremiumCalculator::new(Arc::new(tables));

        let err = calc
            .price_life(35, Gender::Male, 500_000.0, 20, ProductType::TermLife, &RiskFactors::default())
            .unwrap_err();
        assert!(matches!(err, PricingError::ConfigurationAbsent(_)));
    }

    #[test]
    fn test_disability_premium() {
        let calc = calculator();
        let quote = calc
            .price_disability(35, Gender::Male, 2, 5_000.0, BenefitPeriod::ToAge65, 90)
            .unwrap();

        // Age 35 class 2 male rate
        assert_eq!(quote.breakdown["base_morbidity_rate"], 0.0034);
        assert_eq!(quote.breakdown["waiting_period_adjustment"], 1.0);
        assert_eq!(quote.risk_multiplier, 1.0);
        assert_eq!(quote.reserves, 5_000.0 * 12.0 * 0.15);
        assert_relative_eq!(quote.annual_premium(), quote.gross_premium * 12.0);

        // 30 annual payments of 60,000 at 0.0034, discounted
        let pv = PresentValueEngine::from_tables(calc.tables());
        let expected = pv.level_benefit_pv(60_000.0, 0.0034, 30) / pv.premium_annuity_pv(35, Gender::Male, 30);
        assert_relative_eq!(quote.net_premium, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_disability_waiting_period_tiers() {
        let calc = calculator();
        let price = |days| {
            calc.price_disability(40, Gender::Female, 3, 4_000.0, BenefitPeriod::Years(10), days)
                .unwrap()
        };

        let short = price(14);
        let standard = price(90);
        let long = price(400);
        assert_eq!(short.breakdown["waiting_period_adjustment"], 1.25);
        assert_eq!(long.breakdown["waiting_period_adjustment"], 0.65);
        assert!(short.gross_premium > standard.gross_premium);
        assert!(long.gross_premium < standard.gross_premium);
        assert_relative_eq!(short.net_premium, standard.net_premium);
    }

    #[test]
    fn test_disability_validation() {
        let calc = calculator();

        let err = calc
            .price_disability(35, Gender::Male, 9, 5_000.0, BenefitPeriod::ToAge65, 90)
            .unwrap_err();
        assert_eq!(err, PricingError::Validation("Invalid occupation class 9".to_string()));

        assert!(calc
            .price_disability(35, Gender::Male, 2, 100.0, BenefitPeriod::ToAge65, 90)
            .is_err());
        assert!(calc
            .price_disability(61, Gender::Male, 2, 5_000.0, BenefitPeriod::ToAge65, 90)
            .is_err());
    }

    #[test]
    fn test_critical_illness_premium() {
        let tables = Arc::new(Tables::default_pricing());
        let calc = PremiumCalculator::new(tables.clone());
        let engine = UnderwritingEngine::new(tables);

        let mut applicant = Applicant::new(42, Gender::Female);
        applicant.annual_income = 90_000.0;
        applicant.net_worth = 200_000.0;
        let assessment = engine.assess_risk(&applicant, ProductType::CriticalIllness, 150_000.0);
        assert_eq!(assessment.overall_risk_multiplier, 1.0);

        let quote = calc.price_critical_illness(&applicant, 150_000.0, &assessment).unwrap();
        // Closest tabulated age to 42 is 45: cancer + heart attack + stroke
        assert_relative_eq!(quote.breakdown["base_morbidity_rate"], 0.0036 + 0.0006 + 0.0005);
        assert_eq!(quote.reserves, 150_000.0 * 0.05);
        assert_relative_eq!(
            quote.gross_premium,
            quote.net_premium * (1.0 + quote.expense_load + quote.profit_margin + quote.commission),
            max_relative = 1e-12
        );
        assert!(quote.explanation.contains("Covered Conditions: cancer, heart_attack, stroke"));
    }

    #[test]
    fn test_critical_illness_applies_assessment_multiplier() {
        let tables = Arc::new(Tables::default_pricing());
        let calc = PremiumCalculator::new(tables.clone());
        let engine = UnderwritingEngine::new(tables);

        let mut applicant = Applicant::new(42, Gender::Male);
        applicant.annual_income = 90_000.0;
        let clean = engine.assess_risk(&applicant, ProductType::CriticalIllness, 100_000.0);
        applicant.smoking_status = SmokingStatus::CurrentSmoker;
        let smoker = engine.assess_risk(&applicant, ProductType::CriticalIllness, 100_000.0);

        let base = calc.price_critical_illness(&applicant, 100_000.0, &clean).unwrap();
        let rated = calc.price_critical_illness(&applicant, 100_000.0, &smoker).unwrap();
        assert_eq!(rated.risk_multiplier, 2.5);
        assert_relative_eq!(rated.gross_premium, base.gross_premium * 2.5, max_relative = 1e-12);
    }
}
