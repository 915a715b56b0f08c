//! Product manager: underwriting followed by pricing for each requested product

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calculator::{PremiumCalculator, RiskFactors};
use super::quote::QuoteResult;
use crate::error::Result;
use crate::policy::ProductType;
use crate::tables::Tables;
use crate::underwriting::{Applicant, RiskAssessment, UnderwritingEngine};
use crate::valuation::BenefitPeriod;

/// Days a quote stays open from its as-of date
pub const QUOTE_VALIDITY_DAYS: u64 = 30;

pub const DEFAULT_POLICY_TERM: u32 = 20;
pub const DEFAULT_WAITING_PERIOD_DAYS: u32 = 90;

fn default_policy_term() -> u32 {
    DEFAULT_POLICY_TERM
}

fn default_benefit_period() -> String {
    "to_age_65".to_string()
}

fn default_waiting_period() -> u32 {
    DEFAULT_WAITING_PERIOD_DAYS
}

/// One product in a multi-product request, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductRequest {
    TermLife {
        coverage_amount: f64,
        #[serde(default = "default_policy_term")]
        policy_term: u32,
    },
    WholeLife {
        coverage_amount: f64,
        #[serde(default = "default_policy_term")]
        policy_term: u32,
    },
    DisabilityIncome {
        monthly_benefit: f64,
        #[serde(default = "default_benefit_period")]
        benefit_period: String,
        #[serde(default = "default_waiting_period")]
        waiting_period: u32,
    },
    CriticalIllness {
        coverage_amount: f64,
    },
}

impl ProductRequest {
    pub fn product_type(&self) -> ProductType {
        match self {
            ProductRequest::TermLife { .. } => ProductType::TermLife,
            ProductRequest::WholeLife { .. } => ProductType::WholeLife,
            ProductRequest::DisabilityIncome { .. } => ProductType::DisabilityIncome,
            ProductRequest::CriticalIllness { .. } => ProductType::CriticalIllness,
        }
    }
}

/// Underwritten and priced quote for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuote {
    pub product_type: ProductType,
    pub product_name: String,
    /// Coverage after underwriting caps; monthly benefit for disability income
    pub approved_coverage: f64,
    pub premium_quote: QuoteResult,
    pub risk_assessment: RiskAssessment,
    /// `None` for declined applications
    pub quote_valid_until: Option<NaiveDate>,
    pub underwriter_notes: String,
}

impl ProductQuote {
    pub fn is_declined(&self) -> bool {
        self.premium_quote.is_declined()
    }
}

/// Runs underwriting and pricing together over one set of tables
#[derive(Debug, Clone)]
pub struct ProductManager {
    tables: Arc<Tables>,
    underwriter: UnderwritingEngine,
    calculator: PremiumCalculator,
}

impl ProductManager {
    pub fn new(tables: Arc<Tables>) -> Self {
        Self {
            underwriter: UnderwritingEngine::new(tables.clone()),
            calculator: PremiumCalculator::new(tables.clone()),
            tables,
        }
    }

    pub fn calculator(&self) -> &PremiumCalculator {
        &self.calculator
    }

    /// Term or whole life quote; the gross premium carries the underwriting multiplier
    pub fn life_quote(
        &self,
        applicant: &Applicant,
        coverage: f64,
        policy_term: u32,
        product_type: ProductType,
        as_of: NaiveDate,
    ) -> Result<ProductQuote> {
        let assessment = self.underwriter.assess_risk(applicant, product_type, coverage);
        let approved = coverage.min(assessment.maximum_coverage);
        if approved <= 0.0 {
            return self.declined(product_type, assessment);
        }

        let overall = assessment.overall_risk_multiplier;
        let premium_quote = self
            .calculator
            .price_life(
                applicant.age,
                applicant.gender,
                approved,
                policy_term,
                product_type,
                &RiskFactors::from_applicant(applicant),
            )?
            .apply_risk_adjustment(overall);

        self.approved(product_type, approved, premium_quote, assessment, as_of)
    }

    /// Disability income quote
    ///
    /// Underwriting sees the annual benefit; the approved monthly benefit is
    /// the request capped at a twelfth of the approved maximum, in whole dollars.
    pub fn disability_quote(
        &self,
        applicant: &Applicant,
        monthly_benefit: f64,
        benefit_period: BenefitPeriod,
        waiting_period_days: u32,
        as_of: NaiveDate,
    ) -> Result<ProductQuote> {
        let product_type = ProductType::DisabilityIncome;
        let assessment = self
            .underwriter
            .assess_risk(applicant, product_type, monthly_benefit * 12.0);
        let approved = monthly_benefit.min((assessment.maximum_coverage / 12.0).floor());
        if approved <= 0.0 {
            return self.declined(product_type, assessment);
        }

        let overall = assessment.overall_risk_multiplier;
        let premium_quote = self
            .calculator
            .price_disability(
                applicant.age,
                applicant.gender,
                applicant.occupation_class,
                approved,
                benefit_period,
                waiting_period_days,
            )?
            .apply_risk_adjustment(overall);

        self.approved(product_type, approved, premium_quote, assessment, as_of)
    }

    /// Critical illness quote; pricing applies the underwriting multiplier itself
    pub fn critical_illness_quote(&self, applicant: &Applicant, coverage: f64, as_of: NaiveDate) -> Result<ProductQuote> {
        let product_type = ProductType::CriticalIllness;
        let assessment = self.underwriter.assess_risk(applicant, product_type, coverage);
        let approved = coverage.min(assessment.maximum_coverage);
        if approved <= 0.0 {
            return self.declined(product_type, assessment);
        }

        let premium_quote = self
            .calculator
            .price_critical_illness(applicant, approved, &assessment)?;

        self.approved(product_type, approved, premium_quote, assessment, as_of)
    }

    pub fn quote(&self, applicant: &Applicant, request: &ProductRequest, as_of: NaiveDate) -> Result<ProductQuote> {
        match request {
            ProductRequest::TermLife { coverage_amount, policy_term } => {
                self.life_quote(applicant, *coverage_amount, *policy_term, ProductType::TermLife, as_of)
            }
            ProductRequest::WholeLife { coverage_amount, policy_term } => {
                self.life_quote(applicant, *coverage_amount, *policy_term, ProductType::WholeLife, as_of)
            }
            ProductRequest::DisabilityIncome { monthly_benefit, benefit_period, waiting_period } => {
                let period: BenefitPeriod = benefit_period.parse()?;
                self.disability_quote(applicant, *monthly_benefit, period, *waiting_period, as_of)
            }
            ProductRequest::CriticalIllness { coverage_amount } => {
                self.critical_illness_quote(applicant, *coverage_amount, as_of)
            }
        }
    }

    /// Quote every request in order, logging and skipping the ones that fail
    pub fn quote_many(&self, applicant: &Applicant, requests: &[ProductRequest], as_of: NaiveDate) -> Vec<ProductQuote> {
        requests
            .iter()
            .filter_map(|request| match self.quote(applicant, request, as_of) {
                Ok(quote) => Some(quote),
                Err(e) => {
                    log::warn!("Error generating quote for {}: {}", request.product_type(), e);
                    None
                }
            })
            .collect()
    }

    fn approved(
        &self,
        product_type: ProductType,
        approved_coverage: f64,
        premium_quote: QuoteResult,
        risk_assessment: RiskAssessment,
        as_of: NaiveDate,
    ) -> Result<ProductQuote> {
        let product = self.tables.products.get(product_type)?;
        Ok(ProductQuote {
            product_type,
            product_name: product.name.clone(),
            approved_coverage,
            premium_quote,
            underwriter_notes: risk_assessment.underwriting_notes.clone(),
            risk_assessment,
            quote_valid_until: as_of.checked_add_days(Days::new(QUOTE_VALIDITY_DAYS)),
        })
    }

    fn declined(&self, product_type: ProductType, risk_assessment: RiskAssessment) -> Result<ProductQuote> {
        let product = self.tables.products.get(product_type)?;
        log::info!("{} application declined ({})", product_type, risk_assessment.decision);
        Ok(ProductQuote {
            product_type,
            product_name: format!("Declined - {}", product.name),
            approved_coverage: 0.0,
            premium_quote: QuoteResult::declined(risk_assessment.overall_risk_multiplier),
            underwriter_notes: risk_assessment.underwriting_notes.clone(),
            risk_assessment,
            quote_valid_until: None,
        })
    }
}
