//! Premium Engine - Pricing, underwriting and reserves for individual life and health products
//!
//! This library provides:
//! - Table store for mortality, morbidity, underwriting rules, products and regulatory standards
//! - Present values of benefits and premium annuities
//! - Medical, lifestyle, occupation and financial underwriting with coverage caps
//! - Premium quotes for term life, whole life, disability income and critical illness
//! - Portfolio reserves, solvency margin, risk-based capital and compliance checks
//!
//! Every engine shares one read-only [`Tables`] behind an `Arc`.

pub mod error;
pub mod format;
pub mod policy;
pub mod pricing;
pub mod reserves;
pub mod tables;
pub mod underwriting;
pub mod valuation;

// Re-export commonly used types
pub use error::{PricingError, Result, TableLoadError};
pub use policy::{load_portfolio, Gender, PolicyRecord, ProductType};
pub use pricing::{PremiumCalculator, ProductManager, ProductQuote, ProductRequest, QuoteResult, RiskFactors};
pub use reserves::{RegulatoryCompliance, ReserveCalculation, ReserveEngine};
pub use tables::Tables;
pub use underwriting::{Applicant, RiskAssessment, UnderwritingDecision, UnderwritingEngine};
pub use valuation::{BenefitPeriod, DiscountRate, PresentValueEngine};
