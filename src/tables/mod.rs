//! Table store: mortality, morbidity, underwriting rules, products and regulatory standards

mod mortality;
mod morbidity;
mod product;
mod regulatory;
mod rules;
pub mod loader;

pub use loader::LoadedTables;
pub use morbidity::{
    AgeRateTable, DisabilityClass, GenderRates, MorbidityTables, WaitingPeriod, WaitingPeriodAdjustment,
};
pub use mortality::MortalityTable;
pub use product::{ProductCatalog, ProductDefinition, DEFAULT_MAX_COMBINED_LOAD, DEFAULT_RESERVE_FACTOR};
pub use regulatory::{
    MaximumPremiumRates, RegulatoryStandards, RiskBasedCapitalFactors, SolvencyBucket, SolvencyMargins,
    UnderwritingStandards,
};
pub use rules::{
    AlcoholUse, CategoryRules, FinancialRules, MedicalCategory, MedicalRule, OccupationClass, RiskFactorRule,
    SmokingStatus, UnderwritingRules, UNKNOWN_CONDITION_MULTIPLIER,
};

use std::path::Path;

use crate::error::{Result, TableLoadError};
use crate::valuation::DiscountRate;

pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Every table the engines read, loaded once and shared read-only
#[derive(Debug, Clone, PartialEq)]
pub struct Tables {
    pub mortality: MortalityTable,
    pub discount_rate: DiscountRate,
    pub morbidity: MorbidityTables,
    pub rules: UnderwritingRules,
    pub products: ProductCatalog,
    pub regulatory: RegulatoryStandards,
}

impl Tables {
    /// Built-in tables matching the shipped data directory
    pub fn default_pricing() -> Self {
        Self {
            mortality: MortalityTable::cso_2017(),
            discount_rate: DiscountRate::default(),
            morbidity: MorbidityTables::standard(),
            rules: UnderwritingRules::standard(),
            products: ProductCatalog::standard(),
            regulatory: RegulatoryStandards::default(),
        }
    }

    /// Load tables from the default location (data/tables/)
    pub fn from_default_path() -> std::result::Result<Self, TableLoadError> {
        Self::from_path(Path::new(loader::DEFAULT_TABLES_PATH))
    }

    /// Load tables from a specific directory and check their invariants
    pub fn from_path(path: &Path) -> std::result::Result<Self, TableLoadError> {
        let loaded = LoadedTables::load_from(path)?;
        Ok(Self::from_loaded(loaded)?)
    }

    pub fn from_loaded(loaded: LoadedTables) -> Result<Self> {
        let tables = Self {
            mortality: MortalityTable::from_rates(loaded.mortality_rates)?,
            discount_rate: loaded.discount_rate,
            morbidity: loaded.morbidity,
            rules: loaded.rules,
            products: loaded.products,
            regulatory: loaded.regulatory,
        };
        tables.validate()?;
        Ok(tables)
    }

    pub fn validate(&self) -> Result<()> {
        self.morbidity.validate()?;
        self.rules.validate()?;
        self.products.validate()?;
        self.regulatory.validate()?;
        Ok(())
    }
}
