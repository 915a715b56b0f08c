//! Product definitions: loads, issue limits and reserve factors

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};
use crate::policy::ProductType;

/// Reserve factor for products that do not define one
pub const DEFAULT_RESERVE_FACTOR: f64 = 0.05;

/// Regulatory ceiling on expense + profit + commission when none is configured
pub const DEFAULT_MAX_COMBINED_LOAD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub expense_load: f64,
    pub profit_margin: f64,
    pub commission: f64,
    pub min_age: u32,
    pub max_age: u32,
    /// Monthly benefit for disability income, face amount otherwise
    #[serde(alias = "min_monthly_benefit")]
    pub min_coverage: f64,
    #[serde(alias = "max_monthly_benefit")]
    pub max_coverage: f64,
    /// Allowed policy terms; `None` accepts any term
    #[serde(default)]
    pub terms: Option<Vec<u32>>,
    #[serde(default)]
    pub reserve_factor: Option<f64>,
    #[serde(default)]
    pub covered_conditions: Vec<String>,
}

impl ProductDefinition {
    /// Expense + profit + commission
    pub fn total_load(&self) -> f64 {
        self.expense_load + self.profit_margin + self.commission
    }

    /// Gross-up factor applied to net premium
    pub fn load_factor(&self) -> f64 {
        1.0 + self.total_load()
    }

    pub fn reserve_factor(&self) -> f64 {
        self.reserve_factor.unwrap_or(DEFAULT_RESERVE_FACTOR)
    }

    pub fn validate_age(&self, age: u32) -> Result<()> {
        crate::require!(
            (self.min_age..=self.max_age).contains(&age),
            "Age {} outside valid range {}-{}",
            age,
            self.min_age,
            self.max_age
        );
        Ok(())
    }

    pub fn validate_coverage(&self, coverage: f64) -> Result<()> {
        crate::require!(
            coverage >= self.min_coverage && coverage <= self.max_coverage,
            "Coverage ${} outside valid range ${}-${}",
            coverage,
            self.min_coverage,
            self.max_coverage
        );
        Ok(())
    }

    pub fn validate_term(&self, term: u32) -> Result<()> {
        if let Some(terms) = &self.terms {
            crate::require!(
                terms.contains(&term),
                "Term {} not available. Valid terms: {:?}",
                term,
                terms
            );
        }
        Ok(())
    }
}

/// All product definitions plus the shared load ceiling
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCatalog {
    products: BTreeMap<ProductType, ProductDefinition>,
    max_combined_load: f64,
}

impl ProductCatalog {
    pub fn new(products: BTreeMap<ProductType, ProductDefinition>, max_combined_load: f64) -> Self {
        Self {
            products,
            max_combined_load,
        }
    }

    /// Built-in catalog matching `data/tables/product_definitions.json`
    pub fn standard() -> Self {
        let mut products = BTreeMap::new();

        products.insert(
            ProductType::TermLife,
            ProductDefinition {
                name: "Term Life Insurance".to_string(),
                description: "Level premium term life coverage".to_string(),
                expense_load: 0.15,
                profit_margin: 0.08,
                commission: 0.10,
                min_age: 18,
                max_age: 75,
                min_coverage: 50_000.0,
                max_coverage: 10_000_000.0,
                terms: Some(vec![10, 15, 20, 25, 30]),
                reserve_factor: Some(0.02),
                covered_conditions: Vec::new(),
            },
        );
        products.insert(
            ProductType::WholeLife,
            ProductDefinition {
                name: "Whole Life Insurance".to_string(),
                description: "Permanent coverage with cash value".to_string(),
                expense_load: 0.18,
                profit_margin: 0.10,
                commission: 0.12,
                min_age: 18,
                max_age: 80,
                min_coverage: 25_000.0,
                max_coverage: 5_000_000.0,
                terms: None,
                reserve_factor: Some(0.1),
                covered_conditions: Vec::new(),
            },
        );
        products.insert(
            ProductType::DisabilityIncome,
            ProductDefinition {
                name: "Disability Income Insurance".to_string(),
                description: "Monthly income replacement during disability".to_string(),
                expense_load: 0.20,
                profit_margin: 0.10,
                commission: 0.10,
                min_age: 18,
                max_age: 60,
                min_coverage: 500.0,
                max_coverage: 20_000.0,
                terms: None,
                reserve_factor: Some(0.15),
                covered_conditions: Vec::new(),
            },
        );
        products.insert(
            ProductType::CriticalIllness,
            ProductDefinition {
                name: "Critical Illness Insurance".to_string(),
                description: "Lump sum on first diagnosis of a covered condition".to_string(),
                expense_load: 0.15,
                profit_margin: 0.10,
                commission: 0.10,
                min_age: 18,
                max_age: 65,
                min_coverage: 10_000.0,
                max_coverage: 1_000_000.0,
                terms: None,
                reserve_factor: None,
                covered_conditions: vec![
                    "cancer".to_string(),
                    "heart_attack".to_string(),
                    "stroke".to_string(),
                ],
            },
        );

        Self::new(products, DEFAULT_MAX_COMBINED_LOAD)
    }

    pub fn get(&self, product_type: ProductType) -> Result<&ProductDefinition> {
        self.products.get(&product_type).ok_or_else(|| {
            PricingError::ConfigurationAbsent(format!("product definition for {}", product_type))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProductType, &ProductDefinition)> {
        self.products.iter().map(|(product, definition)| (*product, definition))
    }

    pub fn max_combined_load(&self) -> f64 {
        self.max_combined_load
    }

    /// Loads must be non-negative and their sum strictly below the ceiling
    pub fn validate(&self) -> Result<()> {
        for (product, definition) in &self.products {
            let loads = [definition.expense_load, definition.profit_margin, definition.commission];
            if loads.iter().any(|load| !(load.is_finite() && *load >= 0.0)) {
                return Err(PricingError::InvalidConfiguration(format!(
                    "{} has a negative load",
                    product
                )));
            }
            if definition.total_load() >= self.max_combined_load {
                return Err(PricingError::InvalidConfiguration(format!(
                    "{} combined load {:.2} not below ceiling {:.2}",
                    product,
                    definition.total_load(),
                    self.max_combined_load
                )));
            }
            if definition.min_age > definition.max_age || definition.min_coverage > definition.max_coverage {
                return Err(PricingError::InvalidConfiguration(format!(
                    "{} has inverted issue limits",
                    product
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog() {
        let catalog = ProductCatalog::standard();
        assert!(catalog.validate().is_ok());

        let term = catalog.get(ProductType::TermLife).unwrap();
        assert!((term.total_load() - 0.33).abs() < 1e-12);
        assert_eq!(term.reserve_factor(), 0.02);

        let ci = catalog.get(ProductType::CriticalIllness).unwrap();
        assert_eq!(ci.reserve_factor(), DEFAULT_RESERVE_FACTOR);
        assert_eq!(ci.covered_conditions.len(), 3);
    }

    #[test]
    fn test_missing_product_is_configuration_absent() {
        let catalog = ProductCatalog::new(BTreeMap::new(), DEFAULT_MAX_COMBINED_LOAD);
        assert!(matches!(
            catalog.get(ProductType::WholeLife),
            Err(PricingError::ConfigurationAbsent(_))
        ));
    }

    #[test]
    fn test_issue_limit_validation() {
        let catalog = ProductCatalog::standard();
        let term = catalog.get(ProductType::TermLife).unwrap();

        assert!(term.validate_age(18).is_ok());
        assert!(term.validate_age(75).is_ok());
        assert!(term.validate_age(76).is_err());
        assert!(term.validate_coverage(50_000.0).is_ok());
        assert!(term.validate_coverage(49_999.0).is_err());
        assert!(term.validate_term(20).is_ok());
        assert_eq!(
            term.validate_term(12),
            Err(PricingError::Validation(
                "Term 12 not available. Valid terms: [10, 15, 20, 25, 30]".to_string()
            ))
        );

        // Whole life lists no terms, so any term passes
        let whole = catalog.get(ProductType::WholeLife).unwrap();
        assert!(whole.validate_term(57).is_ok());
    }

    #[test]
    fn test_load_ceiling_is_exclusive() {
        let mut catalog = ProductCatalog::standard();
        catalog.max_combined_load = 0.33;
        assert!(matches!(catalog.validate(), Err(PricingError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_disability_limits_alias() {
        let json = r#"{
            "name": "DI", "expense_load": 0.2, "profit_margin": 0.1, "commission": 0.1,
            "min_age": 18, "max_age": 60,
            "min_monthly_benefit": 500.0, "max_monthly_benefit": 20000.0
        }"#;
        let definition: ProductDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(definition.min_coverage, 500.0);
        assert_eq!(definition.max_coverage, 20_000.0);
        assert_eq!(definition.terms, None);
    }
}
