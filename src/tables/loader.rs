//! File-based table loader
//!
//! Loads pricing tables from data/tables/: mortality as CSV, everything else
//! as JSON. The loader only parses; invariant checks happen when the loaded
//! tables are turned into [`Tables`](super::Tables).

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::morbidity::{AgeRateTable, DisabilityClass, MorbidityTables, WaitingPeriod, WaitingPeriodAdjustment};
use super::product::{ProductCatalog, ProductDefinition, DEFAULT_MAX_COMBINED_LOAD};
use super::regulatory::RegulatoryStandards;
use super::rules::{
    AlcoholUse, FinancialRules, MedicalCategory, OccupationClass, RiskFactorRule, SmokingStatus,
    UnderwritingRules,
};
use crate::error::TableLoadError;
use crate::policy::ProductType;
use crate::valuation::DiscountRate;

/// Default path to the tables directory
pub const DEFAULT_TABLES_PATH: &str = "data/tables";

pub const MORTALITY_FILE: &str = "mortality_rates.csv";
pub const DISCOUNT_FILE: &str = "discount_rates.json";
pub const MORBIDITY_FILE: &str = "morbidity_tables.json";
pub const RULES_FILE: &str = "underwriting_rules.json";
pub const PRODUCTS_FILE: &str = "product_definitions.json";
pub const REGULATORY_FILE: &str = "regulatory_standards.json";

fn open(path: &Path) -> Result<File, TableLoadError> {
    File::open(path).map_err(|source| TableLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TableLoadError> {
    let reader = BufReader::new(open(path)?);
    serde_json::from_reader(reader).map_err(|source| TableLoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load mortality rates from CSV (`age,female,male`)
/// Returns Vec<(female_rate, male_rate)> indexed by age up to the highest age in the file.
pub fn load_mortality_rates(path: &Path) -> Result<Vec<(f64, f64)>, TableLoadError> {
    parse_mortality_rates(open(&path.join(MORTALITY_FILE))?)
}

/// Every age from 0 to the highest listed age must be present
pub fn parse_mortality_rates<R: std::io::Read>(source: R) -> Result<Vec<(f64, f64)>, TableLoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let mut by_age = BTreeMap::new();

    for result in reader.records() {
        let record = result?;
        let field = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .ok_or_else(|| TableLoadError::Parse(format!("mortality row missing column {}", idx)))
        };
        let age: u32 = field(0)?
            .parse()
            .map_err(|e| TableLoadError::Parse(format!("bad mortality age: {}", e)))?;
        let female: f64 = field(1)?
            .parse()
            .map_err(|e| TableLoadError::Parse(format!("bad female rate at age {}: {}", age, e)))?;
        let male: f64 = field(2)?
            .parse()
            .map_err(|e| TableLoadError::Parse(format!("bad male rate at age {}: {}", age, e)))?;

        by_age.insert(age, (female, male));
    }

    let ceiling = by_age
        .keys()
        .next_back()
        .copied()
        .ok_or_else(|| TableLoadError::Parse(format!("{} has no rows", MORTALITY_FILE)))?;

    (0..=ceiling)
        .map(|age| {
            by_age.get(&age).copied().ok_or_else(|| {
                TableLoadError::Parse(format!("{} missing age {} below ceiling {}", MORTALITY_FILE, age, ceiling))
            })
        })
        .collect()
}

#[derive(Deserialize)]
struct DiscountRatesFile {
    standard: DiscountRate,
}

/// Load the standard valuation discount rate
pub fn load_discount_rate(path: &Path) -> Result<DiscountRate, TableLoadError> {
    let file: DiscountRatesFile = read_json(&path.join(DISCOUNT_FILE))?;
    Ok(file.standard)
}

#[derive(Deserialize)]
struct MorbidityFile {
    disability_tables: DisabilityTablesFile,
    waiting_periods: WaitingPeriodsFile,
    critical_illness_tables: CriticalIllnessFile,
}

#[derive(Deserialize)]
struct DisabilityTablesFile {
    occupation_classes: BTreeMap<u8, DisabilityClass>,
}

#[derive(Deserialize)]
struct WaitingPeriodsFile {
    disability: BTreeMap<WaitingPeriod, WaitingPeriodAdjustment>,
}

#[derive(Deserialize)]
struct CriticalIllnessFile {
    conditions: BTreeMap<String, AgeRateTable>,
}

/// Load disability and critical illness morbidity
pub fn load_morbidity(path: &Path) -> Result<MorbidityTables, TableLoadError> {
    let file: MorbidityFile = read_json(&path.join(MORBIDITY_FILE))?;
    Ok(MorbidityTables::new(
        file.disability_tables.occupation_classes,
        file.waiting_periods.disability,
        file.critical_illness_tables.conditions,
    ))
}

#[derive(Deserialize)]
struct RulesFile {
    medical_conditions: Vec<MedicalCategoryFile>,
    #[serde(default)]
    lifestyle_factors: LifestyleFile,
    #[serde(default)]
    occupation_factors: HashMap<OccupationClass, RiskFactorRule>,
    financial_underwriting: FinancialFile,
}

#[derive(Deserialize)]
struct MedicalCategoryFile {
    category: MedicalCategory,
    conditions: BTreeMap<String, RiskFactorRule>,
}

#[derive(Deserialize, Default)]
struct LifestyleFile {
    #[serde(default)]
    smoking: HashMap<SmokingStatus, RiskFactorRule>,
    #[serde(default)]
    alcohol: HashMap<AlcoholUse, RiskFactorRule>,
    #[serde(default)]
    hazardous_activities: HashMap<String, RiskFactorRule>,
}

#[derive(Deserialize)]
struct FinancialFile {
    income_multiples: IncomeMultiplesFile,
    net_worth_requirements: NetWorthFile,
}

#[derive(Deserialize)]
struct IncomeMultiplesFile {
    life_insurance: LifeIncomeFile,
    disability_insurance: DisabilityIncomeFile,
}

#[derive(Deserialize)]
struct LifeIncomeFile {
    max_coverage_multiple: f64,
}

#[derive(Deserialize)]
struct DisabilityIncomeFile {
    max_benefit_percentage: f64,
}

#[derive(Deserialize)]
struct NetWorthFile {
    coverage_1m_plus: NetWorthTier,
    coverage_5m_plus: NetWorthTier,
}

#[derive(Deserialize)]
struct NetWorthTier {
    min_net_worth: f64,
}

/// Load underwriting rules, resolving medical categories in file order
pub fn load_underwriting_rules(path: &Path) -> Result<UnderwritingRules, TableLoadError> {
    let file: RulesFile = read_json(&path.join(RULES_FILE))?;

    let medical = file
        .medical_conditions
        .into_iter()
        .map(|category| (category.category, category.conditions.into_iter().collect()))
        .collect();

    let financial = FinancialRules {
        max_coverage_income_multiple: file.financial_underwriting.income_multiples.life_insurance.max_coverage_multiple,
        max_benefit_income_share: file
            .financial_underwriting
            .income_multiples
            .disability_insurance
            .max_benefit_percentage,
        min_net_worth_1m: file.financial_underwriting.net_worth_requirements.coverage_1m_plus.min_net_worth,
        min_net_worth_5m: file.financial_underwriting.net_worth_requirements.coverage_5m_plus.min_net_worth,
    };

    Ok(UnderwritingRules::new(
        medical,
        file.lifestyle_factors.smoking,
        file.lifestyle_factors.alcohol,
        file.lifestyle_factors.hazardous_activities,
        file.occupation_factors,
        financial,
    ))
}

#[derive(Deserialize)]
struct ProductsFile {
    products: BTreeMap<ProductType, ProductDefinition>,
    #[serde(default)]
    regulatory_requirements: RegulatoryRequirementsFile,
}

#[derive(Deserialize)]
struct RegulatoryRequirementsFile {
    #[serde(default = "default_max_combined_load")]
    max_combined_load: f64,
    #[serde(default)]
    reserve_factors: BTreeMap<ProductType, f64>,
}

fn default_max_combined_load() -> f64 {
    DEFAULT_MAX_COMBINED_LOAD
}

impl Default for RegulatoryRequirementsFile {
    fn default() -> Self {
        Self {
            max_combined_load: DEFAULT_MAX_COMBINED_LOAD,
            reserve_factors: BTreeMap::new(),
        }
    }
}

/// Load product definitions; shared reserve factors fill products that lack one
pub fn load_product_catalog(path: &Path) -> Result<ProductCatalog, TableLoadError> {
    let mut file: ProductsFile = read_json(&path.join(PRODUCTS_FILE))?;

    for (product, factor) in file.regulatory_requirements.reserve_factors {
        if let Some(definition) = file.products.get_mut(&product) {
            definition.reserve_factor.get_or_insert(factor);
        }
    }

    Ok(ProductCatalog::new(
        file.products,
        file.regulatory_requirements.max_combined_load,
    ))
}

/// Load reserve, solvency and capital standards
pub fn load_regulatory_standards(path: &Path) -> Result<RegulatoryStandards, TableLoadError> {
    read_json(&path.join(REGULATORY_FILE))
}

/// All tables as read from disk, before invariant checks
pub struct LoadedTables {
    pub mortality_rates: Vec<(f64, f64)>,
    pub discount_rate: DiscountRate,
    pub morbidity: MorbidityTables,
    pub rules: UnderwritingRules,
    pub products: ProductCatalog,
    pub regulatory: RegulatoryStandards,
}

impl LoadedTables {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self, TableLoadError> {
        Self::load_from(Path::new(DEFAULT_TABLES_PATH))
    }

    /// Load all tables from a specific directory
    pub fn load_from(path: &Path) -> Result<Self, TableLoadError> {
        let loaded = Self {
            mortality_rates: load_mortality_rates(path)?,
            discount_rate: load_discount_rate(path)?,
            morbidity: load_morbidity(path)?,
            rules: load_underwriting_rules(path)?,
            products: load_product_catalog(path)?,
            regulatory: load_regulatory_standards(path)?,
        };
        log::info!(
            "Loaded tables from {} (mortality ages 0-{}, {} products)",
            path.display(),
            loaded.mortality_rates.len().saturating_sub(1),
            loaded.products.iter().count()
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Gender;

    #[test]
    fn test_load_default_tables() {
        let result = LoadedTables::load_default();
        assert!(result.is_ok(), "Failed to load tables: {:?}", result.err());

        let loaded = result.unwrap();

        // Mortality covers ages 0 through 80
        assert_eq!(loaded.mortality_rates.len(), 81);
        assert!((loaded.mortality_rates[35].1 - 0.002023).abs() < 1e-9);

        assert!((loaded.discount_rate.rate() - 0.035).abs() < 1e-12);

        // Disability class 1 at age 35
        let professional = loaded.morbidity.disability_class(1).unwrap();
        assert_eq!(professional.rates.rate_at(35, Gender::Male), Some(0.0026));

        // Duplicate condition resolved to the first category
        let cholesterol = loaded.rules.medical_rule("high_cholesterol").unwrap();
        assert_eq!(cholesterol.category, MedicalCategory::Cardiovascular);

        // Disability limits read through the monthly-benefit aliases
        let di = loaded.products.get(ProductType::DisabilityIncome).unwrap();
        assert_eq!(di.max_coverage, 20_000.0);
        assert_eq!(di.reserve_factor, Some(0.15));

        // No reserve factor configured for critical illness
        let ci = loaded.products.get(ProductType::CriticalIllness).unwrap();
        assert_eq!(ci.reserve_factor, None);

        assert_eq!(loaded.regulatory.minimum_capital_ratio, 2.0);
    }

    #[test]
    fn test_mortality_gap_below_ceiling_is_rejected() {
        let csv = "age,female,male\n0,0.0006,0.00072\n1,0.000255,0.0003\n3,0.000229,0.00027\n";
        let err = parse_mortality_rates(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, TableLoadError::Parse(msg) if msg.contains("missing age 2")));

        let complete = "age,female,male\n1,0.000255,0.0003\n0,0.0006,0.00072\n";
        let rates = parse_mortality_rates(complete.as_bytes()).unwrap();
        assert_eq!(rates, vec![(0.0006, 0.00072), (0.000255, 0.0003)]);
    }

    #[test]
    fn test_missing_directory_reports_path() {
        let err = LoadedTables::load_from(Path::new("data/no_such_dir")).err().unwrap();
        match err {
            TableLoadError::Io { path, .. } => assert!(path.ends_with(MORTALITY_FILE)),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }
}
