//! Load inforce portfolios from CSV

use super::{Gender, PolicyRecord, ProductType};
use crate::error::TableLoadError;
use chrono::NaiveDate;
use csv::Reader;
use std::path::Path;

/// Raw CSV row matching the portfolio file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    policy_id: Option<String>,
    product_type: String,
    coverage_amount: f64,
    annual_premium: f64,
    current_age: u32,
    gender: String,
    remaining_years: u32,
    policy_anniversary: String,
}

impl CsvRow {
    fn to_record(self) -> Result<PolicyRecord, TableLoadError> {
        let product_type: ProductType = self.product_type.parse().map_err(TableLoadError::Parse)?;
        let gender: Gender = self.gender.parse().map_err(TableLoadError::Parse)?;
        let policy_anniversary = NaiveDate::parse_from_str(self.policy_anniversary.trim(), "%Y-%m-%d")
            .map_err(|e| {
                TableLoadError::Parse(format!(
                    "Bad policy_anniversary '{}': {}",
                    self.policy_anniversary, e
                ))
            })?;

        Ok(PolicyRecord {
            policy_id: self.policy_id.filter(|id| !id.is_empty()),
            product_type,
            coverage_amount: self.coverage_amount,
            annual_premium: self.annual_premium,
            current_age: self.current_age,
            gender,
            remaining_years: self.remaining_years,
            policy_anniversary,
        })
    }
}

/// Load all policies from a CSV file
pub fn load_portfolio<P: AsRef<Path>>(path: P) -> Result<Vec<PolicyRecord>, TableLoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| TableLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let policies = load_portfolio_from_reader(file)?;
    log::info!("Loaded {} policies from {}", policies.len(), path.display());
    Ok(policies)
}

/// Load policies from any reader (e.g., string buffer, network stream)
pub fn load_portfolio_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<PolicyRecord>, TableLoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut policies = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        policies.push(row.to_record()?);
    }

    Ok(policies)
}
