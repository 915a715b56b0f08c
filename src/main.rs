//! Premium Engine CLI
//!
//! Command-line interface for quotes, portfolio reserves and the product catalog
//!
//! ```bash
//! premium_engine quote --applicant data/sample_applicant.json --product term_life --amount 500000 --term 20
//! premium_engine quote --applicant data/sample_applicant.json --requests requests.json
//! premium_engine reserves --portfolio data/sample_portfolio.csv --valuation-date 2024-06-30
//! premium_engine products
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use premium_engine::pricing::{DEFAULT_POLICY_TERM, DEFAULT_WAITING_PERIOD_DAYS};
use premium_engine::{
    load_portfolio, Applicant, ProductManager, ProductQuote, ProductRequest, ProductType, RegulatoryCompliance,
    ReserveEngine, Tables,
};

#[derive(Parser, Debug)]
#[command(name = "premium_engine")]
#[command(about = "Price, underwrite and reserve life and health products")]
#[command(version)]
struct Cli {
    /// Directory of table files; built-in tables when omitted
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Underwrite and price one or more products for an applicant
    Quote {
        /// Applicant JSON file
        #[arg(long)]
        applicant: PathBuf,

        /// JSON array of product requests, tagged by "type"
        #[arg(long, conflicts_with = "product")]
        requests: Option<PathBuf>,

        /// Single product to quote
        #[arg(long, required_unless_present = "requests")]
        product: Option<ProductType>,

        /// Coverage amount, or monthly benefit for disability income
        #[arg(long, required_unless_present = "requests")]
        amount: Option<f64>,

        /// Policy term in years for life products
        #[arg(long, default_value_t = DEFAULT_POLICY_TERM)]
        term: u32,

        /// Disability benefit period: "to_age_65" or "<n>_years"
        #[arg(long, default_value = "to_age_65")]
        benefit_period: String,

        /// Disability waiting period in days
        #[arg(long, default_value_t = DEFAULT_WAITING_PERIOD_DAYS)]
        waiting_period: u32,

        /// Quote date (YYYY-MM-DD); today when omitted
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Portfolio CSV to check each quote for regulatory compliance
        #[arg(long)]
        portfolio: Option<PathBuf>,
    },

    /// Value an inforce portfolio
    Reserves {
        /// Portfolio CSV
        #[arg(long)]
        portfolio: PathBuf,

        /// Valuation date (YYYY-MM-DD)
        #[arg(long)]
        valuation_date: NaiveDate,

        /// Print the full result as JSON instead of the notes
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List product definitions
    Products,
}

#[derive(Serialize)]
struct QuoteReport<'a> {
    #[serde(flatten)]
    quote: &'a ProductQuote,
    #[serde(skip_serializing_if = "Option::is_none")]
    regulatory_compliance: Option<RegulatoryCompliance>,
}

fn load_tables(path: Option<&Path>) -> Result<Tables> {
    match path {
        Some(dir) => {
            log::info!("Loading tables from {}", dir.display());
            Tables::from_path(dir).with_context(|| format!("Failed to load tables from {}", dir.display()))
        }
        None => Ok(Tables::default_pricing()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn single_request(product: ProductType, amount: f64, term: u32, benefit_period: String, waiting_period: u32) -> ProductRequest {
    match product {
        ProductType::TermLife => ProductRequest::TermLife {
            coverage_amount: amount,
            policy_term: term,
        },
        ProductType::WholeLife => ProductRequest::WholeLife {
            coverage_amount: amount,
            policy_term: term,
        },
        ProductType::DisabilityIncome => ProductRequest::DisabilityIncome {
            monthly_benefit: amount,
            benefit_period,
            waiting_period,
        },
        ProductType::CriticalIllness => ProductRequest::CriticalIllness { coverage_amount: amount },
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let tables = Arc::new(load_tables(cli.tables.as_deref())?);

    match cli.command {
        Command::Quote {
            applicant,
            requests,
            product,
            amount,
            term,
            benefit_period,
            waiting_period,
            as_of,
            portfolio,
        } => {
            let applicant: Applicant = read_json(&applicant)?;
            let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());

            let requests: Vec<ProductRequest> = match (requests, product, amount) {
                (Some(path), _, _) => read_json(&path)?,
                (None, Some(product), Some(amount)) => {
                    vec![single_request(product, amount, term, benefit_period, waiting_period)]
                }
                _ => bail!("Either --requests or both --product and --amount are required"),
            };

            let manager = ProductManager::new(tables.clone());
            let quotes = manager.quote_many(&applicant, &requests, as_of);
            if quotes.is_empty() {
                bail!("No quotes could be generated for {} request(s)", requests.len());
            }

            let engine = ReserveEngine::new(tables.clone(), as_of);
            let reserves = match portfolio {
                Some(path) => Some(engine.calculate_portfolio_reserves(&load_portfolio(&path)?)),
                None => None,
            };

            let reports: Vec<QuoteReport> = quotes
                .iter()
                .map(|quote| QuoteReport {
                    quote,
                    regulatory_compliance: reserves.as_ref().map(|calc| {
                        engine.assess_regulatory_compliance(
                            quote.product_type,
                            &quote.premium_quote,
                            &quote.risk_assessment,
                            quote.approved_coverage,
                            calc,
                        )
                    }),
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&reports)?);
        }

        Command::Reserves {
            portfolio,
            valuation_date,
            json,
        } => {
            let policies = load_portfolio(&portfolio)?;
            let engine = ReserveEngine::new(tables, valuation_date);
            let calc = engine.calculate_portfolio_reserves(&policies);

            if json {
                println!("{}", serde_json::to_string_pretty(&calc)?);
            } else {
                println!("Portfolio valuation as of {}", engine.valuation_date());
                println!("{}\n", "=".repeat(40));
                println!(
                    "{:<12} {:<18} {:>14} {:>12} {:>12} {:>14}",
                    "Policy", "Product", "Reserve", "UPR", "Claims", "Total"
                );
                println!("{}", "-".repeat(87));
                for reserve in &calc.policies {
                    println!(
                        "{:<12} {:<18} {:>14.2} {:>12.2} {:>12.2} {:>14.2}",
                        reserve.policy_id.as_deref().unwrap_or("-"),
                        reserve.product_type.as_str(),
                        reserve.policy_reserve,
                        reserve.unearned_premium,
                        reserve.claims_reserve,
                        reserve.total(),
                    );
                }
                println!("\n{}", calc.compliance_notes);
            }
        }

        Command::Products => {
            println!("{:<18} {:<24} {:>8} {:>8} {:>8} {:>9} {:>14} {:>14}",
                "Type", "Name", "Expense", "Profit", "Comm", "Ages", "Min", "Max");
            println!("{}", "-".repeat(110));
            for (product_type, product) in tables.products.iter() {
                println!(
                    "{:<18} {:<24} {:>8.2} {:>8.2} {:>8.2} {:>4}-{:<4} {:>14.0} {:>14.0}",
                    product_type.as_str(),
                    product.name,
                    product.expense_load,
                    product.profit_margin,
                    product.commission,
                    product.min_age,
                    product.max_age,
                    product.min_coverage,
                    product.max_coverage,
                );
            }
        }
    }

    Ok(())
}
