//! Price a grid of issue ages × terms for both genders
//!
//! Outputs one CSV row per cell for rate-table review
//!
//! Usage: cargo run --release --bin rate_grid -- --coverage 250000 --output rate_grid.csv

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;

use premium_engine::{Gender, PremiumCalculator, ProductType, QuoteResult, RiskFactors, Tables};

#[derive(Parser, Debug)]
#[command(name = "rate_grid")]
#[command(about = "Price life products over every age and term in the catalog")]
struct Args {
    /// Directory of table files; built-in tables when omitted
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Face amount priced in every cell
    #[arg(long, default_value_t = 250_000.0)]
    coverage: f64,

    /// Life product to price
    #[arg(long, default_value = "term_life")]
    product: ProductType,

    /// Step between issue ages
    #[arg(long, default_value_t = 5)]
    age_step: u32,

    #[arg(long, default_value = "rate_grid.csv")]
    output: PathBuf,
}

struct GridCell {
    age: u32,
    gender: Gender,
    term: u32,
    quote: Option<QuoteResult>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tables = match &args.tables {
        Some(dir) => Tables::from_path(dir).with_context(|| format!("Failed to load tables from {}", dir.display()))?,
        None => Tables::default_pricing(),
    };
    let tables = Arc::new(tables);

    let product = tables.products.get(args.product)?;
    let terms = product.terms.clone().unwrap_or_else(|| vec![premium_engine::pricing::DEFAULT_POLICY_TERM]);
    let ages: Vec<u32> = (product.min_age..=product.max_age)
        .step_by(args.age_step.max(1) as usize)
        .collect();

    let cells: Vec<(u32, Gender, u32)> = ages
        .iter()
        .flat_map(|&age| {
            terms
                .iter()
                .flat_map(move |&term| [Gender::Female, Gender::Male].map(|gender| (age, gender, term)))
        })
        .collect();

    println!(
        "Pricing {} cells ({} ages × {} terms × 2 genders) for {}...",
        cells.len(),
        ages.len(),
        terms.len(),
        product.name
    );
    let start = Instant::now();

    let calculator = PremiumCalculator::new(tables.clone());
    let no_risk = RiskFactors::default();

    // Cells outside the product's bounds come back as validation errors and stay blank
    let results: Vec<GridCell> = cells
        .par_iter()
        .map(|&(age, gender, term)| {
            let quote = match calculator.price_life(age, gender, args.coverage, term, args.product, &no_risk) {
                Ok(quote) => Some(quote),
                Err(e) => {
                    log::debug!("age {} term {} {}: {}", age, term, gender, e);
                    None
                }
            };
            GridCell { age, gender, term, quote }
        })
        .collect();

    println!("Pricing complete in {:?}", start.elapsed());

    let file = File::create(&args.output).with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "Age,Gender,Term,NetPremium,GrossPremium,AnnualPremium,Reserves")?;

    let mut priced = 0usize;
    for cell in &results {
        match &cell.quote {
            Some(quote) => {
                priced += 1;
                writeln!(
                    out,
                    "{},{},{},{:.4},{:.4},{:.2},{:.2}",
                    cell.age,
                    cell.gender,
                    cell.term,
                    quote.net_premium,
                    quote.gross_premium,
                    quote.annual_premium(),
                    quote.reserves,
                )?;
            }
            None => writeln!(out, "{},{},{},,,,", cell.age, cell.gender, cell.term)?,
        }
    }
    out.flush()?;

    println!("{} of {} cells priced", priced, results.len());
    println!("Output written to {}", args.output.display());
    Ok(())
}
