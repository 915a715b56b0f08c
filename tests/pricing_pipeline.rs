//! End-to-end flow over the shipped data directory: quote, value, check compliance

use std::fs::File;
use std::sync::Arc;

use approx::assert_relative_eq;
use chrono::NaiveDate;

use premium_engine::tables::{MortalityTable, RegulatoryStandards};
use premium_engine::{
    load_portfolio, Applicant, Gender, ProductManager, ProductRequest, ProductType, ReserveEngine, Tables,
};

fn tables() -> Arc<Tables> {
    Arc::new(Tables::from_default_path().expect("shipped tables should load"))
}

fn sample_applicant() -> Applicant {
    let file = File::open("data/sample_applicant.json").unwrap();
    serde_json::from_reader(file).unwrap()
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

#[test]
fn test_shipped_tables_match_builtin_defaults() {
    let loaded = tables();
    let builtin = Tables::default_pricing();
    let cso = MortalityTable::cso_2017();

    assert_eq!(loaded.discount_rate, builtin.discount_rate);
    assert_eq!(loaded.regulatory, RegulatoryStandards::default());
    for age in [18, 35, 50, 65, 80, 95] {
        for gender in [Gender::Female, Gender::Male] {
            assert_eq!(loaded.mortality.annual_rate(age, gender), cso.annual_rate(age, gender));
        }
    }
    for (product_type, product) in builtin.products.iter() {
        let shipped = loaded.products.get(product_type).unwrap();
        assert_eq!(shipped.load_factor(), product.load_factor());
        assert_eq!(shipped.terms, product.terms);
    }
}

#[test]
fn test_sample_applicant_quotes() {
    let manager = ProductManager::new(tables());
    let applicant = sample_applicant();
    let requests: Vec<ProductRequest> = serde_json::from_str(
        r#"[
            {"type": "term_life", "coverage_amount": 500000},
            {"type": "whole_life", "coverage_amount": 250000, "policy_term": 30},
            {"type": "disability_income", "monthly_benefit": 4000},
            {"type": "critical_illness", "coverage_amount": 100000}
        ]"#,
    )
    .unwrap();

    let quotes = manager.quote_many(&applicant, &requests, as_of());
    let products: Vec<ProductType> = quotes.iter().map(|q| q.product_type).collect();
    assert_eq!(products, ProductType::ALL.to_vec());

    let expiry = NaiveDate::from_ymd_opt(2024, 7, 30);
    for quote in &quotes {
        assert!(!quote.is_declined(), "{} declined", quote.product_type);
        assert_eq!(quote.quote_valid_until, expiry);
        assert!(quote.premium_quote.gross_premium > quote.premium_quote.net_premium);
        assert!(quote.premium_quote.risk_multiplier > 0.0);
        assert_eq!(quote.underwriter_notes, quote.risk_assessment.underwriting_notes);

        let overall = quote.risk_assessment.overall_risk_multiplier;
        assert!(overall > 0.0 && overall <= 10.0);
    }

    // Life quotes carry the underwriting multiplier on top of pricing
    let term = &quotes[0];
    assert_eq!(term.premium_quote.risk_multiplier, term.risk_assessment.overall_risk_multiplier);
    assert_eq!(term.approved_coverage, 500_000.0);
    // Term life is quoted monthly
    assert_relative_eq!(
        term.premium_quote.annual_premium(),
        term.premium_quote.gross_premium * 12.0,
        max_relative = 1e-12
    );
}

#[test]
fn test_sample_portfolio_reserves() {
    let tables = tables();
    let policies = load_portfolio("data/sample_portfolio.csv").unwrap();
    assert_eq!(policies.len(), 4);

    let engine = ReserveEngine::new(tables.clone(), as_of());
    let calc = engine.calculate_portfolio_reserves(&policies);

    let ids: Vec<&str> = calc.policies.iter().filter_map(|p| p.policy_id.as_deref()).collect();
    assert_eq!(ids, vec!["TERM001", "DI001", "WL001", "CI001"]);

    assert_relative_eq!(
        calc.total_reserves,
        calc.policy_reserves + calc.unearned_premium_reserves + calc.claims_reserves,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        calc.claims_reserves,
        500_000.0 * 0.001 + 60_000.0 * 0.05 + 250_000.0 * 0.002 + 150_000.0 * 0.01,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        calc.solvency_margin,
        750_000.0 * 0.04 + 60_000.0 * 0.08 + 150_000.0 * 0.06,
        max_relative = 1e-12
    );

    // Every policy reserve respects its floor
    for (policy, reserve) in policies.iter().zip(&calc.policies) {
        let floor = policy.coverage_amount * tables.regulatory.min_reserve_ratio(policy.product_type);
        assert!(reserve.policy_reserve >= floor - 1e-9);
        assert!(reserve.unearned_premium >= 0.0 && reserve.unearned_premium <= policy.annual_premium);
    }

    assert_eq!(
        calc.regulatory_requirements_met,
        calc.total_reserves >= calc.solvency_margin.max(calc.risk_based_capital)
    );
    assert!(calc.compliance_notes.contains("Capital Adequacy Ratio:"));
}

#[test]
fn test_quote_compliance_against_portfolio() {
    let tables = tables();
    let manager = ProductManager::new(tables.clone());
    let engine = ReserveEngine::new(tables.clone(), as_of());
    let calc = engine.calculate_portfolio_reserves(&load_portfolio("data/sample_portfolio.csv").unwrap());

    let quote = manager
        .life_quote(&sample_applicant(), 500_000.0, 20, ProductType::TermLife, as_of())
        .unwrap();
    let compliance = engine.assess_regulatory_compliance(
        quote.product_type,
        &quote.premium_quote,
        &quote.risk_assessment,
        quote.approved_coverage,
        &calc,
    );

    assert!(compliance.pricing_compliance);
    assert!(compliance.underwriting_compliance);
    assert_eq!(compliance.reserve_adequacy, calc.regulatory_requirements_met);
    assert_eq!(
        compliance.overall_compliance,
        compliance.reserve_adequacy
            && compliance.capital_adequacy
            && compliance.pricing_compliance
            && compliance.underwriting_compliance
    );
    assert_eq!(compliance.regulatory_notes.len(), compliance.required_actions.len());
}

#[test]
fn test_declined_applicant_end_to_end() {
    let manager = ProductManager::new(tables());
    let mut applicant = sample_applicant();
    applicant.medical_conditions = vec!["coronary_artery_disease".into(), "diabetes_type2".into()];
    applicant.hazardous_activities = vec!["skydiving".into()];

    let quote = manager
        .life_quote(&applicant, 500_000.0, 20, ProductType::TermLife, as_of())
        .unwrap();

    assert!(quote.is_declined());
    assert_eq!(quote.approved_coverage, 0.0);
    assert_eq!(quote.quote_valid_until, None);
    assert!(quote.underwriter_notes.contains("RECOMMENDATIONS:"));
}
