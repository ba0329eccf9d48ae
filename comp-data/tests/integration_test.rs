//! Integration tests for loading rate tables and using them in calculations.

use comp_core::calculations::{AwwCalculator, CommutedValueCalculator};
use comp_core::models::CommutedValueInput;
use comp_core::rates::FallbackPolicy;
use comp_data::{RateTableLoader, RateTableLoaderError};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const TEST_CSV: &str = include_str!("../test-data/max_rates.csv");

#[test]
fn test_load_sample_table() {
    let table = RateTableLoader::load(TEST_CSV.as_bytes()).expect("Failed to load table");

    assert_eq!(table.earliest_year(), 2019);
    assert_eq!(table.latest_year(), 2025);
    assert_eq!(table.entries().count(), 7);
    assert_eq!(
        table.max_comp_rate_for(2021, FallbackPolicy::NearestYear),
        dec!(903.40)
    );
}

#[test]
fn test_loaded_table_falls_back_to_its_own_earliest_year() {
    let table = RateTableLoader::load(TEST_CSV.as_bytes()).expect("Failed to load table");

    let lookup = table.max_rate_lookup(2012, FallbackPolicy::NearestYear);

    assert!(lookup.fell_back);
    assert_eq!(lookup.effective_year, Some(2019));
    assert_eq!(lookup.rate, dec!(845.74));
}

#[test]
fn test_loaded_table_caps_compensation_rate() {
    let table = RateTableLoader::load(TEST_CSV.as_bytes()).expect("Failed to load table");
    let calculator = AwwCalculator::new(&table);

    let comp = calculator.compensation_rate(dec!(2000), 2020);

    assert_eq!(comp.rate, dec!(866.67));
    assert_eq!(comp.max_rate_applied, Some(dec!(866.67)));
}

#[test]
fn test_year_specific_discount_rate_is_used() {
    let table = RateTableLoader::load(TEST_CSV.as_bytes()).expect("Failed to load table");
    let calculator = CommutedValueCalculator::new(&table);

    let input = CommutedValueInput {
        year_of_injury: 2023,
        compensation_rate: dec!(500),
        ttd_paid_weeks: dec!(0),
        other_credit_weeks: dec!(0),
    };
    let result = calculator.calculate(&input).expect("calculation succeeds");

    assert_eq!(result.discount_rate, dec!(0.04));

    let default_year = CommutedValueInput {
        year_of_injury: 2022,
        ..input
    };
    let result = calculator.calculate(&default_year).expect("calculation succeeds");
    assert_eq!(result.discount_rate, dec!(0.0438));
}

#[test]
fn test_duplicate_year_is_reported() {
    let csv = format!("{TEST_CSV}2025,1200.00,\n");

    let result = RateTableLoader::load(csv.as_bytes());

    match result {
        Err(RateTableLoaderError::InvalidTable(err)) => {
            assert_eq!(err.to_string(), "year 2025 appears more than once");
        }
        other => panic!("expected InvalidTable, got {other:?}"),
    }
}
