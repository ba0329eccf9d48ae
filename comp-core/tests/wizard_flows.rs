//! End-to-end walks through both wizards against the built-in rate table.

use std::sync::Arc;

use chrono::NaiveDate;
use comp_core::calculations::common::round_half_up;
use comp_core::wizard::{Advance, AwwFlow, AwwStep, CommutedStep, CommutedValueFlow, Wizard};
use comp_core::{AwwOutcome, RateTable};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date")
}

#[test]
fn test_aww_wizard_caps_high_wage_at_year_maximum() {
    init_tracing();
    let mut wizard = Wizard::new(AwwFlow::new(Arc::new(RateTable::default()), today()));

    wizard.set_field("date_of_injury", "03/15/2023").unwrap();
    assert_eq!(wizard.next().unwrap(), Advance::Moved(AwwStep::SpecialCase));
    assert_eq!(
        wizard.next().unwrap(),
        Advance::Moved(AwwStep::EmployedFourQuarters)
    );
    assert_eq!(wizard.next().unwrap(), Advance::Moved(AwwStep::QuarterlyPay));
    for quarter in 1..=4 {
        wizard
            .set_field(&format!("quarter{quarter}_pay"), "$26,000.00")
            .unwrap();
    }
    assert_eq!(wizard.next().unwrap(), Advance::Completed(AwwStep::Summary));

    let result = wizard
        .results()
        .and_then(AwwOutcome::computed)
        .expect("computed result");
    assert_eq!(round_half_up(result.average_weekly_wage), dec!(2000.00));
    assert_eq!(result.compensation_rate, dec!(1035.78));
    assert_eq!(result.max_rate_applied, Some(dec!(1035.78)));

    let display = result.display_fields();
    assert_eq!(display["compensation_rate"], "$1,035.78");
    assert_eq!(display["quarter1_label"], "Q4 2022");
    assert_eq!(display["quarter4_label"], "Q1 2022");
}

#[test]
fn test_aww_wizard_history_matches_path_taken() {
    init_tracing();
    let mut wizard = Wizard::new(AwwFlow::new(Arc::new(RateTable::default()), today()));

    wizard.set_field("date_of_injury", "2024-11-02").unwrap();
    wizard.next().unwrap();
    wizard.set_field("special_case", "inmate").unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard.set_field("employed_four_quarters", "no").unwrap();
    wizard.next().unwrap();

    assert_eq!(
        wizard.history(),
        &[
            AwwStep::DateOfInjury,
            AwwStep::SpecialCase,
            AwwStep::Inmate,
            AwwStep::EmployedFourQuarters,
        ]
    );
    assert_eq!(wizard.current_step(), AwwStep::ShortEmployment);
}

#[test]
fn test_commuted_value_wizard_full_claim() {
    init_tracing();
    let mut wizard = Wizard::new(CommutedValueFlow::new(
        Arc::new(RateTable::default()),
        today(),
    ));

    wizard.set_field("year_of_injury", "2021").unwrap();
    wizard.next().unwrap();
    wizard.set_field("compensation_rate", "500").unwrap();
    wizard.next().unwrap();
    wizard.set_field("ttd_paid_weeks", "").unwrap();
    wizard.set_field("other_credit_weeks", "").unwrap();

    assert_eq!(
        wizard.next().unwrap(),
        Advance::Completed(CommutedStep::Summary)
    );

    let display = wizard.results().expect("results").display_fields();
    assert_eq!(display["commuted_value"], "$203,960.22");
    assert_eq!(display["discount_rate"], "4.38%");
}

#[test]
fn test_shared_rate_table_serves_independent_sessions() {
    init_tracing();
    let table = Arc::new(RateTable::default());
    let mut aww = Wizard::new(AwwFlow::new(Arc::clone(&table), today()));
    let mut commuted = Wizard::new(CommutedValueFlow::new(Arc::clone(&table), today()));

    aww.set_field("date_of_injury", "01/02/2020").unwrap();
    commuted.set_field("year_of_injury", "2019").unwrap();
    aww.next().unwrap();
    commuted.next().unwrap();

    assert_eq!(aww.current_step(), AwwStep::SpecialCase);
    assert_eq!(commuted.current_step(), CommutedStep::CompensationRate);
    assert_eq!(Arc::strong_count(&table), 3);
}
