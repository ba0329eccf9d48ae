//! Average weekly wage wizard.
//!
//! | Step                 | Next |
//! |----------------------|------|
//! | DateOfInjury         | SpecialCase |
//! | SpecialCase          | EmployedFourQuarters for "none", else the matching special case step |
//! | special case steps   | EmployedFourQuarters |
//! | EmployedFourQuarters | QuarterlyPay for "yes", ShortEmployment for "no" |
//! | QuarterlyPay         | Summary |
//! | ShortEmployment      | Summary |
//!
//! The special case steps only explain that the category has its own wage
//! rule; the calculation itself is the standard one.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::AwwCalculator;
use crate::calculations::common::parse_money;
use crate::calculations::quarters::parse_date;
use crate::models::{AwwInput, AwwOutcome, SpecialCase};
use crate::rates::RateTable;
use crate::wizard::WizardError;
use crate::wizard::step::{ErrorMap, FieldMap, StepSpec, Transition, WizardFlow, no_errors};
use crate::wizard::validators::{collect, date_in_range, non_negative_money, one_of, raw};

pub const DATE_OF_INJURY: &str = "date_of_injury";
pub const SPECIAL_CASE: &str = "special_case";
pub const EMPLOYED_FOUR_QUARTERS: &str = "employed_four_quarters";
pub const QUARTER_PAY: [&str; 4] = ["quarter1_pay", "quarter2_pay", "quarter3_pay", "quarter4_pay"];

/// Largest gross pay accepted for a single quarter.
pub const MAX_QUARTER_PAY: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

const YES: &str = "yes";
const NO: &str = "no";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AwwStep {
    DateOfInjury,
    SpecialCase,
    Guard,
    VolunteerFirefighter,
    VolunteerRescue,
    VolunteerSheriff,
    VolunteerConstable,
    Inmate,
    Student,
    EmployedFourQuarters,
    QuarterlyPay,
    ShortEmployment,
    Summary,
}

impl AwwStep {
    pub fn id(&self) -> u8 {
        match self {
            Self::DateOfInjury => 1,
            Self::SpecialCase => 2,
            Self::Guard => 3,
            Self::VolunteerFirefighter => 4,
            Self::VolunteerRescue => 5,
            Self::VolunteerSheriff => 6,
            Self::VolunteerConstable => 7,
            Self::Inmate => 8,
            Self::Student => 9,
            Self::EmployedFourQuarters => 10,
            Self::QuarterlyPay => 11,
            Self::ShortEmployment => 12,
            Self::Summary => 13,
        }
    }
}

const SPECIAL_CASE_ARMS: &[(&str, AwwStep)] = &[
    ("none", AwwStep::EmployedFourQuarters),
    ("guard", AwwStep::Guard),
    ("volunteer_ff", AwwStep::VolunteerFirefighter),
    ("volunteer_rescue", AwwStep::VolunteerRescue),
    ("volunteer_sheriff", AwwStep::VolunteerSheriff),
    ("volunteer_constable", AwwStep::VolunteerConstable),
    ("inmate", AwwStep::Inmate),
    ("student", AwwStep::Student),
];

const EMPLOYMENT_ARMS: &[(&str, AwwStep)] = &[
    (YES, AwwStep::QuarterlyPay),
    (NO, AwwStep::ShortEmployment),
];

const SPECIAL_CASE_NOTE: &str = "Wages for this category are set by a separate rule under Title 42 \
     that this calculator does not apply. The standard four-quarter method is used below; \
     confirm the result against the Commission's rule for this category.";

const fn special_case_step(
    step: AwwStep,
    title: &'static str,
) -> StepSpec<AwwFlow> {
    StepSpec {
        step,
        title,
        note: SPECIAL_CASE_NOTE,
        fields: &[],
        validate: no_errors,
        transition: Transition::Always(AwwStep::EmployedFourQuarters),
    }
}

const AWW_STEPS: &[StepSpec<AwwFlow>] = &[
    StepSpec {
        step: AwwStep::DateOfInjury,
        title: "Date of injury",
        note: "",
        fields: &[DATE_OF_INJURY],
        validate: AwwFlow::validate_date_of_injury,
        transition: Transition::Always(AwwStep::SpecialCase),
    },
    StepSpec {
        step: AwwStep::SpecialCase,
        title: "Special employment case",
        note: "Select the category that describes the injured worker, if any.",
        fields: &[SPECIAL_CASE],
        validate: AwwFlow::validate_special_case,
        transition: Transition::Branch {
            field: SPECIAL_CASE,
            arms: SPECIAL_CASE_ARMS,
        },
    },
    special_case_step(AwwStep::Guard, "National Guard or State Guard member"),
    special_case_step(AwwStep::VolunteerFirefighter, "Volunteer firefighter"),
    special_case_step(AwwStep::VolunteerRescue, "Volunteer rescue squad member"),
    special_case_step(AwwStep::VolunteerSheriff, "Volunteer deputy sheriff"),
    special_case_step(AwwStep::VolunteerConstable, "Volunteer state constable"),
    special_case_step(AwwStep::Inmate, "Inmate"),
    special_case_step(AwwStep::Student, "Student"),
    StepSpec {
        step: AwwStep::EmployedFourQuarters,
        title: "Employment length",
        note: "Was the worker employed for all four quarters before the quarter of injury?",
        fields: &[EMPLOYED_FOUR_QUARTERS],
        validate: AwwFlow::validate_employment,
        transition: Transition::Branch {
            field: EMPLOYED_FOUR_QUARTERS,
            arms: EMPLOYMENT_ARMS,
        },
    },
    StepSpec {
        step: AwwStep::QuarterlyPay,
        title: "Quarterly pay",
        note: "Enter gross pay for each quarter. Quarter 1 is the most recent.",
        fields: &QUARTER_PAY,
        validate: AwwFlow::validate_quarterly_pay,
        transition: Transition::Always(AwwStep::Summary),
    },
    StepSpec {
        step: AwwStep::ShortEmployment,
        title: "Less than four quarters",
        note: "For shorter employment the average weekly wage is based on days actually \
               worked, the wage of a comparable employee, or the contracted wage. These \
               methods are not computed here.",
        fields: &[],
        validate: no_errors,
        transition: Transition::Always(AwwStep::Summary),
    },
    StepSpec {
        step: AwwStep::Summary,
        title: "Summary",
        note: "",
        fields: &[],
        validate: no_errors,
        transition: Transition::Terminal,
    },
];

/// The average weekly wage wizard for one session.
#[derive(Debug, Clone)]
pub struct AwwFlow {
    rate_table: Arc<RateTable>,
    today: NaiveDate,
}

impl AwwFlow {
    pub fn new(
        rate_table: Arc<RateTable>,
        today: NaiveDate,
    ) -> Self {
        Self { rate_table, today }
    }

    /// First day of the earliest year in the rate table.
    pub fn earliest_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.rate_table.earliest_year(), 1, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Builds the calculator input from validated fields.
    pub fn input(
        &self,
        fields: &FieldMap,
    ) -> Result<AwwInput, WizardError> {
        let date_of_injury =
            parse_date(raw(fields, DATE_OF_INJURY)).map_err(|_| invalid(fields, DATE_OF_INJURY))?;
        let special_case =
            SpecialCase::parse(raw(fields, SPECIAL_CASE)).ok_or_else(|| invalid(fields, SPECIAL_CASE))?;
        let employed_four_quarters = raw(fields, EMPLOYED_FOUR_QUARTERS) == YES;

        let mut quarter_pay = [Decimal::ZERO; 4];
        if employed_four_quarters {
            for (pay, name) in quarter_pay.iter_mut().zip(QUARTER_PAY) {
                *pay = parse_money(raw(fields, name)).map_err(|_| invalid(fields, name))?;
            }
        }

        Ok(AwwInput {
            date_of_injury,
            special_case,
            employed_four_quarters,
            quarter_pay,
        })
    }

    fn validate_date_of_injury(
        &self,
        fields: &FieldMap,
    ) -> ErrorMap {
        let mut errors = ErrorMap::new();
        collect(
            &mut errors,
            DATE_OF_INJURY,
            date_in_range(fields, DATE_OF_INJURY, self.earliest_date(), self.today),
        );
        errors
    }

    fn validate_special_case(
        &self,
        fields: &FieldMap,
    ) -> ErrorMap {
        let codes: Vec<&str> = SpecialCase::all().iter().map(SpecialCase::as_str).collect();
        let mut errors = ErrorMap::new();
        collect(&mut errors, SPECIAL_CASE, one_of(fields, SPECIAL_CASE, &codes));
        errors
    }

    fn validate_employment(
        &self,
        fields: &FieldMap,
    ) -> ErrorMap {
        let mut errors = ErrorMap::new();
        collect(
            &mut errors,
            EMPLOYED_FOUR_QUARTERS,
            one_of(fields, EMPLOYED_FOUR_QUARTERS, &[YES, NO]),
        );
        errors
    }

    fn validate_quarterly_pay(
        &self,
        fields: &FieldMap,
    ) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for name in QUARTER_PAY {
            collect(&mut errors, name, non_negative_money(fields, name, MAX_QUARTER_PAY));
        }
        errors
    }
}

fn invalid(
    fields: &FieldMap,
    field: &'static str,
) -> WizardError {
    WizardError::InvalidField {
        field,
        value: raw(fields, field).to_string(),
    }
}

impl WizardFlow for AwwFlow {
    type Step = AwwStep;
    type Outcome = AwwOutcome;

    fn name(&self) -> &'static str {
        "aww"
    }

    fn steps(&self) -> &'static [StepSpec<Self>] {
        AWW_STEPS
    }

    fn initial_step(&self) -> AwwStep {
        AwwStep::DateOfInjury
    }

    fn seed_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(DATE_OF_INJURY.to_string(), String::new());
        fields.insert(SPECIAL_CASE.to_string(), SpecialCase::None.as_str().to_string());
        fields.insert(EMPLOYED_FOUR_QUARTERS.to_string(), YES.to_string());
        for name in QUARTER_PAY {
            fields.insert(name.to_string(), "0.00".to_string());
        }
        fields
    }

    fn compute(
        &self,
        fields: &FieldMap,
    ) -> Result<AwwOutcome, WizardError> {
        let input = self.input(fields)?;
        Ok(AwwCalculator::new(&self.rate_table).calculate(&input)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_half_up;
    use crate::models::UnsupportedReason;
    use crate::wizard::{Advance, Wizard};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    fn wizard() -> Wizard<AwwFlow> {
        Wizard::new(AwwFlow::new(Arc::new(RateTable::default()), today()))
    }

    fn advance_to_special_case(wizard: &mut Wizard<AwwFlow>) {
        wizard.set_field(DATE_OF_INJURY, "05/10/2025").unwrap();
        assert_eq!(wizard.next().unwrap(), Advance::Moved(AwwStep::SpecialCase));
    }

    // =========================================================================
    // step table tests
    // =========================================================================

    #[test]
    fn every_step_has_exactly_one_table_row() {
        let steps = AWW_STEPS.iter().map(|spec| spec.step).collect::<Vec<_>>();

        for step in &steps {
            assert_eq!(steps.iter().filter(|s| *s == step).count(), 1, "{step:?}");
        }
        assert_eq!(steps.len(), 13);
    }

    #[test]
    fn special_case_branches_to_eight_distinct_steps() {
        let mut targets = SPECIAL_CASE_ARMS.iter().map(|(_, step)| step.id()).collect::<Vec<_>>();
        targets.sort_unstable();
        targets.dedup();

        assert_eq!(targets.len(), 8);
        assert_eq!(SPECIAL_CASE_ARMS.len(), SpecialCase::all().len());
    }

    #[test]
    fn only_summary_is_terminal() {
        let terminal: Vec<AwwStep> = AWW_STEPS
            .iter()
            .filter(|spec| spec.is_terminal())
            .map(|spec| spec.step)
            .collect();

        assert_eq!(terminal, vec![AwwStep::Summary]);
    }

    #[test]
    fn seed_fields_are_documented_defaults() {
        let fields = wizard().fields().clone();

        assert_eq!(fields[DATE_OF_INJURY], "");
        assert_eq!(fields[SPECIAL_CASE], "none");
        assert_eq!(fields[EMPLOYED_FOUR_QUARTERS], "yes");
        assert_eq!(fields["quarter3_pay"], "0.00");
    }

    // =========================================================================
    // validation tests
    // =========================================================================

    #[test]
    fn missing_date_blocks_first_step() {
        let mut wizard = wizard();

        assert_eq!(wizard.next().unwrap(), Advance::Blocked);
        assert_eq!(wizard.current_step(), AwwStep::DateOfInjury);
        assert_eq!(wizard.errors()[DATE_OF_INJURY], "Enter a date.");
    }

    #[test]
    fn future_date_blocks_first_step() {
        let mut wizard = wizard();
        wizard.set_field(DATE_OF_INJURY, "2025-09-02").unwrap();

        assert_eq!(wizard.next().unwrap(), Advance::Blocked);
        assert!(wizard.errors().contains_key(DATE_OF_INJURY));
    }

    #[test]
    fn date_before_table_coverage_is_rejected() {
        let mut wizard = wizard();
        wizard.set_field(DATE_OF_INJURY, "12/31/2009").unwrap();

        assert_eq!(wizard.next().unwrap(), Advance::Blocked);
        assert_eq!(
            wizard.errors()[DATE_OF_INJURY],
            "Date must be on or after 01/01/2010."
        );
    }

    #[test]
    fn editing_field_clears_its_error() {
        let mut wizard = wizard();
        wizard.next().unwrap();

        wizard.set_field(DATE_OF_INJURY, "05/10/2025").unwrap();

        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn unknown_special_case_is_rejected() {
        let mut wizard = wizard();
        advance_to_special_case(&mut wizard);
        wizard.set_field(SPECIAL_CASE, "astronaut").unwrap();

        assert_eq!(wizard.next().unwrap(), Advance::Blocked);
        assert_eq!(wizard.current_step(), AwwStep::SpecialCase);
    }

    #[test]
    fn negative_quarter_pay_is_rejected() {
        let mut wizard = wizard();
        advance_to_special_case(&mut wizard);
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.set_field("quarter2_pay", "-5").unwrap();

        assert_eq!(wizard.next().unwrap(), Advance::Blocked);
        assert_eq!(wizard.errors()["quarter2_pay"], "Amount cannot be negative.");
        assert_eq!(wizard.results(), None);
    }

    #[test]
    fn oversized_quarter_pay_blocks_instead_of_overflowing() {
        let mut wizard = wizard();
        advance_to_special_case(&mut wizard);
        wizard.next().unwrap();
        wizard.next().unwrap();
        for name in QUARTER_PAY {
            wizard.set_field(name, "79228162514264337593543950335").unwrap();
        }

        assert_eq!(wizard.next().unwrap(), Advance::Blocked);
        assert_eq!(wizard.current_step(), AwwStep::QuarterlyPay);
        assert_eq!(
            wizard.errors()["quarter1_pay"],
            "Amount cannot exceed $100,000,000.00."
        );
        assert_eq!(wizard.errors().len(), 4);
        assert_eq!(wizard.results(), None);
    }

    #[test]
    fn quarter_pay_at_ceiling_computes() {
        let mut wizard = wizard();
        advance_to_special_case(&mut wizard);
        wizard.next().unwrap();
        wizard.next().unwrap();
        for name in QUARTER_PAY {
            wizard.set_field(name, "100,000,000").unwrap();
        }

        assert_eq!(wizard.next().unwrap(), Advance::Completed(AwwStep::Summary));
        let result = wizard.results().and_then(AwwOutcome::computed).unwrap();
        assert_eq!(result.total_annual_pay, dec!(400000000));
        assert_eq!(result.compensation_rate, dec!(1134.43));
    }

    // =========================================================================
    // navigation tests
    // =========================================================================

    #[test]
    fn special_case_round_trip_preserves_selection() {
        let mut wizard = wizard();
        advance_to_special_case(&mut wizard);

        assert_eq!(
            wizard.next().unwrap(),
            Advance::Moved(AwwStep::EmployedFourQuarters)
        );
        assert!(wizard.back());

        assert_eq!(wizard.current_step(), AwwStep::SpecialCase);
        assert_eq!(wizard.field(SPECIAL_CASE), Some("none"));
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn special_case_routes_through_placeholder_step() {
        let mut wizard = wizard();
        advance_to_special_case(&mut wizard);
        wizard.set_field(SPECIAL_CASE, "volunteer_ff").unwrap();

        assert_eq!(
            wizard.next().unwrap(),
            Advance::Moved(AwwStep::VolunteerFirefighter)
        );
        assert_eq!(
            wizard.next().unwrap(),
            Advance::Moved(AwwStep::EmployedFourQuarters)
        );

        assert!(wizard.back());
        assert_eq!(wizard.current_step(), AwwStep::VolunteerFirefighter);
        assert!(wizard.back());
        assert_eq!(wizard.current_step(), AwwStep::SpecialCase);
    }

    #[test]
    fn back_on_first_step_is_a_no_op() {
        let mut wizard = wizard();

        assert!(!wizard.back());
        assert_eq!(wizard.current_step(), AwwStep::DateOfInjury);
    }

    #[test]
    fn back_is_allowed_with_errors_present() {
        let mut wizard = wizard();
        advance_to_special_case(&mut wizard);
        wizard.set_field(SPECIAL_CASE, "bogus").unwrap();
        wizard.next().unwrap();

        assert!(wizard.back());
        assert_eq!(wizard.current_step(), AwwStep::DateOfInjury);
    }

    // =========================================================================
    // completion tests
    // =========================================================================

    #[test]
    fn four_quarter_path_computes_results() {
        let mut wizard = wizard();
        advance_to_special_case(&mut wizard);
        wizard.next().unwrap();
        assert_eq!(wizard.next().unwrap(), Advance::Moved(AwwStep::QuarterlyPay));
        for name in QUARTER_PAY {
            wizard.set_field(name, "2,500").unwrap();
        }

        assert_eq!(wizard.next().unwrap(), Advance::Completed(AwwStep::Summary));

        let result = wizard.results().and_then(AwwOutcome::computed).unwrap();
        assert_eq!(round_half_up(result.average_weekly_wage), dec!(192.31));
        assert_eq!(round_half_up(result.compensation_rate), dec!(128.21));
        assert!(wizard.is_terminal());
    }

    #[test]
    fn short_employment_path_is_unsupported() {
        let mut wizard = wizard();
        advance_to_special_case(&mut wizard);
        wizard.next().unwrap();
        wizard.set_field(EMPLOYED_FOUR_QUARTERS, "no").unwrap();

        assert_eq!(
            wizard.next().unwrap(),
            Advance::Moved(AwwStep::ShortEmployment)
        );
        assert_eq!(wizard.next().unwrap(), Advance::Completed(AwwStep::Summary));
        assert_eq!(
            wizard.results(),
            Some(&AwwOutcome::Unsupported {
                reason: UnsupportedReason::FewerThanFourQuarters
            })
        );
    }

    #[test]
    fn editing_earlier_field_invalidates_results_and_blocks_recompute() {
        let mut wizard = wizard();
        advance_to_special_case(&mut wizard);
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert!(wizard.results().is_some());

        wizard.set_field(DATE_OF_INJURY, "not a date").unwrap();
        assert_eq!(wizard.results(), None);

        assert_eq!(wizard.next().unwrap(), Advance::Blocked);
        assert_eq!(wizard.results(), None);
        assert!(wizard.errors().contains_key(DATE_OF_INJURY));
    }

    #[test]
    fn reset_restores_seeds_and_first_step() {
        let mut wizard = wizard();
        advance_to_special_case(&mut wizard);
        wizard.set_field(SPECIAL_CASE, "student").unwrap();
        wizard.next().unwrap();

        wizard.reset();

        assert_eq!(wizard.current_step(), AwwStep::DateOfInjury);
        assert_eq!(wizard.field(DATE_OF_INJURY), Some(""));
        assert_eq!(wizard.field(SPECIAL_CASE), Some("none"));
        assert!(wizard.history().is_empty());
        assert!(wizard.errors().is_empty());
        assert_eq!(wizard.results(), None);
    }

    #[test]
    fn unknown_field_is_a_contract_error() {
        let mut wizard = wizard();

        assert_eq!(
            wizard.set_field("favourite_colour", "blue"),
            Err(WizardError::UnknownField("favourite_colour".to_string()))
        );
    }

    #[test]
    fn sessions_do_not_share_state() {
        let table = Arc::new(RateTable::default());
        let mut first = Wizard::new(AwwFlow::new(Arc::clone(&table), today()));
        let second = Wizard::new(AwwFlow::new(table, today()));

        first.set_field(DATE_OF_INJURY, "05/10/2025").unwrap();
        first.next().unwrap();

        assert_eq!(second.current_step(), AwwStep::DateOfInjury);
        assert_eq!(second.field(DATE_OF_INJURY), Some(""));
    }
}
