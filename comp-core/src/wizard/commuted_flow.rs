//! Commuted value wizard: year of injury, compensation rate, credited
//! weeks, then the summary.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::CommutedValueCalculator;
use crate::calculations::commuted_value::MAX_INDEMNITY_WEEKS;
use crate::models::{CommutedValueInput, CommutedValueResult};
use crate::rates::{FallbackPolicy, RateTable};
use crate::wizard::WizardError;
use crate::wizard::step::{ErrorMap, FieldMap, StepSpec, Transition, WizardFlow, no_errors};
use crate::wizard::validators::{collect, positive_money_up_to, raw, weeks_in_range, year_in_range};

pub const YEAR_OF_INJURY: &str = "year_of_injury";
pub const COMPENSATION_RATE: &str = "compensation_rate";
pub const TTD_PAID_WEEKS: &str = "ttd_paid_weeks";
pub const OTHER_CREDIT_WEEKS: &str = "other_credit_weeks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommutedStep {
    YearOfInjury,
    CompensationRate,
    Credits,
    Summary,
}

const COMMUTED_STEPS: &[StepSpec<CommutedValueFlow>] = &[
    StepSpec {
        step: CommutedStep::YearOfInjury,
        title: "Year of injury",
        note: "",
        fields: &[YEAR_OF_INJURY],
        validate: CommutedValueFlow::validate_year,
        transition: Transition::Always(CommutedStep::CompensationRate),
    },
    StepSpec {
        step: CommutedStep::CompensationRate,
        title: "Compensation rate",
        note: "The weekly rate cannot exceed the maximum for the year of injury.",
        fields: &[COMPENSATION_RATE],
        validate: CommutedValueFlow::validate_rate,
        transition: Transition::Always(CommutedStep::Credits),
    },
    StepSpec {
        step: CommutedStep::Credits,
        title: "Weeks already credited",
        note: "Weeks paid or credited count against the 500 week maximum.",
        fields: &[TTD_PAID_WEEKS, OTHER_CREDIT_WEEKS],
        validate: CommutedValueFlow::validate_credits,
        transition: Transition::Always(CommutedStep::Summary),
    },
    StepSpec {
        step: CommutedStep::Summary,
        title: "Summary",
        note: "",
        fields: &[],
        validate: no_errors,
        transition: Transition::Terminal,
    },
];

/// The commuted value wizard for one session.
#[derive(Debug, Clone)]
pub struct CommutedValueFlow {
    rate_table: Arc<RateTable>,
    today: NaiveDate,
}

impl CommutedValueFlow {
    pub fn new(
        rate_table: Arc<RateTable>,
        today: NaiveDate,
    ) -> Self {
        Self { rate_table, today }
    }

    /// Maximum compensation rate for the year currently entered, if the
    /// year is valid.
    pub fn max_rate(
        &self,
        fields: &FieldMap,
    ) -> Option<Decimal> {
        self.year(fields)
            .ok()
            .map(|year| self.rate_table.max_comp_rate_for(year, FallbackPolicy::StatutoryDefault))
    }

    /// Builds the calculator input from validated fields.
    pub fn input(
        &self,
        fields: &FieldMap,
    ) -> Result<CommutedValueInput, WizardError> {
        let year_of_injury = self.year(fields).map_err(|_| invalid(fields, YEAR_OF_INJURY))?;
        let compensation_rate = positive_money_up_to(fields, COMPENSATION_RATE, Decimal::MAX)
            .map_err(|_| invalid(fields, COMPENSATION_RATE))?;
        let ttd_paid_weeks = weeks_in_range(fields, TTD_PAID_WEEKS, MAX_INDEMNITY_WEEKS)
            .map_err(|_| invalid(fields, TTD_PAID_WEEKS))?;
        let other_credit_weeks = weeks_in_range(fields, OTHER_CREDIT_WEEKS, MAX_INDEMNITY_WEEKS)
            .map_err(|_| invalid(fields, OTHER_CREDIT_WEEKS))?;

        Ok(CommutedValueInput {
            year_of_injury,
            compensation_rate,
            ttd_paid_weeks,
            other_credit_weeks,
        })
    }

    fn year(
        &self,
        fields: &FieldMap,
    ) -> Result<i32, String> {
        year_in_range(
            fields,
            YEAR_OF_INJURY,
            self.rate_table.earliest_year(),
            self.today.year(),
        )
    }

    fn validate_year(
        &self,
        fields: &FieldMap,
    ) -> ErrorMap {
        let mut errors = ErrorMap::new();
        collect(&mut errors, YEAR_OF_INJURY, self.year(fields));
        errors
    }

    fn validate_rate(
        &self,
        fields: &FieldMap,
    ) -> ErrorMap {
        let ceiling = self.max_rate(fields).unwrap_or(Decimal::MAX);
        let mut errors = ErrorMap::new();
        collect(
            &mut errors,
            COMPENSATION_RATE,
            positive_money_up_to(fields, COMPENSATION_RATE, ceiling),
        );
        errors
    }

    fn validate_credits(
        &self,
        fields: &FieldMap,
    ) -> ErrorMap {
        let mut errors = ErrorMap::new();
        let ttd = collect(
            &mut errors,
            TTD_PAID_WEEKS,
            weeks_in_range(fields, TTD_PAID_WEEKS, MAX_INDEMNITY_WEEKS),
        );
        let other = collect(
            &mut errors,
            OTHER_CREDIT_WEEKS,
            weeks_in_range(fields, OTHER_CREDIT_WEEKS, MAX_INDEMNITY_WEEKS),
        );
        let total = ttd.zip(other).map(|(ttd, other)| ttd + other);
        if total.is_some_and(|total| total > MAX_INDEMNITY_WEEKS) {
            errors.insert(
                OTHER_CREDIT_WEEKS.to_string(),
                format!("Total credited weeks cannot exceed {MAX_INDEMNITY_WEEKS}."),
            );
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

impl WizardFlow for CommutedValueFlow {
    type Step = CommutedStep;
    type Outcome = CommutedValueResult;

    fn name(&self) -> &'static str {
        "commuted_value"
    }

    fn steps(&self) -> &'static [StepSpec<Self>] {
        COMMUTED_STEPS
    }

    fn initial_step(&self) -> CommutedStep {
        CommutedStep::YearOfInjury
    }

    fn seed_fields(&self) -> FieldMap {
        FieldMap::from([
            (YEAR_OF_INJURY.to_string(), self.today.year().to_string()),
            (COMPENSATION_RATE.to_string(), String::new()),
            (TTD_PAID_WEEKS.to_string(), "0".to_string()),
            (OTHER_CREDIT_WEEKS.to_string(), "0".to_string()),
        ])
    }

    fn compute(
        &self,
        fields: &FieldMap,
    ) -> Result<CommutedValueResult, WizardError> {
        let input = self.input(fields)?;
        Ok(CommutedValueCalculator::new(&self.rate_table).calculate(&input)?)
    }
}
