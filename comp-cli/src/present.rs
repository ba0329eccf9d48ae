//! Terminal wording for each wizard: field prompts, option lists and the
//! summary table.

use comp_core::calculations::common::format_currency;
use comp_core::calculations::preceding_quarters;
use comp_core::calculations::quarters::parse_date;
use comp_core::models::{AwwOutcome, CommutedValueResult, SpecialCase};
use comp_core::wizard::{AwwFlow, CommutedValueFlow, FieldMap, WizardFlow};

/// How a flow's fields and results are shown in the terminal.
pub trait Present: WizardFlow {
    /// Prompt text for a field.
    fn label(field: &str) -> &'static str;

    /// `(value, label)` pairs when the field takes one of a fixed set.
    fn choices(_field: &str) -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }

    /// Extra lines shown under a step's title, derived from earlier answers.
    fn context(
        &self,
        _fields: &FieldMap,
        _field: &str,
    ) -> Option<String> {
        None
    }

    /// `(label, value)` rows for the results step.
    fn summary(outcome: &Self::Outcome) -> Vec<(&'static str, String)>;
}

impl Present for AwwFlow {
    fn label(field: &str) -> &'static str {
        match field {
            "date_of_injury" => "Date of injury (MM/DD/YYYY)",
            "special_case" => "Special employment case",
            "employed_four_quarters" => "Employed all four quarters",
            "quarter1_pay" => "Quarter 1 gross pay",
            "quarter2_pay" => "Quarter 2 gross pay",
            "quarter3_pay" => "Quarter 3 gross pay",
            "quarter4_pay" => "Quarter 4 gross pay",
            _ => "Value",
        }
    }

    fn choices(field: &str) -> Vec<(&'static str, &'static str)> {
        match field {
            "special_case" => SpecialCase::all()
                .iter()
                .map(|case| (case.as_str(), case.label()))
                .collect(),
            "employed_four_quarters" => vec![("yes", "Yes"), ("no", "No")],
            _ => Vec::new(),
        }
    }

    fn context(
        &self,
        fields: &FieldMap,
        field: &str,
    ) -> Option<String> {
        let index = ["quarter1_pay", "quarter2_pay", "quarter3_pay", "quarter4_pay"]
            .iter()
            .position(|name| *name == field)?;
        let date_of_injury = parse_date(fields.get("date_of_injury")?).ok()?;
        let quarter = preceding_quarters(date_of_injury).into_iter().nth(index)?;
        Some(format!("{}: {}", quarter.label(), quarter.date_range()))
    }

    fn summary(outcome: &AwwOutcome) -> Vec<(&'static str, String)> {
        let result = match outcome {
            AwwOutcome::Computed(result) => result,
            AwwOutcome::Unsupported { reason } => {
                return vec![("Result", reason.message().to_string())];
            }
        };

        let display = result.display_fields();
        let value = |key: &str| display.get(key).cloned().unwrap_or_default();

        let mut rows = vec![
            ("Date of injury", value("date_of_injury")),
            ("Special case", value("special_case")),
            ("Total annual pay", value("total_annual_pay")),
            ("Average weekly wage", value("average_weekly_wage")),
            ("Compensation rate", value("compensation_rate")),
        ];
        if result.max_rate_applied.is_some() {
            rows.push(("Capped at maximum for", value("max_rate_year")));
        }
        rows.extend([
            ("Quarter 1", format!("{} ({})", value("quarter1_label"), value("quarter1_dates"))),
            ("Quarter 2", format!("{} ({})", value("quarter2_label"), value("quarter2_dates"))),
            ("Quarter 3", format!("{} ({})", value("quarter3_label"), value("quarter3_dates"))),
            ("Quarter 4", format!("{} ({})", value("quarter4_label"), value("quarter4_dates"))),
        ]);
        rows
    }
}

impl Present for CommutedValueFlow {
    fn label(field: &str) -> &'static str {
        match field {
            "year_of_injury" => "Year of injury",
            "compensation_rate" => "Weekly compensation rate",
            "ttd_paid_weeks" => "Weeks of TTD paid",
            "other_credit_weeks" => "Other credited weeks",
            _ => "Value",
        }
    }

    fn context(
        &self,
        fields: &FieldMap,
        field: &str,
    ) -> Option<String> {
        if field != "compensation_rate" {
            return None;
        }
        let max = self.max_rate(fields)?;
        Some(format!("Maximum rate: {}", format_currency(max)))
    }

    fn summary(result: &CommutedValueResult) -> Vec<(&'static str, String)> {
        let display = result.display_fields();
        let value = |key: &str| display.get(key).cloned().unwrap_or_default();

        vec![
            ("Weeks remaining", value("weeks_remaining")),
            ("TTD paid to date", value("ttd_paid_to_date_value")),
            ("Discount rate", value("discount_rate")),
            ("Discounted weeks", value("discounted_weeks")),
            ("Commuted value", value("commuted_value")),
            ("Commuted value at 95%", value("commuted_value_95")),
            ("Commuted value at 90%", value("commuted_value_90")),
        ]
    }
}
