use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::format_currency;
use crate::calculations::quarters::{format_date, preceding_quarters};
use crate::models::SpecialCase;
use crate::rates::RateLookup;

/// Inputs for the average weekly wage calculation.
///
/// `quarter_pay[0]` is the most recent full quarter before the injury and
/// `quarter_pay[3]` the earliest of the four.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwwInput {
    pub date_of_injury: NaiveDate,
    pub special_case: SpecialCase,
    pub employed_four_quarters: bool,
    pub quarter_pay: [Decimal; 4],
}

/// Why a wage calculation was not produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsupportedReason {
    /// The worker was employed for less than the four quarters before the
    /// injury. The alternative statutory methods (days actually worked,
    /// comparable employee wage, contracted wage) need facts this calculator
    /// does not collect.
    FewerThanFourQuarters,
}

impl UnsupportedReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::FewerThanFourQuarters => {
                "Employment of less than four quarters requires an alternative \
                 method under S.C. Code § 42-1-40; the average weekly wage \
                 cannot be computed from quarterly pay."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwwResult {
    pub date_of_injury: NaiveDate,
    pub special_case: SpecialCase,

    /// Sum of the four quarterly pay amounts.
    pub total_annual_pay: Decimal,

    /// Total annual pay divided by 52, at full precision.
    pub average_weekly_wage: Decimal,

    /// Weekly compensation rate after the floor and the statutory cap.
    pub compensation_rate: Decimal,

    /// The statutory maximum, present only when it capped the rate.
    pub max_rate_applied: Option<Decimal>,

    /// The rate table lookup used for the cap.
    pub rate_lookup: RateLookup,
}

impl AwwResult {
    /// Display strings keyed by form field name.
    pub fn display_fields(&self) -> BTreeMap<&'static str, String> {
        let mut fields = BTreeMap::new();
        fields.insert("date_of_injury", format_date(self.date_of_injury));
        fields.insert("special_case", self.special_case.label().to_string());
        fields.insert("total_annual_pay", format_currency(self.total_annual_pay));
        fields.insert(
            "average_weekly_wage",
            format_currency(self.average_weekly_wage),
        );
        fields.insert("compensation_rate", format_currency(self.compensation_rate));
        fields.insert(
            "max_rate_applied",
            self.max_rate_applied
                .map(format_currency)
                .unwrap_or_default(),
        );
        fields.insert(
            "max_rate_year",
            self.rate_lookup
                .effective_year
                .map(|year| year.to_string())
                .unwrap_or_default(),
        );

        let names = [
            ("quarter1_label", "quarter1_dates"),
            ("quarter2_label", "quarter2_dates"),
            ("quarter3_label", "quarter3_dates"),
            ("quarter4_label", "quarter4_dates"),
        ];
        for (quarter, (label, dates)) in preceding_quarters(self.date_of_injury)
            .iter()
            .zip(names)
        {
            fields.insert(label, quarter.label());
            fields.insert(dates, quarter.date_range());
        }

        fields
    }
}

/// What the wage calculator produced for a given input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AwwOutcome {
    Computed(AwwResult),
    Unsupported { reason: UnsupportedReason },
}

impl AwwOutcome {
    pub fn computed(&self) -> Option<&AwwResult> {
        match self {
            Self::Computed(result) => Some(result),
            Self::Unsupported { .. } => None,
        }
    }
}
