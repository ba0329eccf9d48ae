use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{format_currency, format_percent, format_weeks};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommutedValueInput {
    pub year_of_injury: i32,
    pub compensation_rate: Decimal,
    /// Weeks of temporary total disability already paid.
    pub ttd_paid_weeks: Decimal,
    /// Other weeks credited against the 500 week cap.
    pub other_credit_weeks: Decimal,
}

/// Present value of the remaining weekly payments.
///
/// Values are kept at full precision; [`CommutedValueResult::display_fields`]
/// rounds them to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommutedValueResult {
    pub weeks_remaining: Decimal,
    pub ttd_paid_to_date_value: Decimal,
    /// Annual discount rate.
    pub discount_rate: Decimal,
    /// Present value factor of one dollar per week for the weeks remaining.
    pub discounted_weeks: Decimal,
    pub commuted_value: Decimal,
    pub commuted_value_95: Decimal,
    pub commuted_value_90: Decimal,
}

impl CommutedValueResult {
    /// Display strings keyed by form field name.
    pub fn display_fields(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("weeks_remaining", format_weeks(self.weeks_remaining)),
            (
                "ttd_paid_to_date_value",
                format_currency(self.ttd_paid_to_date_value),
            ),
            ("discount_rate", format_percent(self.discount_rate)),
            ("discounted_weeks", format_weeks(self.discounted_weeks)),
            ("commuted_value", format_currency(self.commuted_value)),
            ("commuted_value_95", format_currency(self.commuted_value_95)),
            ("commuted_value_90", format_currency(self.commuted_value_90)),
        ])
    }
}
