//! Average weekly wage and compensation rate calculations.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Total pay: sum of the four quarters before the injury |
//! | 2    | Average weekly wage: total pay ÷ 52 |
//! | 3    | Rate: AWW when AWW is under $75, else AWW × 66.67% floored at $75 |
//! | 4    | Cap: the smaller of step 3 and the maximum rate for the year of injury |
//!
//! Workers employed less than four quarters are not computed; the outcome is
//! [`AwwOutcome::Unsupported`] instead of a four-quarter figure.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use comp_core::calculations::AwwCalculator;
//! use comp_core::calculations::common::round_half_up;
//! use comp_core::rates::RateTable;
//! use comp_core::{AwwInput, SpecialCase};
//!
//! let table = RateTable::default();
//! let input = AwwInput {
//!     date_of_injury: NaiveDate::from_ymd_opt(2023, 8, 14).unwrap(),
//!     special_case: SpecialCase::None,
//!     employed_four_quarters: true,
//!     quarter_pay: [dec!(26000), dec!(26000), dec!(26000), dec!(26000)],
//! };
//!
//! let outcome = AwwCalculator::new(&table).calculate(&input).unwrap();
//! let result = outcome.computed().unwrap();
//!
//! assert_eq!(round_half_up(result.average_weekly_wage), dec!(2000.00));
//! assert_eq!(result.compensation_rate, dec!(1035.78));
//! assert_eq!(result.max_rate_applied, Some(dec!(1035.78)));
//! ```

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::common::{max, min};
use crate::models::{AwwInput, AwwOutcome, AwwResult, UnsupportedReason};
use crate::rates::{FallbackPolicy, RateLookup, RateTable};

pub const WEEKS_PER_YEAR: Decimal = Decimal::from_parts(52, 0, 0, false, 0);

/// Weekly compensation floor. Workers earning less receive their full wage.
pub const MINIMUM_COMPENSATION_RATE: Decimal = Decimal::from_parts(75, 0, 0, false, 0);

/// Two-thirds of the average weekly wage, as the statute rounds it.
pub const COMPENSATION_FACTOR: Decimal = Decimal::from_parts(6667, 0, 0, false, 4);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AwwError {
    /// Quarter numbers are 1-based, quarter 1 being the most recent.
    #[error("pay for quarter {quarter} must not be negative, got {amount}")]
    NegativeQuarterPay { quarter: usize, amount: Decimal },
    #[error("total of the quarterly pay is too large to represent")]
    PayOverflow,
}

/// A capped weekly compensation rate and how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationRate {
    pub rate: Decimal,
    pub max_rate_applied: Option<Decimal>,
    pub rate_lookup: RateLookup,
}

/// Calculator for the average weekly wage and compensation rate.
#[derive(Debug, Clone)]
pub struct AwwCalculator<'a> {
    rate_table: &'a RateTable,
}

impl<'a> AwwCalculator<'a> {
    pub fn new(rate_table: &'a RateTable) -> Self {
        Self { rate_table }
    }

    /// Runs every step for a validated input.
    ///
    /// # Errors
    ///
    /// Returns [`AwwError::NegativeQuarterPay`] if any quarter is negative, or
    /// [`AwwError::PayOverflow`] if the quarters cannot be summed.
    pub fn calculate(
        &self,
        input: &AwwInput,
    ) -> Result<AwwOutcome, AwwError> {
        if !input.employed_four_quarters {
            info!(
                date_of_injury = %input.date_of_injury,
                "short employment, average weekly wage not computed"
            );
            return Ok(AwwOutcome::Unsupported {
                reason: UnsupportedReason::FewerThanFourQuarters,
            });
        }

        let total_annual_pay = self.total_pay(&input.quarter_pay)?;
        let average_weekly_wage = total_annual_pay / WEEKS_PER_YEAR;
        let comp = self.compensation_rate(average_weekly_wage, input.date_of_injury.year());

        info!(
            total_annual_pay = %total_annual_pay,
            compensation_rate = %comp.rate,
            capped = comp.max_rate_applied.is_some(),
            "average weekly wage computed"
        );

        Ok(AwwOutcome::Computed(AwwResult {
            date_of_injury: input.date_of_injury,
            special_case: input.special_case,
            total_annual_pay,
            average_weekly_wage,
            compensation_rate: comp.rate,
            max_rate_applied: comp.max_rate_applied,
            rate_lookup: comp.rate_lookup,
        }))
    }

    /// Sums the four quarters.
    pub fn total_pay(
        &self,
        quarter_pay: &[Decimal; 4],
    ) -> Result<Decimal, AwwError> {
        if let Some((index, amount)) = quarter_pay
            .iter()
            .enumerate()
            .find(|(_, amount)| amount.is_sign_negative() && !amount.is_zero())
        {
            return Err(AwwError::NegativeQuarterPay {
                quarter: index + 1,
                amount: *amount,
            });
        }
        quarter_pay
            .iter()
            .try_fold(Decimal::ZERO, |total, amount| total.checked_add(*amount))
            .ok_or(AwwError::PayOverflow)
    }

    /// Total of the four quarters divided by 52, unrounded.
    pub fn average_weekly_wage(
        &self,
        quarter_pay: &[Decimal; 4],
    ) -> Result<Decimal, AwwError> {
        Ok(self.total_pay(quarter_pay)? / WEEKS_PER_YEAR)
    }

    /// Applies the floor and the maximum rate for `year_of_injury`.
    pub fn compensation_rate(
        &self,
        average_weekly_wage: Decimal,
        year_of_injury: i32,
    ) -> CompensationRate {
        let uncapped = if average_weekly_wage < MINIMUM_COMPENSATION_RATE {
            average_weekly_wage
        } else {
            max(
                average_weekly_wage * COMPENSATION_FACTOR,
                MINIMUM_COMPENSATION_RATE,
            )
        };

        let rate_lookup = self
            .rate_table
            .max_rate_lookup(year_of_injury, FallbackPolicy::NearestYear);
        let max_rate_applied = (uncapped > rate_lookup.rate).then_some(rate_lookup.rate);
        let rate = max(min(uncapped, rate_lookup.rate), Decimal::ZERO);

        debug!(
            average_weekly_wage = %average_weekly_wage,
            uncapped = %uncapped,
            max_rate = %rate_lookup.rate,
            "compensation rate"
        );

        CompensationRate {
            rate,
            max_rate_applied,
            rate_lookup,
        }
    }
}
