//! Commuted value of the remaining weekly compensation payments.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Weeks remaining: 500 − (TTD weeks paid + other credit weeks) |
//! | 2    | TTD paid to date: TTD weeks paid × compensation rate |
//! | 3    | Annual discount rate: 4.38% over 100 weeks remaining, else 2% |
//! | 4    | Weekly discount rate: annual rate ÷ 52 |
//! | 5    | Discounted weeks: (1 − (1 + i)^−n) ÷ i, or 0 when no weeks remain |
//! | 6    | Commuted value: discounted weeks × compensation rate |
//! | 7    | 95% and 90% of the commuted value |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use comp_core::calculations::CommutedValueCalculator;
//! use comp_core::calculations::common::round_half_up;
//! use comp_core::rates::RateTable;
//! use comp_core::CommutedValueInput;
//!
//! let table = RateTable::default();
//! let input = CommutedValueInput {
//!     year_of_injury: 2025,
//!     compensation_rate: dec!(500),
//!     ttd_paid_weeks: dec!(0),
//!     other_credit_weeks: dec!(0),
//! };
//!
//! let result = CommutedValueCalculator::new(&table).calculate(&input).unwrap();
//!
//! assert_eq!(result.weeks_remaining, dec!(500));
//! assert_eq!(result.discount_rate, dec!(0.0438));
//! assert_eq!(round_half_up(result.commuted_value), dec!(203960.22));
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::aww::WEEKS_PER_YEAR;
use crate::models::{CommutedValueInput, CommutedValueResult};
use crate::rates::RateTable;

/// Total weeks of indemnity payable for a single injury.
pub const MAX_INDEMNITY_WEEKS: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

pub const COMMUTED_VALUE_95_FACTOR: Decimal = Decimal::from_parts(95, 0, 0, false, 2);
pub const COMMUTED_VALUE_90_FACTOR: Decimal = Decimal::from_parts(90, 0, 0, false, 2);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommutedValueError {
    #[error("compensation rate must be positive, got {0}")]
    NonPositiveCompensationRate(Decimal),

    #[error("{field} must be between 0 and 500 weeks, got {weeks}")]
    WeeksOutOfRange { field: &'static str, weeks: Decimal },

    #[error("discount factor overflowed for {0} weeks")]
    DiscountOverflow(Decimal),
}

/// Calculator for the commuted value of remaining payments.
#[derive(Debug, Clone)]
pub struct CommutedValueCalculator<'a> {
    rate_table: &'a RateTable,
}

impl<'a> CommutedValueCalculator<'a> {
    pub fn new(rate_table: &'a RateTable) -> Self {
        Self { rate_table }
    }

    /// Computes every figure from one snapshot of the input.
    ///
    /// # Errors
    ///
    /// Returns [`CommutedValueError`] if the compensation rate is not
    /// positive, either week count is outside 0 to 500, or the discount
    /// factor cannot be represented.
    pub fn calculate(
        &self,
        input: &CommutedValueInput,
    ) -> Result<CommutedValueResult, CommutedValueError> {
        self.check_input(input)?;

        let weeks_remaining = self.weeks_remaining(input.ttd_paid_weeks, input.other_credit_weeks);
        let ttd_paid_to_date_value = input.ttd_paid_weeks * input.compensation_rate;
        let discount_rate = self
            .rate_table
            .discount_rate_for_year(input.year_of_injury, weeks_remaining);
        let weekly_rate = discount_rate / WEEKS_PER_YEAR;
        let discounted_weeks = self.discounted_weeks(weekly_rate, weeks_remaining)?;

        let commuted_value = discounted_weeks * input.compensation_rate;

        debug!(
            weeks_remaining = %weeks_remaining,
            discount_rate = %discount_rate,
            discounted_weeks = %discounted_weeks,
            "commutation factors"
        );
        info!(commuted_value = %commuted_value, "commuted value computed");

        Ok(CommutedValueResult {
            weeks_remaining,
            ttd_paid_to_date_value,
            discount_rate,
            discounted_weeks,
            commuted_value,
            commuted_value_95: commuted_value * COMMUTED_VALUE_95_FACTOR,
            commuted_value_90: commuted_value * COMMUTED_VALUE_90_FACTOR,
        })
    }

    /// Weeks left under the 500 week cap; zero or negative when exhausted.
    pub fn weeks_remaining(
        &self,
        ttd_paid_weeks: Decimal,
        other_credit_weeks: Decimal,
    ) -> Decimal {
        MAX_INDEMNITY_WEEKS - (ttd_paid_weeks + other_credit_weeks)
    }

    /// Present value of one dollar a week for `weeks` weeks at `weekly_rate`.
    pub fn discounted_weeks(
        &self,
        weekly_rate: Decimal,
        weeks: Decimal,
    ) -> Result<Decimal, CommutedValueError> {
        if weeks <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        if weekly_rate.is_zero() {
            return Ok(weeks);
        }

        let growth = self
            .growth_factor(Decimal::ONE + weekly_rate, weeks)
            .ok_or(CommutedValueError::DiscountOverflow(weeks))?;

        Ok((Decimal::ONE - Decimal::ONE / growth) / weekly_rate)
    }

    /// `base^weeks`, exact for whole weeks and via `powd` for the fraction.
    fn growth_factor(
        &self,
        base: Decimal,
        weeks: Decimal,
    ) -> Option<Decimal> {
        let whole = weeks.trunc().to_u64()?;
        let fraction = weeks.fract();
        let whole_growth = base.checked_powu(whole)?;
        if fraction.is_zero() {
            Some(whole_growth)
        } else {
            whole_growth.checked_mul(base.checked_powd(fraction)?)
        }
    }

    fn check_input(
        &self,
        input: &CommutedValueInput,
    ) -> Result<(), CommutedValueError> {
        if input.compensation_rate <= Decimal::ZERO {
            return Err(CommutedValueError::NonPositiveCompensationRate(
                input.compensation_rate,
            ));
        }
        for (field, weeks) in [
            ("TTD weeks paid", input.ttd_paid_weeks),
            ("other credit weeks", input.other_credit_weeks),
        ] {
            if weeks < Decimal::ZERO || weeks > MAX_INDEMNITY_WEEKS {
                return Err(CommutedValueError::WeeksOutOfRange { field, weeks });
            }
        }
        Ok(())
    }
}
