//! Common money helpers for the calculators.
//!
//! All arithmetic stays in [`Decimal`]. Rounding to cents happens only when a
//! value is shown to the user or handed to a form.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when a string cannot be parsed as a money amount.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid amount '{input}'")]
pub struct ParseMoneyError {
    pub input: String,
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use comp_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the minimum of two decimal values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// Trims whitespace and strips a leading `$` and thousands separators.
fn normalize_money_input(s: &str) -> String {
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    unsigned.trim().replace(',', "")
}

/// Parses a user-entered amount such as `"$1,234.56"`.
///
/// Empty or whitespace-only input is treated as 0.
pub fn parse_money(s: &str) -> Result<Decimal, ParseMoneyError> {
    let normalized = normalize_money_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid amount: {}", e);
        ParseMoneyError {
            input: s.to_string(),
        }
    })
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats an amount as dollars and cents, e.g. `$1,234.56`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a fractional rate as a percentage, e.g. `0.0438` as `4.38%`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{:.2}%", round_half_up(rate * Decimal::ONE_HUNDRED))
}

/// Formats a week count to two places, e.g. `407.92`.
pub fn format_weeks(weeks: Decimal) -> String {
    format!("{:.2}", round_half_up(weeks))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_repeating_fraction() {
        let aww = dec!(10000) / dec!(52);

        assert_eq!(round_half_up(aww), dec!(192.31));
    }

    // =========================================================================
    // max / min tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
    }

    #[test]
    fn min_returns_smaller_value() {
        assert_eq!(min(dec!(100.00), dec!(200.00)), dec!(100.00));
        assert_eq!(min(dec!(-5), dec!(0)), dec!(-5));
    }

    // =========================================================================
    // parse_money tests
    // =========================================================================

    #[test]
    fn parse_money_accepts_dollar_sign_and_commas() {
        assert_eq!(parse_money("$1,234.56"), Ok(dec!(1234.56)));
        assert_eq!(parse_money(" $ 2,500 "), Ok(dec!(2500)));
    }

    #[test]
    fn parse_money_empty_treated_as_zero() {
        assert_eq!(parse_money(""), Ok(Decimal::ZERO));
        assert_eq!(parse_money("   "), Ok(Decimal::ZERO));
    }

    #[test]
    fn parse_money_keeps_negative_sign() {
        assert_eq!(parse_money("-10.50"), Ok(dec!(-10.50)));
    }

    #[test]
    fn parse_money_invalid_returns_error() {
        assert_eq!(
            parse_money("ten dollars"),
            Err(ParseMoneyError {
                input: "ten dollars".to_string()
            })
        );
    }

    // =========================================================================
    // formatting tests
    // =========================================================================

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(203960.2188)), "$203,960.22");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
    }

    #[test]
    fn format_currency_pads_cents() {
        assert_eq!(format_currency(dec!(1333.4)), "$1,333.40");
        assert_eq!(format_currency(dec!(75)), "$75.00");
        assert_eq!(format_currency(dec!(0)), "$0.00");
    }

    #[test]
    fn format_currency_handles_negative_values() {
        assert_eq!(format_currency(dec!(-1500)), "-$1,500.00");
    }

    #[test]
    fn format_percent_scales_rate() {
        assert_eq!(format_percent(dec!(0.0438)), "4.38%");
        assert_eq!(format_percent(dec!(0.02)), "2.00%");
    }

    #[test]
    fn format_weeks_rounds_to_two_places() {
        assert_eq!(format_weeks(dec!(407.920437)), "407.92");
        assert_eq!(format_weeks(dec!(500)), "500.00");
    }
}
