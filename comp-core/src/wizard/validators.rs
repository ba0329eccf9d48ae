//! Field checks shared by the wizard flows.
//!
//! Each check reads one field and returns the parsed value or the message to
//! show next to that field. They take no UI state and can be called directly.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calculations::common::{format_currency, parse_money};
use crate::calculations::quarters::{format_date, parse_date};
use crate::wizard::step::{ErrorMap, FieldMap};

pub fn raw<'a>(
    fields: &'a FieldMap,
    name: &str,
) -> &'a str {
    fields.get(name).map(|v| v.trim()).unwrap_or_default()
}

/// A required date between `earliest` and `latest`, inclusive.
pub fn date_in_range(
    fields: &FieldMap,
    name: &str,
    earliest: NaiveDate,
    latest: NaiveDate,
) -> Result<NaiveDate, String> {
    let value = raw(fields, name);
    if value.is_empty() {
        return Err("Enter a date.".to_string());
    }
    let date = parse_date(value).map_err(|_| "Enter a valid date (MM/DD/YYYY).".to_string())?;
    if date < earliest {
        return Err(format!("Date must be on or after {}.", format_date(earliest)));
    }
    if date > latest {
        return Err("Date cannot be in the future.".to_string());
    }
    Ok(date)
}

/// A dollar amount from zero to `ceiling`. Empty counts as zero.
pub fn non_negative_money(
    fields: &FieldMap,
    name: &str,
    ceiling: Decimal,
) -> Result<Decimal, String> {
    let amount =
        parse_money(raw(fields, name)).map_err(|_| "Enter a valid dollar amount.".to_string())?;
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative.".to_string());
    }
    if amount > ceiling {
        return Err(format!("Amount cannot exceed {}.", format_currency(ceiling)));
    }
    Ok(amount)
}

/// A required dollar amount above zero and no more than `ceiling`.
pub fn positive_money_up_to(
    fields: &FieldMap,
    name: &str,
    ceiling: Decimal,
) -> Result<Decimal, String> {
    if raw(fields, name).is_empty() {
        return Err("Enter an amount.".to_string());
    }
    let amount =
        parse_money(raw(fields, name)).map_err(|_| "Enter a valid dollar amount.".to_string())?;
    if amount <= Decimal::ZERO {
        return Err("Amount must be greater than zero.".to_string());
    }
    if amount > ceiling {
        return Err(format!(
            "Amount cannot exceed the maximum rate of {}.",
            format_currency(ceiling)
        ));
    }
    Ok(amount)
}

/// A week count between zero and `max_weeks`. Empty counts as zero.
pub fn weeks_in_range(
    fields: &FieldMap,
    name: &str,
    max_weeks: Decimal,
) -> Result<Decimal, String> {
    let value = raw(fields, name);
    let weeks = if value.is_empty() {
        Decimal::ZERO
    } else {
        value
            .parse::<Decimal>()
            .map_err(|_| "Enter a number of weeks.".to_string())?
    };
    if weeks < Decimal::ZERO || weeks > max_weeks {
        return Err(format!("Weeks must be between 0 and {max_weeks}."));
    }
    Ok(weeks)
}

/// A required calendar year between `earliest` and `latest`, inclusive.
pub fn year_in_range(
    fields: &FieldMap,
    name: &str,
    earliest: i32,
    latest: i32,
) -> Result<i32, String> {
    let year = raw(fields, name)
        .parse::<i32>()
        .map_err(|_| "Enter a four digit year.".to_string())?;
    if year < earliest || year > latest {
        return Err(format!("Year must be between {earliest} and {latest}."));
    }
    Ok(year)
}

/// One of `choices`.
pub fn one_of(
    fields: &FieldMap,
    name: &str,
    choices: &[&str],
) -> Result<(), String> {
    let value = raw(fields, name);
    if choices.iter().any(|choice| *choice == value) {
        Ok(())
    } else {
        Err("Select one of the options.".to_string())
    }
}

/// Records the message from `check`, if any, against `name`.
pub fn collect<T>(
    errors: &mut ErrorMap,
    name: &str,
    check: Result<T, String>,
) -> Option<T> {
    match check {
        Ok(value) => Some(value),
        Err(message) => {
            errors.insert(name.to_string(), message);
            None
        }
    }
}
