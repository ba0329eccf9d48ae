//! Calendar quarters preceding a date of injury.
//!
//! Wages are reported for the four full calendar quarters before the quarter
//! in which the injury happened. Quarter 1 is the most recent of those.
//!
//! | Date of injury | Quarter 1 | Quarter 4 |
//! |----------------|-----------|-----------|
//! | 05/10/2025     | Q1 2025   | Q2 2024   |
//! | 01/02/2025     | Q4 2024   | Q1 2024   |

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DISPLAY_FORMAT: &str = "%m/%d/%Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid date '{0}', expected MM/DD/YYYY or YYYY-MM-DD")]
pub struct ParseDateError(pub String);

/// A calendar quarter with its first and last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quarter {
    pub year: i32,
    /// 1 through 4.
    pub number: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Quarter {
    pub fn new(
        year: i32,
        number: u32,
    ) -> Option<Self> {
        let (start_month, end_month, end_day) = match number {
            1 => (1, 3, 31),
            2 => (4, 6, 30),
            3 => (7, 9, 30),
            4 => (10, 12, 31),
            _ => return None,
        };
        Some(Self {
            year,
            number,
            start: NaiveDate::from_ymd_opt(year, start_month, 1)?,
            end: NaiveDate::from_ymd_opt(year, end_month, end_day)?,
        })
    }

    pub fn containing(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month0() / 3 + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        if self.number == 1 {
            Self::new(self.year - 1, 4)
        } else {
            Self::new(self.year, self.number - 1)
        }
    }

    /// Short label such as `Q3 2024`.
    pub fn label(&self) -> String {
        format!("Q{} {}", self.number, self.year)
    }

    /// Date span such as `07/01/2024 - 09/30/2024`.
    pub fn date_range(&self) -> String {
        format!("{} - {}", format_date(self.start), format_date(self.end))
    }
}

/// The four full quarters before the quarter containing `date_of_injury`,
/// most recent first.
pub fn preceding_quarters(date_of_injury: NaiveDate) -> Vec<Quarter> {
    let current = Quarter::containing(date_of_injury);
    std::iter::successors(current.and_then(|q| q.previous()), Quarter::previous)
        .take(4)
        .collect()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Parses `YYYY-MM-DD` or `MM/DD/YYYY`.
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseDateError> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, ISO_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DISPLAY_FORMAT))
        .map_err(|_| ParseDateError(s.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(
        y: i32,
        m: u32,
        d: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_rejects_quarter_out_of_range() {
        assert_eq!(Quarter::new(2025, 0), None);
        assert_eq!(Quarter::new(2025, 5), None);
    }

    #[test]
    fn containing_maps_month_to_quarter() {
        assert_eq!(Quarter::containing(date(2025, 1, 1)).unwrap().number, 1);
        assert_eq!(Quarter::containing(date(2025, 6, 30)).unwrap().number, 2);
        assert_eq!(Quarter::containing(date(2025, 7, 1)).unwrap().number, 3);
        assert_eq!(Quarter::containing(date(2025, 12, 31)).unwrap().number, 4);
    }

    #[test]
    fn previous_wraps_to_prior_year() {
        let q1 = Quarter::new(2025, 1).unwrap();

        let prev = q1.previous().unwrap();

        assert_eq!(prev.year, 2024);
        assert_eq!(prev.number, 4);
        assert_eq!(prev.start, date(2024, 10, 1));
        assert_eq!(prev.end, date(2024, 12, 31));
    }

    #[test]
    fn preceding_quarters_mid_year_injury() {
        let quarters = preceding_quarters(date(2025, 5, 10));

        let labels: Vec<String> = quarters.iter().map(Quarter::label).collect();
        assert_eq!(labels, vec!["Q1 2025", "Q4 2024", "Q3 2024", "Q2 2024"]);
    }

    #[test]
    fn preceding_quarters_early_january_injury() {
        let quarters = preceding_quarters(date(2025, 1, 2));

        assert_eq!(quarters.len(), 4);
        assert_eq!(quarters[0].label(), "Q4 2024");
        assert_eq!(quarters[3].label(), "Q1 2024");
    }

    #[test]
    fn preceding_quarters_excludes_injury_quarter() {
        let quarters = preceding_quarters(date(2025, 3, 31));

        assert!(quarters.iter().all(|q| q.end < date(2025, 1, 1)));
    }

    #[test]
    fn date_range_formats_both_ends() {
        let q3 = Quarter::new(2024, 3).unwrap();

        assert_eq!(q3.date_range(), "07/01/2024 - 09/30/2024");
    }

    #[test]
    fn parse_date_accepts_both_formats() {
        assert_eq!(parse_date("2025-05-10"), Ok(date(2025, 5, 10)));
        assert_eq!(parse_date(" 05/10/2025 "), Ok(date(2025, 5, 10)));
    }

    #[test]
    fn parse_date_rejects_garbage_and_impossible_dates() {
        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("02/30/2025").is_err());
        assert!(parse_date("").is_err());
    }
}
