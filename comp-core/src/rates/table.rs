//! Year-indexed lookup of maximum compensation rates and discount rates.
//!
//! Lookups never fail. A year missing from the table is resolved through a
//! [`FallbackPolicy`] chosen by the caller, and the returned [`RateLookup`]
//! records which year was actually used.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use comp_core::rates::{FallbackPolicy, RateTable};
//!
//! let table = RateTable::default();
//!
//! assert_eq!(
//!     table.max_comp_rate_for(2023, FallbackPolicy::NearestYear),
//!     dec!(1035.78)
//! );
//!
//! let lookup = table.max_rate_lookup(2099, FallbackPolicy::NearestYear);
//! assert!(lookup.fell_back);
//! assert_eq!(lookup.effective_year, Some(2025));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::RateTableEntry;
use crate::rates::south_carolina_entries;

/// Maximum weekly rate used by commutations when the year is not on file.
pub const DEFAULT_MAX_COMPENSATION_RATE: Decimal = Decimal::from_parts(113443, 0, 0, false, 2);

/// Annual discount rate when more than [`DISCOUNT_THRESHOLD_WEEKS`] remain.
pub const LONG_TERM_DISCOUNT_RATE: Decimal = Decimal::from_parts(438, 0, 0, false, 4);

/// Annual discount rate when [`DISCOUNT_THRESHOLD_WEEKS`] or fewer remain.
pub const SHORT_TERM_DISCOUNT_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

pub const DISCOUNT_THRESHOLD_WEEKS: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Errors raised while building a [`RateTable`] from entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("rate table has no entries")]
    Empty,

    #[error("year {0} appears more than once")]
    DuplicateYear(i32),

    #[error("maximum compensation rate for {year} must be positive, got {rate}")]
    NonPositiveRate { year: i32, rate: Decimal },

    #[error("discount rate for {year} must be between 0 and 1, got {rate}")]
    InvalidDiscountRate { year: i32, rate: Decimal },
}

/// How to resolve a year the table does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackPolicy {
    /// Use the closest year on file: the latest year for injuries after the
    /// table ends, the earliest year for injuries before it starts.
    NearestYear,

    /// Use [`DEFAULT_MAX_COMPENSATION_RATE`].
    StatutoryDefault,
}

/// Outcome of a maximum rate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLookup {
    pub requested_year: i32,
    /// Year whose entry supplied the rate; `None` for the statutory default.
    pub effective_year: Option<i32>,
    pub rate: Decimal,
    pub fell_back: bool,
}

/// Immutable table of statutory rates keyed by calendar year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    entries: BTreeMap<i32, RateTableEntry>,
}

impl RateTable {
    /// Builds a table, rejecting duplicate years and out of range rates.
    pub fn new(entries: Vec<RateTableEntry>) -> Result<Self, RateTableError> {
        if entries.is_empty() {
            return Err(RateTableError::Empty);
        }

        let mut map = BTreeMap::new();
        for entry in entries {
            if entry.max_compensation_rate <= Decimal::ZERO {
                return Err(RateTableError::NonPositiveRate {
                    year: entry.year,
                    rate: entry.max_compensation_rate,
                });
            }
            if let Some(rate) = entry.discount_rate {
                if rate <= Decimal::ZERO || rate >= Decimal::ONE {
                    return Err(RateTableError::InvalidDiscountRate {
                        year: entry.year,
                        rate,
                    });
                }
            }
            let year = entry.year;
            if map.insert(year, entry).is_some() {
                return Err(RateTableError::DuplicateYear(year));
            }
        }

        Ok(Self { entries: map })
    }

    /// The built-in South Carolina table.
    pub fn south_carolina() -> Self {
        let entries = south_carolina_entries()
            .into_iter()
            .map(|entry| (entry.year, entry))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = &RateTableEntry> {
        self.entries.values()
    }

    pub fn get(
        &self,
        year: i32,
    ) -> Option<&RateTableEntry> {
        self.entries.get(&year)
    }

    pub fn earliest_year(&self) -> i32 {
        self.entries.keys().next().copied().unwrap_or_default()
    }

    pub fn latest_year(&self) -> i32 {
        self.entries.keys().next_back().copied().unwrap_or_default()
    }

    /// Looks up the maximum weekly compensation rate for `year`.
    pub fn max_rate_lookup(
        &self,
        year: i32,
        policy: FallbackPolicy,
    ) -> RateLookup {
        if let Some(entry) = self.entries.get(&year) {
            return RateLookup {
                requested_year: year,
                effective_year: Some(year),
                rate: entry.max_compensation_rate,
                fell_back: false,
            };
        }

        let lookup = match policy {
            FallbackPolicy::NearestYear => {
                let nearest = if year > self.latest_year() {
                    self.entries.values().next_back()
                } else if year < self.earliest_year() {
                    self.entries.values().next()
                } else {
                    // A gap inside the table: take the closest earlier year.
                    self.entries.range(..year).next_back().map(|(_, entry)| entry)
                };
                match nearest {
                    Some(entry) => RateLookup {
                        requested_year: year,
                        effective_year: Some(entry.year),
                        rate: entry.max_compensation_rate,
                        fell_back: true,
                    },
                    None => Self::statutory_default(year),
                }
            }
            FallbackPolicy::StatutoryDefault => Self::statutory_default(year),
        };

        warn!(
            requested_year = year,
            effective_year = ?lookup.effective_year,
            rate = %lookup.rate,
            "maximum compensation rate not on file, using fallback"
        );
        lookup
    }

    /// Convenience form of [`RateTable::max_rate_lookup`].
    pub fn max_comp_rate_for(
        &self,
        year: i32,
        policy: FallbackPolicy,
    ) -> Decimal {
        self.max_rate_lookup(year, policy).rate
    }

    /// Annual discount rate for a commutation with `weeks_remaining` weeks.
    pub fn discount_rate_for(
        &self,
        weeks_remaining: Decimal,
    ) -> Decimal {
        if weeks_remaining > DISCOUNT_THRESHOLD_WEEKS {
            LONG_TERM_DISCOUNT_RATE
        } else {
            SHORT_TERM_DISCOUNT_RATE
        }
    }

    /// Like [`RateTable::discount_rate_for`], but a year whose entry carries
    /// [`RateTableEntry::discount_rate`] uses it in place of the statutory
    /// long-term rate. This override only comes from a loaded table.
    pub fn discount_rate_for_year(
        &self,
        year: i32,
        weeks_remaining: Decimal,
    ) -> Decimal {
        if weeks_remaining <= DISCOUNT_THRESHOLD_WEEKS {
            return SHORT_TERM_DISCOUNT_RATE;
        }
        self.entries
            .get(&year)
            .and_then(|entry| entry.discount_rate)
            .unwrap_or(LONG_TERM_DISCOUNT_RATE)
    }

    fn statutory_default(year: i32) -> RateLookup {
        RateLookup {
            requested_year: year,
            effective_year: None,
            rate: DEFAULT_MAX_COMPENSATION_RATE,
            fell_back: true,
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::south_carolina()
    }
}

impl TryFrom<Vec<RateTableEntry>> for RateTable {
    type Error = RateTableError;

    fn try_from(entries: Vec<RateTableEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}
