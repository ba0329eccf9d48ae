//! CSV loader for maximum compensation rate tables.
//!
//! ## CSV Format
//!
//! | Column                  | Required | Type    | Notes |
//! |-------------------------|----------|---------|-------|
//! | `year`                  | yes      | integer | e.g. `2025` |
//! | `max_compensation_rate` | yes      | decimal | e.g. `1134.43` |
//! | `discount_rate`         | no       | decimal | Annual rate, e.g. `0.0438`. Leave empty for the standard rate |
//!
//! ```csv
//! year,max_compensation_rate,discount_rate
//! 2024,1093.67,
//! 2025,1134.43,
//! ```

use std::io::Read;

use comp_core::models::RateTableEntry;
use comp_core::rates::{RateTable, RateTableError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading a rate table.
#[derive(Debug, Error)]
pub enum RateTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid rate table: {0}")]
    InvalidTable(#[from] RateTableError),
}

impl From<csv::Error> for RateTableLoaderError {
    fn from(err: csv::Error) -> Self {
        RateTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the rate table CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateTableRecord {
    pub year: i32,
    pub max_compensation_rate: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub discount_rate: Option<Decimal>,
}

impl From<RateTableRecord> for RateTableEntry {
    fn from(record: RateTableRecord) -> Self {
        RateTableEntry {
            year: record.year,
            max_compensation_rate: record.max_compensation_rate,
            discount_rate: record.discount_rate,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for rate tables from CSV files.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parse rate records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RateTableRecord>, RateTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RateTableRecord = result?;
            records.push(record);
        }

        debug!(records = records.len(), "parsed rate table CSV");
        Ok(records)
    }

    /// Build a [`RateTable`] from parsed records.
    ///
    /// Rejects an empty file, duplicate years, non-positive maximum rates,
    /// and discount rates outside (0, 1).
    pub fn into_table(records: Vec<RateTableRecord>) -> Result<RateTable, RateTableLoaderError> {
        let entries: Vec<RateTableEntry> = records.into_iter().map(RateTableEntry::from).collect();
        let table = RateTable::new(entries)?;
        info!(
            earliest_year = table.earliest_year(),
            latest_year = table.latest_year(),
            "rate table loaded"
        );
        Ok(table)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<RateTable, RateTableLoaderError> {
        Self::into_table(Self::parse(reader)?)
    }
}
