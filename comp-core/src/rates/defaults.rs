use rust_decimal::Decimal;

use crate::models::RateTableEntry;

/// South Carolina maximum weekly compensation rates by year of injury.
const SOUTH_CAROLINA_MAX_RATES: &[(i32, i64)] = &[
    (2010, 66129),
    (2011, 68136),
    (2012, 68971),
    (2013, 70492),
    (2014, 72547),
    (2015, 75216),
    (2016, 76605),
    (2017, 78403),
    (2018, 80692),
    (2019, 84574),
    (2020, 86667),
    (2021, 90340),
    (2022, 96337),
    (2023, 103578),
    (2024, 109367),
    (2025, 113443),
];

/// The built-in rate table entries, oldest year first.
pub fn south_carolina_entries() -> Vec<RateTableEntry> {
    SOUTH_CAROLINA_MAX_RATES
        .iter()
        .map(|&(year, cents)| RateTableEntry {
            year,
            max_compensation_rate: Decimal::new(cents, 2),
            discount_rate: None,
        })
        .collect()
}
