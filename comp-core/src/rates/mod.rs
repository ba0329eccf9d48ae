//! Statutory rate tables.
//!
//! The Workers' Compensation Commission publishes a maximum weekly
//! compensation rate for each calendar year. Commutations are discounted at
//! one of two annual rates depending on how many weeks remain.

mod defaults;
mod table;

pub use defaults::south_carolina_entries;
pub use table::{
    DEFAULT_MAX_COMPENSATION_RATE, DISCOUNT_THRESHOLD_WEEKS, FallbackPolicy, LONG_TERM_DISCOUNT_RATE,
    RateLookup, RateTable, RateTableError, SHORT_TERM_DISCOUNT_RATE,
};
