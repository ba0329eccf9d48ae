use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTableEntry {
    pub year: i32,
    pub max_compensation_rate: Decimal,
    /// Annual discount rate a loaded table publishes for this year.
    ///
    /// When set, it overrides the statutory 4.38% long-term rate for
    /// commutations with more than 100 weeks remaining. The 2% short-term
    /// rate is never overridden. Built-in entries leave this empty.
    pub discount_rate: Option<Decimal>,
}
