//! Workers' compensation calculations.
//!
//! This module provides the average weekly wage and compensation rate
//! calculator, the commuted value calculator, and the money and quarter
//! helpers they share.

pub mod aww;
pub mod common;
pub mod commuted_value;
pub mod quarters;

pub use aww::{AwwCalculator, AwwError, CompensationRate};
pub use commuted_value::{CommutedValueCalculator, CommutedValueError};
pub use quarters::{Quarter, preceding_quarters};
