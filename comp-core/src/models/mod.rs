mod aww;
mod commuted_value;
mod rate_table_entry;
mod special_case;

pub use aww::{AwwInput, AwwOutcome, AwwResult, UnsupportedReason};
pub use commuted_value::{CommutedValueInput, CommutedValueResult};
pub use rate_table_entry::RateTableEntry;
pub use special_case::SpecialCase;
