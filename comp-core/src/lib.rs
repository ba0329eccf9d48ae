pub mod calculations;
pub mod models;
pub mod rates;
pub mod wizard;

pub use models::*;
pub use rates::{FallbackPolicy, RateLookup, RateTable};
