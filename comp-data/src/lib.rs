//! Loading maximum compensation rate tables from CSV.

pub mod loader;

pub use loader::{RateTableLoader, RateTableLoaderError, RateTableRecord};
