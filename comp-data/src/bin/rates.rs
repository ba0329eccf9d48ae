use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use comp_core::calculations::common::{format_currency, format_percent};
use comp_core::rates::{LONG_TERM_DISCOUNT_RATE, RateTable};
use comp_data::RateTableLoader;

/// Validate a maximum compensation rate table and print it.
///
/// The CSV file should have the following columns:
/// - year: Calendar year of injury (e.g., 2025)
/// - max_compensation_rate: Maximum weekly rate for that year
/// - discount_rate: Optional annual commutation discount rate (e.g., 0.0438)
///
/// Without --file the built-in South Carolina table is printed.
#[derive(Parser, Debug)]
#[command(name = "comp-rates")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the rate table
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let table = match &args.file {
        Some(path) => {
            println!("Loading rate table from: {}", path.display());
            let file =
                File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
            RateTableLoader::load(file)
                .with_context(|| format!("Invalid rate table: {}", path.display()))?
        }
        None => RateTable::south_carolina(),
    };

    println!("{:>6}  {:>14}  {:>9}", "Year", "Maximum rate", "Discount");
    for entry in table.entries() {
        println!(
            "{:>6}  {:>14}  {:>9}",
            entry.year,
            format_currency(entry.max_compensation_rate),
            format_percent(entry.discount_rate.unwrap_or(LONG_TERM_DISCOUNT_RATE)),
        );
    }
    println!(
        "{} years, {} to {}.",
        table.entries().count(),
        table.earliest_year(),
        table.latest_year()
    );

    Ok(())
}
