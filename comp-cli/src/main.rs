use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use comp_cli::{Settings, SessionEnd, logging, present::Present, run_session};
use comp_core::RateTable;
use comp_core::wizard::{AwwFlow, CommutedValueFlow, Wizard};
use comp_data::RateTableLoader;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// South Carolina workers' compensation calculators.
///
/// Walks through the average weekly wage or commuted value worksheet one
/// step at a time and prints the results.
#[derive(Debug, Parser)]
#[command(name = "comp-cli", version, about, long_about = None)]
struct Cli {
    /// TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV rate table replacing the built-in one.
    #[arg(long, global = true)]
    rates: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `comp_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Average weekly wage and compensation rate.
    Aww,
    /// Commuted value of the remaining weekly payments.
    Commuted,
}

impl Cli {
    fn overrides(&self) -> Settings {
        Settings {
            rate_table: self.rates.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

// ─── setup ───────────────────────────────────────────────────────────────────

fn load_settings(cli: &Cli) -> Result<Settings> {
    let file_settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    Ok(file_settings.merge(cli.overrides()))
}

fn load_rate_table(path: Option<&Path>) -> Result<RateTable> {
    let Some(path) = path else {
        debug!("using built-in rate table");
        return Ok(RateTable::south_carolina());
    };
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    RateTableLoader::load(file).with_context(|| format!("Invalid rate table: {}", path.display()))
}

fn run<F: Present>(flow: F) -> Result<()> {
    let mut wizard = Wizard::new(flow);
    let stdin = io::stdin();
    let stdout = io::stdout();

    let end = run_session(&mut wizard, &mut stdin.lock(), &mut stdout.lock())?;
    info!(flow = wizard.flow().name(), ?end, "session ended");
    if end == SessionEnd::Quit {
        println!();
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    if let Some(level) = &settings.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &settings.log_file {
        logging::enable_file_logging(path)?;
    }

    let rate_table = Arc::new(load_rate_table(settings.rate_table.as_deref())?);
    let today = Local::now().date_naive();

    match cli.command {
        Command::Aww => run(AwwFlow::new(rate_table, today)),
        Command::Commuted => run(CommutedValueFlow::new(rate_table, today)),
    }
}
