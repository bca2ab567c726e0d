//! IRS Mortality CLI
//!
//! Builds the 430, 430 static and 417e tables for one calculation year

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, ValueEnum};
use irs_mortality::{EngineConfig, MortalityEngine, RateType};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TableChoice {
    All,
    #[value(name = "430")]
    Irs430,
    Static,
    #[value(name = "417e")]
    Irs417e,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "irs-mortality", version, about = "IRS 430 / 430 static / 417e mortality tables")]
struct Args {
    /// Calculation year (defaults to the current year)
    #[arg(short, long)]
    year: Option<u32>,

    /// Directory holding the base, improvement, method and published tables
    #[arg(short, long, default_value = irs_mortality::loader::DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    /// JSON engine configuration (published cutoffs, precisions, 417e weights)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Which table to print
    #[arg(short, long, value_enum, default_value_t = TableChoice::All)]
    table: TableChoice,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let year = args.year.unwrap_or_else(|| Local::now().year() as u32);

    let engine = MortalityEngine::from_data_dir(&args.data_dir, config)
        .with_context(|| format!("loading tables from {}", args.data_dir.display()))?;
    let table = engine
        .build(year)
        .with_context(|| format!("building mortality table for {}", year))?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let selected = match args.table {
        TableChoice::All => None,
        TableChoice::Irs430 => Some(RateType::Irs430),
        TableChoice::Static => Some(RateType::Irs430Static),
        TableChoice::Irs417e => Some(RateType::Irs417e),
    };

    match (args.format, selected) {
        (OutputFormat::Json, None) => {
            serde_json::to_writer_pretty(&mut out, &table)?;
            writeln!(out)?;
        }
        (OutputFormat::Json, Some(RateType::Irs430)) => {
            serde_json::to_writer_pretty(&mut out, &table.irs_430)?;
            writeln!(out)?;
        }
        (OutputFormat::Json, Some(RateType::Irs430Static)) => {
            serde_json::to_writer_pretty(&mut out, &table.irs_430_static)?;
            writeln!(out)?;
        }
        (OutputFormat::Json, Some(RateType::Irs417e)) => {
            serde_json::to_writer_pretty(&mut out, &table.irs_417e)?;
            writeln!(out)?;
        }
        (OutputFormat::Csv, None) => table.write_csv(&mut out)?,
        (OutputFormat::Csv, Some(rate_type)) => {
            let mut writer = csv::Writer::from_writer(&mut out);
            for row in table.rows().filter(|row| row.table == rate_type.label()) {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
    }

    if let Some(path) = &args.output {
        eprintln!("{} mortality tables written to {}", year, path.display());
    }
    Ok(())
}
