//! Build mortality tables for a range of calculation years
//!
//! Outputs one long-format CSV (Year,Table,Category,Age,Rate) covering every year

use anyhow::{Context, Result};
use clap::Parser;
use irs_mortality::{EngineConfig, MortalityEngine, RateType};
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "build_range", about = "Build IRS mortality tables for a range of years")]
struct Args {
    /// First calculation year
    #[arg(long, default_value_t = irs_mortality::tables::MIN_CALC_YEAR)]
    from: u32,

    /// Last calculation year (inclusive)
    #[arg(long, default_value_t = irs_mortality::tables::MAX_CALC_YEAR)]
    to: u32,

    #[arg(short, long, default_value = irs_mortality::loader::DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    /// JSON engine configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "irs_mortality_tables.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    println!("Loading tables from {}...", args.data_dir.display());
    let engine = MortalityEngine::from_data_dir(&args.data_dir, config)
        .with_context(|| format!("loading tables from {}", args.data_dir.display()))?;
    println!("Loaded in {:?}", start.elapsed());

    println!("Building {}..={}...", args.from, args.to);
    let build_start = Instant::now();
    let tables = engine.build_range(args.from..=args.to)?;
    println!("Built {} years in {:?}", tables.len(), build_start.elapsed());

    let file = File::create(&args.output).with_context(|| format!("creating {}", args.output.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    let mut rows = 0usize;
    for table in &tables {
        for row in table.rows() {
            writer.serialize(row)?;
            rows += 1;
        }
    }
    writer.flush()?;
    println!("{} rows written to {}", rows, args.output.display());

    println!("\nPublished vs computed:");
    for rate_type in RateType::ALL {
        let computed = tables
            .iter()
            .filter(|t| !engine.is_published(rate_type, t.calc_year))
            .count();
        println!("  {:<18} {:>3} published, {:>3} computed", rate_type.label(), tables.len() - computed, computed);
    }

    if let Some(last) = tables.last() {
        println!("\nSpot check {} (age 65):", last.calc_year);
        for (category, rates) in last.iter() {
            if let Ok(rate) = rates.rate(65) {
                println!("  {:<28} {:.6}", category.to_string(), rate);
            }
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
