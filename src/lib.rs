//! IRS Mortality - 430, 430 static and 417e mortality tables for pension funding
//!
//! This library provides:
//! - Published IRS rates returned verbatim for published calculation years
//! - Pri-2012 base rates projected with the adjusted MP-2021 improvement scale
//!   for every other year up to 2099
//! - Static and unisex blending with spreadsheet-compatible rounding
//! - CSV loading of the source tables
//!
//! # Example
//!
//! ```rust,ignore
//! use irs_mortality::{EngineConfig, MortalityEngine};
//! use std::path::Path;
//!
//! let engine = MortalityEngine::from_data_dir(Path::new("data"), EngineConfig::default())?;
//! let table = engine.build(2030)?;
//! println!("{}", serde_json::to_string_pretty(&table)?);
//! ```

pub mod error;
pub mod tables;
pub mod projection;
pub mod engine;
pub mod loader;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export commonly used types
pub use error::{MortalityError, MortalityResult};
pub use tables::{AgeRates, Category, Category430, Gender, MortalityTables, RateTable, RateType};
pub use projection::{ProjectionCalculator, Rounder, StaticBlender};
pub use engine::{EngineConfig, FullMortalityTable, MortalityEngine, PublishedCutoffs};
