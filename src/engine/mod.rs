//! Mortality engine: published lookup or projection, per rate type
//!
//! For each rate type independently, a calculation year at or before the
//! configured published cutoff returns the regulator's table verbatim. Later
//! years are computed:
//! - 430: base rate projected with the improvement scale, interpolated over
//!   fractional projection years, rounded to the rate precision
//! - 430 static: HA/EE blend of the same year's 430 rates, rounded to the rate
//!   precision and then to the static precision
//! - 417e: blend of the same year's static rates, rounded to the static precision

mod config;
mod full_table;

pub use config::{
    EngineConfig, PublishedCutoffs, DEFAULT_PUBLISHED_THROUGH, DEFAULT_RATE_PRECISION,
    DEFAULT_STATIC_PRECISION,
};
pub use full_table::{FullMortalityTable, RateRow};

use crate::error::{MortalityError, MortalityResult};
use crate::projection::{BlendWeight, ProjectionCalculator, Rounder, StaticBlender};
use crate::tables::{
    check_calc_year, AgeRates, Category430, Gender, MortalityTables, RateTable, RateType,
};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::Path;

/// Builds IRS mortality tables for any calculation year from read-only inputs
#[derive(Debug, Clone)]
pub struct MortalityEngine {
    tables: MortalityTables,
    config: EngineConfig,
}

impl MortalityEngine {
    pub fn new(tables: MortalityTables, config: EngineConfig) -> Self {
        for rate_type in RateType::ALL {
            let cutoff = config.published_through.for_rate_type(rate_type);
            match tables.published.latest_year(rate_type) {
                Some(latest) if latest < cutoff => warn!(
                    "{} published through {} but cutoff is {}; years {}..={} will fail",
                    rate_type,
                    latest,
                    cutoff,
                    latest + 1,
                    cutoff
                ),
                None if cutoff >= crate::tables::MIN_CALC_YEAR => {
                    warn!("{} has no published years but cutoff is {}", rate_type, cutoff)
                }
                _ => {}
            }
        }

        match StaticBlender::unbalanced_ages(&irs_417e_weights(&config)) {
            Ok(unbalanced) if !unbalanced.is_empty() => warn!(
                "417e weights {:?} do not sum to 1 at {} ages",
                config.irs_417e_weights,
                unbalanced.len()
            ),
            _ => {}
        }

        info!(
            "Mortality engine ready: base year {}, published through {:?}",
            tables.base.base_year(),
            config.published_through
        );
        Self { tables, config }
    }

    /// Load the standard data directory layout and build an engine
    pub fn from_data_dir(path: &Path, config: EngineConfig) -> MortalityResult<Self> {
        let tables = MortalityTables::load_from(path)?;
        Ok(Self::new(tables, config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tables(&self) -> &MortalityTables {
        &self.tables
    }

    /// Whether `year` takes the published path for `rate_type`
    pub fn is_published(&self, rate_type: RateType, year: u32) -> bool {
        year <= self.config.published_through.for_rate_type(rate_type)
    }

    /// Full 430, 430 static and 417e table for a calculation year
    pub fn build(&self, year: u32) -> MortalityResult<FullMortalityTable> {
        check_calc_year(year)?;
        let irs_430 = self.table_430(year)?;
        let irs_430_static = self.table_430_static(year, &irs_430)?;
        let irs_417e = self.table_417e(year, &irs_430_static)?;

        Ok(FullMortalityTable {
            calc_year: year,
            irs_430,
            irs_430_static,
            irs_417e,
        })
    }

    /// 430 rates only
    pub fn build_430(&self, year: u32) -> MortalityResult<BTreeMap<Category430, AgeRates>> {
        check_calc_year(year)?;
        self.table_430(year)
    }

    /// 430 static rates only
    pub fn build_430_static(&self, year: u32) -> MortalityResult<BTreeMap<Gender, AgeRates>> {
        check_calc_year(year)?;
        if self.is_published(RateType::Irs430Static, year) {
            return self.tables.published.irs_430_static(year);
        }
        let irs_430 = self.table_430(year)?;
        self.table_430_static(year, &irs_430)
    }

    /// 417e rates only
    pub fn build_417e(&self, year: u32) -> MortalityResult<AgeRates> {
        check_calc_year(year)?;
        if self.is_published(RateType::Irs417e, year) {
            return self.tables.published.irs_417e(year);
        }
        let irs_430_static = self.build_430_static(year)?;
        self.table_417e(year, &irs_430_static)
    }

    /// Build several calculation years in parallel, returned in year order
    pub fn build_range(&self, years: RangeInclusive<u32>) -> MortalityResult<Vec<FullMortalityTable>> {
        check_calc_year(*years.start())?;
        check_calc_year(*years.end())?;
        years.into_par_iter().map(|year| self.build(year)).collect()
    }

    fn table_430(&self, year: u32) -> MortalityResult<BTreeMap<Category430, AgeRates>> {
        if self.is_published(RateType::Irs430, year) {
            debug!("430 {}: published", year);
            return self.tables.published.irs_430(year);
        }

        debug!("430 {}: projecting from base year {}", year, self.tables.base.base_year());
        Category430::ALL
            .par_iter()
            .map(|&category| self.project_category(category, year).map(|rates| (category, rates)))
            .collect()
    }

    fn table_430_static(
        &self,
        year: u32,
        irs_430: &BTreeMap<Category430, AgeRates>,
    ) -> MortalityResult<BTreeMap<Gender, AgeRates>> {
        if self.is_published(RateType::Irs430Static, year) {
            debug!("430 static {}: published", year);
            return self.tables.published.irs_430_static(year);
        }

        debug!("430 static {}: blending 430 rates", year);
        Gender::ALL
            .into_iter()
            .map(|gender| self.blend_static(gender, irs_430).map(|rates| (gender, rates)))
            .collect()
    }

    fn table_417e(&self, year: u32, irs_430_static: &BTreeMap<Gender, AgeRates>) -> MortalityResult<AgeRates> {
        if self.is_published(RateType::Irs417e, year) {
            debug!("417e {}: published", year);
            return self.tables.published.irs_417e(year);
        }

        debug!("417e {}: blending static rates", year);
        let weights = irs_417e_weights(&self.config);
        let rounder = Rounder::new(self.config.static_precision);
        let blended = StaticBlender::blend(irs_430_static, &weights)?;
        Ok(blended.map(|rate| rounder.round(rate)))
    }

    /// Projected 430 rates for one category, rounded to the rate precision
    fn project_category(&self, category: Category430, year: u32) -> MortalityResult<AgeRates> {
        let calculator = ProjectionCalculator::new(&self.tables.improvement, self.tables.base.base_year());
        let precision = self.config.rate_precision;

        AgeRates::try_from_fn(|age| {
            let base_rate = self.tables.base.rate(category, age)?;
            let extra_years = self.tables.projection_years.split(category, age)?;
            calculator.project_fractional(base_rate, age, category.gender(), year, extra_years, precision)
        })
    }

    /// Static rate for one sex: HA weighted by the blending table, EE by the remainder
    fn blend_static(&self, gender: Gender, irs_430: &BTreeMap<Category430, AgeRates>) -> MortalityResult<AgeRates> {
        let ha_weights = self
            .tables
            .blending
            .weights(gender)
            .ok_or_else(|| MortalityError::WeightMismatch {
                category: gender.annuitant().to_string(),
            })?;
        let ha = BlendWeight::ByAge(ha_weights.clone());

        let mut rates = BTreeMap::new();
        for category in [gender.employee(), gender.annuitant()] {
            let column = irs_430.get(&category).ok_or_else(|| {
                MortalityError::incomplete(RateType::Irs430.label(), format!("no '{}' rates", category))
            })?;
            rates.insert(category, column.clone());
        }

        let weights = BTreeMap::from([
            (gender.employee(), ha.complement()),
            (gender.annuitant(), ha),
        ]);

        let intermediate = Rounder::new(self.config.rate_precision);
        let rounder = Rounder::new(self.config.static_precision);
        let blended = StaticBlender::blend(&rates, &weights)?;
        Ok(blended.map(|rate| rounder.round(intermediate.round(rate))))
    }
}

fn irs_417e_weights(config: &EngineConfig) -> BTreeMap<Gender, BlendWeight> {
    config
        .irs_417e_weights
        .iter()
        .map(|(&gender, &w)| (gender, BlendWeight::Fixed(w)))
        .collect()
}
