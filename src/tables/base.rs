//! Base mortality table (Pri-2012) used as the seed for 430 projections

use super::{AgeRates, Category430, RateTable, RawRates};
use crate::error::{MortalityError, MortalityResult};
use std::collections::BTreeMap;

/// Base rates by 430 category and age, anchored at the table's base year
#[derive(Debug, Clone)]
pub struct BaseTable {
    name: String,
    base_year: u32,
    columns: BTreeMap<Category430, AgeRates>,
}

impl BaseTable {
    /// Build from raw columns; every 430 category must be present and complete
    pub fn new(
        name: impl Into<String>,
        base_year: u32,
        raw: &BTreeMap<Category430, RawRates>,
    ) -> MortalityResult<Self> {
        let name = name.into();
        let mut columns = BTreeMap::new();

        for category in Category430::ALL {
            let column = raw.get(&category).ok_or_else(|| {
                MortalityError::incomplete(&name, format!("missing column '{}'", category))
            })?;
            let label = format!("{} {}", name, category);
            columns.insert(category, AgeRates::from_raw(&label, column)?);
        }

        Ok(Self { name, base_year, columns })
    }

    /// Year the base rates apply to; projection starts the year after
    pub fn base_year(&self) -> u32 {
        self.base_year
    }

    pub fn category(&self, category: Category430) -> Option<&AgeRates> {
        self.columns.get(&category)
    }
}

impl RateTable for BaseTable {
    type Key = Category430;

    fn label(&self) -> &str {
        &self.name
    }

    fn rate(&self, category: Category430, age: u8) -> MortalityResult<f64> {
        self.columns
            .get(&category)
            .ok_or_else(|| MortalityError::incomplete(&self.name, format!("missing column '{}'", category)))?
            .rate(age)
    }
}
