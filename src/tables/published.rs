//! Regulator-published rates, returned verbatim for published years

use super::{AgeRates, Category430, Gender, RateTable, RateType, RawRates};
use crate::error::{MortalityError, MortalityResult};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Published rates for one category, keyed by calculation year
#[derive(Debug, Clone)]
pub struct PublishedTable {
    name: String,
    years: BTreeMap<u32, AgeRates>,
}

impl PublishedTable {
    pub fn new(name: impl Into<String>, raw: &BTreeMap<u32, RawRates>) -> MortalityResult<Self> {
        let name = name.into();
        let years = raw
            .iter()
            .map(|(&year, column)| {
                let label = format!("{} {}", name, year);
                AgeRates::from_raw(&label, column).map(|rates| (year, rates))
            })
            .collect::<MortalityResult<BTreeMap<_, _>>>()?;
        Ok(Self { name, years })
    }

    /// Published column for `year`
    pub fn for_year(&self, year: u32) -> MortalityResult<&AgeRates> {
        self.years.get(&year).ok_or_else(|| MortalityError::UnpublishedYear {
            table: self.name.clone(),
            year,
        })
    }

    pub fn is_published(&self, year: u32) -> bool {
        self.years.contains_key(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = u32> + '_ {
        self.years.keys().copied()
    }

    pub fn latest_year(&self) -> Option<u32> {
        self.years.keys().next_back().copied()
    }
}

impl RateTable for PublishedTable {
    type Key = u32;

    fn label(&self) -> &str {
        &self.name
    }

    fn rate(&self, year: u32, age: u8) -> MortalityResult<f64> {
        self.for_year(year)?.rate(age)
    }
}

/// Published 430, 430 static and 417e tables
#[derive(Debug, Clone)]
pub struct PublishedTables {
    irs_430: BTreeMap<Category430, PublishedTable>,
    irs_430_static: BTreeMap<Gender, PublishedTable>,
    irs_417e: PublishedTable,
}

impl PublishedTables {
    /// Build from year-first raw data as produced by the loader
    ///
    /// Every published year must carry every category of its rate type.
    pub fn new(
        irs_430: &BTreeMap<u32, BTreeMap<Category430, RawRates>>,
        irs_430_static: &BTreeMap<u32, BTreeMap<Gender, RawRates>>,
        irs_417e: &BTreeMap<u32, RawRates>,
    ) -> MortalityResult<Self> {
        Ok(Self {
            irs_430: by_category("Published 430", &Category430::ALL, irs_430)?,
            irs_430_static: by_category("Published 430 Static", &Gender::ALL, irs_430_static)?,
            irs_417e: PublishedTable::new("Published 417e", irs_417e)?,
        })
    }

    pub fn irs_430(&self, year: u32) -> MortalityResult<BTreeMap<Category430, AgeRates>> {
        self.irs_430
            .iter()
            .map(|(&category, table)| table.for_year(year).map(|rates| (category, rates.clone())))
            .collect()
    }

    pub fn irs_430_static(&self, year: u32) -> MortalityResult<BTreeMap<Gender, AgeRates>> {
        self.irs_430_static
            .iter()
            .map(|(&gender, table)| table.for_year(year).map(|rates| (gender, rates.clone())))
            .collect()
    }

    pub fn irs_417e(&self, year: u32) -> MortalityResult<AgeRates> {
        self.irs_417e.for_year(year).cloned()
    }

    /// Latest published year for a rate type, if any year is published
    pub fn latest_year(&self, rate_type: RateType) -> Option<u32> {
        match rate_type {
            RateType::Irs430 => self.irs_430.values().filter_map(PublishedTable::latest_year).min(),
            RateType::Irs430Static => self
                .irs_430_static
                .values()
                .filter_map(PublishedTable::latest_year)
                .min(),
            RateType::Irs417e => self.irs_417e.latest_year(),
        }
    }
}

/// Transpose year -> category -> rates into one table per category
fn by_category<K>(
    name: &str,
    categories: &[K],
    raw: &BTreeMap<u32, BTreeMap<K, RawRates>>,
) -> MortalityResult<BTreeMap<K, PublishedTable>>
where
    K: Ord + Copy + Display,
{
    let mut tables = BTreeMap::new();
    for &category in categories {
        let mut years = BTreeMap::new();
        for (&year, columns) in raw {
            let column = columns.get(&category).ok_or_else(|| {
                MortalityError::incomplete(name, format!("{} has no '{}' column", year, category))
            })?;
            years.insert(year, column.clone());
        }
        let table = PublishedTable::new(format!("{} {}", name, category), &years)?;
        tables.insert(category, table);
    }
    Ok(tables)
}
