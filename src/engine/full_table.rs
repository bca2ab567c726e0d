//! Combined 430, 430 static and 417e tables for one calculation year

use crate::error::{MortalityError, MortalityResult};
use crate::tables::{AgeRates, Category, Category430, Gender, RateType};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// All IRS mortality rates for one calculation year
///
/// Only the engine builds these, so every table covers all seven categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct FullMortalityTable {
    #[serde(rename = "Calculation Year")]
    pub calc_year: u32,

    #[serde(rename = "430 Table")]
    pub irs_430: BTreeMap<Category430, AgeRates>,

    #[serde(rename = "430 Static Table")]
    pub irs_430_static: BTreeMap<Gender, AgeRates>,

    #[serde(rename = "417e Table")]
    pub irs_417e: AgeRates,
}

/// One flattened rate, as written to CSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRow {
    #[serde(rename = "Year")]
    pub year: u32,
    #[serde(rename = "Table")]
    pub table: &'static str,
    #[serde(rename = "Category")]
    pub category: &'static str,
    #[serde(rename = "Age")]
    pub age: u8,
    #[serde(rename = "Rate")]
    pub rate: f64,
}

impl FullMortalityTable {
    pub fn get(&self, category: Category) -> Option<&AgeRates> {
        match category {
            Category::Irs430(c) => self.irs_430.get(&c),
            Category::Irs430Static(g) => self.irs_430_static.get(&g),
            Category::Irs417e => Some(&self.irs_417e),
        }
    }

    pub fn rate(&self, category: Category, age: u8) -> MortalityResult<f64> {
        self.get(category)
            .ok_or_else(|| MortalityError::incomplete(category.rate_type().label(), format!("no '{}' rates", category.label())))?
            .rate(age)
    }

    /// Every category in rate-type order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &AgeRates)> + '_ {
        let irs_430 = self.irs_430.iter().map(|(&c, rates)| (Category::Irs430(c), rates));
        let irs_static = self
            .irs_430_static
            .iter()
            .map(|(&g, rates)| (Category::Irs430Static(g), rates));
        irs_430
            .chain(irs_static)
            .chain(std::iter::once((Category::Irs417e, &self.irs_417e)))
    }

    /// Categories of one rate type
    pub fn of_type(&self, rate_type: RateType) -> impl Iterator<Item = (Category, &AgeRates)> + '_ {
        self.iter().filter(move |(c, _)| c.rate_type() == rate_type)
    }

    /// Long-format rows: one per category and age
    pub fn rows(&self) -> impl Iterator<Item = RateRow> + '_ {
        self.iter().flat_map(move |(category, rates)| {
            rates.iter().map(move |(age, rate)| RateRow {
                year: self.calc_year,
                table: category.rate_type().label(),
                category: category.label(),
                age,
                rate,
            })
        })
    }

    /// Write the long-format rows (with header) as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> MortalityResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in self.rows() {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FullMortalityTable {
        FullMortalityTable {
            calc_year: 2030,
            irs_430: Category430::ALL
                .into_iter()
                .map(|c| (c, AgeRates::from_fn(|age| age as f64 / 10000.0)))
                .collect(),
            irs_430_static: Gender::ALL
                .into_iter()
                .map(|g| (g, AgeRates::from_fn(|_| 0.01)))
                .collect(),
            irs_417e: AgeRates::from_fn(|_| 0.02),
        }
    }

    #[test]
    fn test_iterates_all_seven_categories() {
        let table = table();
        let categories: Vec<Category> = table.iter().map(|(c, _)| c).collect();
        assert_eq!(categories.len(), 7);
        assert_eq!(categories[0], Category::Irs430(Category430::MaleEe));
        assert_eq!(categories[6], Category::Irs417e);
        assert_eq!(table.of_type(RateType::Irs430Static).count(), 2);
    }

    #[test]
    fn test_rate_lookup_by_category() {
        let table = table();
        assert_eq!(table.rate(Category::Irs430(Category430::FemaleHa), 50).unwrap(), 50.0 / 10000.0);
        assert_eq!(table.rate(Category::Irs417e, 99).unwrap(), 0.02);
        assert!(table.rate(Category::Irs417e, 121).is_err());
    }

    #[test]
    fn test_rows_and_csv() {
        let table = table();
        assert_eq!(table.rows().count(), 7 * 106);

        let mut buffer = Vec::new();
        table.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Year,Table,Category,Age,Rate"));
        assert_eq!(lines.next(), Some("2030,430 Table,Male EE,15,0.0015"));
        assert!(text.contains("2030,417e Table,Unisex,120,0.02"));
    }

    #[test]
    fn test_json_uses_table_names() {
        let json = serde_json::to_value(table()).unwrap();
        assert_eq!(json["Calculation Year"], 2030);
        assert_eq!(json["430 Table"]["Male HA"]["65"], 65.0 / 10000.0);
        assert_eq!(json["430 Static Table"]["Female"]["15"], 0.01);
        assert_eq!(json["417e Table"]["120"], 0.02);
    }
}
