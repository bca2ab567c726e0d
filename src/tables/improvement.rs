//! Mortality improvement scales (MP-2021 adjusted) with extend-by-copy extrapolation
//!
//! The stored grid rarely covers everything the projection needs: the scale
//! starts above age 15 and stops decades before 2099. Lookups outside the grid
//! clamp each axis to the nearest stored value, first the year and then the
//! age. This reproduces the spreadsheet, which extends the scale by copying the
//! last year across and the first age down. Never interpolate here.

use super::{check_age, Gender, RateTable, RawRates};
use crate::error::{MortalityError, MortalityResult};
use std::collections::BTreeMap;

/// Improvement rates for one sex, keyed by year then age
#[derive(Debug, Clone)]
pub struct ImprovementTable {
    name: String,
    rates: BTreeMap<u32, RawRates>,
    first_year: u32,
    last_year: u32,
    min_age: u8,
    max_age: u8,
}

impl ImprovementTable {
    /// Validate a raw year -> age -> rate grid
    ///
    /// Years must be contiguous and every year must cover the same
    /// contiguous age range.
    pub fn new(name: impl Into<String>, rates: BTreeMap<u32, RawRates>) -> MortalityResult<Self> {
        let name = name.into();

        let (first_year, last_year) = match (rates.keys().next(), rates.keys().next_back()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Err(MortalityError::incomplete(&name, "no years")),
        };

        if rates.len() as u32 != last_year - first_year + 1 {
            return Err(MortalityError::incomplete(
                &name,
                format!("years {}..={} are not contiguous", first_year, last_year),
            ));
        }

        let first_column = &rates[&first_year];
        let (min_age, max_age) = match (first_column.keys().next(), first_column.keys().next_back()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => return Err(MortalityError::incomplete(&name, format!("no ages for {}", first_year))),
        };

        for (year, column) in &rates {
            let covered = column.len() == (max_age - min_age) as usize + 1
                && column.keys().next() == Some(&min_age)
                && column.keys().next_back() == Some(&max_age);
            if !covered {
                return Err(MortalityError::incomplete(
                    &name,
                    format!("year {} does not cover ages {}..={}", year, min_age, max_age),
                ));
            }
            if let Some((age, rate)) = column.iter().find(|(_, r)| !r.is_finite()) {
                return Err(MortalityError::incomplete(
                    &name,
                    format!("invalid rate {} at age {} in {}", rate, age, year),
                ));
            }
        }

        Ok(Self {
            name,
            rates,
            first_year,
            last_year,
            min_age,
            max_age,
        })
    }

    /// Stored year range
    pub fn years(&self) -> (u32, u32) {
        (self.first_year, self.last_year)
    }

    /// Stored age range
    pub fn stored_ages(&self) -> (u8, u8) {
        (self.min_age, self.max_age)
    }

    /// Improvement rate with nearest-neighbor clamping on both axes
    pub fn improvement(&self, age: u8, year: u32) -> MortalityResult<f64> {
        check_age(age)?;
        let year = year.clamp(self.first_year, self.last_year);
        let age = age.clamp(self.min_age, self.max_age);

        self.rates
            .get(&year)
            .and_then(|column| column.get(&age))
            .copied()
            .ok_or_else(|| MortalityError::incomplete(&self.name, format!("no rate at age {} in {}", age, year)))
    }
}

impl RateTable for ImprovementTable {
    type Key = u32;

    fn label(&self) -> &str {
        &self.name
    }

    fn rate(&self, year: u32, age: u8) -> MortalityResult<f64> {
        self.improvement(age, year)
    }
}

/// Male and female improvement tables used together for projection
#[derive(Debug, Clone)]
pub struct ImprovementScale {
    male: ImprovementTable,
    female: ImprovementTable,
}

impl ImprovementScale {
    pub fn new(male: ImprovementTable, female: ImprovementTable) -> Self {
        Self { male, female }
    }

    pub fn table(&self, gender: Gender) -> &ImprovementTable {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }

    pub fn improvement(&self, gender: Gender, age: u8, year: u32) -> MortalityResult<f64> {
        self.table(gender).improvement(age, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{ages, MAX_AGE};

    /// Ages 20..=115, years 2012..=2021, rate depends on both axes
    fn grid() -> BTreeMap<u32, RawRates> {
        (2012..=2021)
            .map(|year| {
                let column = (20..=115)
                    .map(|age| (age, 0.0001 * age as f64 + 0.001 * (year - 2012) as f64))
                    .collect();
                (year, column)
            })
            .collect()
    }

    #[test]
    fn test_lookup_inside_grid() {
        let table = ImprovementTable::new("MP-2021 Males", grid()).unwrap();
        assert_eq!(table.years(), (2012, 2021));
        assert_eq!(table.stored_ages(), (20, 115));
        assert_eq!(table.improvement(50, 2015).unwrap(), 0.0001 * 50.0 + 0.001 * 3.0);
    }

    #[test]
    fn test_years_after_last_stored_year_copy_the_last_year() {
        let table = ImprovementTable::new("MP-2021 Males", grid()).unwrap();
        for age in ages() {
            assert_eq!(table.improvement(age, 2050).unwrap(), table.improvement(age, 2021).unwrap());
            assert_eq!(table.improvement(age, 2178).unwrap(), table.improvement(age, 2021).unwrap());
        }
    }

    #[test]
    fn test_years_before_first_stored_year_copy_the_first_year() {
        let table = ImprovementTable::new("MP-2021 Males", grid()).unwrap();
        assert_eq!(table.improvement(60, 1990).unwrap(), table.improvement(60, 2012).unwrap());
    }

    #[test]
    fn test_ages_outside_grid_copy_the_boundary_age() {
        let table = ImprovementTable::new("MP-2021 Males", grid()).unwrap();
        for age in 15..20 {
            assert_eq!(table.improvement(age, 2018).unwrap(), table.improvement(20, 2018).unwrap());
        }
        for age in 116..=MAX_AGE {
            assert_eq!(table.improvement(age, 2018).unwrap(), table.improvement(115, 2018).unwrap());
        }
        // Both axes clamp together
        assert_eq!(table.improvement(15, 2099).unwrap(), table.improvement(20, 2021).unwrap());
    }

    #[test]
    fn test_lookup_rejects_ages_outside_domain() {
        let table = ImprovementTable::new("MP-2021 Males", grid()).unwrap();
        assert!(matches!(table.improvement(10, 2015), Err(MortalityError::OutOfRange { .. })));
    }

    #[test]
    fn test_rejects_year_gaps() {
        let mut raw = grid();
        raw.remove(&2016);
        assert!(matches!(
            ImprovementTable::new("gappy", raw),
            Err(MortalityError::IncompleteTable { .. })
        ));
    }

    #[test]
    fn test_rejects_ragged_ages() {
        let mut raw = grid();
        if let Some(column) = raw.get_mut(&2019) {
            column.remove(&70);
        }
        assert!(matches!(
            ImprovementTable::new("ragged", raw),
            Err(MortalityError::IncompleteTable { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(ImprovementTable::new("empty", BTreeMap::new()).is_err());
    }
}
