//! Rate tables: base, improvement, published and the projection method tables
//!
//! Every table kind implements [`RateTable`]: a lookup by age plus one extra key
//! (category, year or sex). Construction validates coverage of the age domain,
//! so a successfully built table never has gaps in 15..=120.

mod age_rates;
mod base;
mod category;
mod improvement;
mod methods;
mod published;

pub use age_rates::AgeRates;
pub use base::BaseTable;
pub use category::{Category, Category430, Gender, RateType};
pub use improvement::{ImprovementScale, ImprovementTable};
pub use methods::{BlendingTable, ProjectionYears};
pub use published::{PublishedTable, PublishedTables};

use crate::error::{MortalityError, MortalityResult};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Youngest age with an IRS rate
pub const MIN_AGE: u8 = 15;

/// Oldest age with an IRS rate
pub const MAX_AGE: u8 = 120;

/// First calculation year the IRS tables are defined for
pub const MIN_CALC_YEAR: u32 = 2009;

/// Last calculation year the IRS tables are defined for
pub const MAX_CALC_YEAR: u32 = 2099;

/// Most extra projection years a projection-years table may carry
pub const MAX_PROJECTION_YEARS: f64 = (MAX_CALC_YEAR - MIN_CALC_YEAR) as f64;

/// Raw age-keyed rates as supplied by a loader
pub type RawRates = BTreeMap<u8, f64>;

/// All ages an IRS table is defined for
pub fn ages() -> RangeInclusive<u8> {
    MIN_AGE..=MAX_AGE
}

/// Check an age against the 15..=120 domain
pub fn check_age(age: u8) -> MortalityResult<()> {
    if ages().contains(&age) {
        Ok(())
    } else {
        Err(MortalityError::OutOfRange { age, min: MIN_AGE, max: MAX_AGE })
    }
}

/// Check a calculation year against the 2009..=2099 domain
pub fn check_calc_year(year: u32) -> MortalityResult<()> {
    if (MIN_CALC_YEAR..=MAX_CALC_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(MortalityError::YearOutOfRange {
            year,
            min: MIN_CALC_YEAR,
            max: MAX_CALC_YEAR,
        })
    }
}

/// Every input table the engine needs, validated and read-only
#[derive(Debug, Clone)]
pub struct MortalityTables {
    /// Pre-2012 base rates; its base year anchors every projection
    pub base: BaseTable,
    pub improvement: ImprovementScale,
    pub projection_years: ProjectionYears,
    /// HA weights for 430 static blending
    pub blending: BlendingTable,
    pub published: PublishedTables,
}

/// Common lookup capability shared by every table kind
pub trait RateTable {
    /// Second lookup key besides age (category, year or sex)
    type Key: Copy;

    /// Name used in error messages
    fn label(&self) -> &str;

    /// Rate for `age` under `key`
    fn rate(&self, key: Self::Key, age: u8) -> MortalityResult<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_domain_bounds() {
        assert!(check_age(15).is_ok());
        assert!(check_age(120).is_ok());
        assert!(matches!(check_age(14), Err(MortalityError::OutOfRange { age: 14, .. })));
        assert!(matches!(check_age(121), Err(MortalityError::OutOfRange { age: 121, .. })));
        assert_eq!(ages().count(), 106);
    }

    #[test]
    fn test_calc_year_domain_bounds() {
        assert!(check_calc_year(2009).is_ok());
        assert!(check_calc_year(2099).is_ok());
        assert!(matches!(check_calc_year(2008), Err(MortalityError::YearOutOfRange { .. })));
        assert!(matches!(check_calc_year(2100), Err(MortalityError::YearOutOfRange { .. })));
    }
}
