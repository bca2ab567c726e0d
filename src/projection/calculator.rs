//! Projection of base mortality rates to a target year using an improvement scale

use super::rounding::round_half_up;
use crate::error::{MortalityError, MortalityResult};
use crate::tables::{check_age, Gender, ImprovementScale};

/// Projects base-year rates forward one improvement factor per year
///
/// Holds only shared references, so a calculator can be copied freely into
/// parallel workers.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionCalculator<'a> {
    improvement: &'a ImprovementScale,
    base_year: u32,
}

impl<'a> ProjectionCalculator<'a> {
    pub fn new(improvement: &'a ImprovementScale, base_year: u32) -> Self {
        Self { improvement, base_year }
    }

    pub fn base_year(&self) -> u32 {
        self.base_year
    }

    /// Project `base_rate` from the base year to `target_year`
    ///
    /// rate = base_rate x prod over y in (base_year, target_year] of (1 - i(age, y)).
    /// Factors are applied in year order starting from the base rate, so
    /// projecting one year further multiplies the previous result by exactly
    /// one more factor. Targets at or before the base year return the base rate.
    pub fn project(&self, base_rate: f64, age: u8, gender: Gender, target_year: u32) -> MortalityResult<f64> {
        check_age(age)?;
        let table = self.improvement.table(gender);
        ((self.base_year + 1)..=target_year).try_fold(base_rate, |rate, year| -> MortalityResult<f64> {
            Ok(rate * (1.0 - table.improvement(age, year)?))
        })
    }

    /// Project with a fractional number of extra years past `calc_year`
    ///
    /// The rates projected to the whole years either side are each rounded to
    /// `precision`, blended linearly on the fractional part and rounded again.
    /// With zero extra years this is `project` to `calc_year`, rounded.
    pub fn project_fractional(
        &self,
        base_rate: f64,
        age: u8,
        gender: Gender,
        calc_year: u32,
        extra_years: (u32, f64),
        precision: u32,
    ) -> MortalityResult<f64> {
        let (whole, fraction) = extra_years;
        let target = calc_year
            .checked_add(whole)
            .filter(|target| target.checked_add(1).is_some())
            .ok_or_else(|| {
                MortalityError::incomplete("projection", format!("{} extra years past {} overflows the year", whole, calc_year))
            })?;

        let lower = round_half_up(self.project(base_rate, age, gender, target)?, precision);
        if fraction == 0.0 {
            return Ok(lower);
        }

        let upper = round_half_up(self.project(base_rate, age, gender, target + 1)?, precision);
        let blended = (1.0 - fraction) * lower + fraction * upper;
        Ok(round_half_up(blended, precision))
    }
}
