//! Projection-method tables: projection years per 430 category and static blending weights

use super::{AgeRates, Category430, Gender, RateTable, RawRates, MAX_PROJECTION_YEARS};
use crate::error::{MortalityError, MortalityResult};
use std::collections::BTreeMap;

/// Extra (possibly fractional) projection years added to the calculation year
#[derive(Debug, Clone)]
pub struct ProjectionYears {
    name: String,
    columns: BTreeMap<Category430, AgeRates>,
}

impl ProjectionYears {
    pub fn new(name: impl Into<String>, raw: &BTreeMap<Category430, RawRates>) -> MortalityResult<Self> {
        let name = name.into();
        let mut columns = BTreeMap::new();
        for category in Category430::ALL {
            let column = raw.get(&category).ok_or_else(|| {
                MortalityError::incomplete(&name, format!("missing column '{}'", category))
            })?;
            let years = AgeRates::from_raw(&format!("{} {}", name, category), column)?;
            if let Some((age, y)) = years.iter().find(|(_, y)| *y > MAX_PROJECTION_YEARS) {
                return Err(MortalityError::incomplete(
                    &name,
                    format!("{} projects {} years at age {}; at most {} allowed", category, y, age, MAX_PROJECTION_YEARS),
                ));
            }
            columns.insert(category, years);
        }
        Ok(Self { name, columns })
    }

    /// No extra projection: every rate is projected exactly to the calculation year
    pub fn zero() -> Self {
        Self {
            name: "Projection Years".to_string(),
            columns: Category430::ALL
                .into_iter()
                .map(|category| (category, AgeRates::from_fn(|_| 0.0)))
                .collect(),
        }
    }

    /// Split the projection years into whole years and the fractional remainder
    pub fn split(&self, category: Category430, age: u8) -> MortalityResult<(u32, f64)> {
        let years = self.rate(category, age)?;
        let whole = years.trunc();
        Ok((whole as u32, years - whole))
    }
}

impl RateTable for ProjectionYears {
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

/// Weight given to the healthy-annuitant rate when blending 430 static rates
#[derive(Debug, Clone)]
pub struct BlendingTable {
    name: String,
    columns: BTreeMap<Gender, AgeRates>,
}

impl BlendingTable {
    pub fn new(name: impl Into<String>, raw: &BTreeMap<Gender, RawRates>) -> MortalityResult<Self> {
        let name = name.into();
        let mut columns = BTreeMap::new();
        for gender in Gender::ALL {
            let Some(column) = raw.get(&gender) else {
                continue;
            };
            let weights = AgeRates::from_raw(&format!("{} {}", name, gender), column)?;
            if let Some((age, w)) = weights.iter().find(|(_, w)| *w > 1.0) {
                return Err(MortalityError::incomplete(
                    &name,
                    format!("{} weight {} at age {} exceeds 1", gender, w, age),
                ));
            }
            columns.insert(gender, weights);
        }
        Ok(Self { name, columns })
    }

    /// HA weights for one sex; `None` when the table carries no column for it
    pub fn weights(&self, gender: Gender) -> Option<&AgeRates> {
        self.columns.get(&gender)
    }
}

impl RateTable for BlendingTable {
    type Key = Gender;

    fn label(&self) -> &str {
        &self.name
    }

    fn rate(&self, gender: Gender, age: u8) -> MortalityResult<f64> {
        self.columns
            .get(&gender)
            .ok_or_else(|| MortalityError::WeightMismatch {
                category: gender.label().to_string(),
            })?
            .rate(age)
    }
}
