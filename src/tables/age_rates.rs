//! A complete 15..=120 column of rates for one category

use super::{ages, check_age, RawRates, MAX_AGE, MIN_AGE};
use crate::error::{MortalityError, MortalityResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rates by age for one category, always covering exactly ages 15..=120
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AgeRates {
    rates: BTreeMap<u8, f64>,
}

impl AgeRates {
    /// Validate a raw column, dropping any ages outside 15..=120
    pub fn from_raw(table: &str, raw: &RawRates) -> MortalityResult<Self> {
        let missing: Vec<u8> = ages().filter(|age| !raw.contains_key(age)).collect();
        if let Some(first) = missing.first() {
            return Err(MortalityError::incomplete(
                table,
                format!("{} ages missing (first missing age {})", missing.len(), first),
            ));
        }

        if let Some(bad) = raw.iter().find(|(_, rate)| !rate.is_finite() || **rate < 0.0) {
            return Err(MortalityError::incomplete(
                table,
                format!("invalid rate {} at age {}", bad.1, bad.0),
            ));
        }

        Ok(Self {
            rates: raw.range(MIN_AGE..=MAX_AGE).map(|(&a, &r)| (a, r)).collect(),
        })
    }

    /// Build a column by evaluating `f` at every age, stopping at the first error
    pub fn try_from_fn<F>(mut f: F) -> MortalityResult<Self>
    where
        F: FnMut(u8) -> MortalityResult<f64>,
    {
        let rates = ages()
            .map(|age| f(age).map(|rate| (age, rate)))
            .collect::<MortalityResult<BTreeMap<_, _>>>()?;
        Ok(Self { rates })
    }

    /// Build a column from an infallible function of age
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(u8) -> f64,
    {
        Self {
            rates: ages().map(|age| (age, f(age))).collect(),
        }
    }

    /// Rate at `age`
    pub fn rate(&self, age: u8) -> MortalityResult<f64> {
        check_age(age)?;
        self.rates
            .get(&age)
            .copied()
            .ok_or_else(|| MortalityError::incomplete("age rates", format!("no rate at age {}", age)))
    }

    /// Apply `f` to every rate
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        Self {
            rates: self.rates.iter().map(|(&age, &rate)| (age, f(rate))).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.rates.iter().map(|(&age, &rate)| (age, rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
