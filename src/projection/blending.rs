//! Weighted blending of category rates into a single static rate per age

use crate::error::{MortalityError, MortalityResult};
use crate::tables::{ages, AgeRates};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Weight applied to one category's rates
#[derive(Debug, Clone, PartialEq)]
pub enum BlendWeight {
    /// Same weight at every age
    Fixed(f64),
    /// Weight varies by age
    ByAge(AgeRates),
}

impl BlendWeight {
    pub fn at(&self, age: u8) -> MortalityResult<f64> {
        match self {
            BlendWeight::Fixed(w) => Ok(*w),
            BlendWeight::ByAge(weights) => weights.rate(age),
        }
    }

    /// Weight of the other side of a two-way blend (1 - w)
    pub fn complement(&self) -> Self {
        match self {
            BlendWeight::Fixed(w) => BlendWeight::Fixed(1.0 - w),
            BlendWeight::ByAge(weights) => BlendWeight::ByAge(weights.map(|w| 1.0 - w)),
        }
    }
}

/// Combines category rates using supplied weights
pub struct StaticBlender;

impl StaticBlender {
    /// Weighted sum of `rates` at every age, unrounded
    ///
    /// Fails with `WeightMismatch` if any category in `rates` has no weight.
    /// Weights for categories not present in `rates` are ignored.
    pub fn blend<K>(
        rates: &BTreeMap<K, AgeRates>,
        weights: &BTreeMap<K, BlendWeight>,
    ) -> MortalityResult<AgeRates>
    where
        K: Ord + Display,
    {
        if rates.is_empty() {
            return Err(MortalityError::incomplete("blend", "no category rates supplied"));
        }

        let mut terms = Vec::with_capacity(rates.len());
        for (category, column) in rates {
            let weight = weights.get(category).ok_or_else(|| MortalityError::WeightMismatch {
                category: category.to_string(),
            })?;
            terms.push((column, weight));
        }

        AgeRates::try_from_fn(|age| {
            terms.iter().try_fold(0.0, |sum, (column, weight)| -> MortalityResult<f64> {
                Ok(sum + weight.at(age)? * column.rate(age)?)
            })
        })
    }

    /// Ages at which the weights of a blend do not sum to one
    pub fn unbalanced_ages<K: Ord>(weights: &BTreeMap<K, BlendWeight>) -> MortalityResult<Vec<u8>> {
        let mut unbalanced = Vec::new();
        for age in ages() {
            let total = weights
                .values()
                .try_fold(0.0, |sum, w| -> MortalityResult<f64> { Ok(sum + w.at(age)?) })?;
            if (total - 1.0).abs() > 1e-9 {
                unbalanced.push(age);
            }
        }
        Ok(unbalanced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{Category430, Gender};
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_weights_blend() {
        let rates = BTreeMap::from([
            (Category430::MaleEe, AgeRates::from_fn(|_| 0.010)),
            (Category430::MaleHa, AgeRates::from_fn(|_| 0.020)),
        ]);
        let weights = BTreeMap::from([
            (Category430::MaleEe, BlendWeight::Fixed(0.3)),
            (Category430::MaleHa, BlendWeight::Fixed(0.7)),
        ]);

        let blended = StaticBlender::blend(&rates, &weights).unwrap();
        assert_eq!(blended.len(), 106);
        for (_, rate) in blended.iter() {
            assert_relative_eq!(rate, 0.017, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_age_varying_weights() {
        let rates = BTreeMap::from([
            (Gender::Male, AgeRates::from_fn(|_| 0.01)),
            (Gender::Female, AgeRates::from_fn(|_| 0.03)),
        ]);
        let male = BlendWeight::ByAge(AgeRates::from_fn(|age| if age < 65 { 1.0 } else { 0.25 }));
        let weights = BTreeMap::from([(Gender::Female, male.complement()), (Gender::Male, male)]);

        let blended = StaticBlender::blend(&rates, &weights).unwrap();
        assert_relative_eq!(blended.rate(40).unwrap(), 0.01);
        assert_relative_eq!(blended.rate(80).unwrap(), 0.25 * 0.01 + 0.75 * 0.03);
        assert!(StaticBlender::unbalanced_ages(&weights).unwrap().is_empty());
    }

    #[test]
    fn test_missing_weight_is_a_mismatch() {
        let rates = BTreeMap::from([
            (Category430::FemaleEe, AgeRates::from_fn(|_| 0.01)),
            (Category430::FemaleHa, AgeRates::from_fn(|_| 0.02)),
        ]);
        let weights = BTreeMap::from([(Category430::FemaleEe, BlendWeight::Fixed(1.0))]);

        match StaticBlender::blend(&rates, &weights) {
            Err(MortalityError::WeightMismatch { category }) => assert_eq!(category, "Female HA"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_unbalanced_weights_are_reported() {
        let weights = BTreeMap::from([
            (Gender::Male, BlendWeight::Fixed(0.5)),
            (Gender::Female, BlendWeight::ByAge(AgeRates::from_fn(|age| if age == 100 { 0.4 } else { 0.5 }))),
        ]);
        assert_eq!(StaticBlender::unbalanced_ages(&weights).unwrap(), vec![100]);
    }

    #[test]
    fn test_empty_blend_fails() {
        let rates: BTreeMap<Gender, AgeRates> = BTreeMap::new();
        assert!(StaticBlender::blend(&rates, &BTreeMap::new()).is_err());
    }
}
