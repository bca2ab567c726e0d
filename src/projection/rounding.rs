//! Spreadsheet-compatible rounding
//!
//! Excel's ROUND works on the decimal the cell displays, rounding halves away
//! from zero. Rounding the binary f64 directly would send 2.005 down to 2.00
//! (its nearest double is 2.00499999...), so the value is first taken through
//! its shortest decimal representation.

use rust_decimal::prelude::*;

/// Round `value` to `precision` decimals, halves away from zero
///
/// Non-finite values are returned unchanged.
pub fn round_half_up(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let decimal = value
        .to_string()
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_f64(value));

    match decimal {
        Some(d) => d
            .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
            .to_string()
            .parse::<f64>()
            .unwrap_or(value),
        None => value,
    }
}

/// Rounds every computed rate to a fixed number of decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rounder {
    precision: u32,
}

impl Rounder {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn round(&self, value: f64) -> f64 {
        round_half_up(value, self.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halves_round_up_not_to_even() {
        assert_eq!(round_half_up(2.005, 2), 2.01);
        assert_eq!(round_half_up(2.004, 2), 2.00);
        assert_eq!(round_half_up(0.125, 2), 0.13);
        assert_eq!(round_half_up(0.135, 2), 0.14);
        assert_eq!(round_half_up(2.5, 0), 3.0);
    }

    #[test]
    fn test_negative_halves_round_away_from_zero() {
        assert_eq!(round_half_up(-2.005, 2), -2.01);
        assert_eq!(round_half_up(-0.5, 0), -1.0);
    }

    #[test]
    fn test_mortality_precisions() {
        assert_eq!(round_half_up(0.0123455, 6), 0.012346);
        assert_eq!(round_half_up(0.0123454999, 6), 0.012345);
        assert_eq!(round_half_up(0.000365, 5), 0.00037);
        assert_eq!(Rounder::new(5).round(0.1234449), 0.12344);
    }

    #[test]
    fn test_already_rounded_values_are_unchanged() {
        for value in [0.0, 0.00037, 0.012346, 1.0, 0.4] {
            assert_eq!(round_half_up(value, 6), value);
        }
    }

    #[test]
    fn test_non_finite_passthrough() {
        assert!(round_half_up(f64::NAN, 5).is_nan());
        assert_eq!(round_half_up(f64::INFINITY, 5), f64::INFINITY);
    }
}
