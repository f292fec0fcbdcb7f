//! Fixed-ratio weight conversion.
//!
//! Every unit converts through grams using exact decimal factors
//! (1 kg = 1000 g, 1 lb = 453.59237 g, 1 oz = 28.349523125 g). Results
//! are rounded half-to-even to [`SIGNIFICANT_DIGITS`] significant digits so
//! repeated conversions do not accumulate error.

use catalog_model::{Decimal, Weight, WeightUnit};
use rust_decimal::RoundingStrategy;

/// Significant digits kept after a unit change.
pub const SIGNIFICANT_DIGITS: u32 = 8;

/// Convert `value` from one unit to another.
///
/// Same-unit conversions return the value unchanged apart from trailing
/// zeros.
pub fn convert(value: Decimal, from: WeightUnit, to: WeightUnit) -> Decimal {
    if from == to {
        return value.normalize();
    }
    let grams = value.saturating_mul(from.grams());
    let converted = grams / to.grams();
    round_significant(converted)
}

/// Convert a weight, returning a new value in `to`.
pub fn convert_weight(weight: Weight, to: WeightUnit) -> Weight {
    Weight::new(convert(weight.value, weight.unit, to), to)
}

/// Round half-to-even to [`SIGNIFICANT_DIGITS`] significant digits.
pub fn round_significant(value: Decimal) -> Decimal {
    value
        .round_sf_with_strategy(SIGNIFICANT_DIGITS, RoundingStrategy::MidpointNearestEven)
        .unwrap_or(value)
        .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn test_kg_to_lb() {
        assert_eq!(convert(dec("2.5"), WeightUnit::Kg, WeightUnit::Lb), dec("5.5115566"));
    }

    #[test]
    fn test_identity_keeps_precision() {
        assert_eq!(
            convert(dec("2.500"), WeightUnit::Kg, WeightUnit::Kg).to_string(),
            "2.5"
        );
        assert_eq!(
            convert(dec("1.23456"), WeightUnit::G, WeightUnit::G),
            dec("1.23456")
        );
    }

    #[test]
    fn test_exact_ratios() {
        assert_eq!(convert(dec("1"), WeightUnit::Lb, WeightUnit::G), dec("453.59237"));
        assert_eq!(convert(dec("1500"), WeightUnit::G, WeightUnit::Kg), dec("1.5"));
        assert_eq!(convert(dec("16"), WeightUnit::Oz, WeightUnit::Lb), dec("1"));
    }

    #[test]
    fn test_half_even_rounding() {
        // Both sit exactly on the midpoint at 8 digits.
        assert_eq!(round_significant(dec("1.00000005")), dec("1"));
        assert_eq!(round_significant(dec("1.00000015")), dec("1.0000002"));
        assert_eq!(round_significant(dec("123456789")), dec("123456790"));
        assert_eq!(round_significant(dec("12345")), dec("12345"));
    }

    #[test]
    fn test_zero_and_negative() {
        assert_eq!(convert(Decimal::ZERO, WeightUnit::Kg, WeightUnit::Oz), Decimal::ZERO);
        assert_eq!(convert(dec("-1"), WeightUnit::Kg, WeightUnit::G), dec("-1000"));
    }

    #[test]
    fn test_convert_weight_sets_unit() {
        let weight = convert_weight(Weight::new(dec("500"), WeightUnit::G), WeightUnit::Kg);
        assert_eq!(weight.unit, WeightUnit::Kg);
        assert_eq!(weight.value, dec("0.5"));
    }
}
