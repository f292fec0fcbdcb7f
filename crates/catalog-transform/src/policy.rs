//! Per-target weight-unit policy.
//!
//! Each export target declares the units its bulk importer accepts and a
//! default. Resolution order is fixed: an explicitly requested unit must be
//! in the allowed set (otherwise [`ConversionError::UnitNotAllowed`]); with
//! no request the target default is used. There is no other fallback.

use catalog_model::{TargetPlatform, Weight, WeightUnit};

use crate::error::{ConversionError, Result};
use crate::units::convert_weight;

/// Allowed units and default for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightPolicy {
    pub target: TargetPlatform,
    pub allowed: &'static [WeightUnit],
    pub default: WeightUnit,
}

const ALL_UNITS: &[WeightUnit] = &[WeightUnit::G, WeightUnit::Kg, WeightUnit::Lb, WeightUnit::Oz];
const METRIC_OR_POUNDS: &[WeightUnit] = &[WeightUnit::Kg, WeightUnit::Lb];
const KILOGRAMS_ONLY: &[WeightUnit] = &[WeightUnit::Kg];

impl WeightPolicy {
    pub fn for_target(target: TargetPlatform) -> Self {
        let (allowed, default) = match target {
            TargetPlatform::Shopify => (ALL_UNITS, WeightUnit::G),
            TargetPlatform::BigCommerce => (ALL_UNITS, WeightUnit::Kg),
            TargetPlatform::Wix | TargetPlatform::Squarespace => (METRIC_OR_POUNDS, WeightUnit::Kg),
            TargetPlatform::WooCommerce => (KILOGRAMS_ONLY, WeightUnit::Kg),
        };
        Self {
            target,
            allowed,
            default,
        }
    }

    pub fn allows(&self, unit: WeightUnit) -> bool {
        self.allowed.contains(&unit)
    }

    /// Allowed units as a comma-separated list, e.g. `kg, lb`.
    pub fn allowed_label(&self) -> String {
        self.allowed
            .iter()
            .map(|unit| unit.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolve the unit an export should emit.
    pub fn resolve(&self, requested: Option<WeightUnit>) -> Result<WeightUnit> {
        match requested {
            None => Ok(self.default),
            Some(unit) if self.allows(unit) => Ok(unit),
            Some(unit) => Err(ConversionError::UnitNotAllowed {
                target: self.target,
                unit,
                allowed: self.allowed_label(),
            }),
        }
    }
}

/// Express `weight` in the unit `target` will emit.
pub fn convert_for_target(
    weight: Weight,
    target: TargetPlatform,
    requested: Option<WeightUnit>,
) -> Result<Weight> {
    let unit = WeightPolicy::for_target(target).resolve(requested)?;
    if weight.unit == unit {
        return Ok(weight);
    }
    Ok(convert_weight(weight, unit))
}

/// Resolve a requested unit string for `target`; blank means "default".
pub fn resolve_weight_unit(target: TargetPlatform, requested: Option<&str>) -> Result<WeightUnit> {
    let parsed = match requested.map(str::trim).filter(|value| !value.is_empty()) {
        None => None,
        Some(value) => Some(value.parse::<WeightUnit>().map_err(|_| {
            ConversionError::UnknownUnit {
                value: value.to_string(),
            }
        })?),
    };
    WeightPolicy::for_target(target).resolve(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_per_target() {
        assert_eq!(
            WeightPolicy::for_target(TargetPlatform::Shopify).default,
            WeightUnit::G
        );
        for target in [
            TargetPlatform::BigCommerce,
            TargetPlatform::Wix,
            TargetPlatform::Squarespace,
            TargetPlatform::WooCommerce,
        ] {
            assert_eq!(WeightPolicy::for_target(target).default, WeightUnit::Kg);
        }
    }

    #[test]
    fn explicit_unit_must_be_allowed() {
        let policy = WeightPolicy::for_target(TargetPlatform::Squarespace);
        assert_eq!(policy.resolve(Some(WeightUnit::Lb)), Ok(WeightUnit::Lb));
        let err = policy.resolve(Some(WeightUnit::Oz)).unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnitNotAllowed {
                target: TargetPlatform::Squarespace,
                unit: WeightUnit::Oz,
                allowed: "kg, lb".to_string(),
            }
        );
    }

    #[test]
    fn woocommerce_is_kilograms_only() {
        assert!(resolve_weight_unit(TargetPlatform::WooCommerce, Some("lb")).is_err());
        assert_eq!(
            resolve_weight_unit(TargetPlatform::WooCommerce, Some(" ")),
            Ok(WeightUnit::Kg)
        );
    }

    #[test]
    fn unknown_strings_are_rejected() {
        assert_eq!(
            resolve_weight_unit(TargetPlatform::Shopify, Some("stone")),
            Err(ConversionError::UnknownUnit {
                value: "stone".to_string()
            })
        );
    }

    #[test]
    fn weight_follows_target_default() {
        let weight = Weight::new("2.5".parse().unwrap(), WeightUnit::Kg);
        assert_eq!(
            convert_for_target(weight, TargetPlatform::WooCommerce, None),
            Ok(weight)
        );
        let grams = convert_for_target(weight, TargetPlatform::Shopify, None).unwrap();
        assert_eq!(grams.unit, WeightUnit::G);
        assert_eq!(grams.value.to_string(), "2500");
        assert!(convert_for_target(weight, TargetPlatform::Wix, Some(WeightUnit::Oz)).is_err());
    }
}
