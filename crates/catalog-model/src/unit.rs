//! Weight units.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Mass units understood by every importer and exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    G,
    Kg,
    Lb,
    Oz,
}

impl WeightUnit {
    pub const ALL: [WeightUnit; 4] = [WeightUnit::G, WeightUnit::Kg, WeightUnit::Lb, WeightUnit::Oz];

    pub fn as_str(self) -> &'static str {
        match self {
            WeightUnit::G => "g",
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
            WeightUnit::Oz => "oz",
        }
    }

    /// Exact number of grams in one of this unit.
    pub fn grams(self) -> Decimal {
        match self {
            WeightUnit::G => Decimal::ONE,
            WeightUnit::Kg => Decimal::new(1000, 0),
            // International avoirdupois pound.
            WeightUnit::Lb => Decimal::new(45_359_237, 5),
            WeightUnit::Oz => Decimal::new(28_349_523_125, 9),
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "g" | "gram" | "grams" => Ok(WeightUnit::G),
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Lb),
            "oz" | "ounce" | "ounces" => Ok(WeightUnit::Oz),
            _ => Err(ModelError::UnknownWeightUnit {
                value: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_synonyms() {
        assert_eq!("KG".parse::<WeightUnit>(), Ok(WeightUnit::Kg));
        assert_eq!("lbs".parse::<WeightUnit>(), Ok(WeightUnit::Lb));
        assert_eq!("ounces".parse::<WeightUnit>(), Ok(WeightUnit::Oz));
        assert!("stone".parse::<WeightUnit>().is_err());
    }

    #[test]
    fn gram_factors() {
        assert_eq!(WeightUnit::Lb.grams().to_string(), "453.59237");
        assert_eq!(WeightUnit::Oz.grams().to_string(), "28.349523125");
    }
}
