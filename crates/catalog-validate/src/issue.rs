//! Validation finding types.
//!
//! The Finding enum provides type-safe finding creation where each variant
//! carries only its needed data. Rule code, field path, severity and
//! message are all derived from the variant.

use catalog_model::WeightUnit;
use serde::{Deserialize, Serialize};

/// Finding severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks export
    Fatal,
    /// Reported but does not block export
    Advisory,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fatal" | "error" => Some(Self::Fatal),
            "advisory" | "warning" => Some(Self::Advisory),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fatal => "Fatal",
            Self::Advisory => "Advisory",
        }
    }
}

/// Group a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Presence,
    Structure,
    Unit,
    Limit,
    Consistency,
}

impl Category {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Presence => "Presence",
            Self::Structure => "Structure",
            Self::Unit => "Unit",
            Self::Limit => "Limit",
            Self::Consistency => "Consistency",
        }
    }
}

/// Validation finding - each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Finding {
    // Presence checks
    /// Product title is empty
    MissingTitle,
    /// Product has no variants
    MissingVariants,
    /// Variant has no price and the product has no fallback price
    MissingPrice { variant: usize },
    /// Variant has no SKU
    MissingSku { variant: usize },
    /// SEO description is empty
    MissingSeoDescription,
    /// Neither the product nor any variant has media
    MissingMedia,

    // Structure checks
    /// Media positions or primary flag break the ordering invariant
    MediaOrder {
        scope: String,
        index: usize,
        reason: String,
    },
    /// Quantity below zero on a value that skipped normalization
    NegativeQuantity { variant: usize, quantity: i64 },
    /// Variant of a multi-variant product cannot be matched by SKU or options
    UnresolvableSku { variant: usize },

    // Unit checks
    /// Weight unit the target does not accept
    UnitNotAllowed {
        path: String,
        unit: WeightUnit,
        allowed: String,
    },

    // Limit checks
    /// More option axes than the target supports
    TooManyOptions { count: usize, max: usize },
    /// More variants than the target supports
    TooManyVariants { count: usize, max: usize },
    /// Product images that have no row to sit on
    ImageOverflow { images: usize, rows: usize },

    // Consistency checks
    /// Variants priced in more than one currency
    CurrencyMixed { currencies: Vec<String> },
}

impl Finding {
    /// Stable rule code.
    pub fn rule_code(&self) -> &'static str {
        match self {
            Finding::MissingTitle => "missing_title",
            Finding::MissingVariants => "missing_variants",
            Finding::MissingPrice { .. } => "missing_price",
            Finding::MissingSku { .. } => "missing_sku",
            Finding::MissingSeoDescription => "missing_seo_description",
            Finding::MissingMedia => "missing_media",
            Finding::MediaOrder { .. } => "media_order",
            Finding::NegativeQuantity { .. } => "negative_quantity",
            Finding::UnresolvableSku { .. } => "unresolvable_sku",
            Finding::UnitNotAllowed { .. } => "unit_not_allowed",
            Finding::TooManyOptions { .. } => "too_many_options",
            Finding::TooManyVariants { .. } => "too_many_variants",
            Finding::ImageOverflow { .. } => "image_overflow",
            Finding::CurrencyMixed { .. } => "currency_mixed",
        }
    }

    /// Path of the offending field within the canonical product.
    pub fn field_path(&self) -> String {
        match self {
            Finding::MissingTitle => "title".to_string(),
            Finding::MissingVariants
            | Finding::TooManyVariants { .. }
            | Finding::CurrencyMixed { .. } => "variants".to_string(),
            Finding::MissingPrice { variant } => format!("variants[{variant}].price"),
            Finding::MissingSku { variant } | Finding::UnresolvableSku { variant } => {
                format!("variants[{variant}].sku")
            }
            Finding::MissingSeoDescription => "seo.description".to_string(),
            Finding::MissingMedia | Finding::ImageOverflow { .. } => "media".to_string(),
            Finding::MediaOrder { scope, index, .. } => {
                if scope == "product" {
                    format!("media[{index}]")
                } else {
                    let variant = scope.trim_start_matches("variant ");
                    format!("variants[{variant}].media[{index}]")
                }
            }
            Finding::NegativeQuantity { variant, .. } => {
                format!("variants[{variant}].inventory.quantity")
            }
            Finding::UnitNotAllowed { path, .. } => path.clone(),
            Finding::TooManyOptions { .. } => "options".to_string(),
        }
    }

    /// Category for this finding.
    pub fn category(&self) -> Category {
        match self {
            Finding::MissingTitle
            | Finding::MissingVariants
            | Finding::MissingPrice { .. }
            | Finding::MissingSku { .. }
            | Finding::MissingSeoDescription
            | Finding::MissingMedia => Category::Presence,
            Finding::MediaOrder { .. }
            | Finding::NegativeQuantity { .. }
            | Finding::UnresolvableSku { .. } => Category::Structure,
            Finding::UnitNotAllowed { .. } => Category::Unit,
            Finding::TooManyOptions { .. }
            | Finding::TooManyVariants { .. }
            | Finding::ImageOverflow { .. } => Category::Limit,
            Finding::CurrencyMixed { .. } => Category::Consistency,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Finding::MissingPrice { .. }
            | Finding::MissingSku { .. }
            | Finding::MissingSeoDescription
            | Finding::MissingMedia
            | Finding::ImageOverflow { .. }
            | Finding::CurrencyMixed { .. } => Severity::Advisory,
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Human-readable reason.
    pub fn message(&self) -> String {
        match self {
            Finding::MissingTitle => "Product title is empty".to_string(),
            Finding::MissingVariants => "Product has no variants".to_string(),
            Finding::MissingPrice { variant } => {
                format!("Variant {} has no price and the product has none", variant + 1)
            }
            Finding::MissingSku { variant } => format!("Variant {} has no SKU", variant + 1),
            Finding::MissingSeoDescription => "SEO description is empty".to_string(),
            Finding::MissingMedia => "Product has no images".to_string(),
            Finding::MediaOrder {
                scope,
                index,
                reason,
            } => format!("Media {} in {scope} is out of order: {reason}", index + 1),
            Finding::NegativeQuantity { variant, quantity } => {
                format!("Variant {} has negative quantity {quantity}", variant + 1)
            }
            Finding::UnresolvableSku { variant } => format!(
                "Variant {} has neither a SKU nor option values to match on",
                variant + 1
            ),
            Finding::UnitNotAllowed {
                path,
                unit,
                allowed,
            } => format!("Weight unit '{unit}' at {path} is not accepted (allowed: {allowed})"),
            Finding::TooManyOptions { count, max } => {
                format!("Product defines {count} options; at most {max} are supported")
            }
            Finding::TooManyVariants { count, max } => {
                format!("Product has {count} variants; at most {max} are supported")
            }
            Finding::ImageOverflow { images, rows } => format!(
                "{images} product images but only {rows} rows; {} will be dropped",
                images.saturating_sub(*rows)
            ),
            Finding::CurrencyMixed { currencies } => {
                format!("Variants use more than one currency: {}", currencies.join(", "))
            }
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.rule_code(), self.field_path(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse(" FATAL "), Some(Severity::Fatal));
        assert_eq!(Severity::parse("warning"), Some(Severity::Advisory));
        assert_eq!(Severity::parse("info"), None);
    }

    #[test]
    fn test_field_paths() {
        assert_eq!(Finding::MissingPrice { variant: 2 }.field_path(), "variants[2].price");
        let media = Finding::MediaOrder {
            scope: "variant 1".to_string(),
            index: 0,
            reason: "first entry must be primary".to_string(),
        };
        assert_eq!(media.field_path(), "variants[1].media[0]");
    }

    #[test]
    fn test_default_severities() {
        assert!(Finding::MissingTitle.is_fatal());
        assert!(!Finding::MissingMedia.is_fatal());
        assert_eq!(
            Finding::ImageOverflow { images: 5, rows: 2 }.severity(),
            Severity::Advisory
        );
    }

    #[test]
    fn test_display() {
        let finding = Finding::TooManyOptions { count: 4, max: 3 };
        assert_eq!(
            finding.to_string(),
            "[too_many_options] options: Product defines 4 options; at most 3 are supported"
        );
    }
}
