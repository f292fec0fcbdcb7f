//! Per-target cardinality limits.

use catalog_model::TargetPlatform;

/// Cardinality bounds a target's importer enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetLimits {
    pub max_options: usize,
    pub max_variants: usize,
}

impl TargetLimits {
    pub fn for_target(target: TargetPlatform) -> Self {
        match target {
            TargetPlatform::Shopify => Self {
                max_options: 3,
                max_variants: 100,
            },
            TargetPlatform::BigCommerce => Self {
                max_options: 3,
                max_variants: 600,
            },
            TargetPlatform::Wix => Self {
                max_options: 6,
                max_variants: 1000,
            },
            TargetPlatform::Squarespace | TargetPlatform::WooCommerce => Self {
                max_options: 3,
                max_variants: 100,
            },
        }
    }
}
