//! Platform tags for sources and export targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Every platform the transcoder knows about, as a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Shopify,
    #[serde(rename = "bigcommerce")]
    BigCommerce,
    Wix,
    Squarespace,
    #[serde(rename = "woocommerce")]
    WooCommerce,
    Amazon,
    #[serde(rename = "aliexpress")]
    AliExpress,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Shopify,
        Platform::BigCommerce,
        Platform::Wix,
        Platform::Squarespace,
        Platform::WooCommerce,
        Platform::Amazon,
        Platform::AliExpress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Shopify => "shopify",
            Platform::BigCommerce => "bigcommerce",
            Platform::Wix => "wix",
            Platform::Squarespace => "squarespace",
            Platform::WooCommerce => "woocommerce",
            Platform::Amazon => "amazon",
            Platform::AliExpress => "aliexpress",
        }
    }

    /// Short uppercase token used when synthesizing SKUs.
    pub fn sku_token(self) -> &'static str {
        match self {
            Platform::Shopify => "SH",
            Platform::BigCommerce => "BC",
            Platform::Wix => "WX",
            Platform::Squarespace => "SQ",
            Platform::WooCommerce => "WC",
            Platform::Amazon => "AMZ",
            Platform::AliExpress => "AE",
        }
    }

    /// Returns the export target for this platform, if it is one.
    pub fn as_target(self) -> Option<TargetPlatform> {
        match self {
            Platform::Shopify => Some(TargetPlatform::Shopify),
            Platform::BigCommerce => Some(TargetPlatform::BigCommerce),
            Platform::Wix => Some(TargetPlatform::Wix),
            Platform::Squarespace => Some(TargetPlatform::Squarespace),
            Platform::WooCommerce => Some(TargetPlatform::WooCommerce),
            Platform::Amazon | Platform::AliExpress => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownPlatform {
                value: value.to_string(),
            })
    }
}

/// Storefront platforms that accept CSV bulk imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    Shopify,
    #[serde(rename = "bigcommerce")]
    BigCommerce,
    Wix,
    Squarespace,
    #[serde(rename = "woocommerce")]
    WooCommerce,
}

impl TargetPlatform {
    pub const ALL: [TargetPlatform; 5] = [
        TargetPlatform::Shopify,
        TargetPlatform::BigCommerce,
        TargetPlatform::Wix,
        TargetPlatform::Squarespace,
        TargetPlatform::WooCommerce,
    ];

    pub fn platform(self) -> Platform {
        match self {
            TargetPlatform::Shopify => Platform::Shopify,
            TargetPlatform::BigCommerce => Platform::BigCommerce,
            TargetPlatform::Wix => Platform::Wix,
            TargetPlatform::Squarespace => Platform::Squarespace,
            TargetPlatform::WooCommerce => Platform::WooCommerce,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.platform().as_str()
    }
}

impl From<TargetPlatform> for Platform {
    fn from(target: TargetPlatform) -> Self {
        target.platform()
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let platform: Platform = value.parse()?;
        platform.as_target().ok_or_else(|| ModelError::NotATarget {
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(" WooCommerce ".parse::<Platform>(), Ok(Platform::WooCommerce));
        assert_eq!("bigcommerce".parse::<Platform>(), Ok(Platform::BigCommerce));
    }

    #[test]
    fn rejects_unknown_tags() {
        assert!(matches!(
            "etsy".parse::<Platform>(),
            Err(ModelError::UnknownPlatform { .. })
        ));
    }

    #[test]
    fn marketplaces_are_not_targets() {
        assert!(matches!(
            "amazon".parse::<TargetPlatform>(),
            Err(ModelError::NotATarget { .. })
        ));
        assert_eq!("wix".parse::<TargetPlatform>(), Ok(TargetPlatform::Wix));
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&Platform::AliExpress).unwrap();
        assert_eq!(json, "\"aliexpress\"");
        let back: TargetPlatform = serde_json::from_str("\"woocommerce\"").unwrap();
        assert_eq!(back, TargetPlatform::WooCommerce);
    }
}
