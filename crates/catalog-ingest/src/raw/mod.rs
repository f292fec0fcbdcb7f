//! URL-mode importers for typed raw documents.
//!
//! Fetching and HTML scraping happen elsewhere; what arrives here is the
//! platform's product JSON, decoded into one typed struct per platform and
//! tagged by [`RawDocument`].

mod aliexpress;
mod amazon;
pub mod scalar;
mod shopify;
mod squarespace;
mod woocommerce;

use catalog_model::text::{normalize_url, slugify, strip_html, truncate_chars};
use catalog_model::{Inventory, OptionValue, Platform, Product, Seo, Variant};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::options::ImportOptions;

pub use self::aliexpress::{AliExpressDocument, AliExpressItem};
pub use self::amazon::AmazonProduct;
pub use self::scalar::Scalar;
pub use self::shopify::{ShopifyImage, ShopifyOption, ShopifyProduct, ShopifyVariant};
pub use self::squarespace::{SquarespaceItem, SquarespaceVariant};
pub use self::woocommerce::{WooPrices, WooProduct, WooVariation};

/// SEO descriptions are cut to this many characters.
pub const SEO_DESCRIPTION_LIMIT: usize = 400;

/// A platform product document, as returned by that platform's API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "platform", content = "document", rename_all = "lowercase")]
pub enum RawDocument {
    Shopify(ShopifyProduct),
    #[serde(rename = "woocommerce")]
    WooCommerce(WooProduct),
    Squarespace(SquarespaceItem),
    Amazon(AmazonProduct),
    #[serde(rename = "aliexpress")]
    AliExpress(AliExpressDocument),
}

impl RawDocument {
    pub fn platform(&self) -> Platform {
        match self {
            Self::Shopify(_) => Platform::Shopify,
            Self::WooCommerce(_) => Platform::WooCommerce,
            Self::Squarespace(_) => Platform::Squarespace,
            Self::Amazon(_) => Platform::Amazon,
            Self::AliExpress(_) => Platform::AliExpress,
        }
    }

    /// Decode a platform payload.
    ///
    /// Common response envelopes are unwrapped first: Shopify's `product`,
    /// Squarespace's `item`, Amazon's `data` and AliExpress's `result`.
    pub fn from_json(platform: Platform, text: &str) -> Result<Self> {
        let json_error = |err: serde_json::Error| IngestError::Json {
            platform,
            message: err.to_string(),
        };
        let value: serde_json::Value = serde_json::from_str(text).map_err(json_error)?;
        let envelope = match platform {
            Platform::Shopify => Some("product"),
            Platform::Squarespace => Some("item"),
            Platform::Amazon => Some("data"),
            Platform::AliExpress => Some("result"),
            Platform::WooCommerce | Platform::BigCommerce | Platform::Wix => None,
        };
        let value = match envelope {
            Some(key) if value.get(key).is_some_and(serde_json::Value::is_object) => {
                value.get(key).cloned().unwrap_or_default()
            }
            _ => value,
        };
        if !value.is_object() {
            return Err(IngestError::Json {
                platform,
                message: "expected a JSON object".to_string(),
            });
        }
        let document = match platform {
            Platform::Shopify => Self::Shopify(serde_json::from_value(value).map_err(json_error)?),
            Platform::WooCommerce => {
                Self::WooCommerce(serde_json::from_value(value).map_err(json_error)?)
            }
            Platform::Squarespace => {
                Self::Squarespace(serde_json::from_value(value).map_err(json_error)?)
            }
            Platform::Amazon => Self::Amazon(serde_json::from_value(value).map_err(json_error)?),
            Platform::AliExpress => {
                Self::AliExpress(serde_json::from_value(value).map_err(json_error)?)
            }
            Platform::BigCommerce | Platform::Wix => {
                return Err(IngestError::UnsupportedRawSource { platform });
            }
        };
        Ok(document)
    }
}

/// Normalize a raw document into a canonical product.
#[tracing::instrument(skip_all, fields(platform = %doc.platform()))]
pub fn import_raw(doc: &RawDocument, options: &ImportOptions) -> Result<Product> {
    let context = RawContext {
        platform: doc.platform(),
        options,
    };
    match doc {
        RawDocument::Shopify(doc) => shopify::import(doc, &context),
        RawDocument::WooCommerce(doc) => woocommerce::import(doc, &context),
        RawDocument::Squarespace(doc) => squarespace::import(doc, &context),
        RawDocument::Amazon(doc) => amazon::import(doc, &context),
        RawDocument::AliExpress(doc) => aliexpress::import(doc, &context),
    }
}

/// Decode and import in one step, checking the document's platform.
pub fn import_raw_json(platform: Platform, text: &str, options: &ImportOptions) -> Result<Product> {
    let doc = RawDocument::from_json(platform, text)?;
    if doc.platform() != platform {
        return Err(IngestError::DocumentMismatch {
            expected: platform,
            actual: doc.platform(),
        });
    }
    import_raw(&doc, options)
}

/// Rules every raw importer shares.
pub(crate) struct RawContext<'a> {
    platform: Platform,
    options: &'a ImportOptions,
}

impl RawContext<'_> {
    pub(crate) fn options(&self) -> &ImportOptions {
        self.options
    }

    pub(crate) fn require_title(&self, title: Option<&str>) -> Result<String> {
        title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string)
            .ok_or(IngestError::MissingField {
                platform: self.platform,
                field: "title",
            })
    }

    /// First candidate that slugifies to something non-empty.
    pub(crate) fn product_key<const N: usize>(&self, candidates: [Option<&str>; N]) -> String {
        candidates
            .into_iter()
            .flatten()
            .map(slugify)
            .find(|key| !key.is_empty())
            .unwrap_or_else(|| "item".to_string())
    }

    /// The variant's own SKU, or `<TOKEN>:<product key>:<variant key>`.
    pub(crate) fn variant_sku(
        &self,
        sku: Option<&str>,
        product_key: &str,
        variant_id: Option<&str>,
        offset: usize,
    ) -> String {
        if let Some(sku) = sku.map(str::trim).filter(|sku| !sku.is_empty()) {
            return sku.to_string();
        }
        let variant_key = variant_id
            .map(slugify)
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| (offset + 1).to_string());
        format!("{}:{product_key}:{variant_key}", self.platform.sku_token())
    }

    pub(crate) fn image_url(&self, raw: Option<&str>) -> Option<String> {
        raw.and_then(normalize_url)
    }

    /// Apply the shared finishing rules and the structural check.
    ///
    /// 1. An empty variant list gets one default variant carrying the
    ///    product-level price.
    /// 2. In a multi-variant product, variants without option values get an
    ///    `Option` value so they stay distinguishable.
    pub(crate) fn finish(&self, mut product: Product, key: &str) -> Result<Product> {
        if product.variants.is_empty() {
            product.variants.push(Variant {
                id: product.source.id.clone(),
                sku: Some(self.variant_sku(None, key, None, 0)),
                price: product.price.clone(),
                inventory: Inventory::untracked(Some(true)),
                weight: product.weight,
                ..Variant::default()
            });
        }
        if product.variants.len() > 1 {
            for (index, variant) in product.variants.iter_mut().enumerate() {
                if variant.option_values.is_empty() {
                    let value = variant
                        .title
                        .clone()
                        .or_else(|| variant.sku.clone())
                        .or_else(|| variant.id.clone())
                        .unwrap_or_else(|| format!("Variant {}", index + 1));
                    variant.option_values.push(OptionValue {
                        name: "Option".to_string(),
                        value,
                    });
                }
            }
        }
        let product = product.normalized();
        product.check_structure()?;
        debug!(
            key,
            variants = product.variants.len(),
            media = product.media.len(),
            "imported raw document"
        );
        Ok(product)
    }
}

/// Digital when the category or any tag mentions it.
pub(crate) fn mentions_digital(category: Option<&str>, tags: &[String]) -> bool {
    category
        .into_iter()
        .chain(tags.iter().map(String::as_str))
        .any(|text| text.to_lowercase().contains("digital"))
}

/// SEO block: the title, and the description with markup removed and cut
/// to [`SEO_DESCRIPTION_LIMIT`] characters.
pub(crate) fn seo_from(title: &str, description: Option<&str>) -> Seo {
    let description = description
        .map(|text| truncate_chars(&strip_html(text), SEO_DESCRIPTION_LIMIT).trim().to_string())
        .filter(|text| !text.is_empty());
    Seo {
        title: Some(title.to_string()),
        description,
    }
}
