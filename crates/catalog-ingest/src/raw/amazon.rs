//! Amazon product-details documents (`data` payload of the product API).

use std::collections::BTreeMap;
use std::sync::LazyLock;

use catalog_model::text::{non_empty, ordered_unique, parse_decimal, split_tokens};
use catalog_model::{
    Inventory, Media, OptionDef, OptionValue, Platform, Price, Product, SourceRef, Taxonomy,
    Variant, Weight, WeightUnit,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::scalar::{self, Scalar};
use super::{RawContext, mentions_digital, seo_from};
use crate::error::Result;

static ITEM_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(kilograms?|kg|grams?|g|pounds?|lbs?|ounces?|oz)\b")
        .expect("Invalid item weight regex")
});

static STORE_BYLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Visit the (.+) Store$").expect("Invalid store byline regex")
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmazonProduct {
    pub asin: Option<String>,
    pub product_title: Option<String>,
    pub product_description: Option<String>,
    pub about_product: Vec<String>,
    pub product_price: Option<Scalar>,
    pub product_original_price: Option<Scalar>,
    pub currency: Option<String>,
    pub product_url: Option<String>,
    pub product_photo: Option<String>,
    pub product_photos: Vec<String>,
    pub product_availability: Option<String>,
    pub product_byline: Option<String>,
    pub product_details: BTreeMap<String, serde_json::Value>,
    pub product_information: BTreeMap<String, serde_json::Value>,
    pub category_path: Vec<AmazonCategory>,
    pub product_variations_dimensions: Vec<String>,
    /// Dimension name to the values offered on it.
    pub product_variations: BTreeMap<String, Vec<AmazonVariationValue>>,
    /// Variant ASIN to its dimension values.
    pub all_product_variations: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmazonCategory {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmazonVariationValue {
    pub asin: Option<String>,
    pub value: Option<String>,
    pub is_available: Option<bool>,
}

impl AmazonProduct {
    fn detail(&self, name: &str) -> Option<String> {
        self.product_details
            .get(name)
            .or_else(|| self.product_information.get(name))
            .and_then(serde_json::Value::as_str)
            .and_then(non_empty)
    }

    /// `Brand`, then `Manufacturer`, then the "Visit the X Store" byline.
    fn brand(&self) -> Option<String> {
        self.detail("Brand")
            .or_else(|| self.detail("Manufacturer"))
            .or_else(|| {
                let byline = self.product_byline.as_deref()?.trim();
                STORE_BYLINE
                    .captures(byline)
                    .and_then(|caps| caps.get(1))
                    .and_then(|name| non_empty(name.as_str()))
            })
    }

    fn weight(&self) -> Option<Weight> {
        let text = self.detail("Item Weight")?;
        let caps = ITEM_WEIGHT.captures(&text)?;
        let value = parse_decimal(caps.get(1)?.as_str())?;
        let unit = caps.get(2)?.as_str().parse::<WeightUnit>().ok()?;
        Some(Weight::new(value, unit))
    }

    fn in_stock(&self) -> bool {
        self.product_availability
            .as_deref()
            .is_some_and(|text| text.trim().eq_ignore_ascii_case("in stock"))
    }

    fn variation_available(&self, asin: &str) -> Option<bool> {
        self.product_variations
            .values()
            .flatten()
            .find(|value| value.asin.as_deref() == Some(asin))
            .and_then(|value| value.is_available)
    }

    fn description(&self) -> Option<String> {
        let bullets: Vec<String> = self
            .about_product
            .iter()
            .filter_map(|line| non_empty(line))
            .collect();
        if bullets.is_empty() {
            self.product_description.as_deref().and_then(non_empty)
        } else {
            Some(bullets.join("<br>"))
        }
    }
}

/// Dimension keys such as `size` or `color` become option names.
fn option_name(dimension: &str) -> String {
    let mut chars = dimension.trim().chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

pub(crate) fn import(doc: &AmazonProduct, context: &RawContext) -> Result<Product> {
    let title = context.require_title(doc.product_title.as_deref())?;
    let asin = doc.asin.as_deref().and_then(non_empty);
    let key = context.product_key([asin.as_deref(), Some(title.as_str())]);
    let price = scalar::decimal(doc.product_price.as_ref()).map(|amount| {
        Price::new(amount, doc.currency.as_deref())
            .with_compare_at(scalar::decimal(doc.product_original_price.as_ref()))
    });
    let in_stock = doc.in_stock();
    let weight = doc.weight();

    let options: Vec<OptionDef> = doc
        .product_variations_dimensions
        .iter()
        .filter_map(|dimension| {
            let values = ordered_unique(
                doc.product_variations
                    .get(dimension)?
                    .iter()
                    .filter(|value| value.is_available.unwrap_or(true))
                    .filter_map(|value| value.value.as_deref()),
            );
            (!values.is_empty()).then(|| OptionDef {
                name: option_name(dimension),
                values,
            })
        })
        .collect();

    let mut variants: Vec<Variant> = if doc.product_variations_dimensions.is_empty() {
        Vec::new()
    } else {
        doc.all_product_variations
            .iter()
            .map(|(variant_asin, dimensions)| {
                let option_values = doc
                    .product_variations_dimensions
                    .iter()
                    .filter_map(|dimension| {
                        Some(OptionValue {
                            name: option_name(dimension),
                            value: dimensions.get(dimension).and_then(|value| non_empty(value))?,
                        })
                    })
                    .collect();
                let available = if Some(variant_asin.as_str()) == asin.as_deref() {
                    in_stock
                } else {
                    doc.variation_available(variant_asin).unwrap_or(false)
                };
                let mut identifiers = BTreeMap::new();
                identifiers.insert("asin".to_string(), variant_asin.clone());
                Variant {
                    id: Some(variant_asin.clone()),
                    sku: Some(variant_asin.clone()),
                    option_values,
                    price: price.clone(),
                    inventory: Inventory::untracked(Some(available)),
                    weight,
                    identifiers,
                    ..Variant::default()
                }
            })
            .collect()
    };
    if variants.is_empty() {
        let sku = context.variant_sku(asin.as_deref(), &key, None, 0);
        variants.push(Variant {
            id: asin.clone(),
            sku: Some(sku),
            price: price.clone(),
            inventory: Inventory::untracked(Some(in_stock)),
            weight,
            ..Variant::default()
        });
    }

    let media: Vec<Media> = ordered_unique(
        doc.product_photo
            .iter()
            .chain(&doc.product_photos)
            .filter_map(|url| context.image_url(Some(url))),
    )
    .into_iter()
    .map(Media::image)
    .collect();

    let category = doc
        .category_path
        .iter()
        .filter_map(|category| category.name.as_deref().and_then(non_empty))
        .collect::<Vec<_>>();
    let mut tags = Vec::new();
    if let Some(features) = doc.detail("Special features") {
        tags.push(features);
    }
    if let Some(devices) = doc.detail("Compatible Devices") {
        tags.extend(split_tokens(&devices, ','));
    }
    let taxonomy = Taxonomy::from_path(&category.join(" > "));
    let is_digital = mentions_digital(taxonomy.leaf(), &tags);
    let description = doc.description();
    let brand = doc.brand();
    let mut identifiers = BTreeMap::new();
    if let Some(asin) = &asin {
        identifiers.insert("asin".to_string(), asin.clone());
    }
    identifiers.insert("source_product_id".to_string(), asin.clone().unwrap_or_else(|| key.clone()));

    let product = Product {
        source: SourceRef {
            platform: Some(Platform::Amazon),
            id: asin,
            slug: Some(key.clone()),
            url: doc.product_url.as_deref().and_then(non_empty),
        },
        seo: seo_from(&title, description.as_deref()),
        title,
        description,
        vendor: brand.clone(),
        brand,
        tags,
        taxonomy,
        options,
        media,
        price,
        weight,
        requires_shipping: !is_digital,
        track_quantity: false,
        is_digital,
        variants,
        identifiers,
        ..Product::default()
    };
    context.finish(product, &key)
}
