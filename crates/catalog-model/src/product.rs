//! Canonical product, variant and commerce value types.
//!
//! A [`Product`] is an immutable value snapshot. Stages that need a changed
//! product build a new one (see [`Product::normalized`] and the edit
//! commands in [`crate::edit`]) instead of mutating what they received.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::media::{Media, check_order, renumber};
use crate::platform::Platform;
use crate::text::ordered_unique;
use crate::unit::WeightUnit;

/// Amount plus ISO currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
}

impl Money {
    pub fn new(amount: Decimal, currency: Option<&str>) -> Self {
        Self {
            amount: amount.normalize(),
            currency: currency
                .map(|code| code.trim().to_ascii_uppercase())
                .filter(|code| !code.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub current: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at: Option<Money>,
}

impl Price {
    pub fn new(amount: Decimal, currency: Option<&str>) -> Self {
        Self {
            current: Money::new(amount, currency),
            compare_at: None,
        }
    }

    #[must_use]
    pub fn with_compare_at(mut self, amount: Option<Decimal>) -> Self {
        self.compare_at = amount.map(|value| Money::new(value, self.current.currency.as_deref()));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub track_quantity: bool,
    /// Units on hand; never negative once normalized.
    pub quantity: Option<i64>,
    pub available: Option<bool>,
    pub allow_backorder: Option<bool>,
}

impl Inventory {
    /// Inventory with a counted quantity; availability follows the count.
    pub fn counted(quantity: i64) -> Self {
        let quantity = quantity.max(0);
        Self {
            track_quantity: true,
            quantity: Some(quantity),
            available: Some(quantity > 0),
            allow_backorder: None,
        }
    }

    /// Inventory that is not counted, only flagged in or out of stock.
    pub fn untracked(available: Option<bool>) -> Self {
        Self {
            track_quantity: false,
            quantity: None,
            available,
            allow_backorder: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weight {
    pub value: Decimal,
    pub unit: WeightUnit,
}

impl Weight {
    pub fn new(value: Decimal, unit: WeightUnit) -> Self {
        Self {
            value: value.normalize(),
            unit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRef {
    pub platform: Option<Platform>,
    pub id: Option<String>,
    pub slug: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seo {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    /// Category labels from root to leaf.
    pub primary: Option<Vec<String>>,
}

impl Taxonomy {
    /// Parse a `>`-delimited category path such as `Apparel > Shirts`.
    pub fn from_path(path: &str) -> Self {
        let parts: Vec<String> = path
            .split('>')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        if parts.is_empty() {
            Self::default()
        } else {
            Self {
                primary: Some(parts),
            }
        }
    }

    /// Render the path with the given separator, empty when absent.
    pub fn joined(&self, separator: &str) -> String {
        self.primary
            .as_ref()
            .map(|parts| parts.join(separator))
            .unwrap_or_default()
    }

    pub fn leaf(&self) -> Option<&str> {
        self.primary
            .as_ref()
            .and_then(|parts| parts.last())
            .map(String::as_str)
    }
}

/// An option axis such as `Size` with its ordered values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDef {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// The value a variant takes on one option axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    pub name: String,
    pub value: String,
}

/// How a CSV import picked this product out of its file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvProvenance {
    pub source_platform: Platform,
    pub selection_policy: SelectionPolicy,
    pub detected_product_count: usize,
    pub selected_product_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    FirstProduct,
    BatchAll,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variant {
    pub id: Option<String>,
    pub sku: Option<String>,
    pub title: Option<String>,
    pub option_values: Vec<OptionValue>,
    pub price: Option<Price>,
    pub inventory: Inventory,
    pub weight: Option<Weight>,
    pub media: Vec<Media>,
    pub identifiers: BTreeMap<String, String>,
}

impl Variant {
    /// Value for the named option axis, if this variant sets one.
    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.option_values
            .iter()
            .find(|option| option.name == name)
            .map(|option| option.value.as_str())
    }

    /// Title derived from option values, e.g. `Red / Large`.
    pub fn options_title(&self) -> Option<String> {
        let values: Vec<&str> = self
            .option_values
            .iter()
            .map(|option| option.value.as_str())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join(" / "))
        }
    }

    pub fn sku_str(&self) -> Option<&str> {
        self.sku.as_deref().map(str::trim).filter(|sku| !sku.is_empty())
    }
}

/// Root canonical entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub source: SourceRef,
    pub title: String,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub brand: Option<String>,
    pub tags: Vec<String>,
    pub seo: Seo,
    pub taxonomy: Taxonomy,
    pub options: Vec<OptionDef>,
    pub media: Vec<Media>,
    pub variants: Vec<Variant>,
    pub price: Option<Price>,
    pub weight: Option<Weight>,
    pub requires_shipping: bool,
    pub track_quantity: bool,
    pub is_digital: bool,
    pub identifiers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<CsvProvenance>,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            source: SourceRef::default(),
            title: String::new(),
            description: None,
            vendor: None,
            brand: None,
            tags: Vec::new(),
            seo: Seo::default(),
            taxonomy: Taxonomy::default(),
            options: Vec::new(),
            media: Vec::new(),
            variants: Vec::new(),
            price: None,
            weight: None,
            requires_shipping: true,
            track_quantity: false,
            is_digital: false,
            identifiers: BTreeMap::new(),
            provenance: None,
        }
    }
}

impl Product {
    /// Return a copy with every structural invariant re-established.
    ///
    /// Tags are de-duplicated in insertion order, media lists are renumbered
    /// from 1 with a single primary, quantities are clamped at zero,
    /// currencies upper-cased and option definitions merged with the values
    /// variants actually use.
    #[must_use]
    pub fn normalized(&self) -> Product {
        let mut product = self.clone();
        product.title = product.title.trim().to_string();
        product.tags = ordered_unique(&product.tags);
        if let Some(parts) = product.taxonomy.primary.take() {
            let cleaned = ordered_unique(parts);
            product.taxonomy.primary = if cleaned.is_empty() { None } else { Some(cleaned) };
        }
        dedupe_media(&mut product.media);
        renumber(&mut product.media);
        if let Some(price) = product.price.as_mut() {
            normalize_price(price);
        }
        for variant in &mut product.variants {
            if let Some(quantity) = variant.inventory.quantity {
                variant.inventory.quantity = Some(quantity.max(0));
            }
            if let Some(price) = variant.price.as_mut() {
                normalize_price(price);
            }
            variant.sku = variant.sku_str().map(str::to_string);
            dedupe_media(&mut variant.media);
            renumber(&mut variant.media);
        }
        product.options = merge_option_defs(&product.options, &product.variants);
        product
    }

    /// Check the invariants every importer output must satisfy.
    pub fn check_structure(&self) -> Result<()> {
        if self.variants.is_empty() {
            return Err(ModelError::NoVariants);
        }
        check_order("product", &self.media)?;
        for (index, variant) in self.variants.iter().enumerate() {
            if let Some(quantity) = variant.inventory.quantity
                && quantity < 0
            {
                return Err(ModelError::NegativeQuantity { index, quantity });
            }
            check_order(&format!("variant {index}"), &variant.media)?;
        }
        Ok(())
    }

    /// Decode a canonical JSON document.
    pub fn from_json(text: &str) -> Result<Product> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode as pretty canonical JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Variant price, falling back to the product-level price.
    pub fn effective_price<'a>(&'a self, variant: Option<&'a Variant>) -> Option<&'a Price> {
        variant
            .and_then(|variant| variant.price.as_ref())
            .or(self.price.as_ref())
    }

    /// Variant weight, falling back to the product-level weight.
    pub fn effective_weight(&self, variant: Option<&Variant>) -> Option<Weight> {
        variant.and_then(|variant| variant.weight).or(self.weight)
    }

    /// Option axis names: product definitions first, then names only seen on
    /// variants, capped at `limit`.
    pub fn option_names(&self, limit: usize) -> Vec<String> {
        let mut names = ordered_unique(self.options.iter().map(|option| option.name.as_str()));
        for variant in &self.variants {
            for option in &variant.option_values {
                if names.len() >= limit {
                    break;
                }
                if !names.iter().any(|name| name == option.name.trim()) {
                    names.extend(ordered_unique([option.name.as_str()]));
                }
            }
        }
        names.truncate(limit);
        names
    }

    /// Values for one option axis: declared values then values used by
    /// variants, de-duplicated.
    pub fn option_values_for(&self, name: &str) -> Vec<String> {
        let declared = self
            .options
            .iter()
            .filter(|option| option.name == name)
            .flat_map(|option| option.values.iter().map(String::as_str));
        let used = self
            .variants
            .iter()
            .filter_map(|variant| variant.option_value(name));
        ordered_unique(declared.chain(used))
    }

    /// Image URLs: product media first, then variant media, de-duplicated.
    pub fn all_image_urls(&self) -> Vec<String> {
        let product_urls = self
            .media
            .iter()
            .filter(|media| media.is_image())
            .map(|media| media.url.as_str());
        let variant_urls = self
            .variants
            .iter()
            .flat_map(|variant| variant.media.iter())
            .filter(|media| media.is_image())
            .map(|media| media.url.as_str());
        ordered_unique(product_urls.chain(variant_urls))
    }

    /// Product-level image URLs only.
    pub fn product_image_urls(&self) -> Vec<String> {
        ordered_unique(
            self.media
                .iter()
                .filter(|media| media.is_image())
                .map(|media| media.url.as_str()),
        )
    }

    /// First image scoped to `variant`, either in its own media or in
    /// product media tagged with its SKU.
    pub fn variant_image_url<'a>(&'a self, variant: &'a Variant) -> Option<&'a str> {
        if let Some(media) = variant.media.iter().find(|media| media.is_image()) {
            return Some(media.url.as_str());
        }
        let sku = variant.sku_str()?;
        self.media
            .iter()
            .find(|media| media.is_image() && media.variant_skus.contains(sku))
            .map(|media| media.url.as_str())
    }

    /// Stable key for this product: source id, then slug, then title.
    pub fn product_key(&self) -> String {
        let candidates = [
            self.source.id.as_deref(),
            self.source.slug.as_deref(),
            Some(self.title.as_str()),
        ];
        candidates
            .into_iter()
            .flatten()
            .map(crate::text::slugify)
            .find(|key| !key.is_empty())
            .unwrap_or_else(|| "item".to_string())
    }

    /// Every distinct weight unit used by the product or its variants.
    pub fn weight_units(&self) -> BTreeSet<WeightUnit> {
        self.variants
            .iter()
            .filter_map(|variant| variant.weight)
            .chain(self.weight)
            .map(|weight| weight.unit)
            .collect()
    }
}

fn normalize_price(price: &mut Price) {
    price.current = Money::new(price.current.amount, price.current.currency.as_deref());
    if let Some(compare_at) = price.compare_at.as_mut() {
        *compare_at = Money::new(compare_at.amount, compare_at.currency.as_deref());
    }
}

fn dedupe_media(media: &mut Vec<Media>) {
    let mut seen: Vec<String> = Vec::new();
    media.retain(|item| {
        if seen.contains(&item.url) {
            false
        } else {
            seen.push(item.url.clone());
            true
        }
    });
}

/// Merge declared option definitions with the values variants use.
pub fn merge_option_defs(declared: &[OptionDef], variants: &[Variant]) -> Vec<OptionDef> {
    let mut merged: Vec<OptionDef> = Vec::new();
    let declared_pairs = declared.iter().flat_map(|option| {
        option
            .values
            .iter()
            .map(move |value| (option.name.as_str(), Some(value.as_str())))
            .chain(std::iter::once((option.name.as_str(), None)))
    });
    let used_pairs = variants.iter().flat_map(|variant| {
        variant
            .option_values
            .iter()
            .map(|option| (option.name.as_str(), Some(option.value.as_str())))
    });
    for (name, value) in declared_pairs.chain(used_pairs) {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let index = match merged.iter().position(|option| option.name == name) {
            Some(index) => index,
            None => {
                merged.push(OptionDef {
                    name: name.to_string(),
                    values: Vec::new(),
                });
                merged.len() - 1
            }
        };
        if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
            let values = &mut merged[index].values;
            if !values.iter().any(|existing| existing == value) {
                values.push(value.to_string());
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::media_from_urls;

    fn sample() -> Product {
        Product {
            title: " Widget ".to_string(),
            tags: vec!["b".into(), "a".into(), "b".into()],
            media: media_from_urls(["https://x.test/1.jpg", "https://x.test/2.jpg"], None),
            variants: vec![Variant {
                sku: Some("W-1".into()),
                inventory: Inventory {
                    quantity: Some(-3),
                    ..Inventory::default()
                },
                option_values: vec![OptionValue {
                    name: "Size".into(),
                    value: "L".into(),
                }],
                ..Variant::default()
            }],
            ..Product::default()
        }
    }

    #[test]
    fn normalized_restores_invariants() {
        let mut raw = sample();
        raw.media.swap(0, 1);
        assert!(raw.check_structure().is_err());
        let product = raw.normalized();
        assert_eq!(product.title, "Widget");
        assert_eq!(product.tags, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(product.variants[0].inventory.quantity, Some(0));
        assert_eq!(product.media[0].url, "https://x.test/2.jpg");
        assert!(product.media[0].is_primary);
        assert_eq!(product.options[0].values, vec!["L".to_string()]);
        assert!(product.check_structure().is_ok());
    }

    #[test]
    fn normalized_does_not_touch_input() {
        let raw = sample();
        let _ = raw.normalized();
        assert_eq!(raw.variants[0].inventory.quantity, Some(-3));
    }

    #[test]
    fn structure_requires_variants() {
        let product = Product {
            title: "Empty".into(),
            ..Product::default()
        };
        assert_eq!(product.check_structure(), Err(ModelError::NoVariants));
    }

    #[test]
    fn variant_without_sku_or_price_is_valid() {
        let product = Product {
            title: "Loose".into(),
            variants: vec![Variant::default()],
            ..Product::default()
        };
        assert!(product.check_structure().is_ok());
    }

    #[test]
    fn taxonomy_path_parsing() {
        let taxonomy = Taxonomy::from_path("Apparel > > Shirts ");
        assert_eq!(
            taxonomy.primary,
            Some(vec!["Apparel".to_string(), "Shirts".to_string()])
        );
        assert_eq!(taxonomy.joined(" > "), "Apparel > Shirts");
        assert_eq!(Taxonomy::from_path(" ").primary, None);
    }

    #[test]
    fn weight_serializes_value_as_string() {
        let weight = Weight::new(Decimal::new(250, 2), WeightUnit::Kg);
        let json = serde_json::to_value(weight).unwrap();
        assert_eq!(json, serde_json::json!({"value": "2.5", "unit": "kg"}));
    }

    #[test]
    fn option_names_merge_variant_axes() {
        let mut product = sample();
        product.options = vec![OptionDef {
            name: "Color".into(),
            values: vec!["Red".into()],
        }];
        assert_eq!(
            product.option_names(3),
            vec!["Color".to_string(), "Size".to_string()]
        );
        assert_eq!(product.option_values_for("Size"), vec!["L".to_string()]);
    }

    #[test]
    fn product_key_prefers_source_id() {
        let mut product = sample();
        product.source.slug = Some("Blue Widget".into());
        assert_eq!(product.product_key(), "blue-widget");
        product.source.id = Some("123".into());
        assert_eq!(product.product_key(), "123");
    }
}
