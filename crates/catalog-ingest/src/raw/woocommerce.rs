//! WooCommerce Store API product documents
//! (`/wp-json/wc/store/v1/products/<id>`).

use std::collections::BTreeMap;

use catalog_model::text::{non_empty, ordered_unique};
use catalog_model::{
    Decimal, Inventory, Media, OptionDef, OptionValue, Platform, Price, Product, SourceRef,
    Taxonomy, Variant,
};
use serde::{Deserialize, Serialize};

use super::scalar::{self, Scalar};
use super::{RawContext, seo_from};
use crate::detect::detect_url;
use crate::error::Result;

/// Store API prices default to two minor digits.
const DEFAULT_MINOR_UNIT: u32 = 2;
const MAX_MINOR_UNIT: u32 = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WooProduct {
    pub id: Option<Scalar>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub permalink: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub sku: Option<String>,
    pub prices: Option<WooPrices>,
    pub is_in_stock: Option<Scalar>,
    pub stock_quantity: Option<Scalar>,
    pub manage_stock: Option<Scalar>,
    pub is_on_backorder: Option<Scalar>,
    pub is_downloadable: Option<Scalar>,
    pub is_virtual: Option<Scalar>,
    pub images: Vec<WooImage>,
    pub attributes: Vec<WooAttribute>,
    pub variations: Vec<WooVariation>,
    pub categories: Vec<WooTerm>,
    pub tags: Vec<WooTerm>,
    pub brands: Vec<WooTerm>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WooPrices {
    pub price: Option<Scalar>,
    pub regular_price: Option<Scalar>,
    pub sale_price: Option<Scalar>,
    pub currency_code: Option<String>,
    pub currency_minor_unit: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WooImage {
    pub src: Option<String>,
    pub thumbnail: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WooAttribute {
    pub name: Option<String>,
    pub terms: Vec<WooTerm>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WooTerm {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WooVariation {
    pub id: Option<Scalar>,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub prices: Option<WooPrices>,
    pub attributes: Vec<WooVariationAttribute>,
    pub is_in_stock: Option<Scalar>,
    pub stock_quantity: Option<Scalar>,
    pub manage_stock: Option<Scalar>,
    pub is_on_backorder: Option<Scalar>,
    pub image: Option<WooImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WooVariationAttribute {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl WooTerm {
    fn label(&self) -> Option<String> {
        self.name
            .as_deref()
            .and_then(non_empty)
            .or_else(|| self.slug.as_deref().and_then(non_empty))
    }
}

fn labels(terms: &[WooTerm]) -> Vec<String> {
    ordered_unique(terms.iter().filter_map(WooTerm::label))
}

impl WooPrices {
    fn minor_unit(&self) -> u32 {
        scalar::int(self.currency_minor_unit.as_ref())
            .and_then(|value| u32::try_from(value).ok())
            .map_or(DEFAULT_MINOR_UNIT, |value| value.min(MAX_MINOR_UNIT))
    }

    /// Integer amounts are in minor units; anything with a decimal point is
    /// already a major-unit amount.
    fn amount(&self, value: Option<&Scalar>) -> Option<Decimal> {
        let value = value?;
        let amount = value.decimal()?;
        if value.is_integral() {
            let mut scaled = amount;
            scaled.set_scale(self.minor_unit()).ok()?;
            Some(scaled.normalize())
        } else {
            Some(amount)
        }
    }

    /// Current price, falling back to regular then sale; the regular price
    /// becomes compare-at when it differs.
    fn price(&self) -> Option<Price> {
        let regular = self.amount(self.regular_price.as_ref());
        let current = self
            .amount(self.price.as_ref())
            .or(regular)
            .or_else(|| self.amount(self.sale_price.as_ref()))?;
        let compare_at = regular.filter(|regular| *regular != current);
        Some(Price::new(current, self.currency_code.as_deref()).with_compare_at(compare_at))
    }
}

pub(crate) fn import(doc: &WooProduct, context: &RawContext) -> Result<Product> {
    let title = context.require_title(doc.name.as_deref())?;
    let id = scalar::text(doc.id.as_ref());
    let key = context.product_key([id.as_deref(), doc.slug.as_deref(), Some(title.as_str())]);
    let price = doc.prices.as_ref().and_then(WooPrices::price);
    let track_quantity = scalar::flag(doc.manage_stock.as_ref()).unwrap_or(true);
    let allow_backorder = scalar::flag(doc.is_on_backorder.as_ref());
    let available = scalar::flag(doc.is_in_stock.as_ref());

    let options: Vec<OptionDef> = doc
        .attributes
        .iter()
        .filter_map(|attribute| {
            Some(OptionDef {
                name: attribute.name.as_deref().and_then(non_empty)?,
                values: labels(&attribute.terms),
            })
        })
        .collect();

    let mut variants: Vec<Variant> = doc
        .variations
        .iter()
        .enumerate()
        .map(|(offset, raw)| {
            let variant_id = scalar::text(raw.id.as_ref());
            let sku = context.variant_sku(raw.sku.as_deref(), &key, variant_id.as_deref(), offset);
            let option_values = raw
                .attributes
                .iter()
                .filter_map(|attribute| {
                    Some(OptionValue {
                        name: attribute.name.as_deref().and_then(non_empty)?,
                        value: attribute.value.as_deref().and_then(non_empty)?,
                    })
                })
                .collect();
            let tracked = scalar::flag(raw.manage_stock.as_ref()).unwrap_or(track_quantity);
            let mut inventory = match scalar::int(raw.stock_quantity.as_ref()) {
                Some(quantity) if tracked => Inventory::counted(quantity),
                _ => Inventory::untracked(None),
            };
            inventory.track_quantity = tracked;
            inventory.available = scalar::flag(raw.is_in_stock.as_ref()).or(available);
            inventory.allow_backorder = scalar::flag(raw.is_on_backorder.as_ref()).or(allow_backorder);
            let media = raw
                .image
                .as_ref()
                .and_then(|image| context.image_url(image.src.as_deref()))
                .map(|url| vec![Media::image(url).for_sku(&sku)])
                .unwrap_or_default();
            let mut identifiers = BTreeMap::new();
            if let Some(id) = &variant_id {
                identifiers.insert("source_variant_id".to_string(), id.clone());
            }
            identifiers.insert("sku".to_string(), sku.clone());
            Variant {
                id: variant_id,
                sku: Some(sku),
                title: raw.name.as_deref().and_then(non_empty),
                option_values,
                price: raw
                    .prices
                    .as_ref()
                    .and_then(WooPrices::price)
                    .or_else(|| price.clone()),
                inventory,
                weight: None,
                media,
                identifiers,
            }
        })
        .collect();

    if variants.is_empty() {
        // Simple products are their own variant.
        let mut inventory = match scalar::int(doc.stock_quantity.as_ref()) {
            Some(quantity) if track_quantity => Inventory::counted(quantity),
            _ => Inventory::untracked(None),
        };
        inventory.track_quantity = track_quantity;
        inventory.available = available;
        inventory.allow_backorder = allow_backorder;
        let sku = context.variant_sku(doc.sku.as_deref(), &key, id.as_deref(), 0);
        let mut identifiers = BTreeMap::new();
        identifiers.insert("sku".to_string(), sku.clone());
        variants.push(Variant {
            id: id.clone(),
            sku: Some(sku),
            price: price.clone(),
            inventory,
            identifiers,
            ..Variant::default()
        });
    }

    let media: Vec<Media> = doc
        .images
        .iter()
        .filter_map(|image| {
            let url = context
                .image_url(image.src.as_deref())
                .or_else(|| context.image_url(image.thumbnail.as_deref()))?;
            Some(Media::image(url).with_alt(image.alt.as_deref().and_then(non_empty)))
        })
        .collect();

    let slug = doc.slug.as_deref().and_then(non_empty).or_else(|| {
        doc.permalink
            .as_deref()
            .and_then(|permalink| detect_url(permalink).slug)
    });
    let description = doc
        .description
        .as_deref()
        .and_then(non_empty)
        .or_else(|| doc.short_description.as_deref().and_then(non_empty));
    let categories = labels(&doc.categories);
    let brand = labels(&doc.brands).into_iter().next();
    let is_digital = scalar::flag(doc.is_downloadable.as_ref()).unwrap_or(false)
        || scalar::flag(doc.is_virtual.as_ref()).unwrap_or(false);

    let mut identifiers = BTreeMap::new();
    identifiers.insert("source_product_id".to_string(), id.clone().unwrap_or_else(|| key.clone()));
    if let Some(sku) = doc.sku.as_deref().and_then(non_empty) {
        identifiers.insert("sku".to_string(), sku);
    }

    let product = Product {
        source: SourceRef {
            platform: Some(Platform::WooCommerce),
            id,
            slug,
            url: doc.permalink.as_deref().and_then(non_empty),
        },
        seo: seo_from(&title, description.as_deref()),
        title,
        description,
        vendor: brand.clone(),
        brand,
        tags: labels(&doc.tags),
        taxonomy: categories
            .first()
            .map(|category| Taxonomy::from_path(category))
            .unwrap_or_default(),
        options,
        media,
        price,
        requires_shipping: !is_digital,
        track_quantity,
        is_digital,
        variants,
        identifiers,
        ..Product::default()
    };
    context.finish(product, &key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(json: &str) -> WooPrices {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn minor_units_are_divided() {
        let price = prices(
            r#"{"price": "1999", "regular_price": "2499", "currency_code": "usd", "currency_minor_unit": 2}"#,
        )
        .price()
        .unwrap();
        assert_eq!(price.current.amount.to_string(), "19.99");
        assert_eq!(price.compare_at.unwrap().amount.to_string(), "24.99");

        let yen = prices(r#"{"price": 500, "currency_minor_unit": 0}"#).price().unwrap();
        assert_eq!(yen.current.amount.to_string(), "500");
    }

    #[test]
    fn decimal_amounts_are_major_units() {
        let price = prices(r#"{"price": "19.99"}"#).price().unwrap();
        assert_eq!(price.current.amount.to_string(), "19.99");
        assert!(price.compare_at.is_none());
    }
}
