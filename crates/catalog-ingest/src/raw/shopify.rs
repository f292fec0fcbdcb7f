//! Shopify `products/<handle>.json` documents.

use std::collections::BTreeMap;

use catalog_model::text::{non_empty, split_tokens};
use catalog_model::{
    Inventory, Media, OptionDef, OptionValue, Platform, Price, Product, SourceRef, Taxonomy,
    Variant, Weight, WeightUnit,
};
use serde::{Deserialize, Serialize};

use super::scalar::{self, Scalar};
use super::{RawContext, mentions_digital, seo_from};
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopifyProduct {
    pub id: Option<Scalar>,
    pub title: Option<String>,
    pub handle: Option<String>,
    pub body_html: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    /// Comma-separated.
    pub tags: Option<String>,
    pub options: Vec<ShopifyOption>,
    pub variants: Vec<ShopifyVariant>,
    pub images: Vec<ShopifyImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopifyOption {
    pub name: Option<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopifyVariant {
    pub id: Option<Scalar>,
    pub title: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Scalar>,
    pub compare_at_price: Option<Scalar>,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub available: Option<bool>,
    pub inventory_quantity: Option<Scalar>,
    pub inventory_management: Option<String>,
    pub inventory_policy: Option<String>,
    pub grams: Option<Scalar>,
    pub weight: Option<Scalar>,
    pub weight_unit: Option<String>,
    pub requires_shipping: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopifyImage {
    pub id: Option<Scalar>,
    pub src: Option<String>,
    pub alt: Option<String>,
    pub position: Option<Scalar>,
    pub variant_ids: Vec<Scalar>,
}

impl ShopifyVariant {
    fn option_slots(&self) -> [Option<&String>; 3] {
        [self.option1.as_ref(), self.option2.as_ref(), self.option3.as_ref()]
    }

    fn weight(&self) -> Option<Weight> {
        let explicit = self
            .weight_unit
            .as_deref()
            .and_then(|unit| unit.parse::<WeightUnit>().ok())
            .zip(scalar::decimal(self.weight.as_ref()));
        if let Some((unit, value)) = explicit {
            return Some(Weight::new(value, unit));
        }
        scalar::decimal(self.grams.as_ref()).map(|value| Weight::new(value, WeightUnit::G))
    }

    fn inventory(&self) -> Inventory {
        let tracked = self.inventory_management.as_deref() == Some("shopify");
        let mut inventory = match scalar::int(self.inventory_quantity.as_ref()) {
            Some(quantity) if tracked => Inventory::counted(quantity),
            _ => Inventory::untracked(self.available),
        };
        if self.available.is_some() {
            inventory.available = self.available;
        }
        inventory.allow_backorder = self
            .inventory_policy
            .as_deref()
            .map(|policy| policy.eq_ignore_ascii_case("continue"));
        inventory
    }
}

pub(crate) fn import(doc: &ShopifyProduct, context: &RawContext) -> Result<Product> {
    let title = context.require_title(doc.title.as_deref())?;
    let handle = doc.handle.as_deref().and_then(non_empty);
    let id = scalar::text(doc.id.as_ref());
    let key = context.product_key([id.as_deref(), handle.as_deref(), Some(title.as_str())]);

    let option_names: Vec<String> = doc
        .options
        .iter()
        .map(|option| option.name.clone().unwrap_or_default())
        .collect();
    let options: Vec<OptionDef> = doc
        .options
        .iter()
        .filter_map(|option| {
            Some(OptionDef {
                name: option.name.as_deref().and_then(non_empty)?,
                values: option.values.clone(),
            })
        })
        .collect();

    let variants: Vec<Variant> = doc
        .variants
        .iter()
        .enumerate()
        .map(|(offset, raw)| {
            let variant_id = scalar::text(raw.id.as_ref());
            let sku = context.variant_sku(raw.sku.as_deref(), &key, variant_id.as_deref(), offset);
            let option_values = raw
                .option_slots()
                .into_iter()
                .zip(&option_names)
                .filter_map(|(value, name)| {
                    let value = value.and_then(|value| non_empty(value))?;
                    // Single-variant products report `Default Title`.
                    (value != "Default Title" && !name.is_empty()).then(|| OptionValue {
                        name: name.clone(),
                        value,
                    })
                })
                .collect();
            let mut identifiers = BTreeMap::new();
            if let Some(id) = &variant_id {
                identifiers.insert("source_variant_id".to_string(), id.clone());
            }
            identifiers.insert("sku".to_string(), sku.clone());
            Variant {
                id: variant_id,
                sku: Some(sku),
                title: raw
                    .title
                    .as_deref()
                    .and_then(non_empty)
                    .filter(|title| title != "Default Title"),
                option_values,
                price: scalar::decimal(raw.price.as_ref()).map(|amount| {
                    Price::new(amount, None)
                        .with_compare_at(scalar::decimal(raw.compare_at_price.as_ref()))
                }),
                inventory: raw.inventory(),
                weight: raw.weight(),
                media: Vec::new(),
                identifiers,
            }
        })
        .collect();

    // Image `variant_ids` point at variants; media scope uses their SKUs.
    let sku_by_id: BTreeMap<String, String> = variants
        .iter()
        .filter_map(|variant| Some((variant.id.clone()?, variant.sku.clone()?)))
        .collect();
    let mut images: Vec<&ShopifyImage> = doc.images.iter().collect();
    images.sort_by_key(|image| scalar::int(image.position.as_ref()).unwrap_or(i64::MAX));
    let media: Vec<Media> = images
        .into_iter()
        .filter_map(|image| {
            let url = context.image_url(image.src.as_deref())?;
            let mut media = Media::image(url).with_alt(image.alt.as_deref().and_then(non_empty));
            for id in image.variant_ids.iter().filter_map(Scalar::text) {
                if let Some(sku) = sku_by_id.get(&id) {
                    media = media.for_sku(sku);
                }
            }
            Some(media)
        })
        .collect();

    let tags = split_tokens(doc.tags.as_deref().unwrap_or_default(), ',');
    let is_digital = mentions_digital(doc.product_type.as_deref(), &tags);
    let description = doc.body_html.as_deref().and_then(non_empty);
    let mut identifiers = BTreeMap::new();
    identifiers.insert("source_product_id".to_string(), id.clone().unwrap_or_else(|| key.clone()));
    if let Some(handle) = &handle {
        identifiers.insert("handle".to_string(), handle.clone());
    }

    let product = Product {
        source: SourceRef {
            platform: Some(Platform::Shopify),
            id,
            slug: handle,
            url: None,
        },
        seo: seo_from(&title, description.as_deref()),
        title,
        description,
        vendor: doc.vendor.as_deref().and_then(non_empty),
        brand: doc.vendor.as_deref().and_then(non_empty),
        taxonomy: Taxonomy::from_path(doc.product_type.as_deref().unwrap_or_default()),
        tags,
        options,
        media,
        price: variants.first().and_then(|variant| variant.price.clone()),
        weight: variants.first().and_then(|variant| variant.weight),
        requires_shipping: !is_digital,
        track_quantity: variants.iter().any(|variant| variant.inventory.track_quantity),
        is_digital,
        variants,
        identifiers,
        ..Product::default()
    };
    context.finish(product, &key)
}
