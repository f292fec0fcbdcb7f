//! AliExpress item-detail documents (`result` payload).

use std::collections::BTreeMap;
use std::sync::LazyLock;

use catalog_model::text::{non_empty, normalize_url, ordered_unique, parse_decimal};
use catalog_model::{
    Decimal, Inventory, Media, OptionDef, OptionValue, Platform, Price, Product, SourceRef,
    Taxonomy, Variant, Weight, WeightUnit,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::scalar::{self, Scalar};
use super::{RawContext, seo_from};
use crate::error::Result;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("Invalid number regex"));

/// Bare weights up to this value are taken as kilograms, above it as grams.
const BARE_KG_LIMIT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliExpressDocument {
    pub item: AliExpressItem,
    pub settings: AliExpressSettings,
    pub seller: AliExpressSeller,
    pub delivery: AliExpressDelivery,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliExpressSettings {
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AliExpressSeller {
    pub store_title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AliExpressDelivery {
    pub package_detail: Option<AliExpressPackage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliExpressPackage {
    pub weight: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AliExpressItem {
    pub item_id: Option<Scalar>,
    pub title: Option<String>,
    pub item_url: Option<String>,
    pub description: Option<AliExpressDescription>,
    pub images: Vec<String>,
    pub available: Option<Scalar>,
    pub sku: AliExpressSkuData,
    pub properties: AliExpressProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliExpressDescription {
    pub html: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AliExpressSkuData {
    pub def: AliExpressPrices,
    pub props: Vec<AliExpressProp>,
    pub base: Vec<AliExpressSku>,
    /// `pid:vid` to image URL.
    pub sku_images: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AliExpressPrices {
    /// Either one amount or a `low - high` range.
    pub price: Option<Scalar>,
    pub promotion_price: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliExpressProp {
    pub pid: Option<Scalar>,
    pub name: Option<String>,
    pub values: Vec<AliExpressPropValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliExpressPropValue {
    pub vid: Option<Scalar>,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AliExpressSku {
    pub sku_id: Option<Scalar>,
    /// `pid:vid` pairs joined by `;`.
    pub prop_map: Option<String>,
    pub price: Option<Scalar>,
    pub promotion_price: Option<Scalar>,
    pub quantity: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliExpressProperties {
    pub list: Vec<AliExpressProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliExpressProperty {
    pub name: Option<String>,
    pub value: Option<String>,
}

/// Low end of a `low - high` range.
fn range_low(value: Option<&Scalar>) -> Option<Decimal> {
    let text = scalar::text(value)?;
    parse_decimal(text.split(" - ").next()?)
}

impl AliExpressPrices {
    /// Promotion price first; the list price becomes compare-at when higher.
    fn price(&self, currency: Option<&str>) -> Option<Price> {
        let list = range_low(self.price.as_ref());
        let promotion = range_low(self.promotion_price.as_ref());
        match (promotion, list) {
            (Some(promotion), list) => Some(
                Price::new(promotion, currency)
                    .with_compare_at(list.filter(|list| *list > promotion)),
            ),
            (None, Some(list)) => Some(Price::new(list, currency)),
            (None, None) => None,
        }
    }
}

impl AliExpressProperties {
    fn get(&self, names: &[&str]) -> Option<String> {
        self.list.iter().find_map(|property| {
            let name = property.name.as_deref()?.trim().to_lowercase();
            names
                .contains(&name.as_str())
                .then(|| property.value.as_deref().and_then(non_empty))
                .flatten()
        })
    }
}

/// Weight text: `kg` means kilograms, a trailing `g` grams; a bare number up
/// to 50 is kilograms, anything larger grams.
pub(crate) fn parse_weight(text: &str) -> Option<Weight> {
    let value = parse_decimal(NUMBER.find(text)?.as_str())?;
    let lowered = text.trim().to_lowercase();
    let unit = if lowered.contains("kg") {
        WeightUnit::Kg
    } else if lowered.ends_with('g') || lowered.contains(" g") {
        WeightUnit::G
    } else if value > Decimal::ZERO && value <= BARE_KG_LIMIT {
        WeightUnit::Kg
    } else {
        WeightUnit::G
    };
    Some(Weight::new(value, unit))
}

pub(crate) fn import(doc: &AliExpressDocument, context: &RawContext) -> Result<Product> {
    let item = &doc.item;
    let title = context.require_title(item.title.as_deref())?;
    let item_id = scalar::text(item.item_id.as_ref());
    let key = context.product_key([item_id.as_deref(), Some(title.as_str())]);
    let currency = doc.settings.currency.as_deref();
    let price = item.sku.def.price(currency);

    // pid -> (option name, vid -> value)
    let mut props: BTreeMap<String, (String, BTreeMap<String, &AliExpressPropValue>)> =
        BTreeMap::new();
    let mut options = Vec::new();
    for prop in &item.sku.props {
        let Some(name) = prop.name.as_deref().and_then(non_empty) else {
            continue;
        };
        let values = ordered_unique(prop.values.iter().filter_map(|value| value.name.as_deref()));
        if values.is_empty() {
            continue;
        }
        options.push(OptionDef {
            name: name.clone(),
            values,
        });
        if let Some(pid) = scalar::text(prop.pid.as_ref()) {
            let by_vid = prop
                .values
                .iter()
                .filter_map(|value| Some((scalar::text(value.vid.as_ref())?, value)))
                .collect();
            props.insert(pid, (name, by_vid));
        }
    }

    let mut variant_images = Vec::new();
    let variants: Vec<Variant> = item
        .sku
        .base
        .iter()
        .enumerate()
        .map(|(offset, raw)| {
            let sku_id = scalar::text(raw.sku_id.as_ref());
            let sku = context.variant_sku(None, &key, sku_id.as_deref(), offset);
            let mut option_values = Vec::new();
            let mut image = None;
            for pair in raw.prop_map.as_deref().unwrap_or_default().split(';') {
                let Some((pid, vid)) = pair.split_once(':') else {
                    continue;
                };
                let Some((name, value)) = props
                    .get(pid.trim())
                    .and_then(|(name, by_vid)| Some((name, by_vid.get(vid.trim())?)))
                else {
                    continue;
                };
                if let Some(label) = value.name.as_deref().and_then(non_empty) {
                    option_values.push(OptionValue {
                        name: name.clone(),
                        value: label,
                    });
                }
                if image.is_none() {
                    image = item
                        .sku
                        .sku_images
                        .get(&format!("{}:{}", pid.trim(), vid.trim()))
                        .map(String::as_str)
                        .or(value.image.as_deref())
                        .and_then(|url| context.image_url(Some(url)));
                }
            }
            let variant_price = AliExpressPrices {
                price: raw.price.clone(),
                promotion_price: raw.promotion_price.clone(),
            }
            .price(currency)
            .or_else(|| price.clone());
            let quantity = scalar::int(raw.quantity.as_ref()).unwrap_or(0);
            let media = match image {
                Some(url) => {
                    variant_images.push(url.clone());
                    vec![Media::image(url).for_sku(&sku)]
                }
                None => Vec::new(),
            };
            let mut identifiers = BTreeMap::new();
            if let Some(id) = &sku_id {
                identifiers.insert("source_variant_id".to_string(), id.clone());
            }
            identifiers.insert("sku".to_string(), sku.clone());
            Variant {
                id: sku_id,
                sku: Some(sku),
                title: None,
                option_values,
                price: variant_price,
                inventory: Inventory::counted(quantity),
                weight: None,
                media,
                identifiers,
            }
        })
        .collect();

    let media: Vec<Media> = ordered_unique(
        item.images
            .iter()
            .filter_map(|url| context.image_url(Some(url)))
            .chain(variant_images),
    )
    .into_iter()
    .map(Media::image)
    .collect();

    let weight = item
        .properties
        .get(&["weight"])
        .and_then(|text| parse_weight(&text))
        .or_else(|| {
            let package = doc.delivery.package_detail.as_ref()?;
            parse_weight(&scalar::text(package.weight.as_ref())?)
        });
    let variants: Vec<Variant> = variants
        .into_iter()
        .map(|variant| Variant {
            weight: variant.weight.or(weight),
            ..variant
        })
        .collect();

    let description = item
        .description
        .as_ref()
        .and_then(|description| description.html.as_deref())
        .and_then(non_empty);
    let brand = item.properties.get(&["brand name", "brand"]);
    let category = item.properties.get(&["type"]);
    let mut identifiers = BTreeMap::new();
    identifiers.insert(
        "source_product_id".to_string(),
        item_id.clone().unwrap_or_else(|| key.clone()),
    );

    let product = Product {
        source: SourceRef {
            platform: Some(Platform::AliExpress),
            slug: Some(format!("aliexpress-{key}")),
            id: item_id,
            url: item.item_url.as_deref().and_then(normalize_url),
        },
        seo: seo_from(&title, description.as_deref()),
        title,
        description,
        vendor: doc.seller.store_title.as_deref().and_then(non_empty),
        brand,
        taxonomy: category
            .map(|category| Taxonomy::from_path(&category))
            .unwrap_or_default(),
        options,
        media,
        price,
        weight,
        requires_shipping: true,
        track_quantity: !variants.is_empty(),
        is_digital: false,
        variants,
        identifiers,
        ..Product::default()
    };
    context.finish(product, &key)
}
