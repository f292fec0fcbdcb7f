//! Squarespace page JSON (`?format=json`) product items.

use std::collections::BTreeMap;

use catalog_model::text::{non_empty, ordered_unique};
use catalog_model::{
    Decimal, Inventory, Media, OptionDef, OptionValue, Platform, Price, Product, SourceRef,
    Taxonomy, Variant, Weight, WeightUnit,
};
use serde::{Deserialize, Serialize};

use super::scalar::{self, Scalar};
use super::{RawContext, seo_from};
use crate::detect::detect_url;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SquarespaceItem {
    pub id: Option<Scalar>,
    pub title: Option<String>,
    pub url_id: Option<String>,
    pub full_url: Option<String>,
    pub body: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub asset_url: Option<String>,
    /// Gallery assets.
    pub items: Vec<SquarespaceAsset>,
    pub structured_content: SquarespaceContent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SquarespaceAsset {
    pub asset_url: Option<String>,
    pub title: Option<String>,
    pub display_index: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SquarespaceContent {
    /// `PHYSICAL`, `DIGITAL`, `SERVICE`, or the numeric code (2 is digital).
    pub product_type: Option<Scalar>,
    pub is_digital: Option<Scalar>,
    pub variants: Vec<SquarespaceVariant>,
    pub variant_option_ordering: Vec<String>,
    pub price_money: Option<SquarespaceMoney>,
    pub brand: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SquarespaceMoney {
    pub value: Option<Scalar>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SquarespaceVariant {
    pub id: Option<Scalar>,
    pub sku: Option<String>,
    /// Cents.
    pub price: Option<Scalar>,
    pub price_money: Option<SquarespaceMoney>,
    /// Cents.
    pub sale_price: Option<Scalar>,
    pub sale_price_money: Option<SquarespaceMoney>,
    pub on_sale: Option<Scalar>,
    pub stock: Option<SquarespaceStock>,
    pub qty_in_stock: Option<Scalar>,
    pub unlimited: Option<Scalar>,
    /// Option name to value.
    pub attributes: BTreeMap<String, String>,
    pub option_values: Vec<SquarespaceOptionValue>,
    pub shipping_weight: Option<SquarespaceWeight>,
    pub main_image: Option<SquarespaceAsset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SquarespaceStock {
    pub quantity: Option<Scalar>,
    pub unlimited: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SquarespaceOptionValue {
    pub option_name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SquarespaceWeight {
    pub value: Option<Scalar>,
    pub unit: Option<String>,
}

impl SquarespaceMoney {
    fn amount(&self) -> Option<Decimal> {
        scalar::decimal(self.value.as_ref())
    }
}

/// `priceMoney` is a decimal amount; bare `price` fields are cents.
fn money(decimal: Option<&SquarespaceMoney>, cents: Option<&Scalar>) -> Option<(Decimal, Option<String>)> {
    if let Some(money) = decimal
        && let Some(amount) = money.amount()
    {
        return Some((amount, money.currency.clone()));
    }
    let mut amount = scalar::decimal(cents)?;
    amount.set_scale(amount.scale() + 2).ok()?;
    Some((amount.normalize(), None))
}

impl SquarespaceVariant {
    fn price(&self) -> Option<Price> {
        let (regular, currency) = money(self.price_money.as_ref(), self.price.as_ref())?;
        let on_sale = scalar::flag(self.on_sale.as_ref()).unwrap_or(false);
        let sale = money(self.sale_price_money.as_ref(), self.sale_price.as_ref())
            .map(|(amount, _)| amount)
            .filter(|sale| on_sale && *sale > Decimal::ZERO && *sale < regular);
        Some(match sale {
            Some(sale) => Price::new(sale, currency.as_deref()).with_compare_at(Some(regular)),
            None => Price::new(regular, currency.as_deref()),
        })
    }

    fn inventory(&self) -> Inventory {
        let stock = self.stock.clone().unwrap_or_default();
        let unlimited = scalar::flag(stock.unlimited.as_ref())
            .or_else(|| scalar::flag(self.unlimited.as_ref()))
            .unwrap_or(false);
        let quantity =
            scalar::int(stock.quantity.as_ref()).or_else(|| scalar::int(self.qty_in_stock.as_ref()));
        match quantity {
            Some(quantity) if !unlimited => Inventory::counted(quantity),
            _ => Inventory::untracked(Some(true)),
        }
    }

    fn option_values(&self, ordering: &[String]) -> Vec<OptionValue> {
        let mut values: Vec<OptionValue> = self
            .option_values
            .iter()
            .filter_map(|option| {
                Some(OptionValue {
                    name: option.option_name.as_deref().and_then(non_empty)?,
                    value: option.value.as_deref().and_then(non_empty)?,
                })
            })
            .collect();
        if values.is_empty() {
            values = self
                .attributes
                .iter()
                .filter_map(|(name, value)| {
                    Some(OptionValue {
                        name: non_empty(name)?,
                        value: non_empty(value)?,
                    })
                })
                .collect();
        }
        // Declared ordering first; attribute maps carry no order of their own.
        values.sort_by_key(|option| {
            ordering
                .iter()
                .position(|name| *name == option.name)
                .unwrap_or(usize::MAX)
        });
        values
    }

    fn weight(&self, fallback: Option<WeightUnit>) -> Option<Weight> {
        let weight = self.shipping_weight.as_ref()?;
        let value = scalar::decimal(weight.value.as_ref())?;
        let unit = weight
            .unit
            .as_deref()
            .and_then(|unit| unit.parse::<WeightUnit>().ok())
            .or(fallback)?;
        Some(Weight::new(value, unit))
    }
}

impl SquarespaceContent {
    fn is_digital(&self) -> bool {
        let by_type = match &self.product_type {
            Some(Scalar::Text(kind)) => kind.trim().eq_ignore_ascii_case("digital"),
            Some(other) => other.int() == Some(2),
            None => false,
        };
        by_type || scalar::flag(self.is_digital.as_ref()).unwrap_or(false)
    }
}

pub(crate) fn import(doc: &SquarespaceItem, context: &RawContext) -> Result<Product> {
    let title = context.require_title(doc.title.as_deref())?;
    let content = &doc.structured_content;
    let id = scalar::text(doc.id.as_ref());
    let slug = doc.url_id.as_deref().and_then(non_empty).or_else(|| {
        doc.full_url
            .as_deref()
            .and_then(|url| detect_url(url).slug)
    });
    let key = context.product_key([slug.as_deref(), Some(title.as_str()), id.as_deref()]);
    let fallback_unit = context.options().source_weight_unit;

    let variants: Vec<Variant> = content
        .variants
        .iter()
        .enumerate()
        .map(|(offset, raw)| {
            let variant_id = scalar::text(raw.id.as_ref());
            let sku = context.variant_sku(raw.sku.as_deref(), &key, variant_id.as_deref(), offset);
            let media = raw
                .main_image
                .as_ref()
                .and_then(|image| context.image_url(image.asset_url.as_deref()))
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
                title: None,
                option_values: raw.option_values(&content.variant_option_ordering),
                price: raw.price(),
                inventory: raw.inventory(),
                weight: raw.weight(fallback_unit),
                media,
                identifiers,
            }
        })
        .collect();

    let options: Vec<OptionDef> = content
        .variant_option_ordering
        .iter()
        .filter_map(|name| non_empty(name))
        .map(|name| OptionDef {
            values: ordered_unique(
                variants
                    .iter()
                    .filter_map(|variant| variant.option_value(&name)),
            ),
            name,
        })
        .collect();

    let mut assets: Vec<&SquarespaceAsset> = doc.items.iter().collect();
    assets.sort_by_key(|asset| scalar::int(asset.display_index.as_ref()).unwrap_or(0));
    let media: Vec<Media> = assets
        .into_iter()
        .filter_map(|asset| {
            let url = context.image_url(asset.asset_url.as_deref())?;
            Some(Media::image(url).with_alt(asset.title.as_deref().and_then(non_empty)))
        })
        .chain(
            context
                .image_url(doc.asset_url.as_deref())
                .map(Media::image),
        )
        .collect();

    let price = variants
        .first()
        .and_then(|variant| variant.price.clone())
        .or_else(|| {
            let (amount, currency) = money(content.price_money.as_ref(), None)?;
            Some(Price::new(amount, currency.as_deref()))
        });
    let description = doc
        .body
        .as_deref()
        .and_then(non_empty)
        .or_else(|| doc.excerpt.as_deref().and_then(non_empty));
    let is_digital = content.is_digital();
    let brand = content.brand.as_deref().and_then(non_empty);
    let mut identifiers = BTreeMap::new();
    identifiers.insert("source_product_id".to_string(), id.clone().unwrap_or_else(|| key.clone()));

    let product = Product {
        source: SourceRef {
            platform: Some(Platform::Squarespace),
            id,
            slug,
            url: doc.full_url.as_deref().and_then(non_empty),
        },
        seo: seo_from(&title, description.as_deref()),
        title,
        description,
        vendor: brand.clone(),
        brand,
        tags: doc.tags.clone(),
        taxonomy: doc
            .categories
            .iter()
            .find_map(|category| non_empty(category))
            .map(|category| Taxonomy::from_path(&category))
            .unwrap_or_default(),
        options,
        media,
        price,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ImportOptions;
    use crate::raw::{RawDocument, import_raw};

    const ITEM: &str = r#"{
        "item": {
            "id": "5f1",
            "title": "Linen Apron",
            "urlId": "linen-apron",
            "fullUrl": "/shop/p/linen-apron",
            "body": "<p>Washed linen.</p>",
            "categories": ["Kitchen"],
            "items": [
                {"assetUrl": "https://images.example.com/b.jpg", "displayIndex": 1},
                {"assetUrl": "https://images.example.com/a.jpg", "displayIndex": 0}
            ],
            "structuredContent": {
                "productType": 1,
                "variantOptionOrdering": ["Color"],
                "variants": [
                    {
                        "id": "v1",
                        "sku": "APR-NAT",
                        "priceMoney": {"currency": "USD", "value": "32.00"},
                        "salePriceMoney": {"currency": "USD", "value": "24.00"},
                        "onSale": true,
                        "stock": {"quantity": 4, "unlimited": false},
                        "attributes": {"Color": "Natural"},
                        "shippingWeight": {"value": 0.4, "unit": "KILOGRAM"}
                    },
                    {
                        "id": "v2",
                        "price": 3200,
                        "unlimited": true,
                        "attributes": {"Color": "Indigo"},
                        "shippingWeight": {"value": 0.4}
                    }
                ]
            }
        }
    }"#;

    fn imported(options: ImportOptions) -> Product {
        let doc = RawDocument::from_json(Platform::Squarespace, ITEM).unwrap();
        import_raw(&doc, &options).unwrap()
    }

    #[test]
    fn imports_variants_and_prices() {
        let product = imported(ImportOptions::default());
        assert_eq!(product.source.slug.as_deref(), Some("linen-apron"));
        assert_eq!(product.options[0].values, vec!["Natural", "Indigo"]);

        let first = &product.variants[0];
        let price = first.price.as_ref().unwrap();
        assert_eq!(price.current.amount.to_string(), "24");
        assert_eq!(price.compare_at.as_ref().unwrap().amount.to_string(), "32");
        assert_eq!(first.inventory.quantity, Some(4));

        let second = &product.variants[1];
        assert_eq!(second.sku.as_deref(), Some("SQ:linen-apron:v2"));
        assert_eq!(second.price.as_ref().unwrap().current.amount.to_string(), "32");
        assert!(!second.inventory.track_quantity);
    }

    #[test]
    fn gallery_order_and_weight_fallback() {
        let product = imported(ImportOptions::default().with_weight_unit(WeightUnit::Lb));
        assert_eq!(product.media[0].url, "https://images.example.com/a.jpg");
        assert!(product.media[0].is_primary);
        assert_eq!(product.variants[1].weight.unwrap().unit, WeightUnit::Lb);

        let without_unit = imported(ImportOptions::default());
        assert!(without_unit.variants[1].weight.is_none());
    }
}
