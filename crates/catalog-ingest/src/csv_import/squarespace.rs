//! Squarespace product CSV.
//!
//! A row with a non-empty `Title` starts a product; the rows after it up to
//! the next titled row are its variants.

use std::collections::BTreeMap;

use catalog_model::text::{non_empty, parse_bool, parse_decimal, parse_int, split_tokens};
use catalog_model::{
    Inventory, Platform, Price, Product, Seo, SourceRef, Taxonomy, Variant, WeightUnit,
    media_from_urls,
};

use super::ParsedProduct;
use super::fields::{
    apply_product_extras, apply_variant_extras, option_values, options_title, variant_identifiers,
    weight_cell,
};
use super::table::{CsvTable, Row};
use crate::error::{IngestError, Result};

const REQUIRED: &[&str] = &["Title", "SKU", "Price", "Product Type [Non Editable]", "Visible"];

const KNOWN: &[&str] = &[
    "Product ID [Non Editable]",
    "Variant ID [Non Editable]",
    "Product Type [Non Editable]",
    "Product Page",
    "Product URL",
    "Title",
    "Description",
    "SKU",
    "Option Name 1",
    "Option Value 1",
    "Option Name 2",
    "Option Value 2",
    "Option Name 3",
    "Option Value 3",
    "Price",
    "Sale Price",
    "On Sale",
    "Stock",
    "Categories",
    "Tags",
    "Weight",
    "Length",
    "Width",
    "Height",
    "Visible",
    "Hosted Image URLs",
];

pub(crate) fn parse(table: &CsvTable, unit: WeightUnit) -> Result<Vec<ParsedProduct>> {
    table.require(Platform::Squarespace, REQUIRED)?;
    let rows: Vec<Row<'_>> = table.rows().collect();
    let anchors: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.get("Title").is_empty())
        .map(|(index, _)| index)
        .collect();
    if anchors.is_empty() {
        return Err(IngestError::NoProducts {
            platform: Platform::Squarespace,
            reason: "no row has a Title".to_string(),
        });
    }

    anchors
        .iter()
        .enumerate()
        .map(|(slot, &start)| {
            let end = anchors.get(slot + 1).copied().unwrap_or(rows.len());
            parse_segment(&rows[start..end], unit)
        })
        .collect()
}

fn parse_segment(rows: &[Row<'_>], unit: WeightUnit) -> Result<ParsedProduct> {
    let first = rows[0];
    let title = first.get("Title");

    let mut variants = Vec::new();
    for row in rows {
        let Some(sku) = row.text("SKU") else {
            continue;
        };
        let index = variants.len() + 1;
        let options = option_values((1..=3).map(|slot| {
            (
                row.get(&format!("Option Name {slot}")).to_string(),
                row.get(&format!("Option Value {slot}")).to_string(),
            )
        }));
        let mut variant = Variant {
            id: Some(index.to_string()),
            title: options_title(&options),
            option_values: options,
            price: price(*row),
            inventory: stock(row.get("Stock")),
            weight: weight_cell(row.get("Weight"), Some(unit)),
            media: Vec::new(),
            identifiers: variant_identifiers(index, &sku),
            sku: Some(sku),
        };
        apply_variant_extras(&mut variant, *row, KNOWN);
        variants.push(variant);
    }
    if variants.is_empty() {
        return Err(IngestError::NoProducts {
            platform: Platform::Squarespace,
            reason: format!("product '{title}' has no rows with a SKU"),
        });
    }

    let product_url = non_empty(first.get("Product URL"));
    let slug = product_url.as_deref().and_then(|url| {
        url.trim_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    });
    let is_digital = first
        .get("Product Type [Non Editable]")
        .eq_ignore_ascii_case("digital");
    let key = slug
        .clone()
        .or_else(|| non_empty(title))
        .or_else(|| variants[0].sku.clone())
        .unwrap_or_default();
    let source_id = slug.clone().or_else(|| variants[0].sku.clone());

    let mut identifiers = BTreeMap::new();
    if let Some(id) = &source_id {
        identifiers.insert("source_product_id".to_string(), id.clone());
    }

    let mut product = Product {
        source: SourceRef {
            platform: Some(Platform::Squarespace),
            id: source_id,
            slug,
            url: product_url,
        },
        title: title.to_string(),
        description: first.text("Description"),
        seo: Seo {
            title: first.text("Title"),
            description: first.text("Description"),
        },
        tags: split_tokens(first.get("Tags"), ','),
        taxonomy: Taxonomy::from_path(first.get("Categories")),
        price: price(first).or_else(|| variants[0].price.clone()),
        weight: variants[0].weight,
        requires_shipping: !is_digital,
        track_quantity: variants.iter().any(|variant| variant.inventory.track_quantity),
        is_digital,
        media: media_from_urls(first.get("Hosted Image URLs").lines(), None),
        variants,
        identifiers,
        ..Product::default()
    };
    apply_product_extras(&mut product, first, KNOWN);
    Ok(ParsedProduct { key, product })
}

/// `Sale Price` wins while `On Sale` is set; `Price` then becomes the
/// compare-at amount.
fn price(row: Row<'_>) -> Option<Price> {
    let regular = parse_decimal(row.get("Price"));
    let sale = parse_decimal(row.get("Sale Price"));
    let on_sale = parse_bool(row.get("On Sale")).unwrap_or(false);
    match (regular, sale) {
        (Some(regular), Some(sale)) if on_sale => {
            Some(Price::new(sale, None).with_compare_at(Some(regular)))
        }
        (Some(regular), _) => Some(Price::new(regular, None)),
        (None, _) => None,
    }
}

fn stock(value: &str) -> Inventory {
    if value.trim().eq_ignore_ascii_case("unlimited") {
        return Inventory::untracked(Some(true));
    }
    match parse_int(value) {
        Some(quantity) => Inventory::counted(quantity),
        None => Inventory::untracked(None),
    }
}
