//! Shopify product CSV.
//!
//! Rows are grouped by `Handle`. Only the first row of a group carries
//! product fields and option names; rows without `Variant SKU` are
//! image-only rows and contribute media.

use std::collections::BTreeMap;

use catalog_model::text::{
    non_empty, normalize_url, ordered_unique, parse_bool, parse_decimal, split_tokens, strip_html,
    truncate_chars,
};
use catalog_model::{
    Inventory, Platform, Product, Seo, SourceRef, Taxonomy, Variant, Weight, WeightUnit,
    media_from_urls,
};

use super::ParsedProduct;
use super::fields::{
    apply_product_extras, apply_variant_extras, inventory_cell, option_values, options_title,
    price_cell, variant_identifiers,
};
use super::table::{CsvTable, Row};
use crate::error::{IngestError, Result};

const REQUIRED: &[&str] = &["Handle", "Title", "Body (HTML)", "Variant SKU", "Variant Price"];

/// Columns read here; anything else is kept as an identifier.
const KNOWN: &[&str] = &[
    "Handle",
    "Title",
    "Body (HTML)",
    "Vendor",
    "Type",
    "Tags",
    "Published",
    "Status",
    "Option1 Name",
    "Option1 Value",
    "Option2 Name",
    "Option2 Value",
    "Option3 Name",
    "Option3 Value",
    "Variant SKU",
    "Variant Grams",
    "Variant Weight",
    "Variant Inventory Tracker",
    "Variant Inventory Qty",
    "Variant Inventory Policy",
    "Variant Fulfillment Service",
    "Variant Price",
    "Variant Compare At Price",
    "Variant Requires Shipping",
    "Variant Taxable",
    "Image Src",
    "Image Position",
    "Image Alt Text",
    "Variant Image",
    "Variant Weight Unit",
    "SEO Title",
    "SEO Description",
];

pub(crate) fn parse(table: &CsvTable) -> Result<Vec<ParsedProduct>> {
    table.require(Platform::Shopify, REQUIRED)?;
    let handles = ordered_unique(table.rows().map(|row| row.get("Handle")));
    if handles.is_empty() {
        return Err(IngestError::NoProducts {
            platform: Platform::Shopify,
            reason: "no row has a Handle".to_string(),
        });
    }
    handles
        .iter()
        .map(|handle| {
            let rows: Vec<Row<'_>> = table
                .rows()
                .filter(|row| row.get("Handle") == handle)
                .collect();
            parse_handle(handle, &rows)
        })
        .collect()
}

fn parse_handle(handle: &str, rows: &[Row<'_>]) -> Result<ParsedProduct> {
    let Some(first) = rows.first().copied() else {
        return Err(no_variants(handle));
    };

    // Shopify only writes option names on the first row of a handle.
    let option_names: Vec<String> = (1..=3)
        .map(|index| {
            let header = format!("Option{index} Name");
            rows.iter()
                .find_map(|row| row.text(&header))
                .unwrap_or_default()
        })
        .collect();

    let mut images: Vec<(String, Option<String>)> = Vec::new();
    let mut variants = Vec::new();
    for row in rows {
        if let Some(url) = normalize_url(row.get("Image Src"))
            && !images.iter().any(|(existing, _)| *existing == url)
        {
            images.push((url, row.text("Image Alt Text")));
        }

        let Some(sku) = row.text("Variant SKU") else {
            continue;
        };
        let index = variants.len() + 1;
        let options = option_values(option_names.iter().enumerate().map(|(slot, name)| {
            let value = row.get(&format!("Option{} Value", slot + 1));
            (name.clone(), value.to_string())
        }));
        let price = price_cell(row.get("Variant Price"))
            .map(|price| price.with_compare_at(parse_decimal(row.get("Variant Compare At Price"))));
        let mut variant = Variant {
            id: Some(index.to_string()),
            title: options_title(&options),
            option_values: options,
            price,
            inventory: inventory(*row),
            weight: weight(*row),
            media: media_from_urls([row.get("Variant Image")], Some(&sku)),
            identifiers: variant_identifiers(index, &sku),
            sku: Some(sku),
        };
        apply_variant_extras(&mut variant, *row, KNOWN);
        variants.push(variant);
    }
    if variants.is_empty() {
        return Err(no_variants(handle));
    }

    let body = non_empty(first.get("Body (HTML)"));
    let requires_shipping = parse_bool(first.get("Variant Requires Shipping")).unwrap_or(true);
    let mut media = media_from_urls(images.iter().map(|(url, _)| url.as_str()), None);
    let alts: BTreeMap<&str, &Option<String>> =
        images.iter().map(|(url, alt)| (url.as_str(), alt)).collect();
    for item in &mut media {
        item.alt = alts.get(item.url.as_str()).and_then(|alt| (*alt).clone());
    }

    let mut identifiers = BTreeMap::new();
    identifiers.insert("source_product_id".to_string(), handle.to_string());
    identifiers.insert("handle".to_string(), handle.to_string());

    let mut product = Product {
        source: SourceRef {
            platform: Some(Platform::Shopify),
            id: Some(handle.to_string()),
            slug: Some(handle.to_string()),
            url: None,
        },
        title: first.get("Title").to_string(),
        seo: Seo {
            title: first.text("SEO Title").or_else(|| first.text("Title")),
            description: first.text("SEO Description").or_else(|| {
                body.as_deref()
                    .map(|body| truncate_chars(&strip_html(body), 400))
                    .filter(|text| !text.is_empty())
            }),
        },
        description: body,
        vendor: first.text("Vendor"),
        brand: first.text("Vendor"),
        taxonomy: Taxonomy::from_path(first.get("Type")),
        tags: split_tokens(first.get("Tags"), ','),
        price: variants[0].price.clone(),
        weight: variants[0].weight,
        requires_shipping,
        is_digital: !requires_shipping,
        track_quantity: variants.iter().any(|variant| variant.inventory.track_quantity),
        media,
        variants,
        identifiers,
        ..Product::default()
    };
    apply_product_extras(&mut product, first, KNOWN);
    Ok(ParsedProduct {
        key: handle.to_string(),
        product,
    })
}

fn inventory(row: Row<'_>) -> Inventory {
    let mut inventory = inventory_cell(row.get("Variant Inventory Qty"));
    inventory.allow_backorder = match row.get("Variant Inventory Policy").to_ascii_lowercase().as_str() {
        "continue" => Some(true),
        "deny" => Some(false),
        _ => None,
    };
    inventory
}

/// `Variant Grams` is always grams. A non-standard `Variant Weight` column
/// is used instead when `Variant Weight Unit` names a known unit.
fn weight(row: Row<'_>) -> Option<Weight> {
    let explicit_unit = row.get("Variant Weight Unit").parse::<WeightUnit>().ok();
    if let Some(unit) = explicit_unit
        && let Some(value) = parse_decimal(row.get("Variant Weight"))
    {
        return Some(Weight::new(value, unit));
    }
    parse_decimal(row.get("Variant Grams")).map(|value| Weight::new(value, WeightUnit::G))
}

fn no_variants(handle: &str) -> IngestError {
    IngestError::NoProducts {
        platform: Platform::Shopify,
        reason: format!("handle '{handle}' has no rows with a Variant SKU"),
    }
}
