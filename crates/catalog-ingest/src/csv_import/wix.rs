//! Wix product CSV.
//!
//! Rows are grouped by `handle`. The `fieldType` column says what a row
//! holds: `PRODUCT` carries product fields and option definitions,
//! `VARIANT` one option combination, `MEDIA` extra images.

use std::collections::BTreeMap;

use catalog_model::text::{ordered_unique, parse_decimal, parse_int, split_tokens};
use catalog_model::{
    Inventory, OptionDef, Platform, Product, Seo, SourceRef, Variant, WeightUnit,
    media_from_urls,
};

use super::ParsedProduct;
use super::fields::{
    apply_product_extras, apply_variant_extras, option_values, options_title, price_cell,
    variant_identifiers, weight_cell,
};
use super::table::{CsvTable, Row};
use crate::error::{IngestError, Result};

const REQUIRED: &[&str] = &["handle", "fieldType", "name", "price", "sku"];

/// Wix allows up to six option axes.
const OPTION_SLOTS: usize = 6;

const KNOWN: &[&str] = &[
    "handle",
    "fieldType",
    "name",
    "description",
    "visible",
    "price",
    "sku",
    "inventory",
    "weight",
    "brand",
    "media",
    "productOptionName1",
    "productOptionType1",
    "productOptionChoices1",
    "productOptionName2",
    "productOptionType2",
    "productOptionChoices2",
    "productOptionName3",
    "productOptionType3",
    "productOptionChoices3",
    "productOptionName4",
    "productOptionType4",
    "productOptionChoices4",
    "productOptionName5",
    "productOptionType5",
    "productOptionChoices5",
    "productOptionName6",
    "productOptionType6",
    "productOptionChoices6",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    Product,
    Variant,
    Media,
    Other,
}

impl FieldType {
    fn of(row: Row<'_>) -> Self {
        match row.get("fieldType").to_ascii_uppercase().as_str() {
            "PRODUCT" => Self::Product,
            "VARIANT" => Self::Variant,
            "MEDIA" => Self::Media,
            _ => Self::Other,
        }
    }
}

pub(crate) fn parse(table: &CsvTable, unit: WeightUnit) -> Result<Vec<ParsedProduct>> {
    table.require(Platform::Wix, REQUIRED)?;
    let handles = ordered_unique(
        table
            .rows()
            .filter(|row| FieldType::of(*row) == FieldType::Product)
            .map(|row| row.get("handle")),
    );
    if handles.is_empty() {
        return Err(IngestError::NoProducts {
            platform: Platform::Wix,
            reason: "no PRODUCT row has a handle".to_string(),
        });
    }
    handles
        .iter()
        .map(|handle| {
            let rows: Vec<Row<'_>> = table
                .rows()
                .filter(|row| row.get("handle") == handle)
                .collect();
            parse_handle(handle, &rows, unit)
        })
        .collect()
}

fn parse_handle(handle: &str, rows: &[Row<'_>], unit: WeightUnit) -> Result<ParsedProduct> {
    let Some(first) = rows
        .iter()
        .copied()
        .find(|row| FieldType::of(*row) == FieldType::Product)
    else {
        return Err(IngestError::NoProducts {
            platform: Platform::Wix,
            reason: format!("handle '{handle}' has no PRODUCT row"),
        });
    };

    let options: Vec<OptionDef> = (1..=OPTION_SLOTS)
        .filter_map(|slot| {
            let name = first.text(&format!("productOptionName{slot}"))?;
            let values = split_tokens(first.get(&format!("productOptionChoices{slot}")), ';');
            Some(OptionDef { name, values })
        })
        .collect();

    let product_price = price_cell(first.get("price"));
    let variant_rows: Vec<Row<'_>> = rows
        .iter()
        .copied()
        .filter(|row| FieldType::of(*row) == FieldType::Variant)
        .collect();
    let variants: Vec<Variant> = if variant_rows.is_empty() {
        vec![parse_variant(first, 1, handle, &options, unit)]
    } else {
        variant_rows
            .iter()
            .enumerate()
            .map(|(offset, row)| parse_variant(*row, offset + 1, handle, &options, unit))
            .collect()
    };

    let media_cells = rows
        .iter()
        .filter(|row| matches!(FieldType::of(**row), FieldType::Product | FieldType::Media))
        .flat_map(|row| row.get("media").split(';'));

    let mut identifiers = BTreeMap::new();
    identifiers.insert("source_product_id".to_string(), handle.to_string());
    identifiers.insert("handle".to_string(), handle.to_string());

    let mut product = Product {
        source: SourceRef {
            platform: Some(Platform::Wix),
            id: Some(handle.to_string()),
            slug: Some(handle.to_string()),
            url: None,
        },
        title: first.get("name").to_string(),
        description: first.text("description"),
        seo: Seo {
            title: first.text("name"),
            description: None,
        },
        brand: first.text("brand"),
        price: product_price,
        weight: weight_cell(first.get("weight"), Some(unit)).or(variants[0].weight),
        track_quantity: variants.iter().any(|variant| variant.inventory.track_quantity),
        media: media_from_urls(media_cells, None),
        options,
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

/// Build a variant. On `VARIANT` rows the choice columns hold the single
/// value this variant takes; names fall back to the product's definitions.
/// A `PRODUCT` row standing in for its only variant takes the first choice.
fn parse_variant(
    row: Row<'_>,
    index: usize,
    handle: &str,
    options: &[OptionDef],
    unit: WeightUnit,
) -> Variant {
    let sku = row
        .text("sku")
        .unwrap_or_else(|| format!("{handle}:{index}"));
    let values = option_values((1..=OPTION_SLOTS).map(|slot| {
        let name = row
            .text(&format!("productOptionName{slot}"))
            .or_else(|| options.get(slot - 1).map(|option| option.name.clone()))
            .unwrap_or_default();
        let choice = split_tokens(row.get(&format!("productOptionChoices{slot}")), ';');
        (name, choice.into_iter().next().unwrap_or_default())
    }));
    let mut variant = Variant {
        id: Some(index.to_string()),
        title: options_title(&values),
        option_values: values,
        price: price_cell(row.get("price")),
        inventory: inventory(row.get("inventory")),
        weight: weight_cell(row.get("weight"), Some(unit)),
        media: media_from_urls(row.get("media").split(';'), Some(&sku)),
        identifiers: variant_identifiers(index, &sku),
        sku: Some(sku),
    };
    apply_variant_extras(&mut variant, row, KNOWN);
    variant
}

/// Wix writes either a count or an `IN_STOCK`/`OUT_OF_STOCK` flag.
fn inventory(value: &str) -> Inventory {
    if let Some(quantity) = parse_int(value) {
        return Inventory::counted(quantity);
    }
    match value.trim().to_ascii_uppercase().as_str() {
        "IN_STOCK" => Inventory::untracked(Some(true)),
        "OUT_OF_STOCK" => Inventory::untracked(Some(false)),
        _ => Inventory::untracked(None),
    }
}
