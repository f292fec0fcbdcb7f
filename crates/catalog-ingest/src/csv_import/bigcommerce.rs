//! BigCommerce product CSV, modern and legacy layouts.
//!
//! The modern layout is row-typed by `Item`: a `Product` row is followed by
//! its `Variant` and `Image` rows. The legacy layout has one row per
//! product.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use catalog_model::text::{non_empty, parse_decimal, parse_int, slugify, split_tokens};
use catalog_model::{
    Decimal, Inventory, OptionDef, OptionValue, Platform, Price, Product, Seo, SourceRef, Taxonomy,
    Variant, WeightUnit, media_from_urls,
};
use regex::Regex;

use super::ParsedProduct;
use super::fields::{
    apply_product_extras, apply_variant_extras, options_title, variant_identifiers, weight_cell,
};
use super::table::{CsvTable, Row};
use crate::detect::CsvLayout;
use crate::error::{IngestError, Result};

const MODERN_REQUIRED: &[&str] = &["Item", "Name", "Type", "SKU", "Price"];
const LEGACY_REQUIRED: &[&str] = &["Product Type", "Code", "Name", "Calculated Price"];

const MODERN_KNOWN: &[&str] = &[
    "Item",
    "ID",
    "Name",
    "Type",
    "SKU",
    "Options",
    "Inventory Tracking",
    "Current Stock",
    "Price",
    "Sale Price",
    "Weight",
    "Product Visible?",
    "Brand",
    "Categories",
    "Description",
    "Page Title",
    "Meta Description",
    "Search Keywords",
    "Product URL",
    "Image URL (Import)",
];

const LEGACY_KNOWN: &[&str] = &[
    "Product Type",
    "Code",
    "Name",
    "Brand",
    "Description",
    "Calculated Price",
    "Sale Price",
    "Weight",
    "Stock Level",
    "Track Inventory",
    "Product Visible",
    "Category Details",
    "Images",
    "Page Title",
    "META Keywords",
    "META Description",
    "Product URL",
];

/// `|Name=<name>|Value=<values>` at the end of one `Type=` token.
static OPTION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|Name=([^|]+)\|Value=([^|]+)$").expect("Invalid BigCommerce option regex")
});

const LEGACY_IMAGE_PREFIX: &str = "Product Image URL:";

pub(crate) fn parse(
    table: &CsvTable,
    layout: CsvLayout,
    unit: WeightUnit,
) -> Result<Vec<ParsedProduct>> {
    match layout {
        CsvLayout::BigCommerceLegacy => parse_legacy(table, unit),
        CsvLayout::BigCommerceModern | CsvLayout::Standard => parse_modern(table, unit),
    }
}

// === Modern layout ===

fn item(row: Row<'_>) -> String {
    row.get("Item").to_ascii_lowercase()
}

fn parse_modern(table: &CsvTable, unit: WeightUnit) -> Result<Vec<ParsedProduct>> {
    table.require(Platform::BigCommerce, MODERN_REQUIRED)?;
    let mut groups: Vec<Vec<Row<'_>>> = Vec::new();
    for row in table.rows() {
        match item(row).as_str() {
            "product" => groups.push(vec![row]),
            "variant" | "image" | "sku" | "rule" => {
                if let Some(group) = groups.last_mut() {
                    group.push(row);
                }
            }
            _ => {}
        }
    }
    if groups.is_empty() {
        return Err(IngestError::NoProducts {
            platform: Platform::BigCommerce,
            reason: "no row has Item=Product".to_string(),
        });
    }
    Ok(groups
        .iter()
        .map(|rows| parse_modern_product(rows, unit))
        .collect())
}

fn parse_modern_product(rows: &[Row<'_>], unit: WeightUnit) -> ParsedProduct {
    let first = rows[0];
    let declared = parse_options(first.get("Options"));
    let variant_rows: Vec<Row<'_>> = rows
        .iter()
        .copied()
        .filter(|row| matches!(item(*row).as_str(), "variant" | "sku"))
        .collect();
    let tracking = first.get("Inventory Tracking").to_ascii_lowercase();

    let variants: Vec<Variant> = if variant_rows.is_empty() {
        vec![modern_variant(first, 1, &[], tracking != "none", unit)]
    } else {
        variant_rows
            .iter()
            .enumerate()
            .map(|(offset, row)| modern_variant(*row, offset + 1, &declared, true, unit))
            .collect()
    };

    let image_cells = rows.iter().flat_map(|row| {
        let cell = row.get("Image URL (Import)");
        if item(*row) == "product" || item(*row) == "image" {
            cell.split('|').collect::<Vec<_>>()
        } else {
            Vec::new()
        }
    });

    let url = non_empty(first.get("Product URL"));
    let slug = url.as_deref().and_then(url_slug);
    let key = first
        .text("ID")
        .or_else(|| first.text("SKU"))
        .or_else(|| non_empty(&slugify(first.get("Name"))))
        .unwrap_or_else(|| "bigcommerce-product".to_string());
    let is_digital = first.get("Type").eq_ignore_ascii_case("digital");

    let mut product = Product {
        source: SourceRef {
            platform: Some(Platform::BigCommerce),
            id: Some(key.clone()),
            slug,
            url,
        },
        title: first.get("Name").to_string(),
        description: first.text("Description"),
        brand: first.text("Brand"),
        seo: Seo {
            title: first.text("Page Title"),
            description: first.text("Meta Description"),
        },
        tags: split_tokens(first.get("Search Keywords"), ','),
        taxonomy: category_path(first.get("Categories")),
        options: declared,
        price: price(first.get("Price"), first.get("Sale Price")),
        weight: weight_cell(first.get("Weight"), Some(unit)),
        requires_shipping: !is_digital,
        track_quantity: variants.iter().any(|variant| variant.inventory.track_quantity),
        is_digital,
        media: media_from_urls(image_cells, None),
        variants,
        identifiers: source_identifiers(&key),
        ..Product::default()
    };
    apply_product_extras(&mut product, first, MODERN_KNOWN);
    ParsedProduct { key, product }
}

fn modern_variant(
    row: Row<'_>,
    index: usize,
    declared: &[OptionDef],
    tracked: bool,
    unit: WeightUnit,
) -> Variant {
    let sku = row.text("SKU");
    let option_values: Vec<OptionValue> = parse_options(row.get("Options"))
        .into_iter()
        .filter_map(|option| {
            let value = option.values.into_iter().next()?;
            Some(OptionValue {
                name: option.name,
                value,
            })
        })
        .filter(|option| {
            declared.is_empty() || declared.iter().any(|def| def.name == option.name)
        })
        .collect();
    let inventory = match parse_int(row.get("Current Stock")) {
        Some(quantity) if tracked => Inventory::counted(quantity),
        _ => Inventory::untracked(None),
    };
    let mut variant = Variant {
        id: Some(index.to_string()),
        title: options_title(&option_values),
        option_values,
        price: price(row.get("Price"), row.get("Sale Price")),
        inventory,
        weight: weight_cell(row.get("Weight"), Some(unit)),
        media: Vec::new(),
        identifiers: variant_identifiers(index, sku.as_deref().unwrap_or_default()),
        sku,
    };
    apply_variant_extras(&mut variant, row, MODERN_KNOWN);
    variant
}

/// Parse an `Options` cell.
///
/// Tokens look like `Type=Rectangle|Name=Size|Value=S;M` and are joined by
/// commas. The simpler `Size=S` form found on older variant rows is also
/// accepted.
fn parse_options(cell: &str) -> Vec<OptionDef> {
    let mut options: Vec<OptionDef> = Vec::new();
    let mut push = |name: &str, values: Vec<String>| {
        let name = name.trim();
        if name.is_empty() || values.is_empty() {
            return;
        }
        options.push(OptionDef {
            name: name.to_string(),
            values,
        });
    };
    if cell.contains("Type=") {
        for token in cell.split("Type=") {
            let token = token.trim().trim_end_matches(',').trim();
            if let Some(captures) = OPTION_TOKEN.captures(token) {
                push(&captures[1], split_tokens(&captures[2], ';'));
            }
        }
    } else {
        for pair in cell.split(',') {
            if let Some((name, value)) = pair.split_once('=') {
                push(name, split_tokens(value, ';'));
            }
        }
    }
    options
}

// === Legacy layout ===

fn parse_legacy(table: &CsvTable, unit: WeightUnit) -> Result<Vec<ParsedProduct>> {
    table.require(Platform::BigCommerce, LEGACY_REQUIRED)?;
    let products: Vec<ParsedProduct> = table
        .rows()
        .filter(|row| !row.get("Name").is_empty() || !row.get("Code").is_empty())
        .map(|row| parse_legacy_row(row, unit))
        .collect();
    if products.is_empty() {
        return Err(IngestError::NoProducts {
            platform: Platform::BigCommerce,
            reason: "no row has a Name or Code".to_string(),
        });
    }
    Ok(products)
}

fn parse_legacy_row(row: Row<'_>, unit: WeightUnit) -> ParsedProduct {
    let sku = row.text("Code");
    let key = sku
        .clone()
        .or_else(|| non_empty(&slugify(row.get("Name"))))
        .unwrap_or_else(|| "bigcommerce-product".to_string());
    let tracked = !matches!(
        row.get("Track Inventory").to_ascii_lowercase().as_str(),
        "" | "none" | "n" | "no"
    );
    let inventory = match parse_int(row.get("Stock Level")) {
        Some(quantity) if tracked => Inventory::counted(quantity),
        _ => Inventory::untracked(None),
    };
    // `P` is physical, `D` digital.
    let is_digital = row.get("Product Type").eq_ignore_ascii_case("d");
    let price = price(row.get("Calculated Price"), row.get("Sale Price"));
    let weight = weight_cell(row.get("Weight"), Some(unit));

    let mut variant = Variant {
        id: Some("1".to_string()),
        price: price.clone(),
        inventory,
        weight,
        identifiers: variant_identifiers(1, sku.as_deref().unwrap_or_default()),
        sku,
        ..Variant::default()
    };
    apply_variant_extras(&mut variant, row, LEGACY_KNOWN);

    let images = row
        .get("Images")
        .split('|')
        .map(|entry| entry.trim().trim_start_matches(LEGACY_IMAGE_PREFIX));
    let url = non_empty(row.get("Product URL"));

    let mut product = Product {
        source: SourceRef {
            platform: Some(Platform::BigCommerce),
            id: Some(key.clone()),
            slug: url.as_deref().and_then(url_slug),
            url,
        },
        title: row.get("Name").to_string(),
        description: row.text("Description"),
        brand: row.text("Brand"),
        seo: Seo {
            title: row.text("Page Title"),
            description: row.text("META Description"),
        },
        tags: split_tokens(row.get("META Keywords"), ','),
        taxonomy: category_path(row.get("Category Details")),
        price,
        weight,
        requires_shipping: !is_digital,
        track_quantity: tracked,
        is_digital,
        media: media_from_urls(images, None),
        variants: vec![variant],
        identifiers: source_identifiers(&key),
        ..Product::default()
    };
    apply_product_extras(&mut product, row, LEGACY_KNOWN);
    ParsedProduct { key, product }
}

// === Shared cells ===

/// Sale price below the regular price becomes current; the regular price
/// moves to compare-at.
fn price(regular: &str, sale: &str) -> Option<Price> {
    let regular = parse_decimal(regular)?;
    Some(match parse_decimal(sale) {
        Some(sale) if sale > Decimal::ZERO && sale < regular => {
            Price::new(sale, None).with_compare_at(Some(regular))
        }
        _ => Price::new(regular, None),
    })
}

/// First category of a `;`- or `|`-separated list; `/` separates levels and
/// a `Category Name:` style label is dropped.
fn category_path(cell: &str) -> Taxonomy {
    let first = cell.split([';', '|']).next().unwrap_or_default();
    let path = first
        .split_once(':')
        .map_or(first, |(_, rest)| rest)
        .replace('/', ">");
    Taxonomy::from_path(&path)
}

fn url_slug(url: &str) -> Option<String> {
    url.trim_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

fn source_identifiers(key: &str) -> BTreeMap<String, String> {
    let mut identifiers = BTreeMap::new();
    identifiers.insert("source_product_id".to_string(), key.to_string());
    identifiers
}
