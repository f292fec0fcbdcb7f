//! Cell conversions and unknown-column handling shared by CSV importers.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use catalog_model::text::{parse_bool, parse_decimal, parse_int, split_tokens};
use catalog_model::{Inventory, OptionValue, Price, Product, Variant, Weight, WeightUnit};
use regex::Regex;

use super::table::Row;

static HEADER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid header token regex"));

/// Lowercase, underscore-separated form of a header (`"SEO Title"` is
/// `seo_title`).
pub fn header_token(header: &str) -> String {
    let lowered = header.trim().to_lowercase();
    HEADER_TOKEN
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

pub fn price_cell(value: &str) -> Option<Price> {
    parse_decimal(value).map(|amount| Price::new(amount, None))
}

pub fn weight_cell(value: &str, unit: Option<WeightUnit>) -> Option<Weight> {
    let unit = unit?;
    parse_decimal(value).map(|amount| Weight::new(amount, unit))
}

/// Inventory from a quantity cell; blank means untracked and available.
pub fn inventory_cell(value: &str) -> Inventory {
    match parse_int(value) {
        Some(quantity) => Inventory::counted(quantity),
        None => Inventory::untracked(Some(true)),
    }
}

/// Option values from `(name, value)` pairs, skipping incomplete pairs.
pub fn option_values<I>(pairs: I) -> Vec<OptionValue>
where
    I: IntoIterator<Item = (String, String)>,
{
    pairs
        .into_iter()
        .filter(|(name, value)| !name.trim().is_empty() && !value.trim().is_empty())
        .map(|(name, value)| OptionValue {
            name: name.trim().to_string(),
            value: value.trim().to_string(),
        })
        .collect()
}

/// `"Red / Large"` style title, or `None` without options.
pub fn options_title(values: &[OptionValue]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .map(|option| option.value.as_str())
            .collect::<Vec<_>>()
            .join(" / "),
    )
}

/// Identifier map seeded with the usual variant keys.
pub fn variant_identifiers(index: usize, sku: &str) -> BTreeMap<String, String> {
    let mut identifiers = BTreeMap::new();
    identifiers.insert("source_variant_id".to_string(), index.to_string());
    if !sku.is_empty() {
        identifiers.insert("sku".to_string(), sku.to_string());
    }
    identifiers
}

/// Map columns the importer does not read onto canonical product fields
/// where the header names one, otherwise keep them as `csv:<token>`
/// identifiers.
pub fn apply_product_extras(product: &mut Product, row: Row<'_>, known: &[&str]) {
    for (header, value) in row.cells() {
        if value.is_empty() || known.contains(&header) {
            continue;
        }
        let token = header_token(header);
        match token.as_str() {
            "title" => product.title = value.to_string(),
            "description" => product.description = Some(value.to_string()),
            "brand" => product.brand = Some(value.to_string()),
            "vendor" => product.vendor = Some(value.to_string()),
            "tags" => product.tags = split_tokens(value, ','),
            "seo_title" => product.seo.title = Some(value.to_string()),
            "seo_description" => product.seo.description = Some(value.to_string()),
            "source_id" => product.source.id = Some(value.to_string()),
            "source_slug" => product.source.slug = Some(value.to_string()),
            "source_url" => product.source.url = Some(value.to_string()),
            "requires_shipping" | "track_quantity" | "is_digital" => match parse_bool(value) {
                Some(flag) if token == "requires_shipping" => product.requires_shipping = flag,
                Some(flag) if token == "track_quantity" => product.track_quantity = flag,
                Some(flag) => product.is_digital = flag,
                None => keep_identifier(&mut product.identifiers, &token, value),
            },
            _ => keep_identifier(&mut product.identifiers, &token, value),
        }
    }
}

/// Variant counterpart of [`apply_product_extras`].
pub fn apply_variant_extras(variant: &mut Variant, row: Row<'_>, known: &[&str]) {
    for (header, value) in row.cells() {
        if value.is_empty() || known.contains(&header) {
            continue;
        }
        let token = header_token(header);
        match token.as_str() {
            "variant_sku" | "sku" if variant.sku.is_none() => {
                variant.sku = Some(value.to_string());
            }
            "variant_title" if variant.title.is_none() => {
                variant.title = Some(value.to_string());
            }
            "variant_id" if variant.id.is_none() => variant.id = Some(value.to_string()),
            "variant_inventory_qty" | "inventory_quantity" if parse_int(value).is_some() => {
                variant.inventory = inventory_cell(value);
            }
            "variant_available" | "available" if parse_bool(value).is_some() => {
                variant.inventory.available = parse_bool(value);
            }
            _ => keep_identifier(&mut variant.identifiers, &token, value),
        }
    }
}

fn keep_identifier(identifiers: &mut BTreeMap<String, String>, token: &str, value: &str) {
    identifiers
        .entry(format!("csv:{token}"))
        .or_insert_with(|| value.to_string());
}
