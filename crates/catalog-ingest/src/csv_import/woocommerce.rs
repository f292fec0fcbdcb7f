//! WooCommerce product CSV.
//!
//! Every `simple` or `variable` row is a product. A `variable` row owns the
//! `variation` rows whose `Parent` equals its SKU.

use std::collections::BTreeMap;

use catalog_model::text::{non_empty, parse_bool, parse_decimal, parse_int, slugify, split_tokens};
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

const REQUIRED: &[&str] = &["Type", "SKU", "Name", "Regular price"];

const KNOWN: &[&str] = &[
    "Type",
    "SKU",
    "Name",
    "Published",
    "Is featured?",
    "Visibility in catalog",
    "Short description",
    "Description",
    "Tax status",
    "In stock?",
    "Stock",
    "Backorders allowed?",
    "Sold individually?",
    "Weight (kg)",
    "Regular price",
    "Sale price",
    "Categories",
    "Tags",
    "Images",
    "Attribute 1 name",
    "Attribute 1 value(s)",
    "Attribute 1 visible",
    "Attribute 1 global",
    "Attribute 2 name",
    "Attribute 2 value(s)",
    "Attribute 2 visible",
    "Attribute 2 global",
    "Attribute 3 name",
    "Attribute 3 value(s)",
    "Attribute 3 visible",
    "Attribute 3 global",
    "Parent",
];

fn row_type(row: Row<'_>) -> String {
    row.get("Type").to_ascii_lowercase()
}

pub(crate) fn parse(table: &CsvTable) -> Result<Vec<ParsedProduct>> {
    table.require(Platform::WooCommerce, REQUIRED)?;
    let parents: Vec<Row<'_>> = table
        .rows()
        .filter(|row| matches!(row_type(*row).as_str(), "simple" | "variable"))
        .collect();
    if parents.is_empty() {
        return Err(IngestError::NoProducts {
            platform: Platform::WooCommerce,
            reason: "no simple or variable product row".to_string(),
        });
    }
    Ok(parents
        .into_iter()
        .map(|parent| {
            let parent_sku = parent.get("SKU");
            let variations: Vec<Row<'_>> = if row_type(parent) == "variable" && !parent_sku.is_empty()
            {
                table
                    .rows()
                    .filter(|row| row_type(*row) == "variation" && row.get("Parent") == parent_sku)
                    .collect()
            } else {
                Vec::new()
            };
            parse_product(parent, &variations)
        })
        .collect())
}

fn parse_product(parent: Row<'_>, variations: &[Row<'_>]) -> ParsedProduct {
    let name = parent.get("Name");
    let slug = non_empty(&slugify(name));
    let parent_sku = parent.text("SKU");
    let key = parent_sku
        .clone()
        .or_else(|| slug.clone())
        .unwrap_or_else(|| "woocommerce-product".to_string());

    // A simple product is its own single variant.
    let variant_rows: Vec<Row<'_>> = if variations.is_empty() {
        vec![parent]
    } else {
        variations.to_vec()
    };
    let variants: Vec<Variant> = variant_rows
        .iter()
        .enumerate()
        .map(|(offset, row)| parse_variant(*row, offset + 1, &key))
        .collect();

    let is_digital = parent.get("Tax status").eq_ignore_ascii_case("none");
    let category = parent.get("Categories").split(',').next().unwrap_or_default();
    let mut identifiers = BTreeMap::new();
    identifiers.insert("source_product_id".to_string(), key.clone());

    let mut product = Product {
        source: SourceRef {
            platform: Some(Platform::WooCommerce),
            id: parent_sku.or_else(|| slug.clone()),
            slug,
            url: None,
        },
        title: name.to_string(),
        description: parent.text("Description"),
        seo: Seo {
            title: parent.text("Name"),
            description: parent.text("Short description"),
        },
        tags: split_tokens(parent.get("Tags"), ','),
        taxonomy: Taxonomy::from_path(category),
        price: price(parent),
        weight: variants[0].weight,
        requires_shipping: !is_digital,
        track_quantity: variants.iter().any(|variant| variant.inventory.track_quantity),
        is_digital,
        media: media_from_urls(parent.get("Images").split(','), None),
        variants,
        identifiers,
        ..Product::default()
    };
    apply_product_extras(&mut product, parent, KNOWN);
    ParsedProduct { key, product }
}

fn parse_variant(row: Row<'_>, index: usize, key: &str) -> Variant {
    let sku = row.text("SKU").unwrap_or_else(|| format!("{key}:{index}"));
    // Variation rows hold one value; parent rows list all of them.
    let options = option_values((1..=3).map(|slot| {
        let values = split_tokens(row.get(&format!("Attribute {slot} value(s)")), ',');
        (
            row.get(&format!("Attribute {slot} name")).to_string(),
            values.into_iter().next().unwrap_or_default(),
        )
    }));
    let mut variant = Variant {
        id: Some(index.to_string()),
        title: options_title(&options),
        option_values: options,
        price: price(row),
        inventory: inventory(row),
        weight: weight_cell(row.get("Weight (kg)"), Some(WeightUnit::Kg)),
        media: media_from_urls(row.get("Images").split(','), Some(&sku)),
        identifiers: variant_identifiers(index, &sku),
        sku: Some(sku),
    };
    apply_variant_extras(&mut variant, row, KNOWN);
    variant
}

fn price(row: Row<'_>) -> Option<Price> {
    let regular = parse_decimal(row.get("Regular price"))?;
    Some(match parse_decimal(row.get("Sale price")) {
        Some(sale) if sale < regular => Price::new(sale, None).with_compare_at(Some(regular)),
        _ => Price::new(regular, None),
    })
}

fn inventory(row: Row<'_>) -> Inventory {
    let mut inventory = match parse_int(row.get("Stock")) {
        Some(quantity) => Inventory::counted(quantity),
        None => Inventory::untracked(parse_bool(row.get("In stock?"))),
    };
    inventory.allow_backorder = match row.get("Backorders allowed?").to_ascii_lowercase().as_str() {
        "notify" => Some(true),
        other => parse_bool(other),
    };
    inventory
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Type,SKU,Name,Short description,Description,Tax status,In stock?,Stock,Backorders allowed?,Weight (kg),Regular price,Sale price,Categories,Tags,Images,Attribute 1 name,Attribute 1 value(s),Parent
variable,HOOD,Hoodie,Warm hoodie,<p>Fleece</p>,taxable,1,,0,0.8,45,,\"Apparel > Hoodies, Sale\",winter,\"https://img.test/h1.jpg, https://img.test/h2.jpg\",Size,\"S, M\",
variation,HOOD-S,Hoodie - S,,,taxable,1,4,0,0.8,45,39,,,https://img.test/h-s.jpg,Size,S,HOOD
variation,,Hoodie - M,,,taxable,1,0,notify,0.9,45,,,,,Size,M,HOOD
simple,,E-book,,,none,1,,,,12,,,,,,,
";

    fn parsed() -> Vec<ParsedProduct> {
        parse(&CsvTable::parse(CSV).unwrap()).unwrap()
    }

    #[test]
    fn variations_join_their_parent() {
        let products = parsed();
        assert_eq!(products.len(), 2);
        let hoodie = &products[0].product;
        assert_eq!(products[0].key, "HOOD");
        assert_eq!(hoodie.variants.len(), 2);
        assert_eq!(hoodie.variants[0].option_value("Size"), Some("S"));
        assert_eq!(hoodie.taxonomy.joined(" > "), "Apparel > Hoodies");
        assert_eq!(hoodie.seo.description.as_deref(), Some("Warm hoodie"));
        assert_eq!(hoodie.media.len(), 2);
        assert_eq!(hoodie.variants[0].media[0].url, "https://img.test/h-s.jpg");
    }

    #[test]
    fn missing_variation_sku_is_synthesized() {
        let hoodie = &parsed()[0].product;
        assert_eq!(hoodie.variants[1].sku.as_deref(), Some("HOOD:2"));
        assert_eq!(hoodie.variants[1].inventory.allow_backorder, Some(true));
        assert_eq!(hoodie.variants[0].inventory.quantity, Some(4));
    }

    #[test]
    fn sale_price_and_kilograms() {
        let hoodie = &parsed()[0].product;
        let price = hoodie.variants[0].price.as_ref().unwrap();
        assert_eq!(price.current.amount.to_string(), "39");
        assert_eq!(price.compare_at.as_ref().unwrap().amount.to_string(), "45");
        let weight = hoodie.variants[1].weight.unwrap();
        assert_eq!((weight.value.to_string(), weight.unit), ("0.9".to_string(), WeightUnit::Kg));
    }

    #[test]
    fn simple_product_without_sku() {
        let ebook = &parsed()[1];
        assert_eq!(ebook.key, "e-book");
        assert!(ebook.product.is_digital);
        assert_eq!(ebook.product.variants[0].sku.as_deref(), Some("e-book:1"));
    }
}
