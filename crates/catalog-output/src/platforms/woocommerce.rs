//! WooCommerce product CSV: one `simple` or `variable` row per product.
//!
//! A variable row lists its variations as positional `|`-joined cells in
//! variant order. `Parent` stays blank: the row is the parent itself.

use catalog_model::{Product, TargetPlatform};

use crate::error::Result;
use crate::format;
use crate::options::ExportOptions;
use crate::table::ExportTable;

use super::require_variants;

pub const COLUMNS: &[&str] = &[
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
    "Variation SKUs",
    "Variation prices",
    "Variation stock",
    "Variation weights (kg)",
    "Parent",
];

const ATTRIBUTE_SLOTS: usize = 3;

pub fn parent_sku(product: &Product) -> String {
    format::parent_sku(product)
}

pub(crate) fn export(product: &Product, options: &ExportOptions) -> Result<ExportTable> {
    require_variants(product)?;
    let mut table = ExportTable::new(TargetPlatform::WooCommerce, COLUMNS);
    let mut row = table.blank_row();

    let axes = format::option_axes(product, ATTRIBUTE_SLOTS);
    let attributes: Vec<(String, Vec<String>)> = axes
        .into_iter()
        .map(|axis| {
            let values = format::axis_values(product, &axis);
            (axis, values)
        })
        .collect();
    let simple =
        product.variants.len() == 1 && attributes.iter().all(|(_, values)| values.len() <= 1);
    let first = product.variants.first();

    row.set("Type", if simple { "simple" } else { "variable" });
    row.set("SKU", parent_sku(product));
    row.set("Name", product.title.as_str());
    row.set("Published", format::flag(options.publish, "1", "0"));
    row.set("Is featured?", "0");
    row.set("Visibility in catalog", "visible");
    row.set("Short description", format::short_description(product));
    row.set("Description", product.description.clone().unwrap_or_default());
    row.set(
        "Tax status",
        if product.is_digital { "none" } else { "taxable" },
    );

    let in_stock = product.variants.iter().any(format::in_stock);
    row.set("In stock?", format::flag(in_stock, "1", "0"));
    if simple && let Some(quantity) = first.and_then(format::quantity) {
        row.set("Stock", quantity.to_string());
    }
    let backorders = product
        .variants
        .iter()
        .any(|variant| variant.inventory.allow_backorder == Some(true));
    row.set("Backorders allowed?", format::flag(backorders, "1", "0"));
    row.set("Sold individually?", "0");

    row.set(
        "Weight (kg)",
        format::weight_value(product.effective_weight(first)),
    );
    let (current, _) = format::price_amounts(product, first);
    row.set("Regular price", current.map(format::decimal).unwrap_or_default());
    row.set("Categories", product.taxonomy.joined(" > "));
    row.set("Tags", format::sorted_tags(product));
    row.set("Images", format::image_urls(product).join(","));

    for (slot, (name, values)) in attributes.iter().enumerate() {
        let slot = slot + 1;
        row.set(&format!("Attribute {slot} name"), name.as_str());
        row.set(&format!("Attribute {slot} value(s)"), values.join(","));
        row.set(&format!("Attribute {slot} visible"), "1");
        row.set(&format!("Attribute {slot} global"), "0");
    }

    if !simple {
        let axis_names: Vec<String> = attributes.iter().map(|(name, _)| name.clone()).collect();
        let cells = format::variant_cells(product, &axis_names);
        row.set("Variation SKUs", format::join_cells(&cells, "|", |cell| cell.sku.as_str()));
        row.set("Variation prices", format::join_cells(&cells, "|", |cell| cell.price.as_str()));
        row.set("Variation stock", format::join_cells(&cells, "|", |cell| cell.stock.as_str()));
        row.set(
            "Variation weights (kg)",
            format::join_cells(&cells, "|", |cell| cell.weight.as_str()),
        );
    }

    table.push(row);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{
        Inventory, OptionValue, Platform, Price, Seo, SourceRef, Variant, Weight, WeightUnit,
    };

    fn mug() -> Product {
        Product {
            title: "Stoneware Mug".into(),
            description: Some("<p>Holds <b>12 oz</b></p>".into()),
            source: SourceRef {
                platform: Some(Platform::Shopify),
                slug: Some("stoneware-mug".into()),
                ..SourceRef::default()
            },
            variants: vec![Variant {
                sku: Some("MUG".into()),
                price: Some(Price::new("18".parse().unwrap(), None)),
                inventory: Inventory::counted(7),
                weight: Some(Weight::new("2.5".parse().unwrap(), WeightUnit::Kg)),
                ..Variant::default()
            }],
            ..Product::default()
        }
    }

    #[test]
    fn single_variant_is_simple() {
        let table = export(&mug(), &ExportOptions::default()).unwrap();
        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.get("Type"), Some("simple"));
        assert_eq!(row.get("SKU"), Some("SH:stoneware-mug"));
        assert_eq!(row.get("Stock"), Some("7"));
        assert_eq!(row.get("Weight (kg)"), Some("2.5"));
        assert_eq!(row.get("Short description"), Some("Holds 12 oz"));
        assert_eq!(row.get("Tax status"), Some("taxable"));
        assert_eq!(row.get("Published"), Some("0"));
        assert_eq!(row.get("Variation SKUs"), Some(""));
    }

    #[test]
    fn seo_description_wins_for_short_description() {
        let mut product = mug();
        product.seo = Seo {
            title: None,
            description: Some("A sturdy mug".into()),
        };
        let table = export(&product, &ExportOptions::default()).unwrap();
        assert_eq!(table.rows()[0].get("Short description"), Some("A sturdy mug"));
    }

    #[test]
    fn variants_collapse_into_attributes() {
        let mut product = mug();
        let mut blue = product.variants[0].clone();
        blue.sku = Some("MUG-BLUE".into());
        blue.inventory = Inventory::counted(0);
        blue.option_values = vec![OptionValue {
            name: "Color".into(),
            value: "Blue".into(),
        }];
        product.variants[0].option_values = vec![OptionValue {
            name: "Color".into(),
            value: "White".into(),
        }];
        product.variants.push(blue);

        let table = export(&product, &ExportOptions::default()).unwrap();
        let row = &table.rows()[0];
        assert_eq!(row.get("Type"), Some("variable"));
        assert_eq!(row.get("Stock"), Some(""));
        assert_eq!(row.get("In stock?"), Some("1"));
        assert_eq!(row.get("Attribute 1 name"), Some("Color"));
        assert_eq!(row.get("Attribute 1 value(s)"), Some("White,Blue"));
        assert_eq!(row.get("Attribute 1 visible"), Some("1"));
        assert_eq!(row.get("Variation SKUs"), Some("MUG|MUG-BLUE"));
        assert_eq!(row.get("Variation prices"), Some("18|18"));
        assert_eq!(row.get("Variation stock"), Some("7|0"));
        assert_eq!(row.get("Variation weights (kg)"), Some("2.5|2.5"));
        assert_eq!(row.get("Parent"), Some(""));
    }
}
