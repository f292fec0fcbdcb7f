//! Wix product CSV: one `PRODUCT` row, option choices `;`-joined.
//!
//! Variants ride along as positional `;`-joined lists (`sku`,
//! `variantChoices`, `variantPrices`, ...), one entry per variant in
//! variant order.

use catalog_model::{Product, TargetPlatform};

use crate::error::Result;
use crate::format;
use crate::options::ExportOptions;
use crate::table::ExportTable;

use super::require_variants;

pub const COLUMNS: &[&str] = &[
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
    "productOptionName1",
    "productOptionName2",
    "productOptionName3",
    "productOptionName4",
    "productOptionName5",
    "productOptionName6",
    "productOptionType1",
    "productOptionType2",
    "productOptionType3",
    "productOptionType4",
    "productOptionType5",
    "productOptionType6",
    "productOptionChoices1",
    "productOptionChoices2",
    "productOptionChoices3",
    "productOptionChoices4",
    "productOptionChoices5",
    "productOptionChoices6",
    "media",
    "variantChoices",
    "variantPrices",
    "variantInventory",
    "variantWeights",
];

const OPTION_SLOTS: usize = 6;

pub fn handle(product: &Product) -> String {
    format::handle(product)
}

pub(crate) fn export(product: &Product, options: &ExportOptions) -> Result<ExportTable> {
    require_variants(product)?;
    let mut table = ExportTable::new(TargetPlatform::Wix, COLUMNS);
    let mut row = table.blank_row();
    let first = product.variants.first();

    row.set("handle", handle(product));
    row.set("fieldType", "PRODUCT");
    row.set("name", product.title.as_str());
    row.set("description", product.description.clone().unwrap_or_default());
    row.set("visible", format::flag(options.publish, "TRUE", "FALSE"));
    let axes = format::option_axes(product, OPTION_SLOTS);
    let cells = format::variant_cells(product, &axes);
    let (current, _) = format::price_amounts(product, first);
    row.set("price", current.map(format::decimal).unwrap_or_default());
    row.set("sku", format::join_cells(&cells, ";", |cell| cell.sku.as_str()));
    row.set("inventory", inventory(product));
    row.set("weight", format::weight_value(product.effective_weight(first)));
    row.set("brand", product.brand.clone().unwrap_or_default());

    for (slot, axis) in axes.iter().enumerate() {
        let slot = slot + 1;
        row.set(&format!("productOptionName{slot}"), axis.as_str());
        row.set(&format!("productOptionType{slot}"), "TEXT_CHOICES");
        row.set(
            &format!("productOptionChoices{slot}"),
            format::axis_values(product, axis).join(";"),
        );
    }
    row.set("media", format::image_urls(product).join(";"));
    if cells.len() > 1 {
        let choices: Vec<String> = cells
            .iter()
            .map(|cell| {
                cell.choices
                    .iter()
                    .map(|(_, value)| value.as_str())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect();
        row.set("variantChoices", choices.join(";"));
        row.set("variantPrices", format::join_cells(&cells, ";", |cell| cell.price.as_str()));
        row.set("variantInventory", format::join_cells(&cells, ";", |cell| cell.stock.as_str()));
        row.set("variantWeights", format::join_cells(&cells, ";", |cell| cell.weight.as_str()));
    }

    table.push(row);
    Ok(table)
}

/// Summed count when any variant is counted, else a stock status.
fn inventory(product: &Product) -> String {
    match format::total_quantity(product) {
        Some(total) => total.to_string(),
        None => {
            let in_stock = product.variants.iter().any(format::in_stock);
            format::flag(in_stock, "IN_STOCK", "OUT_OF_STOCK")
        }
    }
}
