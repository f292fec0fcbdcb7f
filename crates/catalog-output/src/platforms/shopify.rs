//! Shopify product CSV: one row per variant, keyed by a repeated Handle.

use catalog_model::{Product, TargetPlatform};

use crate::error::Result;
use crate::format;
use crate::options::ExportOptions;
use crate::table::ExportTable;

use super::require_variants;

pub const COLUMNS: &[&str] = &[
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

const OPTION_SLOTS: usize = 3;

pub fn handle(product: &Product) -> String {
    format::handle(product)
}

pub(crate) fn export(product: &Product, options: &ExportOptions) -> Result<ExportTable> {
    require_variants(product)?;
    let mut table = ExportTable::new(TargetPlatform::Shopify, COLUMNS);
    let handle = handle(product);
    let axes = format::option_axes(product, OPTION_SLOTS);
    let images = format::images(product);

    for (index, variant) in product.variants.iter().enumerate() {
        let mut row = table.blank_row();
        row.set("Handle", handle.as_str());

        if index == 0 {
            row.set("Title", product.title.as_str());
            row.set("Body (HTML)", product.description.clone().unwrap_or_default());
            row.set(
                "Vendor",
                product
                    .vendor
                    .clone()
                    .or_else(|| product.brand.clone())
                    .unwrap_or_default(),
            );
            row.set("Type", product.taxonomy.joined(" > "));
            row.set("Tags", format::sorted_tags(product));
            row.set("Published", format::flag(options.publish, "TRUE", "FALSE"));
            row.set("Status", format::flag(options.publish, "active", "draft"));
            row.set("SEO Title", product.seo.title.clone().unwrap_or_default());
            row.set(
                "SEO Description",
                product.seo.description.clone().unwrap_or_default(),
            );
        }

        if axes.is_empty() {
            if index == 0 {
                row.set("Option1 Name", "Title");
            }
            row.set("Option1 Value", "Default Title");
        } else {
            for (slot, axis) in axes.iter().enumerate() {
                if index == 0 {
                    row.set(&format!("Option{} Name", slot + 1), axis.as_str());
                }
                row.set(
                    &format!("Option{} Value", slot + 1),
                    format::option_value(variant, axis, index),
                );
            }
        }

        row.set("Variant SKU", variant.sku_str().unwrap_or_default());
        if let Some(weight) = product.effective_weight(Some(variant)) {
            // Out-of-range masses leave the grams cell blank.
            if let Some(grams) = weight.value.checked_mul(weight.unit.grams()) {
                row.set("Variant Grams", format::decimal(grams.round()));
            }
            row.set("Variant Weight Unit", weight.unit.as_str());
        }
        if let Some(quantity) = format::quantity(variant) {
            row.set("Variant Inventory Tracker", "shopify");
            row.set("Variant Inventory Qty", quantity.to_string());
            let policy = if variant.inventory.allow_backorder == Some(true) {
                "continue"
            } else {
                "deny"
            };
            row.set("Variant Inventory Policy", policy);
        }
        row.set("Variant Fulfillment Service", "manual");

        let (current, compare_at) = format::price_amounts(product, Some(variant));
        row.set(
            "Variant Price",
            current.map(format::decimal).unwrap_or_default(),
        );
        row.set(
            "Variant Compare At Price",
            compare_at.map(format::decimal).unwrap_or_default(),
        );
        row.set(
            "Variant Requires Shipping",
            format::flag(product.requires_shipping && !product.is_digital, "TRUE", "FALSE"),
        );
        row.set("Variant Taxable", format::flag(!product.is_digital, "TRUE", "FALSE"));
        row.set("Variant Image", format::variant_image(product, variant));

        if let Some(image) = images.get(index) {
            row.set("Image Src", image.url.as_str());
            row.set("Image Position", (index + 1).to_string());
            row.set(
                "Image Alt Text",
                image.alt.clone().unwrap_or_else(|| product.title.clone()),
            );
        }
        table.push(row);
    }
    Ok(table)
}
