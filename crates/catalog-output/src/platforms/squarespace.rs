//! Squarespace product CSV: one row per variant, product fields on the
//! first row only.

use catalog_model::text::slugify;
use catalog_model::{Product, TargetPlatform};

use crate::error::Result;
use crate::format;
use crate::options::ExportOptions;
use crate::table::ExportTable;

use super::require_variants;

pub const COLUMNS: &[&str] = &[
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

const OPTION_SLOTS: usize = 3;

/// URL slug for the product page: the configured value, else the source
/// slug, else the slugified title.
pub fn product_url(product: &Product, options: &ExportOptions) -> String {
    options
        .squarespace_product_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .or_else(|| {
            product
                .source
                .slug
                .as_deref()
                .map(slugify)
                .filter(|slug| !slug.is_empty())
        })
        .unwrap_or_else(|| slugify(&product.title))
}

pub(crate) fn export(product: &Product, options: &ExportOptions) -> Result<ExportTable> {
    require_variants(product)?;
    let mut table = ExportTable::new(TargetPlatform::Squarespace, COLUMNS);
    let axes = format::option_axes(product, OPTION_SLOTS);

    for (index, variant) in product.variants.iter().enumerate() {
        let mut row = table.blank_row();
        if index == 0 {
            let product_type = if product.is_digital { "DIGITAL" } else { "PHYSICAL" };
            row.set("Product Type [Non Editable]", product_type);
            row.set(
                "Product Page",
                options.product_page.clone().unwrap_or_default(),
            );
            row.set("Product URL", product_url(product, options));
            row.set("Title", product.title.as_str());
            row.set("Description", product.description.clone().unwrap_or_default());
            row.set("Tags", format::sorted_tags(product));
            row.set("Visible", format::flag(options.publish, "Yes", "No"));
            row.set("Hosted Image URLs", format::image_urls(product).join("\n"));
        }

        row.set("SKU", variant.sku_str().unwrap_or_default());
        for (slot, axis) in axes.iter().enumerate() {
            row.set(&format!("Option Name {}", slot + 1), axis.as_str());
            row.set(
                &format!("Option Value {}", slot + 1),
                format::option_value(variant, axis, index),
            );
        }

        let (regular, sale) = format::regular_and_sale(product, Some(variant));
        let on_sale = !sale.is_empty();
        row.set("Price", regular);
        row.set("Sale Price", sale);
        row.set("On Sale", format::flag(on_sale, "Yes", "No"));
        row.set(
            "Stock",
            format::quantity(variant)
                .map_or_else(|| "Unlimited".to_string(), |quantity| quantity.to_string()),
        );
        row.set(
            "Weight",
            format::weight_value(product.effective_weight(Some(variant))),
        );
        table.push(row);
    }
    Ok(table)
}
