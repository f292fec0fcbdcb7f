//! BigCommerce product CSV in the modern (`Item=Product`) and legacy bulk
//! edit dialects. Both write one row per product; variants are packed into
//! the `Variants` column as `[S]SKU=..|<axis>=..|Price=..` tokens.

use catalog_model::{Product, TargetPlatform};

use crate::error::Result;
use crate::format;
use crate::options::{CsvFormat, ExportOptions};
use crate::table::ExportTable;

use super::require_variants;

pub const MODERN_COLUMNS: &[&str] = &[
    "Item",
    "ID",
    "Name",
    "Type",
    "SKU",
    "Options",
    "Variants",
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

pub const LEGACY_COLUMNS: &[&str] = &[
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
    "Variants",
];

const OPTION_SLOTS: usize = 3;

/// The lone variant's SKU, else `<TOKEN>-<KEY>` in upper case.
pub fn product_sku(product: &Product) -> String {
    if let [only] = product.variants.as_slice()
        && let Some(sku) = only.sku_str()
    {
        return sku.to_string();
    }
    let token = product
        .source
        .platform
        .map_or("SRC", |platform| platform.sku_token());
    format!("{token}-{}", product.product_key()).to_uppercase()
}

pub(crate) fn export(product: &Product, options: &ExportOptions) -> Result<ExportTable> {
    require_variants(product)?;
    match options.csv_format {
        CsvFormat::Modern => Ok(modern(product, options)),
        CsvFormat::Legacy => Ok(legacy(product, options)),
    }
}

fn modern(product: &Product, options: &ExportOptions) -> ExportTable {
    let mut table = ExportTable::new(TargetPlatform::BigCommerce, MODERN_COLUMNS);
    let mut row = table.blank_row();
    let first = product.variants.first();
    let stock = Stock::of(product);

    row.set("Item", "Product");
    row.set("ID", product.source.id.clone().unwrap_or_default());
    row.set("Name", product.title.as_str());
    row.set("Type", if product.is_digital { "digital" } else { "physical" });
    row.set("SKU", product_sku(product));
    row.set("Options", option_tokens(product));
    row.set("Variants", variant_tokens(product));
    row.set("Inventory Tracking", stock.tracking());
    row.set("Current Stock", stock.total_cell());
    let (regular, sale) = format::regular_and_sale(product, first);
    row.set("Price", regular);
    row.set("Sale Price", sale);
    row.set("Weight", format::weight_value(product.effective_weight(first)));
    row.set("Product Visible?", format::flag(options.publish, "Y", "N"));
    row.set("Brand", product.brand.clone().unwrap_or_default());
    row.set("Categories", product.taxonomy.joined("/"));
    row.set("Description", product.description.clone().unwrap_or_default());
    row.set("Page Title", product.seo.title.clone().unwrap_or_default());
    row.set(
        "Meta Description",
        product.seo.description.clone().unwrap_or_default(),
    );
    row.set("Search Keywords", format::sorted_tags(product));
    row.set("Product URL", format!("/{}/", format::handle(product)));
    row.set("Image URL (Import)", format::image_urls(product).join("|"));

    table.push(row);
    table
}

fn legacy(product: &Product, options: &ExportOptions) -> ExportTable {
    let mut table = ExportTable::new(TargetPlatform::BigCommerce, LEGACY_COLUMNS);
    let mut row = table.blank_row();
    let first = product.variants.first();
    let stock = Stock::of(product);

    row.set("Product Type", if product.is_digital { "D" } else { "P" });
    row.set("Code", product_sku(product));
    row.set("Name", product.title.as_str());
    row.set("Brand", product.brand.clone().unwrap_or_default());
    row.set("Description", product.description.clone().unwrap_or_default());
    let (regular, sale) = format::regular_and_sale(product, first);
    row.set("Calculated Price", regular);
    row.set("Sale Price", sale);
    row.set("Weight", format::weight_value(product.effective_weight(first)));
    row.set("Stock Level", stock.total_cell());
    row.set(
        "Track Inventory",
        if stock.total.is_some() { "by product" } else { "none" },
    );
    row.set("Product Visible", format::flag(options.publish, "Y", "N"));
    row.set("Category Details", product.taxonomy.joined("/"));
    let images: Vec<String> = format::image_urls(product)
        .into_iter()
        .map(|url| format!("Product Image URL: {url}"))
        .collect();
    row.set("Images", images.join("|"));
    row.set("Page Title", product.seo.title.clone().unwrap_or_default());
    row.set("META Keywords", format::sorted_tags(product));
    row.set(
        "META Description",
        product.seo.description.clone().unwrap_or_default(),
    );
    row.set("Product URL", format!("/{}/", format::handle(product)));
    row.set("Variants", variant_tokens(product));

    table.push(row);
    table
}

/// One `[S]` token per variant, `,`-joined. Empty fields are left out.
fn variant_tokens(product: &Product) -> String {
    let axes = format::option_axes(product, OPTION_SLOTS);
    format::variant_cells(product, &axes)
        .iter()
        .map(|cell| {
            let mut fields: Vec<String> = Vec::new();
            if !cell.sku.is_empty() {
                fields.push(format!("SKU={}", cell.sku));
            }
            for (axis, value) in &cell.choices {
                fields.push(format!("{axis}={value}"));
            }
            let named = [
                ("Price", &cell.regular),
                ("Sale Price", &cell.sale),
                ("Stock", &cell.stock),
                ("Weight", &cell.weight),
            ];
            for (name, value) in named {
                if !value.is_empty() {
                    fields.push(format!("{name}={value}"));
                }
            }
            format!("[S]{}", fields.join("|"))
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// `Type=Rectangle|Name=<axis>|Value=<a;b>` per option axis, `,`-joined.
fn option_tokens(product: &Product) -> String {
    format::option_axes(product, OPTION_SLOTS)
        .iter()
        .map(|axis| {
            let values = format::axis_values(product, axis).join(";");
            format!("Type=Rectangle|Name={axis}|Value={values}")
        })
        .collect::<Vec<_>>()
        .join(",")
}

struct Stock {
    total: Option<i64>,
    counted_variants: usize,
    variants: usize,
}

impl Stock {
    fn of(product: &Product) -> Self {
        Self {
            total: format::total_quantity(product),
            counted_variants: product
                .variants
                .iter()
                .filter(|variant| format::quantity(variant).is_some())
                .count(),
            variants: product.variants.len(),
        }
    }

    fn tracking(&self) -> &'static str {
        match (self.counted_variants, self.variants) {
            (0, _) => "none",
            (_, 1) => "product",
            _ => "variant",
        }
    }

    fn total_cell(&self) -> String {
        self.total.map(|total| total.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{Inventory, Media, OptionValue, Platform, Price, SourceRef, Taxonomy, Variant};

    fn backpack() -> Product {
        let variant = |color: &str, quantity: i64| Variant {
            sku: Some(format!("PACK-{}", color.to_uppercase())),
            option_values: vec![OptionValue {
                name: "Color".into(),
                value: color.into(),
            }],
            price: Some(Price::new("80".parse().unwrap(), None)),
            inventory: Inventory::counted(quantity),
            ..Variant::default()
        };
        Product {
            title: "Trail Backpack".into(),
            source: SourceRef {
                platform: Some(Platform::Amazon),
                id: Some("B0TRAIL".into()),
                ..SourceRef::default()
            },
            taxonomy: Taxonomy::from_path("Outdoors > Bags"),
            media: vec![Media::image("https://img.example/pack.jpg")],
            variants: vec![variant("Red", 2), variant("Olive", 3)],
            ..Product::default()
        }
    }

    #[test]
    fn modern_row_packs_options() {
        let table = export(&backpack(), &ExportOptions::default()).unwrap();
        assert_eq!(table.columns(), MODERN_COLUMNS);
        let row = &table.rows()[0];
        assert_eq!(row.get("Item"), Some("Product"));
        assert_eq!(row.get("SKU"), Some("AMZ-B0TRAIL"));
        assert_eq!(
            row.get("Options"),
            Some("Type=Rectangle|Name=Color|Value=Red;Olive")
        );
        assert_eq!(
            row.get("Variants"),
            Some("[S]SKU=PACK-RED|Color=Red|Price=80|Stock=2,[S]SKU=PACK-OLIVE|Color=Olive|Price=80|Stock=3")
        );
        assert_eq!(row.get("Inventory Tracking"), Some("variant"));
        assert_eq!(row.get("Current Stock"), Some("5"));
        assert_eq!(row.get("Categories"), Some("Outdoors/Bags"));
        assert_eq!(row.get("Product URL"), Some("/trail-backpack/"));
        assert_eq!(row.get("Product Visible?"), Some("N"));
    }

    #[test]
    fn legacy_row_prefixes_images() {
        let options = ExportOptions::default().with_csv_format(CsvFormat::Legacy);
        let table = export(&backpack(), &options).unwrap();
        assert_eq!(table.columns(), LEGACY_COLUMNS);
        let row = &table.rows()[0];
        assert_eq!(row.get("Product Type"), Some("P"));
        assert_eq!(row.get("Code"), Some("AMZ-B0TRAIL"));
        assert_eq!(row.get("Track Inventory"), Some("by product"));
        assert_eq!(
            row.get("Images"),
            Some("Product Image URL: https://img.example/pack.jpg")
        );
    }

    #[test]
    fn single_variant_keeps_its_sku() {
        let mut product = backpack();
        product.variants.truncate(1);
        assert_eq!(product_sku(&product), "PACK-RED");
    }

    #[test]
    fn stock_total_saturates() {
        let mut product = backpack();
        for variant in &mut product.variants {
            variant.inventory = Inventory::counted(i64::MAX);
        }
        let table = export(&product, &ExportOptions::default()).unwrap();
        assert_eq!(
            table.rows()[0].get("Current Stock"),
            Some(i64::MAX.to_string().as_str())
        );
    }
}
