//! Field rules shared by the exporters.

use std::sync::LazyLock;

use catalog_model::text::{
    format_decimal, non_empty, normalize_url, ordered_unique, slugify, strip_html,
};
use catalog_model::{Decimal, Product, Variant, Weight};
use regex::Regex;

static HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Invalid handle regex"));

/// Axis used when variants differ but declare no option.
pub const FALLBACK_OPTION: &str = "Option";

pub fn decimal(value: Decimal) -> String {
    format_decimal(value)
}

pub fn flag(value: bool, yes: &str, no: &str) -> String {
    if value { yes } else { no }.to_string()
}

/// URL handle: the slug when it is already a valid handle, else the
/// slugified title, else `product-item`.
pub fn handle(product: &Product) -> String {
    let slug = product
        .source
        .slug
        .as_deref()
        .map(|slug| slug.trim().to_lowercase())
        .filter(|slug| HANDLE.is_match(slug));
    slug.or_else(|| Some(slugify(&product.title)).filter(|title| HANDLE.is_match(title)))
        .unwrap_or_else(|| "product-item".to_string())
}

/// `<TOKEN>:<product key>`, with `SRC` for products of unknown origin.
pub fn parent_sku(product: &Product) -> String {
    let token = product
        .source
        .platform
        .map_or("SRC", |platform| platform.sku_token());
    format!("{token}:{}", product.product_key())
}

/// Tags sorted case-insensitively and comma-joined.
pub fn sorted_tags(product: &Product) -> String {
    let mut tags = ordered_unique(&product.tags);
    tags.sort_by_key(|tag| tag.to_lowercase());
    tags.join(",")
}

/// An image as exporters write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportImage {
    pub url: String,
    pub alt: Option<String>,
}

/// Product images then variant images, de-duplicated by URL after
/// protocol-relative URLs are made absolute. The first alt text wins.
pub fn images(product: &Product) -> Vec<ExportImage> {
    let mut images: Vec<ExportImage> = Vec::new();
    let media = product
        .media
        .iter()
        .chain(product.variants.iter().flat_map(|variant| variant.media.iter()))
        .filter(|media| media.is_image());
    for media in media {
        let Some(url) = normalize_url(&media.url) else {
            continue;
        };
        if images.iter().any(|image| image.url == url) {
            continue;
        }
        images.push(ExportImage {
            url,
            alt: media.alt.as_deref().and_then(non_empty),
        });
    }
    images
}

pub fn image_urls(product: &Product) -> Vec<String> {
    images(product).into_iter().map(|image| image.url).collect()
}

pub fn variant_image(product: &Product, variant: &Variant) -> String {
    product
        .variant_image_url(variant)
        .and_then(normalize_url)
        .unwrap_or_default()
}

/// SEO description, else the description with markup removed.
pub fn short_description(product: &Product) -> String {
    product
        .seo
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| strip_html(product.description.as_deref().unwrap_or_default()))
}

/// Option axes to export, capped at `limit`. Variants that differ without
/// any declared axis share a single `Option` axis.
pub fn option_axes(product: &Product, limit: usize) -> Vec<String> {
    let names = product.option_names(limit);
    if names.is_empty() && product.variants.len() > 1 {
        vec![FALLBACK_OPTION.to_string()]
    } else {
        names
    }
}

/// A variant's value on `axis`; on the fallback axis, its title, SKU, id or
/// position.
pub fn option_value(variant: &Variant, axis: &str, index: usize) -> String {
    if let Some(value) = variant.option_value(axis) {
        return value.to_string();
    }
    if axis == FALLBACK_OPTION {
        return variant
            .title
            .clone()
            .or_else(|| variant.sku_str().map(str::to_string))
            .or_else(|| variant.id.clone())
            .unwrap_or_else(|| format!("Variant {}", index + 1));
    }
    String::new()
}

/// Every value used on `axis`, declared values first.
pub fn axis_values(product: &Product, axis: &str) -> Vec<String> {
    if axis == FALLBACK_OPTION && product.options.iter().all(|option| option.name != axis) {
        return ordered_unique(
            product
                .variants
                .iter()
                .enumerate()
                .map(|(index, variant)| option_value(variant, axis, index)),
        );
    }
    product.option_values_for(axis)
}

/// Current and compare-at amounts for a variant, falling back to the
/// product price.
pub fn price_amounts(product: &Product, variant: Option<&Variant>) -> (Option<Decimal>, Option<Decimal>) {
    match product.effective_price(variant) {
        Some(price) => (
            Some(price.current.amount),
            price.compare_at.as_ref().map(|money| money.amount),
        ),
        None => (None, None),
    }
}

/// Regular and sale cells: a compare-at above the current price becomes the
/// regular price and the current price the sale price.
pub fn regular_and_sale(product: &Product, variant: Option<&Variant>) -> (String, String) {
    match price_amounts(product, variant) {
        (Some(current), Some(compare_at)) if compare_at > current => {
            (decimal(compare_at), decimal(current))
        }
        (Some(current), _) => (decimal(current), String::new()),
        (None, _) => (String::new(), String::new()),
    }
}

pub fn weight_value(weight: Option<Weight>) -> String {
    weight.map(|weight| decimal(weight.value)).unwrap_or_default()
}

pub fn quantity(variant: &Variant) -> Option<i64> {
    variant.inventory.quantity.map(|quantity| quantity.max(0))
}

/// Counted stock summed over variants, saturating at `i64::MAX`; `None`
/// when no variant is counted.
pub fn total_quantity(product: &Product) -> Option<i64> {
    product
        .variants
        .iter()
        .filter_map(quantity)
        .fold(None, |total: Option<i64>, quantity| {
            Some(total.unwrap_or(0).saturating_add(quantity))
        })
}

/// The per-variant fields a one-row-per-product target packs into
/// delimited sub-fields. Cells are blank where the variant has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantCells {
    pub sku: String,
    /// Price charged now.
    pub price: String,
    pub regular: String,
    pub sale: String,
    pub stock: String,
    pub weight: String,
    /// `(axis, value)` for each exported axis.
    pub choices: Vec<(String, String)>,
}

/// Cells for every variant, in variant order.
pub fn variant_cells(product: &Product, axes: &[String]) -> Vec<VariantCells> {
    product
        .variants
        .iter()
        .enumerate()
        .map(|(index, variant)| {
            let (current, _) = price_amounts(product, Some(variant));
            let (regular, sale) = regular_and_sale(product, Some(variant));
            VariantCells {
                sku: variant.sku_str().unwrap_or_default().to_string(),
                price: current.map(decimal).unwrap_or_default(),
                regular,
                sale,
                stock: quantity(variant)
                    .map(|quantity| quantity.to_string())
                    .unwrap_or_default(),
                weight: weight_value(product.effective_weight(Some(variant))),
                choices: axes
                    .iter()
                    .map(|axis| (axis.clone(), option_value(variant, axis, index)))
                    .collect(),
            }
        })
        .collect()
}

/// Join one field of every variant with `separator`.
pub fn join_cells<F>(cells: &[VariantCells], separator: &str, field: F) -> String
where
    F: Fn(&VariantCells) -> &str,
{
    cells.iter().map(field).collect::<Vec<_>>().join(separator)
}

/// In stock when counted above zero, else when flagged available; unknown
/// counts as in stock.
pub fn in_stock(variant: &Variant) -> bool {
    match quantity(variant) {
        Some(quantity) => quantity > 0 || variant.inventory.allow_backorder == Some(true),
        None => variant.inventory.available.unwrap_or(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{Inventory, OptionValue, Platform, Price, SourceRef};

    fn product(title: &str, slug: Option<&str>) -> Product {
        Product {
            title: title.to_string(),
            source: SourceRef {
                slug: slug.map(str::to_string),
                ..SourceRef::default()
            },
            variants: vec![Variant::default()],
            ..Product::default()
        }
    }

    #[test]
    fn handle_rules() {
        assert_eq!(handle(&product("Ignored", Some("Blue-Mug"))), "blue-mug");
        assert_eq!(handle(&product("Blue Mug!", Some("bad slug"))), "blue-mug");
        assert_eq!(handle(&product("!!!", None)), "product-item");
    }

    #[test]
    fn parent_sku_uses_source_token() {
        let mut item = product("Desk Lamp", None);
        assert_eq!(parent_sku(&item), "SRC:desk-lamp");
        item.source.platform = Some(Platform::AliExpress);
        item.source.id = Some("1005001".to_string());
        assert_eq!(parent_sku(&item), "AE:1005001");
    }

    #[test]
    fn tags_sort_case_insensitively() {
        let mut item = product("Mug", None);
        item.tags = vec!["zebra".into(), "Apple".into(), "mango".into(), "apple".into()];
        assert_eq!(sorted_tags(&item), "Apple,apple,mango,zebra");
    }

    #[test]
    fn fallback_axis_for_plain_variants() {
        let mut item = product("Poster", None);
        item.variants = vec![
            Variant {
                title: Some("Small".into()),
                ..Variant::default()
            },
            Variant {
                sku: Some("P-L".into()),
                ..Variant::default()
            },
        ];
        assert_eq!(option_axes(&item, 3), vec!["Option"]);
        assert_eq!(axis_values(&item, "Option"), vec!["Small", "P-L"]);

        item.variants[0].option_values.push(OptionValue {
            name: "Size".into(),
            value: "S".into(),
        });
        assert_eq!(option_axes(&item, 3), vec!["Size"]);
    }

    #[test]
    fn sale_price_split() {
        let mut item = product("Mug", None);
        item.variants[0].price = Some(
            Price::new("8".parse().unwrap(), None).with_compare_at(Some("12.50".parse().unwrap())),
        );
        assert_eq!(
            regular_and_sale(&item, item.variants.first()),
            ("12.5".to_string(), "8".to_string())
        );
        item.variants[0].inventory = Inventory::counted(0);
        assert!(!in_stock(&item.variants[0]));
    }

    #[test]
    fn stock_total_saturates() {
        let mut product = product("Bulk", None);
        product.variants = vec![
            Variant {
                inventory: Inventory::counted(i64::MAX),
                ..Variant::default()
            },
            Variant {
                inventory: Inventory::counted(i64::MAX),
                ..Variant::default()
            },
        ];
        assert_eq!(total_quantity(&product), Some(i64::MAX));
        product.variants.truncate(1);
        product.variants[0].inventory = Inventory::untracked(None);
        assert_eq!(total_quantity(&product), None);
    }

    #[test]
    fn cells_follow_variant_order() {
        let mut product = product("Tee", None);
        product.variants = ["S", "XL"]
            .iter()
            .zip(["10", "15"])
            .map(|(size, price)| Variant {
                sku: Some(format!("TEE-{size}")),
                option_values: vec![OptionValue {
                    name: "Size".into(),
                    value: (*size).into(),
                }],
                price: Some(Price::new(price.parse().unwrap(), None)),
                inventory: Inventory::counted(3),
                ..Variant::default()
            })
            .collect();
        let cells = variant_cells(&product, &["Size".to_string()]);
        assert_eq!(join_cells(&cells, ";", |cell| cell.sku.as_str()), "TEE-S;TEE-XL");
        assert_eq!(join_cells(&cells, ";", |cell| cell.price.as_str()), "10;15");
        assert_eq!(cells[1].choices, vec![("Size".to_string(), "XL".to_string())]);
        assert_eq!(cells[0].sale, "");
    }
}
