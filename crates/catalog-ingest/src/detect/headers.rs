//! CSV header fingerprinting.

use catalog_model::Platform;

/// Layout of a BigCommerce export; the other platforms have one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    Standard,
    BigCommerceModern,
    BigCommerceLegacy,
}

/// Header fingerprints, most specific first. Every listed header must be
/// present for a fingerprint to match.
const FINGERPRINTS: &[(Platform, CsvLayout, &[&str])] = &[
    (
        Platform::Squarespace,
        CsvLayout::Standard,
        &["Title", "SKU", "Price", "Product Type [Non Editable]", "Visible"],
    ),
    (
        Platform::Wix,
        CsvLayout::Standard,
        &["handle", "fieldType", "name", "price", "sku"],
    ),
    (
        Platform::BigCommerce,
        CsvLayout::BigCommerceModern,
        &["Item", "SKU", "Name"],
    ),
    (
        Platform::BigCommerce,
        CsvLayout::BigCommerceLegacy,
        &["Product Type", "Code", "Name"],
    ),
    (
        Platform::WooCommerce,
        CsvLayout::Standard,
        &["Type", "SKU", "Name", "Regular price"],
    ),
    (
        Platform::Shopify,
        CsvLayout::Standard,
        &["Handle", "Title", "Variant SKU", "Variant Price"],
    ),
];

/// Clean one header cell: trim whitespace and a leading byte-order mark.
pub fn normalize_header(value: &str) -> String {
    value.trim_start_matches('\u{feff}').trim().to_string()
}

/// Match a header row against the fingerprints.
pub fn detect_csv_layout<S: AsRef<str>>(headers: &[S]) -> Option<(Platform, CsvLayout)> {
    let cleaned: Vec<String> = headers
        .iter()
        .map(|header| normalize_header(header.as_ref()))
        .collect();
    FINGERPRINTS
        .iter()
        .find(|(_, _, required)| {
            required
                .iter()
                .all(|header| cleaned.iter().any(|candidate| candidate == header))
        })
        .map(|(platform, layout, _)| (*platform, *layout))
}

/// Platform of a header row, or `None` for unknown.
pub fn detect_csv_headers<S: AsRef<str>>(headers: &[S]) -> Option<Platform> {
    detect_csv_layout(headers).map(|(platform, _)| platform)
}

/// Platform of a raw CSV file, read from its first record only. Inputs
/// that cannot be decoded are unknown rather than an error.
pub fn detect_csv(bytes: &[u8]) -> Option<Platform> {
    let text = std::str::from_utf8(bytes).ok()?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let first = reader.records().next()?.ok()?;
    let headers: Vec<&str> = first.iter().collect();
    detect_csv_headers(&headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprints_in_order() {
        assert_eq!(
            detect_csv_headers(&["Handle", "Title", "Body (HTML)", "Variant SKU", "Variant Price"]),
            Some(Platform::Shopify)
        );
        assert_eq!(
            detect_csv_layout(&["Item", "ID", "Name", "Type", "SKU"]),
            Some((Platform::BigCommerce, CsvLayout::BigCommerceModern))
        );
        assert_eq!(
            detect_csv_layout(&["Product Type", "Code", "Name", "Calculated Price"]),
            Some((Platform::BigCommerce, CsvLayout::BigCommerceLegacy))
        );
        assert_eq!(
            detect_csv_headers(&["Type", "SKU", "Name", "Regular price", "Parent"]),
            Some(Platform::WooCommerce)
        );
    }

    #[test]
    fn squarespace_wins_over_looser_matches() {
        let headers = [
            "Product ID [Non Editable]",
            "Product Type [Non Editable]",
            "Title",
            "SKU",
            "Price",
            "Visible",
        ];
        assert_eq!(detect_csv_headers(&headers), Some(Platform::Squarespace));
    }

    #[test]
    fn bom_and_whitespace_are_ignored() {
        let bytes = "\u{feff}handle , fieldType,name,price,sku\nmug,PRODUCT,Mug,5,M-1\n";
        assert_eq!(detect_csv(bytes.as_bytes()), Some(Platform::Wix));
    }

    #[test]
    fn unknown_headers() {
        assert_eq!(detect_csv_headers(&["id", "label"]), None);
        assert_eq!(detect_csv(&[0xff, 0xfe, 0x00]), None);
        assert_eq!(detect_csv(b""), None);
    }
}
