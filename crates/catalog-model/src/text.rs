//! Text and number helpers shared by importers and exporters.
//!
//! Source documents are loose about formatting: prices carry currency
//! symbols and thousands separators, booleans arrive as `yes`/`1`/`TRUE`,
//! descriptions are HTML. These helpers turn such cells into typed values
//! and back into the plain strings CSV targets expect.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex"));
static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid slug regex"));

/// Parse a money or measurement cell into a normalized decimal.
///
/// Thousands separators and any character other than digits, `.` and `-`
/// are dropped, so `"$1,299.00"` parses as `1299`.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    if cleaned.is_empty() || cleaned == "-" || cleaned == "." {
        return None;
    }
    cleaned.parse::<Decimal>().ok().map(|value| value.normalize())
}

/// Render a decimal without trailing zeros; negative zero prints as `0`.
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Parse an integer cell, truncating fractional input (`"3.0"` is 3).
pub fn parse_int(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(parsed);
    }
    trimmed.parse::<Decimal>().ok()?.trunc().to_i64()
}

/// Parse the boolean spellings used by storefront exports.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Trim, drop empties and de-duplicate while keeping first-seen order.
pub fn ordered_unique<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values: Vec<String> = Vec::new();
    for item in items {
        let cleaned = item.as_ref().trim();
        if cleaned.is_empty() || values.iter().any(|existing| existing == cleaned) {
            continue;
        }
        values.push(cleaned.to_string());
    }
    values
}

/// Split a delimited cell into unique, trimmed tokens.
pub fn split_tokens(value: &str, separator: char) -> Vec<String> {
    ordered_unique(value.split(separator))
}

/// Lowercase ASCII slug with single `-` separators.
pub fn slugify(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    SLUG_SEPARATORS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Remove markup and collapse whitespace.
pub fn strip_html(value: &str) -> String {
    let without_tags = HTML_TAG.replace_all(value, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters on a char boundary.
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Normalize an image URL: protocol-relative URLs get `https:`, anything
/// that is not http(s) is rejected.
pub fn normalize_url(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if let Some(rest) = trimmed.strip_prefix("//") {
        if rest.is_empty() {
            return None;
        }
        return Some(format!("https://{rest}"));
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Some(trimmed.to_string());
    }
    None
}

/// Returns `None` for blank strings, otherwise the trimmed text.
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_money() {
        assert_eq!(parse_decimal("$1,299.00"), Some(Decimal::new(1299, 0)));
        assert_eq!(parse_decimal(" 2.50 ").map(format_decimal).as_deref(), Some("2.5"));
        assert_eq!(parse_decimal("-0.0").map(format_decimal).as_deref(), Some("0"));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("n/a"), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("12"), Some(12));
        assert_eq!(parse_int("3.9"), Some(3));
        assert_eq!(parse_int("-2"), Some(-2));
        assert_eq!(parse_int("lots"), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_ordered_unique() {
        assert_eq!(
            ordered_unique([" b", "a", "b ", "", "a"]),
            vec!["b".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Blue Widget (XL)! "), "blue-widget-xl");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Soft&nbsp;cotton</p>\n<ul><li>Warm</li></ul>"),
            "Soft cotton Warm"
        );
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("//cdn.example.com/a.jpg").as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
        assert_eq!(normalize_url("/relative.jpg"), None);
    }
}
