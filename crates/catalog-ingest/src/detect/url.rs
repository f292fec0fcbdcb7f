//! Product URL classification.
//!
//! Predicates run in a fixed order and the first match wins:
//!
//! 1. Amazon (host contains `amazon.`)
//! 2. AliExpress (host contains `aliexpress.`)
//! 3. WooCommerce Store API product path
//! 4. Any other WooCommerce REST path
//! 5. WooCommerce storefront product page or `?product=` / `?post_type=product&p=`
//! 6. Squarespace (hosted domain, or `format=json` on a shop path)
//! 7. Shopify (`/products/<handle>` path, or a `.myshopify.com` host)
//!
//! WooCommerce and Squarespace run before Shopify because Shopify's
//! `/products/` shape is the most generic.

use std::sync::LazyLock;

use catalog_model::Platform;
use regex::Regex;
use serde::Serialize;
use url::Url;

static AMAZON_ASIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(?:gp/product|dp)/([A-Z0-9]{10})(?:[/?#]|$)").expect("Invalid ASIN regex")
});
static ASIN_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9]{10}$").expect("Invalid ASIN value regex"));
static ALIEXPRESS_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(?:item|i)/(\d+)\.html(?:[/?#]|$)").expect("Invalid AliExpress regex")
});
static WOO_STORE_API_PRODUCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/wp-json/wc/store/v1/products/([^/?#]+)/?$")
        .expect("Invalid Woo Store API regex")
});
static WOO_API: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/wp-json/wc/(?:store/v1|v[1-9]+)/").expect("Invalid Woo API regex")
});
static WOO_PRODUCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/(?:[a-z]{2}(?:-[a-z0-9]{2,8})?/)?product/([^/?#]+)/?$")
        .expect("Invalid Woo product regex")
});
static SQUARESPACE_PRODUCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/(?:shop|store)/(?:p/)?([a-z0-9-]+)/?$").expect("Invalid Squarespace regex")
});
static SQUARESPACE_SHOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/(?:shop|store)(?:/|$)").expect("Invalid Squarespace shop regex")
});
static SHOPIFY_PRODUCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^/(?:[a-z]{2}(?:-[a-z0-9]{2,8})?/)?(?:collections/[^/]+/)?products/([^/?#]+?)(?:\.(?:js|json))?/?$",
    )
    .expect("Invalid Shopify regex")
});
static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("Invalid digits regex"));

/// What a URL says about its platform and product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrlDetection {
    /// `None` means unknown.
    pub platform: Option<Platform>,
    pub is_product: bool,
    pub product_id: Option<String>,
    pub slug: Option<String>,
}

impl UrlDetection {
    fn platform(platform: Platform) -> Self {
        Self {
            platform: Some(platform),
            ..Self::default()
        }
    }

    fn product_id(platform: Platform, id: &str) -> Self {
        Self {
            platform: Some(platform),
            is_product: true,
            product_id: Some(id.to_string()),
            slug: None,
        }
    }

    /// Path tokens arrive percent-encoded; the slug is kept decoded.
    fn slug(platform: Platform, slug: &str) -> Self {
        Self {
            platform: Some(platform),
            is_product: true,
            product_id: None,
            slug: Some(String::from_utf8_lossy(&urlencoding::decode_binary(slug.as_bytes())).into_owned()),
        }
    }

    /// Platform tag, or `unknown`.
    pub fn platform_label(&self) -> &'static str {
        self.platform.map_or("unknown", Platform::as_str)
    }
}

/// Classify a URL. Never fails: unparseable input is simply unknown.
pub fn detect_url(raw: &str) -> UrlDetection {
    let Ok(url) = Url::parse(raw.trim()) else {
        return UrlDetection::default();
    };
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let path = url.path();
    let query = |key: &str| -> Option<String> {
        url.query_pairs()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.trim().to_string())
    };

    if host.contains("amazon.") {
        if let Some(captures) = AMAZON_ASIN.captures(path) {
            return UrlDetection::product_id(Platform::Amazon, &captures[1]);
        }
        let asin = query("asin").or_else(|| query("ASIN"));
        if let Some(asin) = asin.filter(|value| ASIN_VALUE.is_match(value)) {
            return UrlDetection::product_id(Platform::Amazon, &asin);
        }
        return UrlDetection::platform(Platform::Amazon);
    }

    if host.contains("aliexpress.") {
        if let Some(captures) = ALIEXPRESS_ITEM.captures(path) {
            return UrlDetection::product_id(Platform::AliExpress, &captures[1]);
        }
        return UrlDetection::platform(Platform::AliExpress);
    }

    if let Some(captures) = WOO_STORE_API_PRODUCT.captures(path) {
        let token = &captures[1];
        return if DIGITS.is_match(token) {
            UrlDetection::product_id(Platform::WooCommerce, token)
        } else {
            UrlDetection::slug(Platform::WooCommerce, token)
        };
    }
    if WOO_API.is_match(path) {
        return UrlDetection::platform(Platform::WooCommerce);
    }
    if let Some(captures) = WOO_PRODUCT.captures(path) {
        return UrlDetection::slug(Platform::WooCommerce, &captures[1]);
    }
    if let Some(id) = query("product").filter(|value| DIGITS.is_match(value)) {
        return UrlDetection::product_id(Platform::WooCommerce, &id);
    }
    if query("post_type").as_deref() == Some("product")
        && let Some(id) = query("p").filter(|value| DIGITS.is_match(value))
    {
        return UrlDetection::product_id(Platform::WooCommerce, &id);
    }

    let squarespace_slug = SQUARESPACE_PRODUCT
        .captures(path)
        .map(|captures| captures[1].to_string());
    let json_format = query("format")
        .map(|value| value.to_ascii_lowercase())
        .is_some_and(|value| value == "json" || value == "json-pretty");
    if host.ends_with(".squarespace.com") || (json_format && SQUARESPACE_SHOP.is_match(path)) {
        return match squarespace_slug {
            Some(slug) => UrlDetection::slug(Platform::Squarespace, &slug),
            None => UrlDetection::platform(Platform::Squarespace),
        };
    }

    if let Some(captures) = SHOPIFY_PRODUCT.captures(path) {
        return UrlDetection::slug(Platform::Shopify, &captures[1]);
    }
    if host.ends_with(".myshopify.com") {
        return UrlDetection::platform(Platform::Shopify);
    }

    UrlDetection::default()
}
