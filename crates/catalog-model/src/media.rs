//! Product and variant media.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::text::normalize_url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    Other,
}

/// One image (or other asset) attached to a product or a set of variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
    #[serde(default)]
    pub alt: Option<String>,
    /// 1-based position within the owning list.
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub is_primary: bool,
    /// SKUs this asset applies to; empty means product-level.
    #[serde(default)]
    pub variant_skus: BTreeSet<String>,
}

impl Media {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            media_type: MediaType::Image,
            alt: None,
            position: 0,
            is_primary: false,
            variant_skus: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_alt(mut self, alt: Option<String>) -> Self {
        self.alt = alt;
        self
    }

    #[must_use]
    pub fn for_sku(mut self, sku: &str) -> Self {
        if !sku.trim().is_empty() {
            self.variant_skus.insert(sku.trim().to_string());
        }
        self
    }

    pub fn is_image(&self) -> bool {
        self.media_type == MediaType::Image
    }
}

/// Build an ordered media list from raw URLs.
///
/// URLs are normalized (protocol-relative URLs become `https:`), invalid and
/// duplicate entries are skipped, and positions start at 1 with the first
/// entry primary.
pub fn media_from_urls<I, S>(urls: I, variant_sku: Option<&str>) -> Vec<Media>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut media: Vec<Media> = Vec::new();
    for raw in urls {
        let Some(url) = normalize_url(raw.as_ref()) else {
            continue;
        };
        if media.iter().any(|existing| existing.url == url) {
            continue;
        }
        let mut item = Media::image(url);
        if let Some(sku) = variant_sku {
            item = item.for_sku(sku);
        }
        media.push(item);
    }
    renumber(&mut media);
    media
}

/// Re-establish positions `1..=n` and a single primary at position 1.
pub(crate) fn renumber(media: &mut [Media]) {
    for (index, item) in media.iter_mut().enumerate() {
        item.position = u32::try_from(index + 1).unwrap_or(u32::MAX);
        item.is_primary = index == 0;
    }
}

/// Verify the ordering invariant on an owned media list.
pub fn check_order(scope: &str, media: &[Media]) -> Result<()> {
    for (index, item) in media.iter().enumerate() {
        let expected = index + 1;
        if item.position as usize != expected {
            return Err(ModelError::MediaOrder {
                scope: scope.to_string(),
                index,
                reason: format!("position {} (expected {expected})", item.position),
            });
        }
        if item.is_primary != (index == 0) {
            let reason = if index == 0 {
                "first entry must be primary"
            } else {
                "only the first entry may be primary"
            };
            return Err(ModelError::MediaOrder {
                scope: scope.to_string(),
                index,
                reason: reason.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_ordered_media() {
        let media = media_from_urls(
            ["//cdn.test/a.jpg", "https://cdn.test/b.jpg", "https://cdn.test/a.jpg", "x"],
            Some("SKU-1"),
        );
        assert_eq!(media.len(), 2);
        assert_eq!(media[0].url, "https://cdn.test/a.jpg");
        assert!(media[0].is_primary);
        assert_eq!(media[1].position, 2);
        assert!(media[1].variant_skus.contains("SKU-1"));
        assert!(check_order("product", &media).is_ok());
    }

    #[test]
    fn detects_second_primary() {
        let mut media = media_from_urls(["https://a.test/1.png", "https://a.test/2.png"], None);
        media[1].is_primary = true;
        let err = check_order("product", &media).unwrap_err();
        assert!(matches!(err, ModelError::MediaOrder { index: 1, .. }));
    }
}
