//! Platform capability registry.
//!
//! A fixed table from platform tag to what the pipeline can do with it.
//! It is built on first access and never changes afterwards.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use catalog_ingest::{CSV_SOURCES, ImportOptions, RawDocument, import_csv, import_raw};
use catalog_model::{Platform, Product, TargetPlatform};

/// Reads the first product of a CSV export.
pub type CsvImporter = fn(&[u8], Platform, &ImportOptions) -> catalog_ingest::Result<Product>;

/// Normalizes a typed raw document fetched in URL mode.
pub type RawImporter = fn(&RawDocument, &ImportOptions) -> catalog_ingest::Result<Product>;

/// What one platform supports.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub platform: Platform,
    /// URLs and CSV headers can be attributed to this platform.
    pub detect: bool,
    pub import_csv: Option<CsvImporter>,
    pub import_url: Option<RawImporter>,
    pub export: Option<TargetPlatform>,
}

impl Capabilities {
    pub fn can_import_csv(&self) -> bool {
        self.import_csv.is_some()
    }

    pub fn can_import_url(&self) -> bool {
        self.import_url.is_some()
    }

    pub fn can_export(&self) -> bool {
        self.export.is_some()
    }
}

/// Capability records keyed by platform.
#[derive(Debug)]
pub struct Registry {
    entries: BTreeMap<Platform, Capabilities>,
}

impl Registry {
    pub fn get(&self, platform: Platform) -> &Capabilities {
        // Built from Platform::ALL, so every platform has an entry.
        &self.entries[&platform]
    }

    /// Records in platform tag order.
    pub fn iter(&self) -> impl Iterator<Item = &Capabilities> {
        Platform::ALL.iter().map(|platform| self.get(*platform))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The shared registry, built on first access.
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(build_registry)
}

fn build_registry() -> Registry {
    let entries = Platform::ALL
        .iter()
        .map(|&platform| {
            let raw_source = matches!(
                platform,
                Platform::Shopify
                    | Platform::WooCommerce
                    | Platform::Squarespace
                    | Platform::Amazon
                    | Platform::AliExpress
            );
            let record = Capabilities {
                platform,
                detect: true,
                import_csv: CSV_SOURCES
                    .contains(&platform)
                    .then_some(import_csv as CsvImporter),
                import_url: raw_source.then_some(import_raw as RawImporter),
                export: platform.as_target(),
            };
            (platform, record)
        })
        .collect();
    Registry { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_platform_has_a_record() {
        let registry = registry();
        assert_eq!(registry.len(), Platform::ALL.len());
        let tags: Vec<&str> = registry.iter().map(|record| record.platform.as_str()).collect();
        assert_eq!(tags.len(), 7);
        assert!(std::ptr::eq(registry, super::registry()));
    }

    #[test]
    fn marketplaces_are_url_only() {
        let amazon = registry().get(Platform::Amazon);
        assert!(amazon.can_import_url());
        assert!(!amazon.can_import_csv());
        assert!(!amazon.can_export());

        let wix = registry().get(Platform::Wix);
        assert!(wix.can_import_csv());
        assert!(!wix.can_import_url());
        assert_eq!(wix.export, Some(TargetPlatform::Wix));
    }
}
