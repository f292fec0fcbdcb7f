//! Canonical product JSON payloads, as written by `catalog import`.

use catalog_model::{ModelError, Product};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Decode a canonical product and re-establish its invariants.
///
/// Hand-edited payloads are normalized before the structural check, so
/// media positions and tag order need not be exact on input.
#[tracing::instrument(skip_all, fields(bytes = text.len()))]
pub fn import_canonical_json(text: &str) -> Result<Product> {
    let product = Product::from_json(text).map_err(|err| match err {
        ModelError::Json { message } => IngestError::CanonicalJson { message },
        other => IngestError::from(other),
    })?;
    let product = product.normalized();
    product.check_structure()?;
    debug!(
        title = %product.title,
        variants = product.variants.len(),
        "decoded canonical product"
    );
    Ok(product)
}
