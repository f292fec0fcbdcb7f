//! Target-platform validation for canonical products.
//!
//! A product is checked against one export target's constraint set:
//! required-field presence, unit compatibility and cardinality bounds.
//! Each check yields [`Finding`]s with a rule code, field path and
//! [`Severity`]. Fatal findings block export; advisory ones are reported.
//!
//! # Example
//!
//! ```ignore
//! use catalog_model::TargetPlatform;
//! use catalog_validate::validate;
//!
//! let report = validate(&product, TargetPlatform::Shopify);
//! for finding in report.advisories() {
//!     println!("{finding}");
//! }
//! let report = report.into_result()?;
//! ```

mod checks;
pub mod issue;
pub mod limits;
pub mod report;

use catalog_model::{Product, TargetPlatform};
use tracing::debug;

// === Findings ===
pub use issue::{Category, Finding, Severity};

// === Reports ===
pub use report::{ValidationError, ValidationReport};

// === Limits ===
pub use limits::TargetLimits;

/// Check `product` against every rule for `target`.
///
/// Weight units are compared against the target's allowed set as they
/// stand, so this runs on the unit-converted value in the export pipeline.
#[tracing::instrument(skip_all, fields(platform = %target))]
pub fn validate(product: &Product, target: TargetPlatform) -> ValidationReport {
    let report = checks::run_all(product, target);
    debug!(
        fatal = report.fatal_count(),
        advisory = report.advisory_count(),
        "validated product"
    );
    report
}
