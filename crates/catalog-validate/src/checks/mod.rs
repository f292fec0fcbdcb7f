//! Validation check modules.
//!
//! Each module performs one family of checks against a target.

mod cardinality;
mod content;
mod required;
mod structure;
mod units;

use catalog_model::{Product, TargetPlatform};

use crate::report::ValidationReport;

/// Run all validation checks on a product for one target.
pub fn run_all(product: &Product, target: TargetPlatform) -> ValidationReport {
    let mut report = ValidationReport::new(target);

    // 1. Required fields (title, variants)
    for finding in required::check(product) {
        report.add(finding);
    }

    // 2. Structural invariants (media order, quantities, SKU resolution)
    for finding in structure::check(product, target) {
        report.add(finding);
    }

    // 3. Weight units against the target's allowed set
    for finding in units::check(product, target) {
        report.add(finding);
    }

    // 4. Option and variant cardinality
    for finding in cardinality::check(product, target) {
        report.add(finding);
    }

    // 5. Advisory content checks
    for finding in content::check(product, target) {
        report.add(finding);
    }

    report
}
