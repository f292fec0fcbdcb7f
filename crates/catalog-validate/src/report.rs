//! Validation report and its failure form.

use catalog_model::TargetPlatform;
use serde::Serialize;
use thiserror::Error;

use crate::issue::{Finding, Severity};

/// All findings for one product against one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub target: TargetPlatform,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new(target: TargetPlatform) -> Self {
        Self {
            target,
            findings: Vec::new(),
        }
    }

    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn fatal_count(&self) -> usize {
        self.count(Severity::Fatal)
    }

    pub fn advisory_count(&self) -> usize {
        self.count(Severity::Advisory)
    }

    pub fn has_fatal(&self) -> bool {
        self.fatal_count() > 0
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn fatals(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|finding| finding.is_fatal())
    }

    pub fn advisories(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|finding| !finding.is_fatal())
    }

    /// Turn a report with fatal findings into an error; otherwise return it
    /// unchanged so advisories can still be shown.
    pub fn into_result(self) -> Result<Self, ValidationError> {
        if self.has_fatal() {
            Err(ValidationError {
                target: self.target,
                findings: self.findings,
            })
        } else {
            Ok(self)
        }
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity() == severity)
            .count()
    }
}

/// A product failed one or more fatal checks for a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} fatal finding(s) for {target}: {}", fatal_count(.findings), first_fatal(.findings))]
pub struct ValidationError {
    pub target: TargetPlatform,
    /// Every finding, advisory ones included.
    pub findings: Vec<Finding>,
}

impl ValidationError {
    pub fn fatals(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|finding| finding.is_fatal())
    }
}

fn fatal_count(findings: &[Finding]) -> usize {
    findings.iter().filter(|finding| finding.is_fatal()).count()
}

fn first_fatal(findings: &[Finding]) -> String {
    findings
        .iter()
        .find(|finding| finding.is_fatal())
        .map(Finding::message)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_result() {
        let mut report = ValidationReport::new(TargetPlatform::Shopify);
        report.add(Finding::MissingMedia);
        assert_eq!(report.advisory_count(), 1);
        assert!(!report.has_fatal());
        let report = report.into_result().unwrap();

        let mut failing = report.clone();
        failing.add(Finding::MissingTitle);
        assert_eq!(failing.fatal_count(), 1);
        let err = failing.into_result().unwrap_err();
        assert_eq!(err.findings.len(), 2);
        assert_eq!(
            err.to_string(),
            "1 fatal finding(s) for shopify: Product title is empty"
        );
    }
}
