//! Validation report accumulated across the pipeline stages.
//!
//! Data-quality problems that do not abort the run are collected here and
//! serialized alongside the flat file, so a release can be published with a
//! machine-readable record of what was repaired or skipped.

use serde::{Deserialize, Serialize};

/// Severity of a recorded failure.
pub const FAIL_TYPE_ERROR: &str = "ERROR";

/// A single recorded problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Human-readable description of the problem.
    pub message: String,
    /// Severity marker, currently always [`FAIL_TYPE_ERROR`].
    #[serde(rename = "type")]
    pub fail_type: String,
    /// Supporting detail, usually the offending ids or terms.
    pub detail: String,
}

/// A named group of failures from one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCase {
    /// The check that produced these failures.
    pub name: String,
    /// The failures, in the order they were recorded.
    pub failures: Vec<ValidationFailure>,
}

/// All problems recorded during one run.
///
/// Cases keep insertion order; recording a failure under an existing case
/// name appends to that case rather than creating a duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// The recorded cases.
    pub cases: Vec<ValidationCase>,
}

impl ValidationReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure under `case_name`.
    pub fn add_failure(&mut self, case_name: &str, message: &str, detail: String) {
        let failure = ValidationFailure {
            message: message.to_string(),
            fail_type: FAIL_TYPE_ERROR.to_string(),
            detail,
        };

        if let Some(case) = self.cases.iter_mut().find(|c| c.name == case_name) {
            case.failures.push(failure);
        } else {
            self.cases.push(ValidationCase {
                name: case_name.to_string(),
                failures: vec![failure],
            });
        }
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Total failure count across all cases.
    pub fn failure_count(&self) -> usize {
        self.cases.iter().map(|c| c.failures.len()).sum()
    }

    /// Looks up a case by name.
    pub fn case(&self, name: &str) -> Option<&ValidationCase> {
        self.cases.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_group_by_case_name() {
        let mut report = ValidationReport::new();
        report.add_failure("Inactive_with_parents", "inactive concept has parents", "1".into());
        report.add_failure("Null_or_empty_FSN", "concept has no FSN", "2".into());
        report.add_failure("Inactive_with_parents", "inactive concept has parents", "3".into());

        assert_eq!(report.cases.len(), 2);
        assert_eq!(report.failure_count(), 3);
        assert_eq!(report.case("Inactive_with_parents").unwrap().failures.len(), 2);
    }

    #[test]
    fn test_case_order_is_insertion_order() {
        let mut report = ValidationReport::new();
        report.add_failure("b", "m", String::new());
        report.add_failure("a", "m", String::new());

        assert_eq!(report.cases[0].name, "b");
        assert_eq!(report.cases[1].name, "a");
    }

    #[test]
    fn test_report_serializes() {
        let mut report = ValidationReport::new();
        report.add_failure("TPP error", "TPP has too many TPs (123)", "456 789".into());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"type\":\"ERROR\""));

        let parsed: ValidationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
