//! Scenario status resolution

use crate::error::ReportError;
use crate::model::Step;
use serde::Serialize;
use std::fmt;

/// Outcome of a step or scenario.
///
/// Variants are ordered by precedence, so the "worst" status is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Skipped,
    Failed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Passed, Status::Skipped, Status::Failed];

    /// Parse a raw status string, ignoring ASCII case.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| raw.eq_ignore_ascii_case(status.as_str()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Skipped => "skipped",
            Status::Failed => "failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a scenario's status from its steps.
///
/// Any failed step fails the scenario; otherwise any skipped step skips it.
/// A scenario without steps has passed. Every step is checked, so an unknown
/// status is reported even when an earlier step already failed.
pub fn resolve(steps: &[Step]) -> Result<Status, ReportError> {
    let mut resolved = Status::Passed;
    for step in steps {
        resolved = resolved.max(step.status()?);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(statuses: &[&str]) -> Vec<Step> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| Step::new("Given ", format!("step {i}")).with_status(*s))
            .collect()
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!(Status::parse("passed"), Some(Status::Passed));
        assert_eq!(Status::parse("FAILED"), Some(Status::Failed));
        assert_eq!(Status::parse("Skipped"), Some(Status::Skipped));
        assert_eq!(Status::parse("pending"), None);
        assert_eq!(Status::parse(""), None);
    }

    #[test]
    fn all_lists_statuses_in_precedence_order() {
        assert!(Status::ALL.is_sorted());
        assert_eq!(Status::ALL.into_iter().max(), Some(Status::Failed));
    }

    #[test]
    fn no_steps_is_passed() {
        assert_eq!(resolve(&[]).unwrap(), Status::Passed);
    }

    #[test]
    fn all_passed_is_passed() {
        assert_eq!(
            resolve(&steps(&["passed", "passed"])).unwrap(),
            Status::Passed
        );
    }

    #[test]
    fn skipped_beats_passed() {
        assert_eq!(
            resolve(&steps(&["passed", "skipped"])).unwrap(),
            Status::Skipped
        );
    }

    #[test]
    fn failed_beats_everything() {
        assert_eq!(
            resolve(&steps(&["passed", "failed", "skipped"])).unwrap(),
            Status::Failed
        );
        assert_eq!(
            resolve(&steps(&["skipped", "failed"])).unwrap(),
            Status::Failed
        );
    }

    #[test]
    fn unknown_status_after_failure_is_still_reported() {
        let err = resolve(&steps(&["failed", "undefined"])).unwrap_err();
        assert!(matches!(
            err,
            ReportError::UnknownStatus { ref status, .. } if status == "undefined"
        ));
    }
}
