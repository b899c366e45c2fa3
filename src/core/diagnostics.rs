//! Run-wide diagnostic collector.
//!
//! Every stage records into the same collector and keeps going; the run
//! outcome is derived from what was recorded once the pass is complete.

use crate::issues::{Issue, Severity};

#[derive(Debug, Default)]
pub struct Diagnostics {
    issues: Vec<Issue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, issue: impl Into<Issue>) {
        self.issues.push(issue.into());
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// True if the run must be reported as failed.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == severity)
            .count()
    }
}
