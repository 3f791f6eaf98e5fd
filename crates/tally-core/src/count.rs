//! Pass/fail/skip tallies

use crate::status::Status;
use serde::Serialize;

/// Tally of outcomes for a feature, tag, scenario or the whole run.
///
/// Fields only change through [`ResultCount::add`] and [`ResultCount::merge`],
/// so `total == passed + failed + skipped` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultCount {
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
}

impl ResultCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Skipped => self.skipped += 1,
        }
    }

    pub fn merge(&mut self, other: &ResultCount) {
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Passed => self.passed,
            Status::Failed => self.failed,
            Status::Skipped => self.skipped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Percentage of passed entries (0.0 - 100.0); an empty tally counts as 100%.
    pub fn pass_percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.passed as f64 / self.total as f64) * 100.0
    }
}

impl Extend<Status> for ResultCount {
    fn extend<I: IntoIterator<Item = Status>>(&mut self, iter: I) {
        for status in iter {
            self.add(status);
        }
    }
}

impl FromIterator<Status> for ResultCount {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        let mut count = ResultCount::new();
        count.extend(iter);
        count
    }
}
