//! Identity indexing for features, scenarios and tags
//!
//! Generated pages are named after these indices, so the assignment order is
//! part of the output format: features are numbered by first-seen name,
//! scenarios by a single counter running over reports, then elements.

use crate::model::Report;
use indexmap::IndexSet;
use std::fmt::Write as _;

/// Index state owned by one generation run.
///
/// Two runs must never share an `Indexer`; create a fresh one per corpus.
#[derive(Debug, Default)]
pub struct Indexer {
    features: IndexSet<String>,
    next_scenario: usize,
}

impl Indexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of a feature name, appending it if it has not been seen yet.
    pub fn feature_index(&mut self, name: &str) -> usize {
        match self.features.get_index_of(name) {
            Some(index) => index,
            None => self.features.insert_full(name.to_string()).0,
        }
    }

    pub fn assign_feature(&mut self, report: &mut Report) {
        report.feature_index = Some(self.feature_index(&report.name));
    }

    /// Number every non-background element of the report, continuing the
    /// run-wide counter.
    pub fn assign_scenarios(&mut self, report: &mut Report) {
        for element in report.elements.iter_mut().filter(|e| !e.is_background()) {
            element.scenario_index = Some(self.next_scenario);
            self.next_scenario += 1;
        }
    }

    /// Assign feature and scenario indices to every report, in order.
    pub fn assign(&mut self, reports: &mut [Report]) {
        for report in reports {
            self.assign_feature(report);
            self.assign_scenarios(report);
        }
    }

    /// Feature names in index order
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(String::as_str)
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn scenario_count(&self) -> usize {
        self.next_scenario
    }
}

/// URL-safe slug for a tag name.
///
/// Lowercase ASCII letters, digits and `-` are kept. Every other character,
/// uppercase letters included, becomes `_<hex code point>_`. A leading `@`
/// is dropped; names without one are marked with a `_-` prefix, which no
/// escape sequence can start with. Distinct names never share a slug.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len() + 2);
    let rest = match name.strip_prefix('@') {
        Some(rest) => rest,
        None => {
            slug.push_str("_-");
            name
        }
    };
    for c in rest.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        } else {
            // writing to a String cannot fail
            let _ = write!(slug, "_{:x}_", u32::from(c));
        }
    }
    slug
}
