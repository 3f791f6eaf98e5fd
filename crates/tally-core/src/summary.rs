//! Aggregated views over a normalized corpus
//!
//! All three summaries expect reports that already went through background
//! merging and indexing; [`Generation::run`](crate::Generation::run) is the
//! entry point that guarantees that order.

use crate::count::ResultCount;
use crate::error::ReportError;
use crate::model::{Report, Tag};
use crate::status::Status;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// Scenario counts for one feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureEntry {
    /// Feature index (also used in the feature page file name)
    pub index: usize,
    pub name: String,
    /// Positions of the reports rolled into this feature
    pub reports: Vec<usize>,
    pub counts: ResultCount,
}

/// By-feature view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureSummary {
    features: Vec<FeatureEntry>,
    total: ResultCount,
}

impl FeatureSummary {
    /// Build the by-feature view. Reports sharing a feature index are rolled
    /// into one entry; entries come out in index order.
    pub fn build(reports: &[Report]) -> Result<Self, ReportError> {
        let mut features: IndexMap<usize, FeatureEntry> = IndexMap::new();
        let mut total = ResultCount::new();

        for (position, report) in reports.iter().enumerate() {
            debug_assert!(report.feature_index().is_some(), "report not indexed");
            let index = report.feature_index().unwrap_or_default();
            let entry = features.entry(index).or_insert_with(|| FeatureEntry {
                index,
                name: report.name.clone(),
                reports: Vec::new(),
                counts: ResultCount::new(),
            });
            entry.reports.push(position);

            for element in report.scenarios() {
                let status = element.status()?;
                entry.counts.add(status);
                total.add(status);
            }
        }

        let mut features: Vec<FeatureEntry> = features.into_values().collect();
        features.sort_by_key(|f| f.index);
        Ok(Self { features, total })
    }

    pub fn features(&self) -> &[FeatureEntry] {
        &self.features
    }

    pub fn get(&self, index: usize) -> Option<&FeatureEntry> {
        self.features.iter().find(|f| f.index == index)
    }

    /// Scenario counts across every feature
    pub fn total(&self) -> ResultCount {
        self.total
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// By-tag view, in first-seen tag order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSummary {
    tags: IndexMap<Tag, ResultCount>,
}

impl TagSummary {
    /// Count every scenario once per distinct tag it carries.
    pub fn build(reports: &[Report]) -> Result<Self, ReportError> {
        let mut tags: IndexMap<Tag, ResultCount> = IndexMap::new();

        for element in reports.iter().flat_map(Report::scenarios) {
            let status = element.status()?;
            let mut seen = HashSet::new();
            for tag in &element.tags {
                if !seen.insert(tag.name.as_str()) {
                    continue;
                }
                tags.entry(tag.clone()).or_default().add(status);
            }
        }

        Ok(Self { tags })
    }

    pub fn get(&self, name: &str) -> Option<&ResultCount> {
        self.tags.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &ResultCount)> {
        self.tags.iter()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.keys()
    }

    /// Number of distinct tags
    pub fn total_tags(&self) -> usize {
        self.tags.len()
    }

    /// Tags with at least one failed scenario
    pub fn failed_tags(&self) -> usize {
        self.count_where(|c| c.failed() > 0)
    }

    /// Tags whose scenarios all passed
    pub fn passed_tags(&self) -> usize {
        self.count_where(|c| c.failed() == 0 && c.skipped() == 0 && c.passed() > 0)
    }

    /// Tags without failures but with at least one skipped scenario
    pub fn skipped_tags(&self) -> usize {
        self.count_where(|c| c.failed() == 0 && c.skipped() > 0)
    }

    /// Tally of tags by their aggregated outcome
    pub fn tag_outcomes(&self) -> ResultCount {
        self.tags
            .values()
            .filter(|c| !c.is_empty())
            .map(|c| {
                if c.failed() > 0 {
                    Status::Failed
                } else if c.skipped() > 0 {
                    Status::Skipped
                } else {
                    Status::Passed
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    fn count_where(&self, predicate: impl Fn(&ResultCount) -> bool) -> usize {
        self.tags.values().filter(|c| predicate(c)).count()
    }
}

/// One scenario in the flat by-scenario view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioEntry {
    pub scenario_index: usize,
    /// Position of the owning report in the corpus
    pub report: usize,
    /// Position of the element inside the owning report
    pub element: usize,
    pub feature_index: usize,
    pub feature_name: String,
    pub name: String,
    pub status: Status,
    pub tags: Vec<Tag>,
    /// Step-level counts, background steps included
    pub steps: ResultCount,
    /// Summed step duration in nanoseconds
    pub duration: u64,
}

/// By-scenario view, ordered by scenario index
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenarioSummary {
    scenarios: Vec<ScenarioEntry>,
    total: ResultCount,
}

impl ScenarioSummary {
    pub fn build(reports: &[Report]) -> Result<Self, ReportError> {
        let mut scenarios = Vec::new();
        let mut total = ResultCount::new();

        for (report_pos, report) in reports.iter().enumerate() {
            for (element_pos, element) in report.elements.iter().enumerate() {
                if element.is_background() {
                    continue;
                }
                debug_assert!(element.scenario_index().is_some(), "scenario not indexed");
                let status = element.status()?;
                let steps = element
                    .steps
                    .iter()
                    .map(|s| s.status())
                    .collect::<Result<ResultCount, _>>()?;
                total.add(status);
                scenarios.push(ScenarioEntry {
                    scenario_index: element.scenario_index().unwrap_or_default(),
                    report: report_pos,
                    element: element_pos,
                    feature_index: report.feature_index().unwrap_or_default(),
                    feature_name: report.name.clone(),
                    name: element.name.clone(),
                    status,
                    tags: element.tags.clone(),
                    steps,
                    duration: element.total_duration(),
                });
            }
        }

        scenarios.sort_by_key(|s| s.scenario_index);
        Ok(Self { scenarios, total })
    }

    pub fn scenarios(&self) -> &[ScenarioEntry] {
        &self.scenarios
    }

    pub fn get(&self, scenario_index: usize) -> Option<&ScenarioEntry> {
        self.scenarios
            .binary_search_by_key(&scenario_index, |s| s.scenario_index)
            .ok()
            .map(|pos| &self.scenarios[pos])
    }

    /// Scenarios belonging to one feature
    pub fn for_feature(&self, feature_index: usize) -> impl Iterator<Item = &ScenarioEntry> {
        self.scenarios
            .iter()
            .filter(move |s| s.feature_index == feature_index)
    }

    /// Scenarios carrying a tag
    pub fn with_tag<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ScenarioEntry> {
        self.scenarios
            .iter()
            .filter(move |s| s.tags.iter().any(|t| t.name == name))
    }

    /// Scenario-level counts across the run
    pub fn total(&self) -> ResultCount {
        self.total
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Indexer;
    use crate::model::{Element, Step};

    fn scenario(name: &str, tags: &[&str], status: &str) -> Element {
        tags.iter()
            .fold(Element::scenario(name), |e, t| e.with_tag(*t))
            .with_step(Step::new("Given ", name).with_status(status))
    }

    fn indexed(mut reports: Vec<Report>) -> Vec<Report> {
        Indexer::new().assign(&mut reports);
        reports
    }

    fn tagged_corpus() -> Vec<Report> {
        indexed(vec![
            Report::new("feature")
                .with_element(scenario("one", &["tag1", "tag2"], "failed"))
                .with_element(scenario("two", &["tag2"], "passed"))
                .with_element(scenario("three", &["tag3"], "skipped")),
        ])
    }

    fn assert_counts(count: &ResultCount, total: usize, passed: usize, failed: usize, skipped: usize) {
        assert_eq!(
            (count.total(), count.passed(), count.failed(), count.skipped()),
            (total, passed, failed, skipped)
        );
    }

    #[test]
    fn empty_corpus_has_no_tags() {
        let summary = TagSummary::build(&[]).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.total_tags(), 0);
    }

    #[test]
    fn tag_counts() {
        let summary = TagSummary::build(&tagged_corpus()).unwrap();
        assert_eq!(summary.total_tags(), 3);
        assert_counts(summary.get("tag1").unwrap(), 1, 0, 1, 0);
        assert_counts(summary.get("tag2").unwrap(), 2, 1, 1, 0);
        assert_counts(summary.get("tag3").unwrap(), 1, 0, 0, 1);
    }

    #[test]
    fn tag_outcome_totals() {
        let summary = TagSummary::build(&tagged_corpus()).unwrap();
        assert_eq!(summary.failed_tags(), 2);
        assert_eq!(summary.passed_tags(), 0);
        assert_eq!(summary.skipped_tags(), 1);

        let outcomes = summary.tag_outcomes();
        assert_counts(&outcomes, 3, 0, 2, 1);
    }

    #[test]
    fn tags_keep_first_seen_order() {
        let summary = TagSummary::build(&tagged_corpus()).unwrap();
        let names: Vec<_> = summary.tags().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["tag1", "tag2", "tag3"]);
    }

    #[test]
    fn repeated_tag_on_one_scenario_counts_once() {
        let reports = indexed(vec![
            Report::new("f").with_element(scenario("dup", &["a", "a"], "passed")),
        ]);
        let summary = TagSummary::build(&reports).unwrap();
        assert_counts(summary.get("a").unwrap(), 1, 1, 0, 0);
        assert_eq!(summary.passed_tags(), 1);
    }

    #[test]
    fn features_roll_up_by_index() {
        let reports = indexed(vec![
            Report::new("Login").with_element(scenario("a", &[], "passed")),
            Report::new("Search").with_element(scenario("b", &[], "failed")),
            Report::new("Login").with_element(scenario("c", &[], "skipped")),
            Report::new("Empty"),
        ]);
        let summary = FeatureSummary::build(&reports).unwrap();

        assert_eq!(summary.len(), 3);
        let login = summary.get(0).unwrap();
        assert_eq!(login.name, "Login");
        assert_eq!(login.reports, [0, 2]);
        assert_counts(&login.counts, 2, 1, 0, 1);

        let empty = summary.get(2).unwrap();
        assert_eq!(empty.name, "Empty");
        assert!(empty.counts.is_empty());

        assert_counts(&summary.total(), 3, 1, 1, 1);
    }

    #[test]
    fn scenarios_are_flat_and_ordered() {
        let reports = indexed(vec![
            Report::new("A")
                .with_element(scenario("a1", &["x"], "passed"))
                .with_element(scenario("a2", &[], "failed")),
            Report::new("B").with_element(scenario("b1", &["x"], "skipped")),
        ]);
        let summary = ScenarioSummary::build(&reports).unwrap();

        let indices: Vec<_> = summary.scenarios().iter().map(|s| s.scenario_index).collect();
        assert_eq!(indices, [0, 1, 2]);

        let b1 = summary.get(2).unwrap();
        assert_eq!(b1.name, "b1");
        assert_eq!(b1.feature_name, "B");
        assert_eq!(b1.feature_index, 1);
        assert_eq!((b1.report, b1.element), (1, 0));
        assert_eq!(b1.status, Status::Skipped);

        assert_eq!(summary.for_feature(0).count(), 2);
        let tagged: Vec<_> = summary.with_tag("x").map(|s| s.name.as_str()).collect();
        assert_eq!(tagged, ["a1", "b1"]);
        assert_counts(&summary.total(), 3, 1, 1, 1);
    }

    #[test]
    fn scenario_step_counts_include_every_step() {
        let element = Element::scenario("mixed")
            .with_step(Step::new("Given ", "a").with_status("passed"))
            .with_step(Step::new("When ", "b").with_status("failed"))
            .with_step(Step::new("Then ", "c").with_status("skipped"));
        let reports = indexed(vec![Report::new("f").with_element(element)]);
        let summary = ScenarioSummary::build(&reports).unwrap();

        let entry = summary.get(0).unwrap();
        assert_eq!(entry.status, Status::Failed);
        assert_counts(&entry.steps, 3, 1, 1, 1);
    }

    #[test]
    fn unknown_status_fails_every_view() {
        let reports = indexed(vec![
            Report::new("f").with_element(scenario("bad", &["t"], "exploded")),
        ]);
        assert!(FeatureSummary::build(&reports).is_err());
        assert!(TagSummary::build(&reports).is_err());
        assert!(ScenarioSummary::build(&reports).is_err());
    }
}
