//! One normalization + aggregation run

use crate::error::ReportError;
use crate::index::Indexer;
use crate::merge::merge_backgrounds;
use crate::model::{Element, Report};
use crate::summary::{FeatureSummary, ScenarioEntry, ScenarioSummary, TagSummary};
use tracing::{debug, info};

/// Normalized corpus plus its summary views.
///
/// Only [`Generation::run`] builds one, so the reports are always merged and
/// indexed before anything is aggregated.
#[derive(Debug, Clone)]
pub struct Generation {
    reports: Vec<Report>,
    features: FeatureSummary,
    tags: TagSummary,
    scenarios: ScenarioSummary,
}

impl Generation {
    /// Merge backgrounds, assign indices and build every summary.
    ///
    /// An unknown step status anywhere in the corpus aborts the run.
    pub fn run(mut reports: Vec<Report>) -> Result<Self, ReportError> {
        for report in &mut reports {
            merge_backgrounds(report);
        }
        debug!("merged backgrounds for {} reports", reports.len());

        let mut indexer = Indexer::new();
        indexer.assign(&mut reports);
        debug!(
            features = indexer.feature_count(),
            scenarios = indexer.scenario_count(),
            "assigned indices"
        );

        let scenarios = ScenarioSummary::build(&reports)?;
        let features = FeatureSummary::build(&reports)?;
        let tags = TagSummary::build(&reports)?;

        let total = scenarios.total();
        info!(
            features = features.len(),
            scenarios = total.total(),
            passed = total.passed(),
            failed = total.failed(),
            skipped = total.skipped(),
            tags = tags.total_tags(),
            "report generation complete"
        );

        Ok(Self {
            reports,
            features,
            tags,
            scenarios,
        })
    }

    /// Normalized reports, backgrounds removed
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn features(&self) -> &FeatureSummary {
        &self.features
    }

    pub fn tags(&self) -> &TagSummary {
        &self.tags
    }

    pub fn scenarios(&self) -> &ScenarioSummary {
        &self.scenarios
    }

    /// Report owning a scenario entry
    pub fn report_of(&self, entry: &ScenarioEntry) -> &Report {
        &self.reports[entry.report]
    }

    /// Element behind a scenario entry
    pub fn element_of(&self, entry: &ScenarioEntry) -> &Element {
        &self.reports[entry.report].elements[entry.element]
    }

    /// Whether every scenario passed or was skipped
    pub fn is_passing(&self) -> bool {
        self.scenarios.total().failed() == 0
    }

    pub fn into_reports(self) -> Vec<Report> {
        self.reports
    }
}
