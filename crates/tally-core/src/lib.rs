//! tally-core - Core library for cucumber report normalization
//!
//! This crate provides the building blocks for:
//! - Loading cucumber JSON reports (one report per feature)
//! - Merging background steps into the scenarios that follow them
//! - Assigning stable feature/scenario indices and tag slugs for page names
//! - Computing pass/failed/skipped counts per feature, tag and scenario
//!
//! # Features
//!
//! - `walk` - Enable [`WalkSources`] for gitignore-aware directory walking (brings in `ignore` and `globset`)
//! - `parallel` - Enable parallel file loading (brings in `rayon`)
//!
//! # Running a generation
//!
//! ```
//! use tally_core::{Generation, MemorySources, Sources, Status};
//!
//! let loaded = MemorySources::new()
//!     .add(
//!         "login.json",
//!         r#"[{
//!             "name": "Login",
//!             "elements": [
//!                 {"type": "background", "steps": [
//!                     {"keyword": "Given ", "name": "a user", "result": {"status": "passed"}}
//!                 ]},
//!                 {"type": "scenario", "name": "wrong password", "tags": [{"name": "@auth"}], "steps": [
//!                     {"keyword": "When ", "name": "logging in", "result": {"status": "failed"}}
//!                 ]}
//!             ]
//!         }]"#,
//!     )
//!     .load()
//!     .unwrap();
//!
//! let generation = Generation::run(loaded.reports).unwrap();
//!
//! // The background is gone, its step now leads the scenario
//! let scenario = &generation.reports()[0].elements[0];
//! assert_eq!(scenario.steps.len(), 2);
//! assert_eq!(scenario.scenario_index(), Some(0));
//!
//! let entry = generation.scenarios().get(0).unwrap();
//! assert_eq!(entry.status, Status::Failed);
//! assert_eq!(generation.tags().failed_tags(), 1);
//! ```

mod count;
mod error;
mod generation;
mod index;
mod merge;
mod model;
mod sources;
mod status;
mod summary;

pub use count::ResultCount;
pub use error::ReportError;
pub use generation::Generation;
pub use index::{Indexer, slugify};
pub use merge::{merge_backgrounds, merge_elements};
pub use model::{Element, ElementKind, Report, Row, Step, StepResult, Tag, UNNAMED_STEP};
pub use sources::{LoadResult, MemorySources, ParsedFile, PathSources, Sources, parse_reports};
pub use status::{Status, resolve as resolve_status};
pub use summary::{FeatureEntry, FeatureSummary, ScenarioEntry, ScenarioSummary, TagSummary};

#[cfg(feature = "walk")]
pub use sources::WalkSources;
