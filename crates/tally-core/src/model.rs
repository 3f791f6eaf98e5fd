//! Entity model for cucumber JSON reports
//!
//! These types deserialize straight from the cucumber JSON format (an array of
//! feature objects). Lists that are `null` or absent in the source come back as
//! empty lists; nothing else is repaired here.

use crate::error::ReportError;
use crate::index::slugify;
use crate::status::{self, Status};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Display name for steps whose source name is empty.
pub const UNNAMED_STEP: &str = "[Unnamed]";

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One feature's worth of results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Feature file the results came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Feature name; reports sharing a name share a feature index
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Feature-level tags (not counted in the tag summary)
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub elements: Vec<Element>,
    #[serde(skip)]
    pub(crate) feature_index: Option<usize>,
}

impl Report {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Index shared by every report with this feature name.
    ///
    /// `None` until the report went through an [`Indexer`](crate::Indexer).
    pub fn feature_index(&self) -> Option<usize> {
        self.feature_index
    }

    /// Non-background elements, in report order
    pub fn scenarios(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| !e.is_background())
    }
}

/// Kind of an element block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Background,
    #[default]
    Scenario,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Background => "background",
            ElementKind::Scenario => "scenario",
        }
    }
}

impl From<String> for ElementKind {
    fn from(kind: String) -> Self {
        if kind.eq_ignore_ascii_case("background") {
            ElementKind::Background
        } else {
            ElementKind::Scenario
        }
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A scenario or background block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default)]
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    #[serde(skip)]
    pub(crate) scenario_index: Option<usize>,
}

impl Element {
    pub fn scenario(name: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Scenario,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn background() -> Self {
        Self {
            kind: ElementKind::Background,
            ..Self::default()
        }
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(Tag::new(name));
        self
    }

    pub fn is_background(&self) -> bool {
        self.kind == ElementKind::Background
    }

    /// Global position of this scenario across the run.
    ///
    /// Backgrounds never get one.
    pub fn scenario_index(&self) -> Option<usize> {
        self.scenario_index
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    /// Scenario outcome derived from its steps
    pub fn status(&self) -> Result<Status, ReportError> {
        status::resolve(&self.steps)
    }

    /// Sum of all known step durations, in nanoseconds
    pub fn total_duration(&self) -> u64 {
        self.steps
            .iter()
            .filter_map(|s| s.result.as_ref().and_then(|r| r.duration))
            .sum()
    }
}

/// One executed step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, deserialize_with = "null_as_default")]
    pub keyword: String,
    #[serde(rename = "name", default, deserialize_with = "null_as_default")]
    raw_name: String,
    #[serde(default)]
    pub line: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rows: Vec<Row>,
    /// Absent results are treated as skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<StepResult>,
}

impl Step {
    pub fn new(keyword: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            raw_name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.result = Some(StepResult::new(status));
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn with_row<S: Into<String>>(mut self, cells: impl IntoIterator<Item = S>) -> Self {
        self.rows.push(Row {
            cells: cells.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Step name, or [`UNNAMED_STEP`] when the source name is empty.
    pub fn name(&self) -> &str {
        if self.raw_name.is_empty() {
            UNNAMED_STEP
        } else {
            &self.raw_name
        }
    }

    /// Step name exactly as it appeared in the source
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    pub fn status(&self) -> Result<Status, ReportError> {
        let Some(result) = &self.result else {
            return Ok(Status::Skipped);
        };
        Status::parse(&result.status).ok_or_else(|| ReportError::UnknownStatus {
            status: result.status.clone(),
            keyword: self.keyword.clone(),
            name: self.name().to_string(),
            line: self.line,
        })
    }

    pub fn error_message(&self) -> Option<&str> {
        self.result.as_ref()?.error_message.as_deref()
    }
}

/// Data table row attached to a step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cells: Vec<String>,
}

/// Outcome of a single step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Raw status; matched case-insensitively
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Duration in nanoseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StepResult {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Self::default()
        }
    }
}

/// A free-form label; identity is the name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// URL-safe form of the name, used in page file names
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
