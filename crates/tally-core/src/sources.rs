//! Source providers for cucumber JSON reports
//!
//! Every source yields reports in a deterministic order: feature and scenario
//! indices (and therefore page names) depend on it.

use crate::model::Report;
use eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reports loaded from a set of files, plus non-fatal warnings
#[derive(Debug, Default)]
pub struct LoadResult {
    pub reports: Vec<Report>,
    pub warnings: Vec<String>,
    /// Number of files that contributed reports
    pub files: usize,
}

impl LoadResult {
    fn push_file(&mut self, path: &Path, parsed: ParsedFile) {
        let warning = match parsed {
            ParsedFile::Reports(reports) => {
                debug!("{}: {} reports", path.display(), reports.len());
                self.files += 1;
                self.reports.extend(reports);
                return;
            }
            ParsedFile::Empty => format!("Skipping empty report file {}", path.display()),
            ParsedFile::NotReports => format!(
                "Skipping {}: top level is not an array of reports",
                path.display()
            ),
        };
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// What one file turned out to hold
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedFile {
    /// A cucumber report array (`null` counts as an empty one)
    Reports(Vec<Report>),
    /// Empty or whitespace only; cucumber writes those when a run is aborted
    /// before any feature finished
    Empty,
    /// Valid JSON that is not a report array, e.g. a stray `package.json`
    NotReports,
}

/// Trait for providing report files to load
pub trait Sources {
    /// Load and deserialize all reports, in source order
    fn load(self) -> Result<LoadResult>;
}

/// Parse the content of one report file.
///
/// Only invalid JSON, or an array whose items are not reports, is an error.
pub fn parse_reports(path: &Path, content: &str) -> Result<ParsedFile> {
    if content.trim().is_empty() {
        return Ok(ParsedFile::Empty);
    }
    let value: serde_json::Value = serde_json::from_str(content)
        .wrap_err_with(|| format!("Failed to parse report JSON from {}", path.display()))?;
    match value {
        serde_json::Value::Null => Ok(ParsedFile::Reports(Vec::new())),
        serde_json::Value::Array(_) => {
            let reports = serde_json::from_value(value)
                .wrap_err_with(|| format!("Invalid cucumber report in {}", path.display()))?;
            Ok(ParsedFile::Reports(reports))
        }
        _ => Ok(ParsedFile::NotReports),
    }
}

fn read_reports(path: &Path) -> Result<ParsedFile> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read report file {}", path.display()))?;
    parse_reports(path, &content)
}

/// Reports from an explicit list of file paths, loaded in the given order
pub struct PathSources(Vec<PathBuf>);

impl PathSources {
    /// Create from an iterator of paths
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl Sources for PathSources {
    fn load(self) -> Result<LoadResult> {
        #[cfg(feature = "parallel")]
        let parsed: Vec<ParsedFile> = {
            use rayon::prelude::*;
            self.0
                .par_iter()
                .map(|path| read_reports(path))
                .collect::<Result<_>>()?
        };

        #[cfg(not(feature = "parallel"))]
        let parsed: Vec<ParsedFile> = self
            .0
            .iter()
            .map(|path| read_reports(path))
            .collect::<Result<_>>()?;

        let mut result = LoadResult::default();
        for (path, parsed) in self.0.iter().zip(parsed) {
            result.push_file(path, parsed);
        }
        Ok(result)
    }
}

/// In-memory sources (useful for testing)
pub struct MemorySources(Vec<(PathBuf, String)>);

impl MemorySources {
    /// Create empty memory sources
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a file with content
    pub fn add(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.0.push((path.into(), content.into()));
        self
    }
}

impl Default for MemorySources {
    fn default() -> Self {
        Self::new()
    }
}

impl Sources for MemorySources {
    fn load(self) -> Result<LoadResult> {
        let mut result = LoadResult::default();
        for (path, content) in self.0 {
            let parsed = parse_reports(&path, &content)?;
            result.push_file(&path, parsed);
        }
        Ok(result)
    }
}

/// Gitignore-aware directory walker
#[cfg(feature = "walk")]
pub struct WalkSources {
    root: PathBuf,
    include: Vec<String>,
    exclude: Vec<String>,
}

#[cfg(feature = "walk")]
impl WalkSources {
    /// Patterns used when no include pattern is given
    pub const DEFAULT_INCLUDE: &'static str = "**/*.json";

    /// Create a walker for the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Add include patterns (e.g., `["reports/**/*.json"]`)
    pub fn include(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.include.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add exclude patterns (e.g., `["target/**"]`)
    pub fn exclude(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Matching files, sorted by their path relative to the root
    pub fn paths(&self) -> Result<Vec<PathBuf>> {
        use ignore::WalkBuilder;

        let include = if self.include.is_empty() {
            build_globset([Self::DEFAULT_INCLUDE])?
        } else {
            build_globset(&self.include)?
        };
        let exclude = build_globset(&self.exclude)?;

        let walker = WalkBuilder::new(&self.root)
            .follow_links(true)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .build();

        let mut paths: Vec<(String, PathBuf)> = Vec::new();
        for entry in walker {
            let entry = entry.wrap_err("Failed to walk report directory")?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            let relative_str = relative.to_string_lossy().replace('\\', "/");

            if !include.is_match(&relative_str) || exclude.is_match(&relative_str) {
                continue;
            }
            paths.push((relative_str, path.to_path_buf()));
        }

        paths.sort();
        Ok(paths.into_iter().map(|(_, path)| path).collect())
    }
}

#[cfg(feature = "walk")]
impl Sources for WalkSources {
    fn load(self) -> Result<LoadResult> {
        if !self.root.is_dir() {
            eyre::bail!("Report directory {} does not exist", self.root.display());
        }
        let paths = self.paths()?;
        debug!(
            "found {} report files under {}",
            paths.len(),
            self.root.display()
        );
        PathSources::new(paths).load()
    }
}

#[cfg(feature = "walk")]
fn build_globset(
    patterns: impl IntoIterator<Item = impl AsRef<str>>,
) -> Result<globset::GlobSet> {
    let mut builder = globset::GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref().replace('\\', "/");
        let glob = globset::Glob::new(&pattern)
            .wrap_err_with(|| format!("Invalid glob pattern '{}'", pattern))?;
        builder.add(glob);
    }
    builder.build().wrap_err("Failed to build glob set")
}
