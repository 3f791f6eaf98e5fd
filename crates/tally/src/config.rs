//! Configuration schema for tally
//!
//! Config lives at `.config/tally/config.yaml` relative to the project root.
//! Every field is optional; command line flags take precedence.

use serde::Deserialize;
use std::path::PathBuf;

/// Title used when the config does not set one
pub const DEFAULT_TITLE: &str = "Test Report";

/// Root configuration for tally
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Title shown in summaries and on every generated page
    pub title: Option<String>,

    /// Directory holding cucumber JSON files (relative to the project root)
    pub source: Option<PathBuf>,

    /// Glob patterns for report files, relative to `source`.
    /// Defaults to `**/*.json` if not specified.
    pub include: Vec<String>,

    /// Glob patterns to exclude, relative to `source`
    pub exclude: Vec<String>,

    /// Directory the report site is written to (relative to the project root)
    pub output: Option<PathBuf>,
}

impl Config {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let yaml = r#"
title: Nightly
source: target/cucumber
include:
  - "**/*.json"
exclude:
  - "rerun/**"
output: target/report
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title(), "Nightly");
        assert_eq!(config.source, Some(PathBuf::from("target/cucumber")));
        assert_eq!(config.include, ["**/*.json"]);
        assert_eq!(config.exclude, ["rerun/**"]);
        assert_eq!(config.output, Some(PathBuf::from("target/report")));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.title(), DEFAULT_TITLE);
        assert!(config.source.is_none());
        assert!(config.include.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_yaml::from_str::<Config>("sauce: reports").is_err());
    }
}
