//! Errors surfaced by a generation run

use thiserror::Error;

/// Semantic errors that abort a generation run.
///
/// Input that is merely malformed (missing lists, missing results) is absorbed
/// with defaults while deserializing and never ends up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// A step result carries a status outside of `passed`, `failed`, `skipped`.
    #[error("unknown step status '{status}' on step '{keyword}{name}' (line {line})")]
    UnknownStatus {
        /// The raw status string as it appeared in the report
        status: String,
        /// Keyword of the offending step (e.g. "Given ")
        keyword: String,
        /// Display name of the offending step
        name: String,
        /// Source line of the offending step
        line: usize,
    },
}
