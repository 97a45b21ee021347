//! Common error type for the analysis crates

use thiserror::Error;

/// Result alias used by every library crate in the workspace.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failure surfaced by resolution or graph analytics.
///
/// Missing optional fields, ambiguous names and orphan edges are not errors;
/// they are classified and reported. Only structurally invalid input and
/// numerical failure reach the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A required field is empty (e.g. a paper or edge without an id)
    #[error("invalid {record}: missing required field '{field}'")]
    InvalidRecord { record: String, field: &'static str },

    /// Two papers share the same id
    #[error("duplicate paper id: {0}")]
    DuplicatePaper(String),

    /// PageRank produced NaN or infinity for a node
    #[error("non-finite PageRank score {value} for paper {paper_id}")]
    NonFiniteScore { paper_id: String, value: f64 },

    /// Configuration values out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    pub fn invalid_record(record: impl Into<String>, field: &'static str) -> Self {
        Self::InvalidRecord {
            record: record.into(),
            field,
        }
    }
}
