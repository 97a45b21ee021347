//! Citeline Core - shared types for bibliographic entity resolution and
//! citation graph analysis
//!
//! This crate holds the input records, the error type, the run
//! configuration and the logging/progress plumbing used by the resolver,
//! the graph analytics and the CLI.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod progress;

// Re-exports for convenience
pub use config::{
    AnalysisConfig, DAMPING_FACTOR, ExtractionConfig, GraphConfig, MIN_CYCLE_LENGTH,
    MIN_RING_LENGTH, ResolverConfig,
};
pub use error::{AnalysisError, Result};
pub use logging::{IndicatifLogger, Verbosity, init_logging};
pub use model::{
    AffiliationReference, AuthorRef, CitationEdge, Corpus, InstitutionRef, Paper, index_papers,
};
pub use progress::{ProgressContext, SharedProgress, Stage, fmt_num, pct};
