//! citeline-graph: citation graph analytics
//!
//! Builds the citation multigraph, ranks papers with PageRank and flags
//! citation rings and temporal violations.

pub mod anomaly;
pub mod builder;
pub mod pagerank;

pub use anomaly::{
    CitationRing, RingReport, TemporalAnomaly, find_citation_rings, find_temporal_anomalies,
    strongly_connected_components,
};
pub use builder::{CitationGraph, EdgeClass};
pub use pagerank::{PageRankResult, pagerank};
