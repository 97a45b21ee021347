//! Power-iteration PageRank over the valid citation edges.

use std::collections::BTreeMap;

use citeline_core::{AnalysisError, DAMPING_FACTOR, GraphConfig, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::builder::CitationGraph;

/// Scores plus convergence diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageRankResult {
    pub scores: BTreeMap<String, f64>,
    pub iterations: usize,
    pub converged: bool,
    /// L1 change of the last iteration
    pub delta: f64,
}

impl PageRankResult {
    pub fn total(&self) -> f64 {
        self.scores.values().sum()
    }
}

/// Run PageRank with damping [`DAMPING_FACTOR`].
///
/// Mass leaves a node evenly over its out-edges (parallel edges count
/// separately); dangling nodes spread their mass over every node. Reaching
/// the iteration cap is logged, not an error. A non-finite score is.
pub fn pagerank(graph: &CitationGraph, config: &GraphConfig) -> Result<PageRankResult> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(PageRankResult {
            converged: true,
            ..PageRankResult::default()
        });
    }

    let d = DAMPING_FACTOR;
    let nf = n as f64;
    let out_degree: Vec<f64> = (0..n).map(|v| graph.out_degree(v) as f64).collect();
    let mut rank = vec![1.0 / nf; n];
    let mut next = vec![0.0; n];

    let mut iterations = 0;
    let mut delta = f64::INFINITY;
    while iterations < config.pagerank_max_iterations {
        iterations += 1;

        let dangling: f64 = (0..n)
            .filter(|&v| out_degree[v] == 0.0)
            .map(|v| rank[v])
            .sum();
        let base = (1.0 - d) / nf + d * dangling / nf;

        // Each node sums its predecessors in a fixed order, so the result is
        // independent of how rayon splits the work
        next.par_iter_mut().enumerate().for_each(|(v, slot)| {
            let inflow: f64 = graph
                .predecessors(v)
                .iter()
                .map(|&u| rank[u] / out_degree[u])
                .sum();
            *slot = base + d * inflow;
        });

        if let Some(v) = next.iter().position(|s| !s.is_finite()) {
            return Err(AnalysisError::NonFiniteScore {
                paper_id: graph.id(v).to_string(),
                value: next[v],
            });
        }

        delta = rank.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
        std::mem::swap(&mut rank, &mut next);
        if delta < config.pagerank_tolerance {
            break;
        }
    }

    let converged = delta < config.pagerank_tolerance;
    if converged {
        log::info!("PageRank converged after {iterations} iterations (delta {delta:.2e})");
    } else {
        log::warn!(
            "PageRank stopped at the iteration cap ({iterations}) with delta {delta:.2e}"
        );
    }

    let scores = graph
        .ids()
        .iter()
        .cloned()
        .zip(rank)
        .collect();
    Ok(PageRankResult {
        scores,
        iterations,
        converged,
        delta,
    })
}
