//! Citation rings and temporal violations.
//!
//! Ring search first splits the graph into strongly connected components
//! (Tarjan), then enumerates elementary cycles inside each component large
//! enough to hold a ring, using Johnson's blocked-set discipline so no
//! vertex sequence is explored twice from the same start.

use std::collections::BTreeSet;

use citeline_core::{GraphConfig, MIN_CYCLE_LENGTH, MIN_RING_LENGTH};
use serde::Serialize;

use crate::builder::CitationGraph;

/// One strongly connected cluster containing cycles of ring length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationRing {
    /// Papers on at least one cycle of length >= [`MIN_RING_LENGTH`], sorted
    pub papers: Vec<String>,
    /// Elementary cycles of length >= [`MIN_CYCLE_LENGTH`] found in the cluster
    pub cycle_count: usize,
    pub longest_cycle: usize,
}

/// Output of the ring search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RingReport {
    pub rings: Vec<CitationRing>,
    /// Union of all ring papers, sorted
    pub flagged_papers: Vec<String>,
    /// Elementary cycles enumerated, any length
    pub cycles_examined: usize,
    /// True when the cycle budget cut the search short
    pub truncated: bool,
}

/// A citing paper published before the paper it cites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemporalAnomaly {
    pub citing_paper: String,
    pub cited_paper: String,
    pub citing_year: i32,
    pub cited_year: i32,
}

/// Strongly connected components, each sorted, in discovery order.
///
/// Iterative Tarjan so deep citation chains cannot overflow the stack.
pub fn strongly_connected_components(successors: &[Vec<usize>]) -> Vec<Vec<usize>> {
    const UNVISITED: usize = usize::MAX;

    let n = successors.len();
    let mut index = vec![UNVISITED; n];
    let mut low = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut components = Vec::new();
    let mut next_index = 0;

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }
        // (node, position in its successor list)
        let mut call: Vec<(usize, usize)> = vec![(root, 0)];
        index[root] = next_index;
        low[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        while let Some(&(v, pos)) = call.last() {
            if let Some(&w) = successors[v].get(pos) {
                let top = call.len() - 1;
                call[top].1 += 1;
                if index[w] == UNVISITED {
                    index[w] = next_index;
                    low[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    call.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
                continue;
            }

            call.pop();
            if let Some(&(parent, _)) = call.last() {
                low[parent] = low[parent].min(low[v]);
            }
            if low[v] == index[v] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                component.sort_unstable();
                components.push(component);
            }
        }
    }
    components
}

/// Cycle enumeration state for one component, in local indices.
struct CycleSearch<'a> {
    adj: &'a [Vec<usize>],
    blocked: Vec<bool>,
    blocked_by: Vec<BTreeSet<usize>>,
    path: Vec<usize>,
    on_ring: Vec<bool>,
    cycles: usize,
    ring_cycles: usize,
    longest: usize,
    budget: usize,
}

impl CycleSearch<'_> {
    fn exhausted(&self) -> bool {
        self.cycles >= self.budget
    }

    /// Johnson's CIRCUIT restricted to vertices `>= start`.
    fn circuit(&mut self, v: usize, start: usize) -> bool {
        let mut closed = false;
        self.path.push(v);
        self.blocked[v] = true;

        let adj = self.adj;
        for &w in adj[v].iter().filter(|&&w| w >= start) {
            if self.exhausted() {
                break;
            }
            if w == start {
                self.record_cycle();
                closed = true;
            } else if !self.blocked[w] && self.circuit(w, start) {
                closed = true;
            }
        }

        if closed {
            self.unblock(v);
        } else {
            for &w in adj[v].iter().filter(|&&w| w >= start) {
                self.blocked_by[w].insert(v);
            }
        }
        self.path.pop();
        closed
    }

    fn unblock(&mut self, u: usize) {
        let mut pending = vec![u];
        while let Some(u) = pending.pop() {
            if !self.blocked[u] {
                continue;
            }
            self.blocked[u] = false;
            pending.extend(std::mem::take(&mut self.blocked_by[u]));
        }
    }

    fn record_cycle(&mut self) {
        self.cycles += 1;
        let len = self.path.len();
        if len >= MIN_CYCLE_LENGTH {
            self.ring_cycles += 1;
        }
        if len >= MIN_RING_LENGTH {
            self.longest = self.longest.max(len);
            for &p in &self.path {
                self.on_ring[p] = true;
            }
        }
    }
}

/// Find citation rings: papers on elementary cycles of length
/// >= [`MIN_RING_LENGTH`], grouped by strongly connected component.
///
/// Enumeration stops once `config.max_cycles` cycles have been seen; what
/// was flagged up to that point is still reported.
pub fn find_citation_rings(graph: &CitationGraph, config: &GraphConfig) -> RingReport {
    let successors = graph.simple_successors();
    let components = strongly_connected_components(&successors);

    let mut report = RingReport::default();
    let mut remaining = config.max_cycles;

    for component in components.iter().filter(|c| c.len() >= MIN_RING_LENGTH) {
        if remaining == 0 {
            report.truncated = true;
            break;
        }

        // Local indices follow node order, which is id order
        let mut local = vec![usize::MAX; graph.node_count()];
        for (i, &node) in component.iter().enumerate() {
            local[node] = i;
        }
        let adj: Vec<Vec<usize>> = component
            .iter()
            .map(|&node| {
                successors[node]
                    .iter()
                    .map(|&w| local[w])
                    .filter(|&w| w != usize::MAX)
                    .collect()
            })
            .collect();

        let k = component.len();
        let mut search = CycleSearch {
            adj: &adj,
            blocked: vec![false; k],
            blocked_by: vec![BTreeSet::new(); k],
            path: Vec::new(),
            on_ring: vec![false; k],
            cycles: 0,
            ring_cycles: 0,
            longest: 0,
            budget: remaining,
        };
        for start in 0..k {
            if search.exhausted() {
                break;
            }
            for v in start..k {
                search.blocked[v] = false;
                search.blocked_by[v].clear();
            }
            search.circuit(start, start);
        }

        remaining -= search.cycles.min(remaining);
        report.cycles_examined += search.cycles;
        if search.exhausted() {
            report.truncated = true;
        }

        let papers: Vec<String> = component
            .iter()
            .zip(&search.on_ring)
            .filter(|(_, flagged)| **flagged)
            .map(|(&node, _)| graph.id(node).to_string())
            .collect();
        if !papers.is_empty() {
            log::debug!(
                "Ring of {} papers ({} cycles, longest {})",
                papers.len(),
                search.ring_cycles,
                search.longest
            );
            report.rings.push(CitationRing {
                papers,
                cycle_count: search.ring_cycles,
                longest_cycle: search.longest,
            });
        }
    }

    if report.truncated {
        log::warn!(
            "Cycle budget of {} reached; ring results may be incomplete",
            config.max_cycles
        );
    }

    report.rings.sort_by(|a, b| a.papers.cmp(&b.papers));
    let flagged: BTreeSet<&String> = report.rings.iter().flat_map(|r| &r.papers).collect();
    report.flagged_papers = flagged.into_iter().cloned().collect();

    log::info!(
        "Ring search: {} rings, {} flagged papers, {} cycles examined",
        report.rings.len(),
        report.flagged_papers.len(),
        report.cycles_examined
    );
    report
}

/// Valid edges whose citing paper is strictly older than the cited paper.
/// One record per raw edge.
pub fn find_temporal_anomalies(graph: &CitationGraph) -> Vec<TemporalAnomaly> {
    let anomalies: Vec<TemporalAnomaly> = graph
        .valid_edges()
        .iter()
        .filter_map(|edge| {
            let citing_year = graph.year(graph.node(&edge.citing_paper)?);
            let cited_year = graph.year(graph.node(&edge.cited_paper)?);
            (citing_year < cited_year).then(|| TemporalAnomaly {
                citing_paper: edge.citing_paper.clone(),
                cited_paper: edge.cited_paper.clone(),
                citing_year,
                cited_year,
            })
        })
        .collect();
    log::info!("Found {} temporal anomalies", anomalies.len());
    anomalies
}
