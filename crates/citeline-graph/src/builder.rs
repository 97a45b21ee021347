//! Citation graph construction and edge classification.
//!
//! Nodes are the papers of the corpus, indexed densely in ascending id
//! order. Every raw edge lands in exactly one of three lists; only valid
//! edges become graph edges. Parallel edges are kept.

use std::collections::BTreeMap;

use citeline_core::{AnalysisError, CitationEdge, Paper, Result, index_papers};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// How one raw edge was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeClass {
    Valid,
    SelfCitation,
    /// At least one endpoint is not a known paper
    Orphan,
}

/// Directed multigraph over the papers of one corpus.
#[derive(Debug, Clone, Default)]
pub struct CitationGraph {
    ids: Vec<String>,
    index: FxHashMap<String, usize>,
    years: Vec<i32>,
    /// Successors per node, one entry per valid raw edge
    out_edges: Vec<Vec<usize>>,
    /// Predecessors per node, one entry per valid raw edge
    in_edges: Vec<Vec<usize>>,
    valid: Vec<CitationEdge>,
    self_citations: Vec<CitationEdge>,
    orphans: Vec<CitationEdge>,
}

impl CitationGraph {
    /// Build the graph from papers and raw edges.
    ///
    /// Fails on empty or duplicate paper ids and on edges with an empty
    /// endpoint. Unknown and reflexive edges are classified, not rejected.
    pub fn build(papers: &[Paper], citations: &[CitationEdge]) -> Result<Self> {
        let by_id = index_papers(papers)?;

        let n = by_id.len();
        let mut graph = Self {
            ids: Vec::with_capacity(n),
            index: FxHashMap::default(),
            years: Vec::with_capacity(n),
            out_edges: vec![Vec::new(); n],
            in_edges: vec![Vec::new(); n],
            ..Self::default()
        };
        for (i, (id, paper)) in by_id.into_iter().enumerate() {
            graph.ids.push(id.to_string());
            graph.index.insert(id.to_string(), i);
            graph.years.push(paper.year);
        }

        for (i, edge) in citations.iter().enumerate() {
            if edge.citing_paper.trim().is_empty() {
                return Err(AnalysisError::invalid_record(format!("citation #{i}"), "citing_paper"));
            }
            if edge.cited_paper.trim().is_empty() {
                return Err(AnalysisError::invalid_record(format!("citation #{i}"), "cited_paper"));
            }
            match graph.classify(edge) {
                EdgeClass::Orphan => graph.orphans.push(edge.clone()),
                EdgeClass::SelfCitation => graph.self_citations.push(edge.clone()),
                EdgeClass::Valid => {
                    let from = graph.index[&edge.citing_paper];
                    let to = graph.index[&edge.cited_paper];
                    graph.out_edges[from].push(to);
                    graph.in_edges[to].push(from);
                    graph.valid.push(edge.clone());
                }
            }
        }

        log::info!(
            "Built citation graph: {} papers, {} valid edges, {} self-citations, {} orphans",
            graph.node_count(),
            graph.valid.len(),
            graph.self_citations.len(),
            graph.orphans.len()
        );
        Ok(graph)
    }

    /// Classify an edge against this graph's node set. Existence is checked
    /// before reflexivity.
    pub fn classify(&self, edge: &CitationEdge) -> EdgeClass {
        if !self.contains(&edge.citing_paper) || !self.contains(&edge.cited_paper) {
            EdgeClass::Orphan
        } else if edge.is_reflexive() {
            EdgeClass::SelfCitation
        } else {
            EdgeClass::Valid
        }
    }

    pub fn contains(&self, paper_id: &str) -> bool {
        self.index.contains_key(paper_id)
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.valid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Paper ids in node order (ascending).
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn id(&self, node: usize) -> &str {
        &self.ids[node]
    }

    pub fn node(&self, paper_id: &str) -> Option<usize> {
        self.index.get(paper_id).copied()
    }

    pub fn year(&self, node: usize) -> i32 {
        self.years[node]
    }

    /// Successors of `node` with multiplicity.
    pub fn successors(&self, node: usize) -> &[usize] {
        &self.out_edges[node]
    }

    /// Predecessors of `node` with multiplicity.
    pub fn predecessors(&self, node: usize) -> &[usize] {
        &self.in_edges[node]
    }

    pub fn valid_edges(&self) -> &[CitationEdge] {
        &self.valid
    }

    pub fn self_citations(&self) -> &[CitationEdge] {
        &self.self_citations
    }

    pub fn orphan_citations(&self) -> &[CitationEdge] {
        &self.orphans
    }

    pub fn in_degree(&self, node: usize) -> usize {
        self.in_edges[node].len()
    }

    pub fn out_degree(&self, node: usize) -> usize {
        self.out_edges[node].len()
    }

    /// In-degree of every paper, zero included.
    pub fn in_degrees(&self) -> BTreeMap<String, usize> {
        self.degree_map(|node| self.in_degree(node))
    }

    /// Out-degree of every paper, zero included.
    pub fn out_degrees(&self) -> BTreeMap<String, usize> {
        self.degree_map(|node| self.out_degree(node))
    }

    fn degree_map(&self, degree: impl Fn(usize) -> usize) -> BTreeMap<String, usize> {
        self.ids
            .iter()
            .enumerate()
            .map(|(node, id)| (id.clone(), degree(node)))
            .collect()
    }

    /// The `limit` most cited papers, by in-degree descending then id.
    pub fn top_cited(&self, limit: usize) -> Vec<String> {
        let mut nodes: Vec<usize> = (0..self.node_count()).collect();
        // Node order is id order, so a stable sort on degree keeps ids ascending
        nodes.sort_by(|&a, &b| self.in_degree(b).cmp(&self.in_degree(a)));
        nodes
            .into_iter()
            .take(limit)
            .map(|node| self.ids[node].clone())
            .collect()
    }

    /// Valid edges as `citing -> [cited]`, with multiplicity, for every paper.
    pub fn adjacency(&self) -> BTreeMap<String, Vec<String>> {
        self.ids
            .iter()
            .enumerate()
            .map(|(node, id)| {
                let cited = self.out_edges[node]
                    .iter()
                    .map(|&to| self.ids[to].clone())
                    .collect();
                (id.clone(), cited)
            })
            .collect()
    }

    /// Successor lists with parallel edges collapsed, sorted.
    pub fn simple_successors(&self) -> Vec<Vec<usize>> {
        self.out_edges
            .iter()
            .map(|succ| {
                let mut succ = succ.clone();
                succ.sort_unstable();
                succ.dedup();
                succ
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn papers(ids: &[&str]) -> Vec<Paper> {
        ids.iter().map(|id| Paper::new(*id, 2020)).collect()
    }

    #[test]
    fn classifies_every_edge_once() {
        let papers = papers(&["a", "b", "c"]);
        let edges = vec![
            CitationEdge::new("a", "b"),
            CitationEdge::new("a", "b"),
            CitationEdge::new("b", "b"),
            CitationEdge::new("c", "ghost"),
            CitationEdge::new("ghost", "ghost"),
        ];
        let graph = CitationGraph::build(&papers, &edges).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.self_citations(), &[CitationEdge::new("b", "b")]);
        assert_eq!(graph.orphan_citations().len(), 2);
        assert_eq!(
            graph.edge_count() + graph.self_citations().len() + graph.orphan_citations().len(),
            edges.len()
        );
    }

    #[test]
    fn reflexive_unknown_is_orphan() {
        let graph = CitationGraph::build(&papers(&["a"]), &[]).unwrap();
        assert_eq!(graph.classify(&CitationEdge::new("x", "x")), EdgeClass::Orphan);
        assert_eq!(graph.classify(&CitationEdge::new("a", "a")), EdgeClass::SelfCitation);
    }

    #[test]
    fn degrees_count_valid_edges_only() {
        let papers = papers(&["a", "b", "c"]);
        let edges = vec![
            CitationEdge::new("a", "b"),
            CitationEdge::new("c", "b"),
            CitationEdge::new("b", "b"),
            CitationEdge::new("a", "missing"),
        ];
        let graph = CitationGraph::build(&papers, &edges).unwrap();
        let in_deg = graph.in_degrees();
        let out_deg = graph.out_degrees();
        assert_eq!(in_deg["b"], 2);
        assert_eq!(in_deg["a"], 0);
        assert_eq!(out_deg["a"], 1);
        assert_eq!(out_deg["b"], 0);
        assert_eq!(in_deg.len(), 3);
    }

    #[test]
    fn top_cited_ties_by_id() {
        let papers = papers(&["p1", "p2", "p3", "p4"]);
        let edges = vec![
            CitationEdge::new("p1", "p3"),
            CitationEdge::new("p2", "p3"),
            CitationEdge::new("p1", "p4"),
            CitationEdge::new("p3", "p2"),
        ];
        let graph = CitationGraph::build(&papers, &edges).unwrap();
        assert_eq!(graph.top_cited(3), vec!["p3", "p2", "p4"]);
        assert_eq!(graph.top_cited(10).len(), 4);
    }

    #[test]
    fn parallel_edges_kept_and_collapsible() {
        let papers = papers(&["a", "b"]);
        let edges = vec![CitationEdge::new("a", "b"), CitationEdge::new("a", "b")];
        let graph = CitationGraph::build(&papers, &edges).unwrap();
        let a = graph.node("a").unwrap();
        assert_eq!(graph.successors(a).len(), 2);
        assert_eq!(graph.simple_successors()[a].len(), 1);
        assert_eq!(graph.adjacency()["a"], vec!["b", "b"]);
    }

    #[test]
    fn empty_endpoint_is_invalid() {
        let err = CitationGraph::build(&papers(&["a"]), &[CitationEdge::new("a", " ")]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRecord { field: "cited_paper", .. }));
    }

    #[test]
    fn duplicate_paper_rejected() {
        let err = CitationGraph::build(&papers(&["a", "a"]), &[]).unwrap_err();
        assert_eq!(err, AnalysisError::DuplicatePaper("a".into()));
    }

    #[test]
    fn empty_corpus() {
        let graph = CitationGraph::build(&[], &[]).unwrap();
        assert!(graph.is_empty());
        assert!(graph.top_cited(10).is_empty());
    }
}
