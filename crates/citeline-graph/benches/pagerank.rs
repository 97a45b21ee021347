use citeline_core::{CitationEdge, GraphConfig, Paper};
use citeline_graph::{CitationGraph, find_citation_rings, pagerank};

/// Layered synthetic corpus: each paper cites a handful of older ones, plus
/// one planted ring.
fn synthetic(n: usize) -> CitationGraph {
    let papers: Vec<Paper> = (0..n)
        .map(|i| Paper::new(format!("paper_{i:06}"), 2000 + (i / 100) as i32))
        .collect();
    let mut edges = Vec::new();
    for i in 1..n {
        for step in [1, 7, 31, 101] {
            if i >= step {
                edges.push(CitationEdge::new(
                    format!("paper_{i:06}"),
                    format!("paper_{:06}", i - step),
                ));
            }
        }
    }
    for i in 0..5 {
        edges.push(CitationEdge::new(
            format!("paper_{i:06}"),
            format!("paper_{:06}", (i + 1) % 5),
        ));
    }
    CitationGraph::build(&papers, &edges).unwrap()
}

#[divan::bench(args = [1_000, 10_000])]
fn pagerank_layered(bencher: divan::Bencher, n: usize) {
    let graph = synthetic(n);
    let config = GraphConfig::default();
    bencher.bench(|| pagerank(&graph, &config).unwrap());
}

#[divan::bench(args = [1_000, 10_000])]
fn ring_search_layered(bencher: divan::Bencher, n: usize) {
    let graph = synthetic(n);
    let config = GraphConfig::default();
    bencher.bench(|| find_citation_rings(&graph, &config));
}

fn main() {
    divan::main();
}
