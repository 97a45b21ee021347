//! citeline-pipeline: one analysis run over a loaded corpus
//!
//! Entity resolution and graph analytics read the same immutable
//! [`Corpus`] and run on separate rayon workers. Inside graph analytics,
//! PageRank and the ring search share the built graph the same way.

mod report;

pub use report::{AnalysisReport, CorpusSummary, NetworkStatistics};

use std::time::Instant;

use citeline_core::{AnalysisConfig, Corpus, GraphConfig, Result};
use citeline_graph::{
    CitationGraph, PageRankResult, RingReport, find_citation_rings, find_temporal_anomalies,
    pagerank,
};
use citeline_resolve::{Resolution, extract_topics, methods_from_abstracts, resolve_entities};

/// Graph-side results of a run.
struct GraphAnalysis {
    graph: CitationGraph,
    ranks: PageRankResult,
    rings: RingReport,
}

fn analyze_graph(corpus: &Corpus, config: &GraphConfig) -> Result<GraphAnalysis> {
    let graph = CitationGraph::build(&corpus.papers, &corpus.citations)?;
    let (ranks, rings) = rayon::join(
        || pagerank(&graph, config),
        || find_citation_rings(&graph, config),
    );
    Ok(GraphAnalysis {
        ranks: ranks?,
        rings,
        graph,
    })
}

/// Run the whole analysis.
///
/// Fails on invalid configuration, structurally invalid records and
/// non-finite PageRank scores. Everything else is classified and reported.
pub fn analyze(corpus: &Corpus, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;
    let start = Instant::now();
    log::info!(
        "Analyzing {} papers, {} citation records",
        corpus.papers.len(),
        corpus.citations.len()
    );

    let (resolution, graph) = rayon::join(
        || resolve_entities(&corpus.papers, &corpus.affiliations, &config.resolver),
        || analyze_graph(corpus, &config.graph),
    );
    let resolution: Resolution = resolution?;
    let GraphAnalysis {
        graph,
        ranks,
        rings,
    } = graph?;

    let temporal_anomalies = find_temporal_anomalies(&graph);
    let extracted_topics = extract_topics(&corpus.papers);
    let methods = methods_from_abstracts(&corpus.papers, &config.extraction);

    let summary = CorpusSummary::from_inputs(
        &corpus.papers,
        &corpus.citations,
        &resolution.venue_normalizations,
    );

    let mut report = AnalysisReport {
        summary,
        resolved_author_count: resolution.resolved_author_count(),
        resolved_institution_count: resolution.resolved_institution_count(),
        extracted_authors: resolution.authors,
        extracted_institutions: resolution.institutions,
        author_resolution_map: resolution.author_map,
        institution_resolution_map: resolution.institution_map,
        ambiguous_author_resolutions: resolution.ambiguous_author_resolutions,
        typo_corrections: resolution.typo_corrections,
        venue_normalizations: resolution.venue_normalizations,
        affiliation_conflicts: resolution.affiliation_conflicts,
        extracted_topics,
        methods_from_abstracts: methods,
        citation_graph: graph.adjacency(),
        in_degree: graph.in_degrees(),
        out_degree: graph.out_degrees(),
        pagerank_scores: ranks.scores,
        pagerank_iterations: ranks.iterations,
        pagerank_converged: ranks.converged,
        top_cited_papers: graph.top_cited(config.graph.top_cited),
        orphan_citations: graph.orphan_citations().to_vec(),
        self_citations: graph.self_citations().to_vec(),
        citation_rings: rings.rings,
        citation_ring_papers: rings.flagged_papers,
        temporal_anomalies,
    };
    report.summary = std::mem::take(&mut report.summary).with_report(&report, &graph);

    log::info!("Analysis finished in {:.2?}", start.elapsed());
    Ok(report)
}
