//! The analysis report and its corpus summary.

use std::collections::BTreeMap;

use citeline_core::{CitationEdge, Paper};
use citeline_graph::{CitationGraph, CitationRing, TemporalAnomaly};
use citeline_resolve::{
    AffiliationConflict, AmbiguousResolution, MethodMention, ResolutionMap, ResolvedAuthor,
    ResolvedInstitution, TypoCorrection,
};
use serde::Serialize;

/// Every artifact of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summary: CorpusSummary,

    // Entity resolution
    pub extracted_authors: Vec<ResolvedAuthor>,
    pub extracted_institutions: Vec<ResolvedInstitution>,
    pub resolved_author_count: usize,
    pub resolved_institution_count: usize,
    pub author_resolution_map: ResolutionMap,
    pub institution_resolution_map: ResolutionMap,
    pub ambiguous_author_resolutions: Vec<AmbiguousResolution>,
    pub typo_corrections: Vec<TypoCorrection>,
    pub venue_normalizations: BTreeMap<String, String>,
    pub affiliation_conflicts: Vec<AffiliationConflict>,

    // Lexical extraction
    pub extracted_topics: BTreeMap<String, usize>,
    pub methods_from_abstracts: Vec<MethodMention>,

    // Graph analytics
    pub citation_graph: BTreeMap<String, Vec<String>>,
    pub in_degree: BTreeMap<String, usize>,
    pub out_degree: BTreeMap<String, usize>,
    pub pagerank_scores: BTreeMap<String, f64>,
    pub pagerank_iterations: usize,
    pub pagerank_converged: bool,
    pub top_cited_papers: Vec<String>,
    pub orphan_citations: Vec<CitationEdge>,
    pub self_citations: Vec<CitationEdge>,
    pub citation_rings: Vec<CitationRing>,
    pub citation_ring_papers: Vec<String>,
    pub temporal_anomalies: Vec<TemporalAnomaly>,
}

/// Degree statistics over all papers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkStatistics {
    pub avg_in_degree: f64,
    pub avg_out_degree: f64,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
}

impl NetworkStatistics {
    pub fn from_graph(graph: &CitationGraph) -> Self {
        let n = graph.node_count();
        if n == 0 {
            return Self::default();
        }
        let (mut in_sum, mut out_sum, mut max_in, mut max_out) = (0, 0, 0, 0);
        for node in 0..n {
            let (i, o) = (graph.in_degree(node), graph.out_degree(node));
            in_sum += i;
            out_sum += o;
            max_in = max_in.max(i);
            max_out = max_out.max(o);
        }
        Self {
            avg_in_degree: in_sum as f64 / n as f64,
            avg_out_degree: out_sum as f64 / n as f64,
            max_in_degree: max_in,
            max_out_degree: max_out,
        }
    }
}

/// Headline counts for a corpus and its analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorpusSummary {
    pub total_papers: usize,
    pub total_citations: usize,
    pub unique_authors_raw: usize,
    pub unique_authors_resolved: usize,
    pub unique_institutions_raw: usize,
    pub unique_institutions_resolved: usize,
    pub papers_with_missing_abstract: usize,
    pub papers_with_missing_keywords: usize,
    pub papers_with_missing_institution: usize,
    pub orphan_citation_count: usize,
    pub self_citation_count: usize,
    /// Raw citation records per paper
    pub avg_citations_per_paper: f64,
    pub most_common_venue: Option<String>,
    pub year_range: Option<(i32, i32)>,
    pub network: NetworkStatistics,
    pub citation_ring_paper_count: usize,
    pub temporal_anomaly_count: usize,
    pub typo_correction_count: usize,
    pub affiliation_conflict_count: usize,
}

impl CorpusSummary {
    /// Input-only counts; the analysis counts are filled by [`Self::with_report`].
    ///
    /// Venues are counted under their canonical name when `venue_names` has
    /// one.
    pub fn from_inputs(
        papers: &[Paper],
        citations: &[CitationEdge],
        venue_names: &BTreeMap<String, String>,
    ) -> Self {
        let mut raw_authors = std::collections::BTreeSet::new();
        let mut raw_institutions = std::collections::BTreeSet::new();
        let mut venues: BTreeMap<&str, usize> = BTreeMap::new();
        let mut summary = Self {
            total_papers: papers.len(),
            total_citations: citations.len(),
            ..Self::default()
        };

        for paper in papers {
            raw_authors.extend(
                paper
                    .authors
                    .iter()
                    .map(|a| a.trim())
                    .filter(|a| !a.is_empty()),
            );
            match paper.institution.as_deref().map(str::trim) {
                Some(inst) if !inst.is_empty() => {
                    raw_institutions.insert(inst);
                }
                _ => summary.papers_with_missing_institution += 1,
            }
            if paper.abstract_text.trim().is_empty() {
                summary.papers_with_missing_abstract += 1;
            }
            if paper.keywords.iter().all(|k| k.trim().is_empty()) {
                summary.papers_with_missing_keywords += 1;
            }
            let raw = paper.venue.trim();
            let venue = venue_names.get(raw).map_or(raw, String::as_str);
            if !venue.is_empty() {
                *venues.entry(venue).or_default() += 1;
            }
        }

        summary.unique_authors_raw = raw_authors.len();
        summary.unique_institutions_raw = raw_institutions.len();
        if !papers.is_empty() {
            summary.avg_citations_per_paper = citations.len() as f64 / papers.len() as f64;
        }
        // Ties go to the alphabetically first venue
        summary.most_common_venue = venues
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(venue, _)| venue.to_string());
        summary.year_range = papers
            .iter()
            .map(|p| p.year)
            .fold(None, |range, y| match range {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            });
        summary
    }

    /// Fill the counts derived from analysis results.
    pub fn with_report(mut self, report: &AnalysisReport, graph: &CitationGraph) -> Self {
        self.unique_authors_resolved = report.resolved_author_count;
        self.unique_institutions_resolved = report.resolved_institution_count;
        self.orphan_citation_count = report.orphan_citations.len();
        self.self_citation_count = report.self_citations.len();
        self.network = NetworkStatistics::from_graph(graph);
        self.citation_ring_paper_count = report.citation_ring_papers.len();
        self.temporal_anomaly_count = report.temporal_anomalies.len();
        self.typo_correction_count = report.typo_corrections.len();
        self.affiliation_conflict_count = report.affiliation_conflicts.len();
        self
    }
}
