//! End-to-end analysis of a small hand-built corpus with every planted
//! anomaly: shared initials, typos, a five-paper ring with chords, papers
//! citing the future, orphan and self citations.

use citeline_core::{
    AffiliationReference, AnalysisConfig, AnalysisError, CitationEdge, Corpus, Paper,
};
use citeline_pipeline::analyze;

const AFFILIATIONS: &str = r#"{
  "authors": {
    "auth_001": {"canonical_name": "John Smith", "known_variations": ["J. Smith", "John A. Smith"],
                 "primary_institution": "inst_001", "disambiguation_notes": "not James Smith"},
    "auth_002": {"canonical_name": "Maria Garcia", "known_variations": ["M. Garcia"],
                 "primary_institution": "inst_002"},
    "auth_003": {"canonical_name": "Wei Zhang", "known_variations": ["W. Zhang"],
                 "primary_institution": "inst_003"},
    "auth_011": {"canonical_name": "James Smith", "known_variations": ["J. Smith"],
                 "primary_institution": "inst_004"},
    "auth_012": {"canonical_name": "Wei Zhang", "known_variations": ["W. Zhang"],
                 "primary_institution": "inst_002"}
  },
  "institutions": {
    "inst_001": {"canonical_name": "Massachusetts Institute of Technology",
                 "known_variations": ["MIT", "M.I.T."], "country": "USA", "email_domain": "mit.edu"},
    "inst_002": {"canonical_name": "Stanford University", "known_variations": ["Stanford"],
                 "country": "USA"},
    "inst_003": {"canonical_name": "Tsinghua University", "known_variations": ["Tsinghua"],
                 "country": "China"},
    "inst_004": {"canonical_name": "University of Oxford", "known_variations": ["Oxford"],
                 "country": "UK"}
  },
  "venue_notes": {"NIPS": "renamed NeurIPS in 2018"}
}"#;

fn id(n: u32) -> String {
    format!("paper_{n:04}")
}

fn corpus() -> Corpus {
    let mut papers = vec![
        Paper::new(id(1), 2018)
            .with_authors(["J. Smith"])
            .with_institution("MIT")
            .with_venue("NIPS")
            .with_abstract("We train with gradient descent and dropout.")
            .with_keywords(["optimization"]),
        Paper::new(id(2), 2019)
            .with_authors(["J. Smith"])
            .with_institution("Oxford")
            .with_venue("NeurIPS")
            .with_keywords(["optimization", "graphs"]),
        Paper::new(id(3), 2019)
            .with_authors(["Jonh Smith", "Maria Gracia"])
            .with_institution("MIT")
            .with_venue("ICML"),
        Paper::new(id(4), 2020)
            .with_authors(["Wei Zhang"])
            .with_institution("Tsinghua"),
        Paper::new(id(5), 2020)
            .with_authors(["Wei Zhang"])
            .with_institution("Standford University"),
        Paper::new(id(10), 2017).with_authors(["Yuki Tanaka"]),
        Paper::new(id(15), 2017),
        Paper::new(id(40), 2021).with_abstract("A study of attention mechanism variants."),
        Paper::new(id(50), 2023),
        Paper::new(id(51), 2023),
        Paper::new(id(60), 2022),
    ];
    for n in 30..35 {
        papers.push(Paper::new(id(n), 2020).with_authors(["M. Garcia"]).with_institution("Stanford"));
    }

    let mut citations = vec![
        CitationEdge::new(id(2), id(1)),
        CitationEdge::new(id(3), id(1)),
        CitationEdge::new(id(4), id(1)),
        CitationEdge::new(id(5), id(2)),
        CitationEdge::new(id(10), "paper_9999"),
        CitationEdge::new(id(15), id(15)),
        CitationEdge::new(id(60), id(60)),
        CitationEdge::new(id(60), id(60)),
        CitationEdge::new(id(40), id(50)),
        CitationEdge::new(id(40), id(51)),
        CitationEdge::new(id(40), id(1)),
    ];
    let ring: Vec<String> = (30..35).map(id).collect();
    for j in 0..ring.len() {
        citations.push(CitationEdge::new(ring[j].clone(), ring[(j + 1) % ring.len()].clone()));
    }
    for (a, b) in [(0, 2), (1, 3), (2, 4), (3, 0)] {
        citations.push(CitationEdge::new(ring[a].clone(), ring[b].clone()));
    }

    let affiliations: AffiliationReference = serde_json::from_str(AFFILIATIONS).unwrap();
    Corpus::new(papers, citations, affiliations)
}

#[test]
fn shared_initials_resolve_to_different_people() {
    let report = analyze(&corpus(), &AnalysisConfig::default()).unwrap();

    let john = report
        .extracted_authors
        .iter()
        .find(|a| a.reference_id.as_deref() == Some("auth_001"))
        .unwrap();
    let james = report
        .extracted_authors
        .iter()
        .find(|a| a.reference_id.as_deref() == Some("auth_011"))
        .unwrap();
    assert!(john.paper_ids.contains(&id(1)));
    assert!(john.paper_ids.contains(&id(3)));
    assert!(!john.paper_ids.contains(&id(2)));
    assert!(james.paper_ids.contains(&id(2)));

    let weis: Vec<_> = report
        .extracted_authors
        .iter()
        .filter(|a| a.canonical_name == "Wei Zhang")
        .collect();
    assert_eq!(weis.len(), 2);

    assert!(report
        .ambiguous_author_resolutions
        .iter()
        .any(|r| r.name_variation == "J. Smith" && r.resolved_to == "James Smith"));
}

#[test]
fn typos_corrected_and_recorded() {
    let report = analyze(&corpus(), &AnalysisConfig::default()).unwrap();
    let corrected = |original: &str| {
        report
            .typo_corrections
            .iter()
            .find(|t| t.original == original)
            .map(|t| t.corrected.clone())
    };
    assert_eq!(corrected("Jonh Smith").as_deref(), Some("John Smith"));
    assert_eq!(corrected("Maria Gracia").as_deref(), Some("Maria Garcia"));
    assert_eq!(
        corrected("Standford University").as_deref(),
        Some("Stanford University")
    );
    assert_eq!(report.summary.typo_correction_count, report.typo_corrections.len());
}

#[test]
fn affiliation_conflict_for_author_at_other_institution() {
    let report = analyze(&corpus(), &AnalysisConfig::default()).unwrap();
    let conflict = report
        .affiliation_conflicts
        .iter()
        .find(|c| c.paper_id == id(3))
        .unwrap();
    assert_eq!(conflict.author, "Maria Garcia");
    assert_eq!(conflict.expected_institution, "Stanford University");
    assert_eq!(
        conflict.listed_institution,
        "Massachusetts Institute of Technology"
    );
}

#[test]
fn planted_ring_flagged() {
    let report = analyze(&corpus(), &AnalysisConfig::default()).unwrap();
    let expected: Vec<String> = (30..35).map(id).collect();
    assert_eq!(report.citation_ring_papers, expected);
    assert_eq!(report.citation_rings.len(), 1);
    assert_eq!(report.citation_rings[0].longest_cycle, 5);
}

#[test]
fn temporal_orphan_and_self_citations() {
    let report = analyze(&corpus(), &AnalysisConfig::default()).unwrap();

    assert_eq!(report.temporal_anomalies.len(), 2);
    assert!(report
        .temporal_anomalies
        .iter()
        .all(|t| t.citing_paper == id(40) && t.citing_year == 2021 && t.cited_year == 2023));

    assert_eq!(
        report.orphan_citations,
        vec![CitationEdge::new(id(10), "paper_9999")]
    );
    assert_eq!(report.self_citations.len(), 3);
    assert!(!report.citation_graph[&id(15)].contains(&id(15)));
    assert_eq!(report.out_degree[&id(10)], 0);
}

#[test]
fn degrees_and_pagerank() {
    let report = analyze(&corpus(), &AnalysisConfig::default()).unwrap();
    assert_eq!(report.top_cited_papers[0], id(1));
    assert_eq!(report.in_degree[&id(1)], 4);
    assert_eq!(report.in_degree.len(), report.summary.total_papers);

    let total: f64 = report.pagerank_scores.values().sum();
    assert!((total - 1.0).abs() < 0.01);
    assert!(report.pagerank_scores.values().all(|s| s.is_finite() && *s >= 0.0));
    assert!(report.pagerank_converged);
}

#[test]
fn venues_topics_and_methods() {
    let report = analyze(&corpus(), &AnalysisConfig::default()).unwrap();
    assert_eq!(report.venue_normalizations["NIPS"], "NeurIPS");
    assert_eq!(report.venue_normalizations["ICML"], "ICML");
    assert_eq!(report.summary.most_common_venue.as_deref(), Some("NeurIPS"));
    assert_eq!(report.extracted_topics["optimization"], 2);

    let methods: Vec<&str> = report
        .methods_from_abstracts
        .iter()
        .map(|m| m.method.as_str())
        .collect();
    assert_eq!(methods, vec!["gradient descent", "dropout", "attention mechanism"]);
}

#[test]
fn summary_counts() {
    let corpus = corpus();
    let report = analyze(&corpus, &AnalysisConfig::default()).unwrap();
    let summary = &report.summary;
    assert_eq!(summary.total_papers, corpus.papers.len());
    assert_eq!(summary.total_citations, corpus.citations.len());
    assert_eq!(summary.orphan_citation_count, 1);
    assert_eq!(summary.self_citation_count, 3);
    assert_eq!(summary.citation_ring_paper_count, 5);
    assert_eq!(summary.temporal_anomaly_count, 2);
    assert_eq!(summary.year_range, Some((2017, 2023)));
    assert_eq!(summary.unique_authors_resolved, report.resolved_author_count);
}

#[test]
fn report_is_deterministic_json() {
    let corpus = corpus();
    let config = AnalysisConfig::default();
    let first = serde_json::to_string(&analyze(&corpus, &config).unwrap()).unwrap();
    let second = serde_json::to_string(&analyze(&corpus, &config).unwrap()).unwrap();
    assert_eq!(first, second);

    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    for key in [
        "extracted_authors",
        "extracted_institutions",
        "extracted_topics",
        "methods_from_abstracts",
        "author_resolution_map",
        "institution_resolution_map",
        "citation_graph",
        "in_degree",
        "out_degree",
        "pagerank_scores",
        "top_cited_papers",
        "orphan_citations",
        "self_citations",
        "citation_ring_papers",
        "temporal_anomalies",
        "ambiguous_author_resolutions",
        "typo_corrections",
        "venue_normalizations",
        "affiliation_conflicts",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn missing_optional_fields_are_not_errors() {
    let corpus = Corpus::new(
        vec![Paper::new("lonely", 2020)],
        Vec::new(),
        AffiliationReference::default(),
    );
    let report = analyze(&corpus, &AnalysisConfig::default()).unwrap();
    assert!(report.extracted_authors.is_empty());
    assert!(report.extracted_topics.is_empty());
    assert!((report.pagerank_scores["lonely"] - 1.0).abs() < 1e-9);
}

#[test]
fn invalid_inputs_fail() {
    let mut corpus = corpus();
    corpus.papers.push(Paper::new(id(1), 2000));
    assert_eq!(
        analyze(&corpus, &AnalysisConfig::default()).unwrap_err(),
        AnalysisError::DuplicatePaper(id(1))
    );

    let mut config = AnalysisConfig::default();
    config.graph.pagerank_tolerance = -1.0;
    assert!(matches!(
        analyze(&Corpus::default(), &config),
        Err(AnalysisError::InvalidConfig(_))
    ));
}
