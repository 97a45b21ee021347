//! `citeline analyze` - resolve entities and analyze the citation graph

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use serde::de::DeserializeOwned;

use citeline_core::{
    AffiliationReference, CitationEdge, Corpus, Paper, SharedProgress, Stage, fmt_num, pct,
};
use citeline_pipeline::AnalysisReport;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Papers JSON file (array of paper records)
    #[arg(long)]
    pub papers: PathBuf,

    /// Citations file: CSV with citing_paper,cited_paper header, or JSON array
    #[arg(long)]
    pub citations: PathBuf,

    /// Affiliation reference JSON file
    #[arg(long)]
    pub affiliations: PathBuf,

    /// Write the full report as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: AnalyzeArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let pb = progress.stage_line(Stage::Load);
    let corpus = load_corpus(&args.papers, &args.citations, &args.affiliations)?;
    pb.finish_with_message(format!(
        "{} papers, {} citations, {} reference authors",
        fmt_num(corpus.papers.len()),
        fmt_num(corpus.citations.len()),
        fmt_num(corpus.affiliations.authors.len())
    ));

    let pb = progress.stage_line(Stage::Analyze);
    pb.set_message("resolving entities and ranking papers");
    let report = citeline_pipeline::analyze(&corpus, &config.analysis)
        .context("Analysis failed")?;
    pb.finish_with_message(format!(
        "{} authors, {} institutions, {} ring papers",
        fmt_num(report.resolved_author_count),
        fmt_num(report.resolved_institution_count),
        fmt_num(report.citation_ring_papers.len())
    ));

    if let Some(path) = args.output.or_else(|| config.output.report.clone()) {
        let pb = progress.stage_line(Stage::Report);
        write_report(&report, &path, config.output.pretty)?;
        pb.finish_with_message(format!("wrote {}", path.display()));
        log::info!("Report written to {}", path.display());
    }

    print_summary(&report, config.output.table_rows);
    Ok(())
}

/// Load the three input files.
pub fn load_corpus(papers: &Path, citations: &Path, affiliations: &Path) -> Result<Corpus> {
    let papers: Vec<Paper> = read_json(papers)?;
    let citations = load_citations(citations)?;
    let affiliations: AffiliationReference = read_json(affiliations)?;
    log::info!(
        "Loaded {} papers, {} citations, {} reference institutions",
        papers.len(),
        citations.len(),
        affiliations.institutions.len()
    );
    Ok(Corpus::new(papers, citations, affiliations))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Citations from CSV (by `.csv` extension) or JSON.
pub fn load_citations(path: &Path) -> Result<Vec<CitationEdge>> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return read_json(path);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    reader
        .deserialize::<CitationEdge>()
        .enumerate()
        .map(|(i, row)| {
            row.with_context(|| format!("{}: bad citation row {}", path.display(), i + 1))
        })
        .collect()
}

fn write_report(report: &AnalysisReport, path: &Path, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir: {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, report)?;
    } else {
        serde_json::to_writer(&mut writer, report)?;
    }
    writer.flush()?;
    Ok(())
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    table
}

fn print_summary(report: &AnalysisReport, rows: usize) {
    let s = &report.summary;

    let mut table = new_table(&["Corpus", "Raw", "Resolved"]);
    table.add_row(vec![
        "Papers".to_string(),
        fmt_num(s.total_papers),
        String::new(),
    ]);
    table.add_row(vec![
        "Authors".to_string(),
        fmt_num(s.unique_authors_raw),
        fmt_num(s.unique_authors_resolved),
    ]);
    table.add_row(vec![
        "Institutions".to_string(),
        fmt_num(s.unique_institutions_raw),
        fmt_num(s.unique_institutions_resolved),
    ]);
    table.add_row(vec![
        "Citations".to_string(),
        fmt_num(s.total_citations),
        format!("{:.2} per paper", s.avg_citations_per_paper),
    ]);
    table.add_row(vec![
        "Missing abstract".to_string(),
        format!(
            "{} ({:.1}%)",
            fmt_num(s.papers_with_missing_abstract),
            pct(s.papers_with_missing_abstract, s.total_papers)
        ),
        String::new(),
    ]);
    table.add_row(vec![
        "Missing keywords".to_string(),
        format!(
            "{} ({:.1}%)",
            fmt_num(s.papers_with_missing_keywords),
            pct(s.papers_with_missing_keywords, s.total_papers)
        ),
        String::new(),
    ]);
    if let Some((lo, hi)) = s.year_range {
        table.add_row(vec!["Years".to_string(), format!("{lo}-{hi}"), String::new()]);
    }
    if let Some(venue) = &s.most_common_venue {
        table.add_row(vec!["Top venue".to_string(), venue.clone(), String::new()]);
    }
    println!("\n{table}");

    let mut table = new_table(&["Anomaly", "Count"]);
    for (label, count) in [
        ("Orphan citations", s.orphan_citation_count),
        ("Self-citations", s.self_citation_count),
        ("Citation ring papers", s.citation_ring_paper_count),
        ("Temporal anomalies", s.temporal_anomaly_count),
        ("Typo corrections", s.typo_correction_count),
        ("Ambiguous authors", report.ambiguous_author_resolutions.len()),
        ("Affiliation conflicts", s.affiliation_conflict_count),
    ] {
        table.add_row(vec![label.to_string(), fmt_num(count)]);
    }
    println!("{table}");

    let mut table = new_table(&["Top cited", "In-degree", "PageRank"]);
    for id in report.top_cited_papers.iter().take(rows) {
        let in_degree = report.in_degree.get(id).copied().unwrap_or(0);
        let score = report.pagerank_scores.get(id).copied().unwrap_or(0.0);
        table.add_row(vec![id.clone(), fmt_num(in_degree), format!("{score:.5}")]);
    }
    println!("{table}");

    if !report.citation_rings.is_empty() {
        let mut table = new_table(&["Ring papers", "Cycles", "Longest"]);
        for ring in &report.citation_rings {
            table.add_row(vec![
                ring.papers.join(", "),
                fmt_num(ring.cycle_count),
                ring.longest_cycle.to_string(),
            ]);
        }
        println!("{table}");
    }

    if !report.pagerank_converged {
        log::warn!(
            "PageRank did not converge within {} iterations",
            report.pagerank_iterations
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn citations_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "citations.csv",
            "citing_paper,cited_paper\npaper_0001, paper_0002\npaper_0003,paper_0003\n",
        );
        let edges = load_citations(&path).unwrap();
        assert_eq!(
            edges,
            vec![
                CitationEdge::new("paper_0001", "paper_0002"),
                CitationEdge::new("paper_0003", "paper_0003"),
            ]
        );
    }

    #[test]
    fn citations_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "citations.json",
            r#"[{"citing_paper": "a", "cited_paper": "b"}]"#,
        );
        assert_eq!(load_citations(&path).unwrap(), vec![CitationEdge::new("a", "b")]);
    }

    #[test]
    fn bad_csv_row_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "c.csv", "citing_paper,cited_paper\nonly_one\n");
        let err = load_citations(&path).unwrap_err();
        assert!(format!("{err:#}").contains("c.csv"));
    }

    #[test]
    fn corpus_round_trip_to_report() {
        let dir = tempfile::tempdir().unwrap();
        let papers = write(
            dir.path(),
            "papers.json",
            r#"[
              {"paper_id": "p1", "title": "A", "authors": ["J. Smith"], "institution": "MIT",
               "abstract": null, "keywords": ["graphs"], "venue": "NIPS", "year": 2019,
               "publication_date": "2019-06-01", "_ground_truth": {}},
              {"paper_id": "p2", "title": "B", "authors": [], "institution": null,
               "abstract": "uses dropout", "keywords": null, "venue": "ICML", "year": 2020,
               "publication_date": null}
            ]"#,
        );
        let citations = write(dir.path(), "citations.csv", "citing_paper,cited_paper\np2,p1\np1,p9\n");
        let affiliations = write(
            dir.path(),
            "affiliations.json",
            r#"{"authors": {"auth_001": {"canonical_name": "John Smith",
                  "known_variations": ["J. Smith"], "primary_institution": "inst_001"}},
                "institutions": {"inst_001": {"canonical_name": "Massachusetts Institute of Technology",
                  "known_variations": ["MIT"], "country": "USA"}}}"#,
        );

        let corpus = load_corpus(&papers, &citations, &affiliations).unwrap();
        assert_eq!(corpus.papers.len(), 2);
        assert_eq!(corpus.citations.len(), 2);

        let report = citeline_pipeline::analyze(&corpus, &Config::default().analysis).unwrap();
        let out = dir.path().join("out").join("report.json");
        write_report(&report, &out, true).unwrap();

        let value: serde_json::Value =
            serde_json::from_reader(File::open(&out).unwrap()).unwrap();
        assert_eq!(value["orphan_citations"][0]["cited_paper"], "p9");
        assert_eq!(value["top_cited_papers"][0], "p1");
        assert_eq!(value["venue_normalizations"]["NIPS"], "NeurIPS");
    }

    #[test]
    fn missing_file_has_context() {
        let err = load_corpus(
            Path::new("/nonexistent/papers.json"),
            Path::new("c.csv"),
            Path::new("a.json"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/papers.json"));
    }
}
