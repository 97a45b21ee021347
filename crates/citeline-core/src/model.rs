//! Input records shared by every analysis stage.
//!
//! All types here are read-only once loaded. The resolver and the graph
//! builder both borrow the same [`Corpus`], which is what allows them to run
//! on separate rayon workers without locking.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AnalysisError, Result};

// === Null-handling deserializers ===

/// Unparsable dates are dropped rather than failing the whole record
fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<NaiveDate>().ok()))
}

/// Deserialize null as empty string (for optional String fields)
fn null_to_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Deserialize null as empty Vec (for optional Vec fields)
fn null_to_empty_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Deserialize blank strings as `None`
fn blank_to_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|opt| opt.filter(|s| !s.trim().is_empty()))
}

/// A paper as supplied by the corpus loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub paper_id: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub title: String,
    /// Raw author strings, in byline order
    #[serde(default, deserialize_with = "null_to_empty_vec")]
    pub authors: Vec<String>,
    /// Raw institution string; `None` means no affiliation context
    #[serde(default, deserialize_with = "blank_to_none")]
    pub institution: Option<String>,
    #[serde(rename = "abstract", default, deserialize_with = "null_to_empty")]
    pub abstract_text: String,
    #[serde(default, deserialize_with = "null_to_empty_vec")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub venue: String,
    pub year: i32,
    /// `None` when absent or not an ISO `YYYY-MM-DD` date
    #[serde(default, deserialize_with = "lenient_date")]
    pub publication_date: Option<NaiveDate>,
}

impl Paper {
    /// Minimal paper for tests and synthetic fixtures.
    pub fn new(paper_id: impl Into<String>, year: i32) -> Self {
        Self {
            paper_id: paper_id.into(),
            title: String::new(),
            authors: Vec::new(),
            institution: None,
            abstract_text: String::new(),
            keywords: Vec::new(),
            venue: String::new(),
            year,
            publication_date: None,
        }
    }

    pub fn with_authors<S: Into<String>>(mut self, authors: impl IntoIterator<Item = S>) -> Self {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = text.into();
        self
    }

    pub fn with_keywords<S: Into<String>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// A raw `citing -> cited` record. Not deduplicated, may be reflexive or
/// point at an unknown paper.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CitationEdge {
    pub citing_paper: String,
    pub cited_paper: String,
}

impl CitationEdge {
    pub fn new(citing: impl Into<String>, cited: impl Into<String>) -> Self {
        Self {
            citing_paper: citing.into(),
            cited_paper: cited.into(),
        }
    }

    pub fn is_reflexive(&self) -> bool {
        self.citing_paper == self.cited_paper
    }
}

/// Reference entry for a known author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub canonical_name: String,
    #[serde(default, deserialize_with = "null_to_empty_vec")]
    pub known_variations: Vec<String>,
    /// Institution id into [`AffiliationReference::institutions`]
    pub primary_institution: String,
}

/// Reference entry for a known institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionRef {
    pub canonical_name: String,
    #[serde(default, deserialize_with = "null_to_empty_vec")]
    pub known_variations: Vec<String>,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub country: String,
}

/// Ground-truth author/institution tables. Never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffiliationReference {
    #[serde(default)]
    pub authors: BTreeMap<String, AuthorRef>,
    #[serde(default)]
    pub institutions: BTreeMap<String, InstitutionRef>,
}

impl AffiliationReference {
    /// Canonical name of an author's primary institution, if that id is known.
    pub fn primary_institution_name(&self, author_id: &str) -> Option<&str> {
        let author = self.authors.get(author_id)?;
        self.institutions
            .get(&author.primary_institution)
            .map(|inst| inst.canonical_name.as_str())
    }
}

/// The three pre-loaded inputs of one analysis run.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub papers: Vec<Paper>,
    pub citations: Vec<CitationEdge>,
    pub affiliations: AffiliationReference,
}

impl Corpus {
    pub fn new(
        papers: Vec<Paper>,
        citations: Vec<CitationEdge>,
        affiliations: AffiliationReference,
    ) -> Self {
        Self {
            papers,
            citations,
            affiliations,
        }
    }
}

/// Index papers by id, rejecting empty and duplicate ids.
///
/// Both the resolver and the graph builder run this pre-check so that either
/// can be used on its own.
pub fn index_papers(papers: &[Paper]) -> Result<BTreeMap<&str, &Paper>> {
    let mut index = BTreeMap::new();
    for (i, paper) in papers.iter().enumerate() {
        let id = paper.paper_id.trim();
        if id.is_empty() {
            return Err(AnalysisError::invalid_record(
                format!("paper #{i}"),
                "paper_id",
            ));
        }
        if index.insert(paper.paper_id.as_str(), paper).is_some() {
            return Err(AnalysisError::DuplicatePaper(paper.paper_id.clone()));
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_from_json_with_nulls() {
        let json = r#"{
            "paper_id": "paper_0001",
            "title": "Graph Things",
            "authors": ["J. Smith", "Maria Garcia"],
            "institution": null,
            "abstract": null,
            "keywords": null,
            "venue": "NIPS",
            "year": 2017,
            "publication_date": "2017-05-03",
            "_ground_truth": {"in_citation_ring": false}
        }"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.paper_id, "paper_0001");
        assert_eq!(paper.authors.len(), 2);
        assert!(paper.institution.is_none());
        assert!(paper.abstract_text.is_empty());
        assert!(paper.keywords.is_empty());
        assert_eq!(
            paper.publication_date,
            NaiveDate::from_ymd_opt(2017, 5, 3)
        );
    }

    #[test]
    fn malformed_date_is_none() {
        let json = r#"{"paper_id": "p", "year": 2020, "publication_date": "spring 2020"}"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert!(paper.publication_date.is_none());
    }

    #[test]
    fn blank_institution_is_none() {
        let json = r#"{"paper_id": "p", "institution": "  ", "year": 2020}"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert!(paper.institution.is_none());
    }

    #[test]
    fn affiliations_ignore_extra_keys() {
        let json = r#"{
            "authors": {
                "auth_001": {
                    "canonical_name": "John Smith",
                    "known_variations": ["J. Smith"],
                    "primary_institution": "inst_001",
                    "email_domain": "mit.edu"
                }
            },
            "institutions": {
                "inst_001": {
                    "canonical_name": "Massachusetts Institute of Technology",
                    "known_variations": ["MIT"],
                    "country": "USA"
                }
            },
            "disambiguation_notes": [],
            "venue_notes": ["NIPS was renamed to NeurIPS in 2018."]
        }"#;
        let refs: AffiliationReference = serde_json::from_str(json).unwrap();
        assert_eq!(
            refs.primary_institution_name("auth_001"),
            Some("Massachusetts Institute of Technology")
        );
        assert_eq!(refs.primary_institution_name("auth_999"), None);
    }

    #[test]
    fn index_rejects_duplicates() {
        let papers = vec![Paper::new("a", 2020), Paper::new("a", 2021)];
        assert_eq!(
            index_papers(&papers).unwrap_err(),
            AnalysisError::DuplicatePaper("a".to_string())
        );
    }

    #[test]
    fn index_rejects_empty_id() {
        let papers = vec![Paper::new("a", 2020), Paper::new(" ", 2021)];
        let err = index_papers(&papers).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRecord { field: "paper_id", .. }));
    }

    #[test]
    fn reflexive_edge() {
        assert!(CitationEdge::new("a", "a").is_reflexive());
        assert!(!CitationEdge::new("a", "b").is_reflexive());
    }
}
