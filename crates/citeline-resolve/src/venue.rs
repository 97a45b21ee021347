//! Venue normalization: fixed rename table, fuzzy fallback, identity.

use std::collections::BTreeMap;

use citeline_core::{Paper, ResolverConfig};
use rustc_hash::FxHashMap;

use crate::fuzzy::{FuzzyMatcher, Vocabulary};
use crate::normalize::normalize;

/// Maps raw venue strings to canonical venue names.
pub struct VenueNormalizer {
    /// normalized variation or canonical -> canonical
    renames: FxHashMap<String, String>,
    vocabulary: Vocabulary,
    matcher: FuzzyMatcher,
    threshold: f64,
}

impl VenueNormalizer {
    pub fn new(config: &ResolverConfig) -> Self {
        let mut by_canonical: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (variation, canonical) in &config.venue_renames {
            let forms = by_canonical.entry(canonical.as_str()).or_default();
            forms.push(normalize(variation));
            forms.push(normalize(canonical));
        }

        let mut renames = FxHashMap::default();
        let mut vocabulary = Vocabulary::new();
        for (canonical, forms) in by_canonical {
            for form in &forms {
                renames
                    .entry(form.clone())
                    .or_insert_with(|| canonical.to_string());
            }
            vocabulary.insert(canonical, canonical, forms);
        }

        Self {
            renames,
            vocabulary,
            matcher: FuzzyMatcher::new(config.distance_ratio),
            threshold: config.fuzzy_threshold,
        }
    }

    /// Canonical name for `raw`; unknown venues come back trimmed.
    pub fn canonical(&self, raw: &str) -> String {
        let raw = raw.trim();
        let key = normalize(raw);
        if let Some(canonical) = self.renames.get(&key) {
            return canonical.clone();
        }
        match self
            .matcher
            .best_match(&key, &self.vocabulary)
            .filter(|hit| hit.meets(self.threshold))
        {
            Some(hit) => {
                log::debug!("Venue '{raw}' ~ '{}' (similarity {:.2})", hit.canonical, hit.similarity);
                hit.canonical.to_string()
            }
            None => raw.to_string(),
        }
    }
}

/// Canonical name of every distinct non-empty venue in `papers`.
pub fn normalize_venues(papers: &[Paper], config: &ResolverConfig) -> BTreeMap<String, String> {
    let normalizer = VenueNormalizer::new(config);
    let mut out = BTreeMap::new();
    for paper in papers {
        let raw = paper.venue.trim();
        if raw.is_empty() || out.contains_key(raw) {
            continue;
        }
        out.insert(raw.to_string(), normalizer.canonical(raw));
    }
    out
}
