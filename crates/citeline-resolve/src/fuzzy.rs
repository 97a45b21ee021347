//! Approximate matching of a normalized string against a reference vocabulary.
//!
//! Distances are Levenshtein edits over characters. The allowed distance
//! grows with the candidate length so long institution names tolerate more
//! typos than short person names.

use std::cmp::Ordering;

/// Floor on the allowed edit distance for any candidate of length >= 2
pub const MIN_ALLOWED_EDITS: usize = 2;

/// Slack applied when comparing a similarity against a confidence floor
const SCORE_EPSILON: f64 = 1e-9;

/// One reference entity and the normalized forms it is known under.
#[derive(Debug, Clone)]
pub struct VocabularyEntry {
    pub id: String,
    pub canonical: String,
    /// Normalized, sorted, deduplicated
    pub forms: Vec<String>,
}

/// Reference strings a candidate is matched against.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. `forms` must already be normalized; empty forms are
    /// dropped.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        canonical: impl Into<String>,
        forms: impl IntoIterator<Item = String>,
    ) {
        let mut forms: Vec<String> = forms.into_iter().filter(|f| !f.is_empty()).collect();
        forms.sort();
        forms.dedup();
        self.entries.push(VocabularyEntry {
            id: id.into(),
            canonical: canonical.into(),
            forms,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }
}

/// Best reference hit for a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'v> {
    pub id: &'v str,
    pub canonical: &'v str,
    /// The reference form that was closest
    pub form: &'v str,
    pub distance: usize,
    /// `1 - distance / max(len)`, in `[0, 1]`
    pub similarity: f64,
}

impl FuzzyMatch<'_> {
    /// Whether this match clears a confidence floor.
    pub fn meets(&self, floor: f64) -> bool {
        self.similarity + SCORE_EPSILON >= floor
    }
}

/// Edit-distance matcher with a length-proportional distance cap.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    distance_ratio: f64,
}

impl FuzzyMatcher {
    pub fn new(distance_ratio: f64) -> Self {
        Self { distance_ratio }
    }

    /// Largest edit distance accepted for a candidate of `len` characters.
    ///
    /// Zero for empty and one-character candidates, which never match.
    pub fn max_distance(&self, len: usize) -> usize {
        if len < 2 {
            return 0;
        }
        let scaled = (len as f64 * self.distance_ratio).ceil() as usize;
        scaled.max(MIN_ALLOWED_EDITS)
    }

    /// Closest vocabulary form within the distance cap.
    ///
    /// Ties resolve to the smallest distance, then the smallest reference id,
    /// then the smallest form, so the result never depends on insertion
    /// order.
    pub fn best_match<'v>(&self, candidate: &str, vocabulary: &'v Vocabulary) -> Option<FuzzyMatch<'v>> {
        let len = candidate.chars().count();
        if len < 2 {
            return None;
        }
        let cap = self.max_distance(len);

        let mut best: Option<FuzzyMatch<'v>> = None;
        for entry in vocabulary.entries() {
            for form in &entry.forms {
                let form_len = form.chars().count();
                if form_len.abs_diff(len) > cap {
                    continue;
                }
                let distance = strsim::levenshtein(candidate, form);
                if distance > cap {
                    continue;
                }
                let hit = FuzzyMatch {
                    id: &entry.id,
                    canonical: &entry.canonical,
                    form,
                    distance,
                    similarity: similarity_from_distance(distance, len.max(form_len)),
                };
                let better = match &best {
                    None => true,
                    Some(current) => compare(&hit, current) == Ordering::Less,
                };
                if better {
                    best = Some(hit);
                }
            }
        }
        best
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(0.15)
    }
}

/// Normalized Levenshtein similarity of two strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    similarity_from_distance(strsim::levenshtein(a, b), max_len)
}

fn similarity_from_distance(distance: usize, max_len: usize) -> f64 {
    if max_len == 0 {
        return 1.0;
    }
    1.0 - distance as f64 / max_len as f64
}

fn compare(a: &FuzzyMatch<'_>, b: &FuzzyMatch<'_>) -> Ordering {
    a.distance
        .cmp(&b.distance)
        .then_with(|| a.id.cmp(b.id))
        .then_with(|| a.form.cmp(b.form))
}
