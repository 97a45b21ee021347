//! Entity resolution for authors and institutions.
//!
//! Each raw string goes through the same tiers: exact or known-variation
//! match, (authors only) initials match for abbreviated names, the known-typo
//! table, fuzzy match, and finally a new unlisted identity. Authors whose
//! name fits several reference entries are split by the institution listed
//! on the paper; without institutional evidence they stay separate
//! identities rather than being merged on a guess.

use std::collections::{BTreeMap, BTreeSet};

use citeline_core::{AffiliationReference, Paper, ResolverConfig, Result, index_papers};
use rustc_hash::FxHashMap;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::fuzzy::{FuzzyMatcher, Vocabulary};
use crate::normalize::{initials_key, is_abbreviated, normalize, normalize_person};
use crate::venue::normalize_venues;

/// Confidence recorded for corrections taken from the known-typo table
const KNOWN_TYPO_CONFIDENCE: f64 = 1.0;

// === Output records ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Author,
    Institution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypoCorrection {
    pub kind: EntityKind,
    pub original: String,
    pub corrected: String,
    pub confidence: f64,
}

/// A name that matched several reference authors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AmbiguousResolution {
    pub name_variation: String,
    pub resolved_to: String,
    /// Raw institution string of the paper, if it listed one
    pub institution_used: Option<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffiliationConflict {
    pub paper_id: String,
    pub author: String,
    pub listed_institution: String,
    pub expected_institution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAuthor {
    pub canonical_name: String,
    /// Reference id, `None` for identities absent from the reference tables
    pub reference_id: Option<String>,
    /// Primary institution (reference) or the disambiguating institution (unlisted)
    pub institution: Option<String>,
    pub paper_ids: BTreeSet<String>,
    pub name_variations: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedInstitution {
    pub canonical_name: String,
    pub reference_id: Option<String>,
    pub country: Option<String>,
    pub paper_ids: BTreeSet<String>,
    pub name_variations: BTreeSet<String>,
}

/// Raw variation (plus context) -> canonical name.
///
/// For authors the context is the canonical institution of the paper the
/// variation appeared on, since the same abbreviated name can denote
/// different people at different institutions. Institutions have no context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionMap {
    entries: BTreeMap<(String, Option<String>), String>,
}

impl ResolutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mapping. The first canonical recorded for a key is kept.
    pub fn insert(&mut self, variation: &str, context: Option<&str>, canonical: &str) {
        self.entries
            .entry((variation.to_string(), context.map(str::to_string)))
            .or_insert_with(|| canonical.to_string());
    }

    pub fn get(&self, variation: &str, context: Option<&str>) -> Option<&str> {
        self.entries
            .get(&(variation.to_string(), context.map(str::to_string)))
            .map(String::as_str)
    }

    /// Every canonical name a variation maps to, across contexts.
    pub fn canonicals_for(&self, variation: &str) -> BTreeSet<&str> {
        self.entries
            .iter()
            .filter(|((v, _), _)| v == variation)
            .map(|(_, canonical)| canonical.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(variation, context, canonical)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>, &str)> {
        self.entries
            .iter()
            .map(|((v, c), canonical)| (v.as_str(), c.as_deref(), canonical.as_str()))
    }
}

impl Serialize for ResolutionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        struct Entry<'a>(&'a str, Option<&'a str>, &'a str);

        impl Serialize for Entry<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                let mut s = serializer.serialize_struct("ResolutionEntry", 3)?;
                s.serialize_field("variation", self.0)?;
                s.serialize_field("context", &self.1)?;
                s.serialize_field("canonical", self.2)?;
                s.end()
            }
        }

        serializer.collect_seq(self.iter().map(|(v, c, canonical)| Entry(v, c, canonical)))
    }
}

/// Everything the resolver produces for one corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    pub authors: Vec<ResolvedAuthor>,
    pub institutions: Vec<ResolvedInstitution>,
    pub author_map: ResolutionMap,
    pub institution_map: ResolutionMap,
    pub ambiguous_author_resolutions: Vec<AmbiguousResolution>,
    pub typo_corrections: Vec<TypoCorrection>,
    pub venue_normalizations: BTreeMap<String, String>,
    pub affiliation_conflicts: Vec<AffiliationConflict>,
}

impl Resolution {
    pub fn resolved_author_count(&self) -> usize {
        self.authors.len()
    }

    pub fn resolved_institution_count(&self) -> usize {
        self.institutions.len()
    }
}

// === Per-string decisions ===

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum InstitutionIdentity {
    Reference(String),
    /// Keyed by normalized name
    Unlisted(String),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum AuthorIdentity {
    Reference(String),
    /// Keyed by normalized name, plus institution when the name alone is
    /// ambiguous
    Unlisted {
        name: String,
        institution: Option<String>,
    },
}

/// A correction applied on the way to a reference match.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub corrected: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstitutionMatch {
    pub identity: InstitutionIdentity,
    pub canonical: String,
    pub correction: Option<Correction>,
}

impl InstitutionMatch {
    pub fn reference_id(&self) -> Option<&str> {
        match &self.identity {
            InstitutionIdentity::Reference(id) => Some(id),
            InstitutionIdentity::Unlisted(_) => None,
        }
    }
}

/// Institution listed on the paper an author mention came from.
#[derive(Debug, Clone, Copy)]
pub struct InstitutionContext<'m> {
    pub raw: &'m str,
    pub resolved: &'m InstitutionMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Disambiguation {
    pub candidates: usize,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorMatch {
    pub identity: AuthorIdentity,
    pub canonical: String,
    pub correction: Option<Correction>,
    /// Set whenever several reference authors fit the name
    pub disambiguation: Option<Disambiguation>,
}

impl AuthorMatch {
    pub fn reference_id(&self) -> Option<&str> {
        match &self.identity {
            AuthorIdentity::Reference(id) => Some(id),
            AuthorIdentity::Unlisted { .. } => None,
        }
    }
}

// === Resolver ===

/// Resolver over one set of reference tables.
///
/// Construction indexes the reference data once; resolution itself is a
/// pure function of the input strings.
pub struct EntityResolver<'a> {
    refs: &'a AffiliationReference,
    config: &'a ResolverConfig,
    matcher: FuzzyMatcher,
    /// normalized form -> institution ids (sorted)
    institution_forms: FxHashMap<String, Vec<&'a str>>,
    institution_vocab: Vocabulary,
    /// normalized person form -> author ids (sorted)
    author_forms: FxHashMap<String, Vec<&'a str>>,
    /// initials key -> author ids (sorted)
    author_initials: FxHashMap<String, Vec<&'a str>>,
    author_vocab: Vocabulary,
}

impl<'a> EntityResolver<'a> {
    pub fn new(refs: &'a AffiliationReference, config: &'a ResolverConfig) -> Self {
        let mut institution_forms: FxHashMap<String, Vec<&'a str>> = FxHashMap::default();
        let mut institution_vocab = Vocabulary::new();
        for (id, inst) in &refs.institutions {
            let forms: BTreeSet<String> = std::iter::once(&inst.canonical_name)
                .chain(&inst.known_variations)
                .map(|s| normalize(s))
                .filter(|f| !f.is_empty())
                .collect();
            for form in &forms {
                institution_forms.entry(form.clone()).or_default().push(id);
            }
            institution_vocab.insert(id.as_str(), inst.canonical_name.as_str(), forms);
        }

        let mut author_forms: FxHashMap<String, Vec<&'a str>> = FxHashMap::default();
        let mut author_initials: FxHashMap<String, Vec<&'a str>> = FxHashMap::default();
        let mut author_vocab = Vocabulary::new();
        for (id, author) in &refs.authors {
            let names: Vec<&String> = std::iter::once(&author.canonical_name)
                .chain(&author.known_variations)
                .collect();
            let forms: BTreeSet<String> = names
                .iter()
                .map(|s| normalize_person(s))
                .filter(|f| !f.is_empty())
                .collect();
            let initials: BTreeSet<String> = names
                .iter()
                .map(|s| initials_key(s))
                .filter(|k| !k.is_empty())
                .collect();
            for form in &forms {
                author_forms.entry(form.clone()).or_default().push(id);
            }
            for key in initials {
                author_initials.entry(key).or_default().push(id);
            }
            author_vocab.insert(id.as_str(), author.canonical_name.as_str(), forms);
        }

        // BTreeMap iteration already yields ids in order; keep that explicit
        for ids in institution_forms
            .values_mut()
            .chain(author_forms.values_mut())
            .chain(author_initials.values_mut())
        {
            ids.sort_unstable();
            ids.dedup();
        }

        log::debug!(
            "Indexed {} reference authors ({} forms), {} institutions ({} forms)",
            refs.authors.len(),
            author_forms.len(),
            refs.institutions.len(),
            institution_forms.len()
        );

        Self {
            refs,
            config,
            matcher: FuzzyMatcher::new(config.distance_ratio),
            institution_forms,
            institution_vocab,
            author_forms,
            author_initials,
            author_vocab,
        }
    }

    /// Resolve a raw institution string by name alone.
    pub fn resolve_institution(&self, raw: &str) -> InstitutionMatch {
        let raw = raw.trim();
        let key = normalize(raw);

        if let Some(id) = self.institution_forms.get(&key).and_then(|ids| ids.first()) {
            return self.institution_reference(id, None);
        }

        if let Some(target) = self.config.known_typos.get(raw) {
            if let Some(id) = self
                .institution_forms
                .get(&normalize(target))
                .and_then(|ids| ids.first())
            {
                return self.institution_reference(id, Some(KNOWN_TYPO_CONFIDENCE));
            }
        }

        if let Some(hit) = self
            .matcher
            .best_match(&key, &self.institution_vocab)
            .filter(|hit| hit.meets(self.config.fuzzy_threshold))
        {
            log::debug!(
                "Institution '{raw}' -> '{}' (fuzzy, similarity {:.2})",
                hit.canonical,
                hit.similarity
            );
            return self.institution_reference(hit.id, Some(hit.similarity));
        }

        InstitutionMatch {
            identity: InstitutionIdentity::Unlisted(key),
            canonical: raw.to_string(),
            correction: None,
        }
    }

    fn institution_reference(&self, id: &str, corrected_with: Option<f64>) -> InstitutionMatch {
        let canonical = self
            .refs
            .institutions
            .get(id)
            .map(|inst| inst.canonical_name.clone())
            .unwrap_or_else(|| id.to_string());
        InstitutionMatch {
            identity: InstitutionIdentity::Reference(id.to_string()),
            correction: corrected_with.map(|confidence| Correction {
                corrected: canonical.clone(),
                confidence,
            }),
            canonical,
        }
    }

    /// Resolve one author mention in the context of its paper's institution.
    pub fn resolve_author(&self, raw: &str, institution: Option<InstitutionContext<'_>>) -> AuthorMatch {
        let raw = raw.trim();
        let key = normalize_person(raw);
        let (candidates, confidence) = self.author_candidates(raw, &key);

        let mut resolved = match candidates.as_slice() {
            [] => self.unlisted_author(raw, &key, institution, is_abbreviated(raw)),
            [id] => self.author_reference(id),
            _ => self.disambiguate(raw, &key, &candidates, institution),
        };

        // Corrections only count when they led to a reference identity
        if let (Some(confidence), AuthorIdentity::Reference(_)) = (confidence, &resolved.identity) {
            resolved.correction = Some(Correction {
                corrected: resolved.canonical.clone(),
                confidence,
            });
        }
        resolved
    }

    /// Reference ids a name could denote, plus the correction confidence if
    /// a typo tier produced them.
    fn author_candidates(&self, raw: &str, key: &str) -> (Vec<&'a str>, Option<f64>) {
        if key.is_empty() {
            return (Vec::new(), None);
        }
        // An abbreviation competes with every reference author sharing its
        // initials, listed as a variation or not
        let mut ids = self.author_forms.get(key).cloned().unwrap_or_default();
        if is_abbreviated(raw) {
            if let Some(more) = self.author_initials.get(&initials_key(raw)) {
                ids.extend(more.iter().copied());
                ids.sort_unstable();
                ids.dedup();
            }
        }
        if !ids.is_empty() {
            return (ids, None);
        }
        if let Some(target) = self.config.known_typos.get(raw) {
            if let Some(ids) = self.author_forms.get(&normalize_person(target)) {
                return (ids.clone(), Some(KNOWN_TYPO_CONFIDENCE));
            }
        }
        if let Some(hit) = self
            .matcher
            .best_match(key, &self.author_vocab)
            .filter(|hit| hit.meets(self.config.fuzzy_threshold))
        {
            log::debug!(
                "Author '{raw}' ~ '{}' (fuzzy, distance {}, similarity {:.2})",
                hit.form,
                hit.distance,
                hit.similarity
            );
            if let Some(ids) = self.author_forms.get(hit.form) {
                return (ids.clone(), Some(hit.similarity));
            }
        }
        (Vec::new(), None)
    }

    fn author_reference(&self, id: &str) -> AuthorMatch {
        let canonical = self
            .refs
            .authors
            .get(id)
            .map(|a| a.canonical_name.clone())
            .unwrap_or_else(|| id.to_string());
        AuthorMatch {
            identity: AuthorIdentity::Reference(id.to_string()),
            canonical,
            correction: None,
            disambiguation: None,
        }
    }

    fn unlisted_author(
        &self,
        raw: &str,
        key: &str,
        institution: Option<InstitutionContext<'_>>,
        keyed_by_institution: bool,
    ) -> AuthorMatch {
        let institution = if keyed_by_institution {
            institution.map(|ctx| ctx.resolved.canonical.clone())
        } else {
            None
        };
        AuthorMatch {
            identity: AuthorIdentity::Unlisted {
                name: key.to_string(),
                institution,
            },
            canonical: raw.to_string(),
            correction: None,
            disambiguation: None,
        }
    }

    /// Pick among several reference authors using the paper's institution.
    fn disambiguate(
        &self,
        raw: &str,
        key: &str,
        candidates: &[&'a str],
        institution: Option<InstitutionContext<'_>>,
    ) -> AuthorMatch {
        let n = candidates.len();
        let Some(ctx) = institution else {
            let mut unlisted = self.unlisted_author(raw, key, None, true);
            unlisted.disambiguation = Some(Disambiguation {
                candidates: n,
                reasoning: format!(
                    "'{raw}' matches {n} reference authors and the paper lists no institution; \
                     name-only match kept as a distinct identity"
                ),
            });
            return unlisted;
        };

        let listed = ctx.resolved;
        let matching: Vec<&str> = candidates
            .iter()
            .copied()
            .filter(|id| {
                let Some(author) = self.refs.authors.get(*id) else {
                    return false;
                };
                listed.reference_id() == Some(author.primary_institution.as_str())
                    || self.refs.primary_institution_name(id) == Some(listed.canonical.as_str())
            })
            .collect();

        match matching.as_slice() {
            [id] => {
                let mut chosen = self.author_reference(id);
                chosen.disambiguation = Some(Disambiguation {
                    candidates: n,
                    reasoning: format!(
                        "'{raw}' matches {n} reference authors; institution '{}' is the primary \
                         institution of {} only",
                        listed.canonical, chosen.canonical
                    ),
                });
                chosen
            }
            _ => {
                let mut unlisted = self.unlisted_author(raw, key, Some(ctx), true);
                let reasoning = if matching.is_empty() {
                    format!(
                        "'{raw}' matches {n} reference authors but none is affiliated with '{}'; \
                         kept as a distinct identity",
                        listed.canonical
                    )
                } else {
                    format!(
                        "'{raw}' matches {} reference authors affiliated with '{}'; \
                         kept as a distinct identity",
                        matching.len(),
                        listed.canonical
                    )
                };
                unlisted.disambiguation = Some(Disambiguation {
                    candidates: n,
                    reasoning,
                });
                unlisted
            }
        }
    }

    /// Resolve every author, institution and venue in the corpus.
    ///
    /// Runs in three passes: institutions, then authors in the context of
    /// their paper's institution, then recording. Unlisted identities are
    /// named before anything is recorded so entities, maps and author
    /// contexts all agree on one name.
    pub fn resolve(&self, papers: &[Paper]) -> Result<Resolution> {
        index_papers(papers)?;

        let mut listed: Vec<Option<(&str, InstitutionMatch)>> = papers
            .iter()
            .map(|paper| {
                paper
                    .institution
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|raw| (raw, self.resolve_institution(raw)))
            })
            .collect();
        let institution_names = settle_unlisted(listed.iter().flatten().filter_map(|(raw, m)| {
            match &m.identity {
                InstitutionIdentity::Unlisted(key) => Some((key.clone(), *raw)),
                InstitutionIdentity::Reference(_) => None,
            }
        }));
        for (_, m) in listed.iter_mut().flatten() {
            if let InstitutionIdentity::Unlisted(key) = &m.identity {
                if let Some(name) = institution_names.get(key) {
                    m.canonical = name.clone();
                }
            }
        }

        let mut mentions: Vec<Vec<(&str, AuthorMatch)>> = papers
            .iter()
            .zip(&listed)
            .map(|(paper, listed)| {
                let ctx = listed.as_ref().map(|(raw, inst)| InstitutionContext {
                    raw: *raw,
                    resolved: inst,
                });
                paper
                    .authors
                    .iter()
                    .map(|raw| raw.trim())
                    .filter(|raw| {
                        if raw.is_empty() {
                            log::debug!("Skipping blank author on {}", paper.paper_id);
                        }
                        !raw.is_empty()
                    })
                    .map(|raw| (raw, self.resolve_author(raw, ctx)))
                    .collect::<Vec<_>>()
            })
            .collect();
        let author_names = settle_unlisted(
            mentions
                .iter()
                .flatten()
                .filter(|(_, m)| m.reference_id().is_none())
                .map(|(raw, m)| (m.identity.clone(), *raw)),
        );
        for (_, m) in mentions.iter_mut().flatten() {
            if let Some(name) = author_names.get(&m.identity) {
                m.canonical = name.clone();
            }
        }

        let mut authors: BTreeMap<AuthorIdentity, ResolvedAuthor> = BTreeMap::new();
        let mut institutions: BTreeMap<InstitutionIdentity, ResolvedInstitution> = BTreeMap::new();
        let mut author_map = ResolutionMap::new();
        let mut institution_map = ResolutionMap::new();
        let mut ambiguous: BTreeSet<AmbiguousResolution> = BTreeSet::new();
        let mut typos: BTreeMap<(EntityKind, String), TypoCorrection> = BTreeMap::new();
        let mut conflicts = Vec::new();

        for ((paper, listed), mentions) in papers.iter().zip(&listed).zip(&mentions) {
            if let Some((raw, inst)) = listed {
                let entry = institutions
                    .entry(inst.identity.clone())
                    .or_insert_with(|| self.new_institution(inst));
                entry.paper_ids.insert(paper.paper_id.clone());
                entry.name_variations.insert(raw.to_string());
                institution_map.insert(raw, None, &inst.canonical);
                if let Some(correction) = &inst.correction {
                    typos
                        .entry((EntityKind::Institution, raw.to_string()))
                        .or_insert_with(|| TypoCorrection {
                            kind: EntityKind::Institution,
                            original: raw.to_string(),
                            corrected: correction.corrected.clone(),
                            confidence: correction.confidence,
                        });
                }
            }
            let ctx = listed.as_ref().map(|(raw, inst)| (*raw, inst));

            for (raw_author, resolved) in mentions {
                let entry = authors
                    .entry(resolved.identity.clone())
                    .or_insert_with(|| self.new_author(resolved));
                entry.paper_ids.insert(paper.paper_id.clone());
                entry.name_variations.insert(raw_author.to_string());

                author_map.insert(
                    raw_author,
                    ctx.map(|(_, inst)| inst.canonical.as_str()),
                    &resolved.canonical,
                );

                if let Some(correction) = &resolved.correction {
                    typos
                        .entry((EntityKind::Author, raw_author.to_string()))
                        .or_insert_with(|| TypoCorrection {
                            kind: EntityKind::Author,
                            original: raw_author.to_string(),
                            corrected: correction.corrected.clone(),
                            confidence: correction.confidence,
                        });
                }

                if let Some(disambiguation) = &resolved.disambiguation {
                    ambiguous.insert(AmbiguousResolution {
                        name_variation: raw_author.to_string(),
                        resolved_to: resolved.canonical.clone(),
                        institution_used: ctx.map(|(raw, _)| raw.to_string()),
                        reasoning: disambiguation.reasoning.clone(),
                    });
                }

                if let (Some(author_id), Some((_, inst))) = (resolved.reference_id(), ctx) {
                    if let Some(expected) = self.refs.primary_institution_name(author_id) {
                        if expected != inst.canonical {
                            conflicts.push(AffiliationConflict {
                                paper_id: paper.paper_id.clone(),
                                author: resolved.canonical.clone(),
                                listed_institution: inst.canonical.clone(),
                                expected_institution: expected.to_string(),
                            });
                        }
                    }
                }
            }
        }

        let venue_normalizations = normalize_venues(papers, self.config);

        let resolution = Resolution {
            authors: authors.into_values().collect(),
            institutions: institutions.into_values().collect(),
            author_map,
            institution_map,
            ambiguous_author_resolutions: ambiguous.into_iter().collect(),
            typo_corrections: typos.into_values().collect(),
            venue_normalizations,
            affiliation_conflicts: conflicts,
        };

        log::info!(
            "Resolved {} authors, {} institutions ({} ambiguous, {} typos, {} conflicts)",
            resolution.resolved_author_count(),
            resolution.resolved_institution_count(),
            resolution.ambiguous_author_resolutions.len(),
            resolution.typo_corrections.len(),
            resolution.affiliation_conflicts.len()
        );
        Ok(resolution)
    }

    fn new_institution(&self, inst: &InstitutionMatch) -> ResolvedInstitution {
        let country = inst
            .reference_id()
            .and_then(|id| self.refs.institutions.get(id))
            .map(|r| r.country.clone())
            .filter(|c| !c.is_empty());
        ResolvedInstitution {
            canonical_name: inst.canonical.clone(),
            reference_id: inst.reference_id().map(str::to_string),
            country,
            paper_ids: BTreeSet::new(),
            name_variations: BTreeSet::new(),
        }
    }

    fn new_author(&self, resolved: &AuthorMatch) -> ResolvedAuthor {
        let institution = match &resolved.identity {
            AuthorIdentity::Reference(id) => self.refs.primary_institution_name(id).map(str::to_string),
            AuthorIdentity::Unlisted { institution, .. } => institution.clone(),
        };
        ResolvedAuthor {
            canonical_name: resolved.canonical.clone(),
            reference_id: resolved.reference_id().map(str::to_string),
            institution,
            paper_ids: BTreeSet::new(),
            name_variations: BTreeSet::new(),
        }
    }
}

/// Name each unlisted identity after its most frequent raw spelling, ties
/// going to the smallest, so the name does not depend on paper order.
fn settle_unlisted<'s, K: Ord>(mentions: impl IntoIterator<Item = (K, &'s str)>) -> BTreeMap<K, String> {
    let mut spellings: BTreeMap<K, BTreeMap<&'s str, usize>> = BTreeMap::new();
    for (key, raw) in mentions {
        *spellings.entry(key).or_default().entry(raw).or_default() += 1;
    }
    spellings
        .into_iter()
        .filter_map(|(key, counts)| {
            counts
                .into_iter()
                .max_by(|(a, x), (b, y)| x.cmp(y).then_with(|| b.cmp(a)))
                .map(|(raw, _)| (key, raw.to_string()))
        })
        .collect()
}

/// Resolve authors, institutions and venues of `papers` against `refs`.
pub fn resolve_entities(
    papers: &[Paper],
    refs: &AffiliationReference,
    config: &ResolverConfig,
) -> Result<Resolution> {
    EntityResolver::new(refs, config).resolve(papers)
}
