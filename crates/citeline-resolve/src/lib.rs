//! citeline-resolve: entity resolution for noisy bibliographic records
//!
//! Normalizes author, institution and venue strings, corrects typos against
//! a reference table and splits ambiguous names by institutional context.
//! Also extracts keyword frequencies and method mentions.

pub mod extraction;
pub mod fuzzy;
pub mod normalize;
pub mod resolver;
pub mod venue;

pub use extraction::{MethodMention, extract_topics, methods_from_abstracts};
pub use fuzzy::{FuzzyMatch, FuzzyMatcher, Vocabulary, similarity};
pub use normalize::{initials_key, is_abbreviated, normalize, normalize_person};
pub use resolver::{
    AffiliationConflict, AmbiguousResolution, AuthorIdentity, AuthorMatch, EntityKind,
    EntityResolver, InstitutionContext, InstitutionIdentity, InstitutionMatch, Resolution,
    ResolutionMap, ResolvedAuthor, ResolvedInstitution, TypoCorrection, resolve_entities,
};
pub use venue::{VenueNormalizer, normalize_venues};
