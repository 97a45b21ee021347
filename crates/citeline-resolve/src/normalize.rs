//! Lexical canonicalization of raw names into comparison keys.
//!
//! Keys are only ever compared; nothing here decides that two names denote
//! the same entity. `"J. Smith"` and `"John Smith"` get different
//! [`normalize_person`] keys and the same [`initials_key`], and it is up to
//! the resolver what to make of that.

/// Normalize an institution or venue name.
///
/// Lower-cases, deletes apostrophes, collapses dotted acronyms
/// (`"M.I.T."` -> `"mit"`), turns other punctuation into spaces and
/// collapses whitespace.
pub fn normalize(raw: &str) -> String {
    let mut tokens: Vec<String> = Vec::new();
    for token in raw.split_whitespace() {
        let parts: Vec<&str> = token.split('.').filter(|p| !p.is_empty()).collect();
        let is_acronym = parts.len() >= 2 && parts.iter().all(|p| p.chars().count() == 1);
        let joined = if is_acronym {
            parts.concat()
        } else {
            parts.join(" ")
        };
        push_clean_words(&joined, &mut tokens);
    }
    tokens.join(" ")
}

/// Normalize a person name.
///
/// Like [`normalize`], plus: a single `"Surname, Given"` inversion is
/// rewritten to given-name-first order, and every period separates
/// initials (`"J.A. Smith"` -> `"j a smith"`).
pub fn normalize_person(raw: &str) -> String {
    let trimmed = raw.trim();
    let reordered = match split_inverted(trimmed) {
        Some((surname, given)) => format!("{given} {surname}"),
        None => trimmed.to_string(),
    };
    let mut tokens = Vec::new();
    push_clean_words(&reordered.replace('.', " "), &mut tokens);
    tokens.join(" ")
}

/// First initial plus surname: `"John A. Smith"` -> `"j smith"`.
///
/// Single-token names come back as their normalized form.
pub fn initials_key(raw: &str) -> String {
    let normalized = normalize_person(raw);
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    match tokens.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, .., last] => {
            let initial: String = first.chars().take(1).collect();
            format!("{initial} {last}")
        }
    }
}

/// True when every given-name token is a bare initial (`"J. A. Smith"`).
pub fn is_abbreviated(raw: &str) -> bool {
    let normalized = normalize_person(raw);
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    match tokens.split_last() {
        Some((_, given)) if !given.is_empty() => given.iter().all(|t| t.chars().count() == 1),
        _ => false,
    }
}

/// `"Smith, John"` -> `Some(("Smith", "John"))`; anything else -> `None`.
fn split_inverted(name: &str) -> Option<(&str, &str)> {
    let (surname, given) = name.split_once(',')?;
    if given.contains(',') {
        return None;
    }
    let (surname, given) = (surname.trim(), given.trim());
    if surname.is_empty() || given.is_empty() {
        return None;
    }
    Some((surname, given))
}

/// Lower-case `text`, drop apostrophes, split on everything that is not
/// alphanumeric, and append the non-empty words to `out`.
fn push_clean_words(text: &str, out: &mut Vec<String>) {
    let mut word = String::new();
    for c in text.chars() {
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_alphanumeric() {
            word.extend(c.to_lowercase());
        } else if !word.is_empty() {
            out.push(std::mem::take(&mut word));
        }
    }
    if !word.is_empty() {
        out.push(word);
    }
}
