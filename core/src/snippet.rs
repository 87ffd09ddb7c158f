//! Result previews: a window of the document around the first query match.

use crate::tokenizer::{self, Normalizer};
use regex::{Captures, Regex, RegexBuilder};

pub const DEFAULT_WIDTH: usize = 200;

/// Distinct normalized words of a query, in first-seen order, using the default
/// normalizer. Stopwords are dropped so previews land on words that actually matched.
pub fn query_terms(query: &str) -> Vec<String> {
    dedup(tokenizer::normalize(query))
}

/// Same as [`query_terms`] with a specific normalizer, e.g. the one the index was built with.
pub fn query_terms_with(normalizer: &Normalizer, query: &str) -> Vec<String> {
    dedup(normalizer.normalize(query))
}

fn dedup(tokens: Vec<String>) -> Vec<String> {
    let mut terms: Vec<String> = Vec::with_capacity(tokens.len());
    for t in tokens {
        if !terms.contains(&t) {
            terms.push(t);
        }
    }
    terms
}

/// One case-insensitive alternation over all terms, longest first, so a term that
/// is a substring of another never wins where the longer one matches.
fn terms_pattern(terms: &[String]) -> Option<Regex> {
    let mut terms: Vec<&str> = terms.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect();
    if terms.is_empty() {
        return None;
    }
    terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
    terms.dedup();
    let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    RegexBuilder::new(&alternation).case_insensitive(true).build().ok()
}

/// Up to `width` characters of `content`, starting `width / 2` characters before the
/// first case-insensitive match of any term; the head of the document when nothing matches.
pub fn snippet(content: &str, terms: &[String], width: usize) -> Option<String> {
    if content.is_empty() {
        return None;
    }
    let start = terms_pattern(terms)
        .and_then(|re| re.find(content))
        .map(|m| content[..m.start()].chars().count().saturating_sub(width / 2))
        .unwrap_or(0);
    Some(content.chars().skip(start).take(width).collect())
}

/// Wrap every case-insensitive occurrence of the terms in `open`/`close`, in a single
/// pass so markers never nest.
pub fn highlight(snippet: &str, terms: &[String], open: &str, close: &str) -> String {
    match terms_pattern(terms) {
        Some(re) => re.replace_all(snippet, |caps: &Captures| format!("{open}{}{close}", &caps[0])).into_owned(),
        None => snippet.to_string(),
    }
}
