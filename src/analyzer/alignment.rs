//! Per-query alignment assessment.
//!
//! Deliberately separate from the relevance rule: relevance counts whole-token
//! coverage at 50%, this reports literal substring presence of each query word
//! and classifies it on its own scale.

use super::text::static_regex;
use crate::{AlignmentStrength, QueryAlignment};

const GOOD_RATIO: f64 = 0.7;
const PARTIAL_RATIO: f64 = 0.4;
/// A question core shorter than this is too generic to count as a verbatim match
const MIN_CORE_WORDS: usize = 2;

static_regex!(fn question_lead_re = r"^(?:what|which|how|why|where|when|who)(?:\s+(?:is|are|was|were|do|does|did|can|should|to))?\s+");

/// Lower-case and collapse runs of whitespace to single spaces
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Query words, lower-cased with surrounding punctuation removed
fn query_words(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// The query phrase (or its core without a leading question word) appears verbatim
fn is_exact_match(query: &str, content_norm: &str) -> bool {
    let phrase = normalize(query);
    let phrase = phrase.trim_end_matches(|c: char| c.is_ascii_punctuation());
    if phrase.is_empty() {
        return false;
    }
    if content_norm.contains(phrase) {
        return true;
    }
    let core = question_lead_re().replace(phrase, "");
    core.len() < phrase.len()
        && core.split_whitespace().count() >= MIN_CORE_WORDS
        && content_norm.contains(&*core)
}

fn classify(exact: bool, ratio: f64) -> AlignmentStrength {
    if exact {
        AlignmentStrength::Strong
    } else if ratio >= GOOD_RATIO {
        AlignmentStrength::Good
    } else if ratio >= PARTIAL_RATIO {
        AlignmentStrength::Partial
    } else {
        AlignmentStrength::Weak
    }
}

/// Assess one query against the content
pub fn align_query(query: &str, content: &str) -> QueryAlignment {
    assess(query, &normalize(content))
}

/// Assess each query in order
pub fn align_queries(queries: &[String], content: &str) -> Vec<QueryAlignment> {
    let content_norm = normalize(content);
    queries.iter().map(|q| assess(q, &content_norm)).collect()
}

fn assess(query: &str, content_norm: &str) -> QueryAlignment {
    let words = query_words(query);
    let matched_words: Vec<String> = words
        .iter()
        .filter(|w| content_norm.contains(w.as_str()))
        .cloned()
        .collect();
    let ratio = if words.is_empty() {
        0.0
    } else {
        matched_words.len() as f64 / words.len() as f64
    };
    let exact_match = is_exact_match(query, content_norm);

    QueryAlignment {
        query: query.to_string(),
        alignment: classify(exact_match, ratio),
        match_ratio: (ratio * 100.0).round() / 100.0,
        matched_words,
        exact_match,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = "Looking for the best TCG binder?\nThe best   tcg binder holds 360 cards.";

    #[test]
    fn test_question_core_counts_as_exact() {
        let a = align_query("what is the best tcg binder", CONTENT);
        assert!(a.exact_match);
        assert_eq!(a.alignment, AlignmentStrength::Strong);
        // "what" and "is" are not in the content
        assert_eq!(a.matched_words, vec!["the", "best", "tcg", "binder"]);
        assert_eq!(a.match_ratio, 0.67);
    }

    #[test]
    fn test_full_phrase_exact_ignores_case_whitespace_and_trailing_punctuation() {
        let a = align_query("The best TCG binder?", CONTENT);
        assert!(a.exact_match);
        assert_eq!(a.match_ratio, 1.0);
    }

    #[test]
    fn test_good_and_partial() {
        let good = align_query("binder holds cards for tcg", CONTENT);
        // binder, holds, cards, tcg present; "for" present inside "looking for"
        assert!(!good.exact_match);
        assert_eq!(good.alignment, AlignmentStrength::Good);

        let partial = align_query("waterproof binder with cards", CONTENT);
        // binder, cards => 2/4
        assert_eq!(partial.alignment, AlignmentStrength::Partial);
        assert_eq!(partial.match_ratio, 0.5);
    }

    #[test]
    fn test_weak() {
        let a = align_query("graded slab storage", CONTENT);
        assert_eq!(a.alignment, AlignmentStrength::Weak);
        assert!(a.matched_words.is_empty());
        assert_eq!(a.match_ratio, 0.0);
    }

    #[test]
    fn test_single_word_core_is_not_exact() {
        // "binder" alone after stripping "what is" is too generic
        let a = align_query("what is binder", CONTENT);
        assert!(!a.exact_match);
    }

    #[test]
    fn test_word_match_is_literal_substring() {
        // "card" is found inside "cards"
        let a = align_query("card", CONTENT);
        assert_eq!(a.matched_words, vec!["card"]);
    }

    #[test]
    fn test_punctuation_only_query() {
        let a = align_query("???", CONTENT);
        assert_eq!(a.match_ratio, 0.0);
        assert!(!a.exact_match);
        assert_eq!(a.alignment, AlignmentStrength::Weak);
    }

    #[test]
    fn test_align_queries_preserves_order() {
        let queries = vec!["graded slab".to_string(), "tcg binder".to_string()];
        let out = align_queries(&queries, CONTENT);
        assert_eq!(out[0].query, "graded slab");
        assert_eq!(out[1].alignment, AlignmentStrength::Strong);
    }
}
