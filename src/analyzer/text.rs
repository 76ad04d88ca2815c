//! Text helpers shared by the dimension rules

use regex::Regex;
use std::collections::HashSet;

/// Declare an accessor for a regex compiled once on first use
macro_rules! static_regex {
    ($vis:vis fn $name:ident = $pattern:expr) => {
        $vis fn $name() -> &'static regex::Regex {
            static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            RE.get_or_init(|| regex::Regex::new($pattern).unwrap())
        }
    };
}
pub(crate) use static_regex;

/// Sentences shorter than this (in chars) are treated as fragments
pub const MIN_SENTENCE_CHARS: usize = 10;

static_regex!(pub fn bold_re = r"\*\*([^*\n]+?)\*\*|__([^_\n]+?)__");

/// Build a case-insensitive whole-word alternation of phrases.
/// Internal whitespace in a phrase matches any run of whitespace.
pub fn phrase_regex(phrases: &[&str]) -> Regex {
    let alternation = phrases
        .iter()
        .map(|p| {
            p.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).unwrap()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Occurrences per 100 words
pub fn per_hundred(count: usize, words: usize) -> f64 {
    if words == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / words as f64
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The first `n` chars of `text`, cut on a char boundary
pub fn prefix_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Count whole-word occurrences of `phrase` in already lower-cased text
pub fn count_phrase(haystack_lower: &str, phrase: &str) -> usize {
    let needle = phrase.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    haystack_lower
        .match_indices(needle.as_str())
        .filter(|(idx, _)| {
            let before = haystack_lower[..*idx].chars().next_back();
            let after = haystack_lower[idx + needle.len()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
        .count()
}

/// Lower-cased alphanumeric tokens of a phrase, in order
pub fn phrase_words(phrase: &str) -> Vec<String> {
    phrase
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct alphanumeric tokens of already lower-cased text
pub fn token_set(text_lower: &str) -> HashSet<&str> {
    text_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Fraction of the phrase's words present in `tokens` (0 for an empty phrase)
pub fn coverage(phrase: &str, tokens: &HashSet<&str>) -> f64 {
    let words = phrase_words(phrase);
    if words.is_empty() {
        return 0.0;
    }
    let found = words.iter().filter(|w| tokens.contains(w.as_str())).count();
    found as f64 / words.len() as f64
}

pub fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Paragraphs separated by blank lines or headings, heading lines excluded
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_heading(trimmed) {
            if !current.is_empty() {
                out.push(current.join(" "));
                current.clear();
            }
            continue;
        }
        current.push(trimmed);
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }
    out
}

/// Sentences split on `.`, `!` and `?`, fragments dropped
pub fn sentences(text: &str) -> Vec<&str> {
    text.split(|c| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| s.chars().count() >= MIN_SENTENCE_CHARS)
        .collect()
}

/// First real word of a sentence, lower-cased, markdown and punctuation stripped
pub fn first_word(sentence: &str) -> Option<String> {
    sentence
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .find(|w| w.chars().any(char::is_alphabetic))
        .map(str::to_lowercase)
}
