//! Quotability - self-contained sentences an assistant can lift verbatim

use super::{ContentContext, RuleScore, ScoringRule};
use crate::analyzer::text::{bold_re, first_word, paragraphs, sentences, static_regex, word_count};
use crate::Dimension;

const MIN_QUOTABLE_WORDS: usize = 10;
const MAX_QUOTABLE_WORDS: usize = 40;
const MAX_FIRST_PARAGRAPH_WORDS: usize = 60;

/// Words that make a sentence depend on the one before it
const CONTINUATION_WORDS: &[&str] = &[
    "however",
    "also",
    "but",
    "and",
    "or",
    "yet",
    "furthermore",
    "moreover",
    "additionally",
];

static_regex!(fn summary_re = r"(?i)\b(?:in summary|key takeaways?|bottom line|the answer is|most importantly|in conclusion|the result is)\b");

/// Rule for scoring how easily sentences can be quoted on their own
pub struct QuotabilityRule;

impl QuotabilityRule {
    fn is_quotable(sentence: &str) -> bool {
        (MIN_QUOTABLE_WORDS..=MAX_QUOTABLE_WORDS).contains(&word_count(sentence))
    }

    fn is_standalone(sentence: &str) -> bool {
        match first_word(sentence) {
            Some(word) => !CONTINUATION_WORDS.contains(&word.as_str()),
            None => true,
        }
    }

    fn ratio_points(ratio: f64) -> f64 {
        if ratio >= 0.6 {
            35.0
        } else if ratio >= 0.3 {
            20.0
        } else {
            ratio * 35.0
        }
    }

    /// Emphasized phrases of at least three words
    fn has_emphasized_phrase(text: &str) -> bool {
        bold_re().captures_iter(text).any(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .is_some_and(|m| word_count(m.as_str()) >= 3)
        })
    }
}

impl ScoringRule for QuotabilityRule {
    fn dimension(&self) -> Dimension {
        Dimension::Quotability
    }

    fn score(&self, ctx: &ContentContext<'_>) -> RuleScore {
        let all = sentences(ctx.text);
        if all.is_empty() {
            return RuleScore::new(0.0, "No analyzable sentences");
        }

        let quotable: Vec<&str> = all.iter().copied().filter(|s| Self::is_quotable(s)).collect();
        let ratio = quotable.len() as f64 / all.len() as f64;
        let standalone = quotable.iter().filter(|s| Self::is_standalone(s)).count();
        let summary = summary_re().is_match(ctx.text);
        let emphasized = Self::has_emphasized_phrase(ctx.text);
        let first_paragraph_words = paragraphs(ctx.text)
            .first()
            .map(|p| word_count(p))
            .unwrap_or(0);
        let concise_opening =
            first_paragraph_words > 0 && first_paragraph_words <= MAX_FIRST_PARAGRAPH_WORDS;

        let mut score = Self::ratio_points(ratio);
        if standalone >= 3 {
            score += 20.0;
        }
        if summary {
            score += 15.0;
        }
        if emphasized {
            score += 15.0;
        }
        if concise_opening {
            score += 15.0;
        }

        let mut notes = vec![format!(
            "{}/{} sentences quotable ({:.0}%), {} standalone",
            quotable.len(),
            all.len(),
            ratio * 100.0,
            standalone
        )];
        if summary {
            notes.push("summary phrase present".to_string());
        }
        if emphasized {
            notes.push("emphasized key phrase".to_string());
        }
        notes.push(format!("first paragraph {} words", first_paragraph_words));

        RuleScore::new(score.min(100.0), notes.join("; "))
    }
}
