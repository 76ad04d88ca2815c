//! Definitiveness - assertive phrasing versus hedging

use super::{ContentContext, RuleScore, ScoringRule};
use crate::analyzer::text::{per_hundred, phrase_regex, prefix_chars};
use crate::Dimension;
use regex::Regex;
use std::sync::OnceLock;

const BASE_SCORE: f64 = 50.0;
const MAX_DEFINITIVE_BONUS: f64 = 30.0;
/// Occurrences per 100 words that earn the full definitive bonus
const DEFINITIVE_FULL_DENSITY: f64 = 5.0;
const MAX_HEDGING_PENALTY: f64 = 25.0;
/// Occurrences per 100 words that incur the full hedging penalty
const HEDGING_FULL_DENSITY: f64 = 3.0;
const OPENING_BONUS: f64 = 20.0;
const OPENING_WINDOW_CHARS: usize = 500;

const DEFINITIVE_PHRASES: &[&str] = &[
    "is",
    "are",
    "means",
    "provides",
    "delivers",
    "ensures",
    "guarantees",
    "offers",
    "represents",
    "the best",
    "the most",
    "specifically",
    "definitely",
    "research shows",
    "according to",
    "experts recommend",
];

const HEDGING_PHRASES: &[&str] = &[
    "might",
    "could",
    "perhaps",
    "possibly",
    "maybe",
    "some people think",
    "it depends",
    "generally speaking",
    "in some cases",
    "kind of",
    "sort of",
];

const OPENING_PHRASES: &[&str] = &["is", "are", "means", "the best", "the answer"];

fn definitive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| phrase_regex(DEFINITIVE_PHRASES))
}

fn hedging_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| phrase_regex(HEDGING_PHRASES))
}

fn opening_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| phrase_regex(OPENING_PHRASES))
}

/// Rule for scoring assertive, answer-first language
pub struct DefinitivenessRule;

impl DefinitivenessRule {
    fn scaled(density: f64, full_density: f64, max_points: f64) -> f64 {
        (density / full_density).min(1.0) * max_points
    }
}

impl ScoringRule for DefinitivenessRule {
    fn dimension(&self) -> Dimension {
        Dimension::Definitiveness
    }

    fn score(&self, ctx: &ContentContext<'_>) -> RuleScore {
        let definitive = definitive_re().find_iter(ctx.text).count();
        let hedging = hedging_re().find_iter(ctx.text).count();
        let definitive_density = per_hundred(definitive, ctx.word_count);
        let hedging_density = per_hundred(hedging, ctx.word_count);

        let bonus = Self::scaled(
            definitive_density,
            DEFINITIVE_FULL_DENSITY,
            MAX_DEFINITIVE_BONUS,
        );
        let penalty = Self::scaled(hedging_density, HEDGING_FULL_DENSITY, MAX_HEDGING_PENALTY);
        let direct_opening = opening_re().is_match(prefix_chars(ctx.text, OPENING_WINDOW_CHARS));

        let mut score = BASE_SCORE + bonus - penalty;
        if direct_opening {
            score += OPENING_BONUS;
        }

        let details = format!(
            "{} definitive phrases ({:.1}/100 words), {} hedges ({:.1}/100 words); {}",
            definitive,
            definitive_density,
            hedging,
            hedging_density,
            if direct_opening {
                "opens with a direct answer"
            } else {
                "no direct answer in the opening"
            }
        );

        RuleScore::new(score.clamp(0.0, 100.0), details)
    }
}
