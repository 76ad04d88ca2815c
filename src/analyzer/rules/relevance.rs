//! Relevance - coverage of high-value search terms and target queries

use super::{tiered, ContentContext, RuleScore, ScoringRule};
use crate::analyzer::text::{coverage, static_regex, token_set};
use crate::Dimension;

/// Share of a term's words that must appear for the term to count
const TERM_MATCH_COVERAGE: f64 = 0.6;
const POINTS_PER_TERM: f64 = 8.0;
const MAX_TERM_POINTS: f64 = 40.0;

/// Share of a query's words that must appear for the query to count
const QUERY_MATCH_COVERAGE: f64 = 0.5;
const POINTS_PER_QUERY: f64 = 15.0;
const MAX_QUERY_POINTS: f64 = 40.0;
/// Awarded when no target queries were supplied
const NO_QUERY_POINTS: f64 = 20.0;

static_regex!(fn question_re = r"\?\s");

/// Rule for scoring how well content targets the searches it should answer
pub struct RelevanceRule;

impl ScoringRule for RelevanceRule {
    fn dimension(&self) -> Dimension {
        Dimension::Relevance
    }

    fn score(&self, ctx: &ContentContext<'_>) -> RuleScore {
        let tokens = token_set(&ctx.lower);

        let terms = &ctx.profile.high_value_terms;
        let matched_terms = terms
            .iter()
            .filter(|t| coverage(t, &tokens) >= TERM_MATCH_COVERAGE)
            .count();
        let mut score = (matched_terms as f64 * POINTS_PER_TERM).min(MAX_TERM_POINTS);

        let queries_note = if ctx.target_queries.is_empty() {
            score += NO_QUERY_POINTS;
            "no target queries provided".to_string()
        } else {
            let aligned = ctx
                .target_queries
                .iter()
                .filter(|q| coverage(q, &tokens) >= QUERY_MATCH_COVERAGE)
                .count();
            score += (aligned as f64 * POINTS_PER_QUERY).min(MAX_QUERY_POINTS);
            format!("{}/{} target queries aligned", aligned, ctx.target_queries.len())
        };

        let questions = question_re().find_iter(ctx.text).count();
        score += tiered(questions, &[(3, 20.0), (1, 10.0)]);

        let details = format!(
            "{}/{} high-value terms matched; {}; {} questions",
            matched_terms,
            terms.len(),
            queries_note,
            questions
        );

        RuleScore::new(score.min(100.0), details)
    }
}
