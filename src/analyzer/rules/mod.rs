//! Scoring rules, one per AEO dimension

pub mod authority;
pub mod definitiveness;
pub mod freshness;
pub mod quotability;
pub mod relevance;
pub mod specificity;
pub mod structure;

pub use authority::AuthorityRule;
pub use definitiveness::DefinitivenessRule;
pub use freshness::FreshnessRule;
pub use quotability::QuotabilityRule;
pub use relevance::RelevanceRule;
pub use specificity::SpecificityRule;
pub use structure::StructureRule;

use super::text::word_count;
use crate::config::BrandProfile;
use crate::Dimension;

/// Everything a rule may look at. Built once per analysis.
pub struct ContentContext<'a> {
    /// Original content
    pub text: &'a str,
    /// Lower-cased content
    pub lower: String,
    pub word_count: usize,
    pub profile: &'a BrandProfile,
    /// Non-empty target queries (empty when none were supplied)
    pub target_queries: &'a [String],
    /// Calendar year used by the freshness rule
    pub current_year: i32,
}

impl<'a> ContentContext<'a> {
    pub fn new(
        text: &'a str,
        profile: &'a BrandProfile,
        target_queries: &'a [String],
        current_year: i32,
    ) -> Self {
        Self {
            text,
            lower: text.to_lowercase(),
            word_count: word_count(text),
            profile,
            target_queries,
            current_year,
        }
    }
}

/// Raw output of a rule, before clamping and weighting
#[derive(Debug, Clone, PartialEq)]
pub struct RuleScore {
    pub score: f64,
    pub details: String,
}

impl RuleScore {
    pub fn new(score: f64, details: impl Into<String>) -> Self {
        Self {
            score,
            details: details.into(),
        }
    }
}

/// Trait for dimension scoring rules
pub trait ScoringRule {
    /// Dimension this rule scores
    fn dimension(&self) -> Dimension;

    /// Name of the rule
    fn name(&self) -> &'static str {
        self.dimension().key()
    }

    /// Score the content (0-100; the engine clamps anything outside)
    fn score(&self, ctx: &ContentContext<'_>) -> RuleScore;
}

/// Points for the first tier whose minimum count is met, tiers ordered highest first
pub(crate) fn tiered(count: usize, tiers: &[(usize, f64)]) -> f64 {
    tiers
        .iter()
        .find(|(min, _)| count >= *min)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}
