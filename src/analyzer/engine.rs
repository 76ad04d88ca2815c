//! Scoring engine - runs every dimension rule and assembles the result

use chrono::{DateTime, Datelike, Utc};

use super::alignment::align_queries;
use super::rules::{
    AuthorityRule, ContentContext, DefinitivenessRule, FreshnessRule, QuotabilityRule,
    RelevanceRule, ScoringRule, SpecificityRule, StructureRule,
};
use super::ScoreCalculator;
use crate::config::BrandProfile;
use crate::{
    AeoError, AnalysisMetadata, ComponentScore, ComponentScores, ContentAnalysisResult, Grade,
};

/// Main scorer. Holds only configuration, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct AeoScorer {
    profile: BrandProfile,
    /// Frozen clock; the system clock is read per call when unset
    now: Option<DateTime<Utc>>,
    /// Year used by the freshness rule; defaults to the clock's year
    current_year: Option<i32>,
}

impl AeoScorer {
    /// Create a scorer with an empty brand profile and the system clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given brand profile for specificity and relevance
    pub fn with_profile(mut self, profile: BrandProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Freeze the clock used for `analyzed_at` and the freshness year
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Override the year the freshness rule treats as current
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    pub fn profile(&self) -> &BrandProfile {
        &self.profile
    }

    /// The year the freshness rule will use for a call made now
    pub fn effective_year(&self) -> i32 {
        self.current_year
            .unwrap_or_else(|| self.now.unwrap_or_else(Utc::now).year())
    }

    /// Score `content`.
    ///
    /// Blank target queries are dropped; an empty list behaves as if none were given.
    /// Fails only when `content` is empty or whitespace.
    pub fn analyze(
        &self,
        content: &str,
        target_queries: Option<&[String]>,
        content_url: Option<&str>,
        content_type: &str,
    ) -> Result<ContentAnalysisResult, AeoError> {
        if content.trim().is_empty() {
            return Err(AeoError::InvalidInput(
                "content must not be empty".to_string(),
            ));
        }

        let now = self.now.unwrap_or_else(Utc::now);
        let year = self.current_year.unwrap_or_else(|| now.year());
        let queries: Vec<String> = target_queries
            .unwrap_or_default()
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .collect();

        let ctx = ContentContext::new(content, &self.profile, &queries, year);
        let component_scores = ComponentScores {
            structure: Self::component(&StructureRule, &ctx),
            definitiveness: Self::component(&DefinitivenessRule, &ctx),
            quotability: Self::component(&QuotabilityRule, &ctx),
            specificity: Self::component(&SpecificityRule, &ctx),
            relevance: Self::component(&RelevanceRule, &ctx),
            freshness: Self::component(&FreshnessRule, &ctx),
            authority: Self::component(&AuthorityRule, &ctx),
        };

        let overall_score = ScoreCalculator::overall(&component_scores);
        let grade = Grade::from_score(overall_score);
        tracing::debug!(overall_score, %grade, words = ctx.word_count, "content scored");

        let query_alignment = if queries.is_empty() {
            None
        } else {
            Some(align_queries(&queries, content))
        };

        Ok(ContentAnalysisResult {
            overall_score,
            grade,
            strengths: ScoreCalculator::strengths(&component_scores),
            weaknesses: ScoreCalculator::weaknesses(&component_scores),
            recommendations: ScoreCalculator::recommendations(&component_scores, content_type),
            component_scores,
            query_alignment,
            word_count: ctx.word_count,
            metadata: AnalysisMetadata {
                analyzed_at: now,
                content_type: content_type.to_string(),
                content_url: content_url.map(str::to_string),
                content_length_chars: content.chars().count(),
                target_queries_count: queries.len(),
            },
        })
    }

    fn component(rule: &dyn ScoringRule, ctx: &ContentContext<'_>) -> ComponentScore {
        let raw = rule.score(ctx);
        let dimension = rule.dimension();
        let score = ScoreCalculator::normalize(raw.score);
        tracing::debug!(
            dimension = rule.name(),
            score,
            details = %raw.details,
            "component scored"
        );
        ComponentScore {
            score,
            weight: dimension.weight(),
            details: raw.details,
        }
    }
}
