//! aeo-scorer: Answer-Engine-Optimization scoring for marketing content
//!
//! This library scores generated marketing copy on how likely AI assistants are
//! to quote or cite it, and explains how to improve the weakest dimensions.

pub mod analyzer;
pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod reporter;
pub mod watcher;

pub use analyzer::AeoScorer;
pub use config::BrandProfile;
pub use error::AeoError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The result of scoring one block of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysisResult {
    /// Weighted sum of the seven component scores (0-100)
    pub overall_score: f64,
    /// Letter grade derived from `overall_score`
    pub grade: Grade,
    /// Per-dimension scores
    pub component_scores: ComponentScores,
    /// Summaries of components scoring 75 or more
    pub strengths: Vec<String>,
    /// Summaries of components scoring below 50
    pub weaknesses: Vec<String>,
    /// Improvement actions, weakest component first
    pub recommendations: Vec<Recommendation>,
    /// Per-query alignment (only when target queries were supplied)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_alignment: Option<Vec<QueryAlignment>>,
    /// Whitespace-delimited word count
    pub word_count: usize,
    pub metadata: AnalysisMetadata,
}

/// The seven scored dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Structure,
    Definitiveness,
    Quotability,
    Specificity,
    Relevance,
    Freshness,
    Authority,
}

impl Dimension {
    /// All dimensions in reporting order
    pub const ALL: [Dimension; 7] = [
        Dimension::Structure,
        Dimension::Definitiveness,
        Dimension::Quotability,
        Dimension::Specificity,
        Dimension::Relevance,
        Dimension::Freshness,
        Dimension::Authority,
    ];

    /// Weight in whole percent (the seven weights sum to 100)
    pub const fn weight_percent(self) -> u32 {
        match self {
            Dimension::Structure => 20,
            Dimension::Definitiveness => 20,
            Dimension::Quotability => 15,
            Dimension::Specificity => 15,
            Dimension::Relevance => 15,
            Dimension::Freshness => 10,
            Dimension::Authority => 5,
        }
    }

    /// Weight as a fraction of 1.0
    pub fn weight(self) -> f64 {
        f64::from(self.weight_percent()) / 100.0
    }

    /// Serialized key (e.g. "structure")
    pub const fn key(self) -> &'static str {
        match self {
            Dimension::Structure => "structure",
            Dimension::Definitiveness => "definitiveness",
            Dimension::Quotability => "quotability",
            Dimension::Specificity => "specificity",
            Dimension::Relevance => "relevance",
            Dimension::Freshness => "freshness",
            Dimension::Authority => "authority",
        }
    }

    /// Human-readable label (e.g. "Structure")
    pub const fn label(self) -> &'static str {
        match self {
            Dimension::Structure => "Structure",
            Dimension::Definitiveness => "Definitiveness",
            Dimension::Quotability => "Quotability",
            Dimension::Specificity => "Specificity",
            Dimension::Relevance => "Relevance",
            Dimension::Freshness => "Freshness",
            Dimension::Authority => "Authority",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Score for a single dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    /// Score (0-100)
    pub score: f64,
    /// Fixed weight of this dimension
    pub weight: f64,
    /// What the scorer found
    pub details: String,
}

/// Component scores, one named field per dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub structure: ComponentScore,
    pub definitiveness: ComponentScore,
    pub quotability: ComponentScore,
    pub specificity: ComponentScore,
    pub relevance: ComponentScore,
    pub freshness: ComponentScore,
    pub authority: ComponentScore,
}

impl ComponentScores {
    pub fn get(&self, dimension: Dimension) -> &ComponentScore {
        match dimension {
            Dimension::Structure => &self.structure,
            Dimension::Definitiveness => &self.definitiveness,
            Dimension::Quotability => &self.quotability,
            Dimension::Specificity => &self.specificity,
            Dimension::Relevance => &self.relevance,
            Dimension::Freshness => &self.freshness,
            Dimension::Authority => &self.authority,
        }
    }

    /// Iterate in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &ComponentScore)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// First matching threshold wins, highest first
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Grade::A
        } else if score >= 65.0 {
            Grade::B
        } else if score >= 50.0 {
            Grade::C
        } else if score >= 35.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}

/// Recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Component scored below 50
    High,
    /// Component scored between 50 and 75
    Medium,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
        }
    }
}

/// A single improvement action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Dimension this recommendation targets
    pub area: Dimension,
    pub priority: Priority,
    /// Score of the dimension when the recommendation was made
    pub current_score: f64,
    /// What to change
    pub action: String,
}

/// How well content answers one target query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentStrength {
    /// The query phrase appears verbatim
    Strong,
    /// At least 70% of query words appear
    Good,
    /// At least 40% of query words appear
    Partial,
    Weak,
}

impl std::fmt::Display for AlignmentStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignmentStrength::Strong => write!(f, "strong"),
            AlignmentStrength::Good => write!(f, "good"),
            AlignmentStrength::Partial => write!(f, "partial"),
            AlignmentStrength::Weak => write!(f, "weak"),
        }
    }
}

/// Alignment of the content with one target query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAlignment {
    pub query: String,
    pub alignment: AlignmentStrength,
    /// Fraction of query words found in the content (0-1)
    pub match_ratio: f64,
    /// Query words found in the content
    pub matched_words: Vec<String>,
    /// Whether the query phrase appears verbatim
    pub exact_match: bool,
}

/// Bookkeeping about the analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub analyzed_at: DateTime<Utc>,
    pub content_type: String,
    pub content_url: Option<String>,
    pub content_length_chars: usize,
    pub target_queries_count: usize,
}

/// A scored document on disk (CLI and batch output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Path of the scored file (or "-" for stdin)
    pub path: PathBuf,
    pub analysis: ContentAnalysisResult,
}

/// Score content with the default (empty) brand profile and the system clock.
///
/// * `target_queries` - questions the content should answer
/// * `content_url` - where the content is published, recorded in metadata
/// * `content_type` - free-form label such as "article", "faq" or "guide"
pub fn analyze_content(
    content: &str,
    target_queries: Option<&[String]>,
    content_url: Option<&str>,
    content_type: &str,
) -> Result<ContentAnalysisResult, AeoError> {
    AeoScorer::new().analyze(content, target_queries, content_url, content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let pct: u32 = Dimension::ALL.iter().map(|d| d.weight_percent()).sum();
        assert_eq!(pct, 100);
        let sum: f64 = Dimension::ALL.iter().map(|d| d.weight()).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_grade_from_score() {
        assert_eq!(Grade::from_score(100.0), Grade::A);
        assert_eq!(Grade::from_score(80.0), Grade::A);
        assert_eq!(Grade::from_score(79.9), Grade::B);
        assert_eq!(Grade::from_score(65.0), Grade::B);
        assert_eq!(Grade::from_score(64.9), Grade::C);
        assert_eq!(Grade::from_score(50.0), Grade::C);
        assert_eq!(Grade::from_score(49.9), Grade::D);
        assert_eq!(Grade::from_score(35.0), Grade::D);
        assert_eq!(Grade::from_score(34.9), Grade::F);
        assert_eq!(Grade::from_score(0.0), Grade::F);
    }

    #[test]
    fn test_grade_is_non_increasing_step() {
        let mut prev = Grade::from_score(0.0);
        for tenths in 0..=1000 {
            let g = Grade::from_score(tenths as f64 / 10.0);
            // Grade ordering: A < B < ... < F, so a higher score never yields a later letter
            assert!(g <= prev);
            prev = g;
        }
    }

    #[test]
    fn test_dimension_serializes_lowercase() {
        let json = serde_json::to_string(&Dimension::Definitiveness).unwrap();
        assert_eq!(json, "\"definitiveness\"");
        assert_eq!(Dimension::Authority.to_string(), "authority");
    }

    #[test]
    fn test_analyze_content_rejects_empty() {
        assert!(matches!(
            analyze_content("", None, None, "article"),
            Err(AeoError::InvalidInput(_))
        ));
    }
}
