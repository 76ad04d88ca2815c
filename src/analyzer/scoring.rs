//! Aggregation, grading and recommendation generation

use crate::{ComponentScores, Dimension, Grade, Priority, Recommendation};

/// Components at or above this score are strengths and get no recommendation
pub const STRENGTH_THRESHOLD: f64 = 75.0;
/// Components below this score are weaknesses with high-priority recommendations
pub const WEAKNESS_THRESHOLD: f64 = 50.0;

/// Calculator for overall scores, grades and recommendations
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Clamp a raw rule score to 0-100
    pub fn normalize(raw: f64) -> f64 {
        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(0.0, 100.0)
    }

    /// Weighted sum of the component scores, unrounded. Grades are taken from
    /// this value; reporters round for display.
    ///
    /// Summed against weight percents and divided once, so equal component
    /// scores produce exactly that overall score.
    pub fn overall(components: &ComponentScores) -> f64 {
        let weighted: f64 = components
            .iter()
            .map(|(dim, c)| c.score * f64::from(dim.weight_percent()))
            .sum();
        (weighted / 100.0).clamp(0.0, 100.0)
    }

    /// Get a description of the grade
    pub fn grade_description(grade: Grade) -> &'static str {
        match grade {
            Grade::A => "Excellent - Highly likely to be quoted by answer engines",
            Grade::B => "Good - Citable, with a few gaps to close",
            Grade::C => "Fair - Occasionally citable but easy to pass over",
            Grade::D => "Poor - Answer engines will rarely quote this content",
            Grade::F => "Failing - Content needs major restructuring",
        }
    }

    /// Summaries of components scoring 75 or more, in dimension order
    pub fn strengths(components: &ComponentScores) -> Vec<String> {
        components
            .iter()
            .filter(|(_, c)| c.score >= STRENGTH_THRESHOLD)
            .map(|(dim, c)| Self::summary(dim, c.score, Self::strength_phrase(dim)))
            .collect()
    }

    /// Summaries of components scoring below 50, in dimension order
    pub fn weaknesses(components: &ComponentScores) -> Vec<String> {
        components
            .iter()
            .filter(|(_, c)| c.score < WEAKNESS_THRESHOLD)
            .map(|(dim, c)| Self::summary(dim, c.score, Self::weakness_phrase(dim)))
            .collect()
    }

    /// Recommendations for every component below 75, weakest first.
    /// Ties keep dimension order.
    pub fn recommendations(components: &ComponentScores, content_type: &str) -> Vec<Recommendation> {
        let mut ranked: Vec<_> = components.iter().collect();
        ranked.sort_by(|a, b| a.1.score.total_cmp(&b.1.score));

        ranked
            .into_iter()
            .filter_map(|(dim, c)| {
                let priority = if c.score < WEAKNESS_THRESHOLD {
                    Priority::High
                } else if c.score < STRENGTH_THRESHOLD {
                    Priority::Medium
                } else {
                    return None;
                };
                Some(Recommendation {
                    area: dim,
                    priority,
                    current_score: c.score,
                    action: Self::action(dim, priority, content_type),
                })
            })
            .collect()
    }

    fn summary(dim: Dimension, score: f64, phrase: &str) -> String {
        format!("{}: {:.0}/100 - {}", dim.label(), score, phrase)
    }

    fn strength_phrase(dim: Dimension) -> &'static str {
        match dim {
            Dimension::Structure => "well organized for extraction",
            Dimension::Definitiveness => "clear, assertive answers",
            Dimension::Quotability => "highly quotable sentences",
            Dimension::Specificity => "concrete, verifiable details",
            Dimension::Relevance => "closely targets key searches",
            Dimension::Freshness => "current and timely",
            Dimension::Authority => "strong credibility signals",
        }
    }

    fn weakness_phrase(dim: Dimension) -> &'static str {
        match dim {
            Dimension::Structure => "hard for answer engines to extract",
            Dimension::Definitiveness => "too much hedging",
            Dimension::Quotability => "few quotable sentences",
            Dimension::Specificity => "lacks concrete details",
            Dimension::Relevance => "misses target searches",
            Dimension::Freshness => "no recency signals",
            Dimension::Authority => "few credibility signals",
        }
    }

    fn action(dim: Dimension, priority: Priority, content_type: &str) -> String {
        match (dim, priority) {
            (Dimension::Structure, Priority::High) => format!(
                "Restructure this {} with H2 section headers, bullet lists and a comparison table so key points can be extracted",
                content_type
            ),
            (Dimension::Structure, Priority::Medium) => {
                "Add more H2/H3 headers and turn dense paragraphs into bullet lists".to_string()
            }
            (Dimension::Definitiveness, Priority::High) => {
                "Open with a direct answer and replace hedging words (might, could, perhaps) with definitive statements".to_string()
            }
            (Dimension::Definitiveness, Priority::Medium) => {
                "State conclusions more directly, e.g. \"X is the best choice for Y\"".to_string()
            }
            (Dimension::Quotability, Priority::High) => {
                "Write self-contained 10-40 word sentences and open with a short summary paragraph".to_string()
            }
            (Dimension::Quotability, Priority::Medium) => {
                "Add a key takeaways section and bold the single most important sentence".to_string()
            }
            (Dimension::Specificity, Priority::High) => {
                "Add concrete numbers, measurements, product names and examples".to_string()
            }
            (Dimension::Specificity, Priority::Medium) => {
                "Back claims with specific figures and include at least one direct comparison".to_string()
            }
            (Dimension::Relevance, Priority::High) => format!(
                "Work high-value search terms and the target questions into this {}'s headers and body, phrased as questions users ask",
                content_type
            ),
            (Dimension::Relevance, Priority::Medium) => {
                "Add an FAQ section that answers the target questions word for word".to_string()
            }
            (Dimension::Freshness, Priority::High) => {
                "Reference the current year and add recency signals such as \"updated\" or \"latest\"".to_string()
            }
            (Dimension::Freshness, Priority::Medium) => {
                "Add a last-updated date and mention recent changes".to_string()
            }
            (Dimension::Authority, Priority::High) => {
                "Cite sources, reference expert research and include customer reviews or testimonials".to_string()
            }
            (Dimension::Authority, Priority::Medium) => {
                "Add a cited source or a customer testimonial to support key claims".to_string()
            }
        }
    }
}
