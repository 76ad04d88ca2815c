//! Specificity - numbers, measurements, named products, comparisons and examples

use super::{tiered, ContentContext, RuleScore, ScoringRule};
use crate::analyzer::text::{count_phrase, static_regex};
use crate::Dimension;

// Percentages and multipliers win over the plain-number branch at the same position
static_regex!(fn numeric_re = r"\b\d+(?:\.\d+)?\s?%|\b\d+(?:\.\d+)?x\b|\b\d{2,}(?:[.,]\d+)*\b");
static_regex!(fn unit_re = r#"(?i)\b\d+(?:\.\d+)?\s?(?:inch(?:es)?|cm|mm|oz|lbs?|grams?|g|ml)\b|\b\d+(?:\.\d+)?""#);
static_regex!(fn comparison_re = r"(?i)\b(?:vs|versus|compared to|better than|unlike|in contrast)\b");
static_regex!(fn example_re = r"(?i)\b(?:for example|such as|including|like)\b");

/// Rule for scoring concrete, verifiable detail
pub struct SpecificityRule;

impl SpecificityRule {
    fn keyword_matches(ctx: &ContentContext<'_>) -> usize {
        ctx.profile
            .product_keywords
            .iter()
            .map(|k| count_phrase(&ctx.lower, k))
            .sum()
    }

    fn competitors_mentioned<'p>(ctx: &ContentContext<'p>) -> Vec<&'p str> {
        ctx.profile
            .competitors
            .iter()
            .filter(|c| count_phrase(&ctx.lower, c) > 0)
            .map(String::as_str)
            .collect()
    }
}

impl ScoringRule for SpecificityRule {
    fn dimension(&self) -> Dimension {
        Dimension::Specificity
    }

    fn score(&self, ctx: &ContentContext<'_>) -> RuleScore {
        let numbers = numeric_re().find_iter(ctx.text).count();
        let units = unit_re().find_iter(ctx.text).count();
        let brand = count_phrase(&ctx.lower, &ctx.profile.name);
        let keywords = Self::keyword_matches(ctx);
        let comparisons = comparison_re().find_iter(ctx.text).count();
        let examples = example_re().find_iter(ctx.text).count();

        let mut score = tiered(numbers, &[(10, 30.0), (5, 20.0), (2, 10.0)]);
        if units > 0 {
            score += 15.0;
        }
        score += tiered(brand, &[(2, 10.0)]);
        score += tiered(keywords, &[(3, 15.0), (1, 8.0)]);
        score += tiered(comparisons, &[(2, 15.0)]);
        score += tiered(examples, &[(3, 15.0), (1, 8.0)]);

        let mut details = format!(
            "{} numbers, {} measurements, {} brand mentions, {} product keywords, {} comparisons, {} examples",
            numbers, units, brand, keywords, comparisons, examples
        );
        let competitors = Self::competitors_mentioned(ctx);
        if !competitors.is_empty() {
            details.push_str(&format!("; mentions competitors: {}", competitors.join(", ")));
        }

        RuleScore::new(score.min(100.0), details)
    }
}
