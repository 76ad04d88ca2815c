//! Freshness - recent dates and recency language

use super::{tiered, ContentContext, RuleScore, ScoringRule};
use crate::analyzer::text::static_regex;
use crate::Dimension;
use std::collections::BTreeSet;

const BASE_SCORE: f64 = 50.0;
/// Earliest year that counts as a stale reference
const OLDEST_TRACKED_YEAR: i32 = 2018;

// Runs of ASCII digits; a year may be glued to letters ("FY2025") but not to other digits
static_regex!(fn digit_run_re = r"[0-9]+");
static_regex!(fn freshness_word_re = r"(?i)\b(?:updated|latest|current|new|recent|recently|today|this\s+year)\b");

/// Rule for scoring time-sensitive signals against an injected current year
pub struct FreshnessRule;

impl FreshnessRule {
    /// Four-digit 20xx years appearing literally in the text
    fn years(text: &str) -> BTreeSet<i32> {
        digit_run_re()
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|run| run.len() == 4 && run.starts_with("20"))
            .filter_map(|run| run.parse().ok())
            .collect()
    }
}

impl ScoringRule for FreshnessRule {
    fn dimension(&self) -> Dimension {
        Dimension::Freshness
    }

    fn score(&self, ctx: &ContentContext<'_>) -> RuleScore {
        let years = Self::years(ctx.text);
        let current = ctx.current_year;
        let recent_year = years.contains(&current) || years.contains(&(current - 1));
        let stale_year = years
            .iter()
            .any(|y| (OLDEST_TRACKED_YEAR..=current - 2).contains(y));
        let signals = freshness_word_re().find_iter(ctx.text).count();

        let mut score = BASE_SCORE;
        if recent_year {
            score += 25.0;
        }
        score += tiered(signals, &[(3, 20.0), (1, 10.0)]);
        let stale = stale_year && !recent_year;
        if stale {
            score -= 15.0;
        }

        let mut details = format!(
            "{}; {} freshness signals",
            if recent_year {
                format!("references {} or {}", current, current - 1)
            } else {
                "no current-year reference".to_string()
            },
            signals
        );
        if stale {
            details.push_str("; only outdated years referenced");
        }

        RuleScore::new(score.clamp(0.0, 100.0), details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::test_support::score_with;
    use crate::config::BrandProfile;

    fn score_in(text: &str, year: i32) -> RuleScore {
        let p = BrandProfile::default();
        let ctx = ContentContext::new(text, &p, &[], year);
        FreshnessRule.score(&ctx)
    }

    #[test]
    fn test_no_signals_scores_base() {
        let r = score_with(&FreshnessRule, "Binders keep cards flat.");
        assert_eq!(r.score, 50.0);
    }

    #[test]
    fn test_current_year_and_signals() {
        let r = score_with(
            &FreshnessRule,
            "Updated for 2025: the latest and newest, with current prices.",
        );
        // 2025 => +25; updated, latest, current => +20 ("newest" is not a signal word)
        assert_eq!(r.score, 95.0);
    }

    #[test]
    fn test_prior_year_counts_as_recent() {
        assert_eq!(score_in("Tested in 2024.", 2025).score, 75.0);
    }

    #[test]
    fn test_old_year_penalized_without_recent_year() {
        assert_eq!(score_in("Our 2019 review.", 2025).score, 35.0);
        // a recent year cancels the penalty
        assert_eq!(score_in("Our 2019 review, revisited in 2025.", 2025).score, 75.0);
        // two years back is already stale
        assert!(score_in("Written in 2023.", 2025).details.contains("outdated"));
    }

    #[test]
    fn test_injected_year_changes_result() {
        let text = "Best binders of 2025.";
        assert_eq!(score_in(text, 2025).score, 75.0);
        assert_eq!(score_in(text, 2030).score, 35.0);
    }

    #[test]
    fn test_this_year_phrase() {
        let r = score_with(&FreshnessRule, "Collectors bought more this year than ever.");
        assert_eq!(r.score, 60.0);
    }

    #[test]
    fn test_years_inside_numbers_ignored() {
        assert!(FreshnessRule::years("sku 120250 and 20251").is_empty());
    }

    #[test]
    fn test_years_glued_to_letters_count() {
        let years = FreshnessRule::years("FY2025, v2024, Q3-2019 and 2025-06");
        assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![2019, 2024, 2025]);

        assert_eq!(score_in("Our FY2025 binder lineup holds cards.", 2025).score, 75.0);
        assert_eq!(score_in("Binder guide v2025 for collectors.", 2025).score, 75.0);
        assert_eq!(score_in("Released in FY2019.", 2025).score, 35.0);
    }
}
