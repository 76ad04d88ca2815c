//! Authority - expert positioning, citations, first-person expertise and social proof

use super::{tiered, ContentContext, RuleScore, ScoringRule};
use crate::analyzer::text::static_regex;
use crate::Dimension;

static_regex!(fn expert_re = r"(?i)\b(?:experts?|research|studies|data|according\s+to|proven|tested|certified|industry|professionals?)\b");
static_regex!(fn citation_re = r"(?i)source:|\[[^\]\n]+\]\([^)\s]+\)|https?://[^\s)]+|\baccording\s+to\b|\breferenced\s+by\b|\bas\s+noted\s+by\b");
static_regex!(fn brand_authority_re = r"(?i)\bwe\s+(?:have|provide|offer|deliver|ensure)\b|\bour\s+(?:team|experts|experience|testing)\b|\byears\s+of\s+experience\b");
static_regex!(fn social_proof_re = r"(?i)\b(?:customers?|reviews?|ratings?|testimonials?|feedback|trusted|recommend(?:s|ed)?)\b");

/// Rule for scoring credibility signals
pub struct AuthorityRule;

impl ScoringRule for AuthorityRule {
    fn dimension(&self) -> Dimension {
        Dimension::Authority
    }

    fn score(&self, ctx: &ContentContext<'_>) -> RuleScore {
        let experts = expert_re().find_iter(ctx.text).count();
        let citations = citation_re().find_iter(ctx.text).count();
        let brand_voice = brand_authority_re().is_match(ctx.text);
        let social = social_proof_re().find_iter(ctx.text).count();

        let mut score = tiered(experts, &[(5, 30.0), (2, 20.0), (1, 10.0)]);
        score += tiered(citations, &[(3, 25.0), (1, 15.0)]);
        if brand_voice {
            score += 20.0;
        }
        score += tiered(social, &[(3, 25.0), (1, 10.0)]);

        let details = format!(
            "{} expert signals, {} citations, {}, {} social proof signals",
            experts,
            citations,
            if brand_voice {
                "brand expertise stated"
            } else {
                "no brand expertise statement"
            },
            social
        );

        RuleScore::new(score.min(100.0), details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::test_support::score_with;

    #[test]
    fn test_plain_text_scores_zero() {
        let r = score_with(&AuthorityRule, "Binders keep cards flat.");
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn test_according_to_counts_as_expert_and_citation() {
        let r = score_with(&AuthorityRule, "According to collectors, sleeves matter.");
        // expert 1 => +10, citation 1 => +15
        assert_eq!(r.score, 25.0);
    }

    #[test]
    fn test_links_and_sources() {
        let text = "See [the guide](https://example.com/guide). Source: PSA. Also https://psacard.com";
        let r = score_with(&AuthorityRule, text);
        // markdown link, source:, bare url => 3 citations (the url inside the link is consumed with it)
        assert!(r.details.contains("3 citations"));
        assert_eq!(r.score, 25.0);
    }

    #[test]
    fn test_all_signals_capped() {
        let text = "Our team of experts tested and certified every binder using industry research and data. \
                    According to PSA, as noted by Beckett, referenced by CGC, sleeves matter. \
                    We have years of experience. Customers leave reviews and ratings; collectors recommend us.";
        let r = score_with(&AuthorityRule, text);
        // 30 + 25 + 20 + 25 = 100
        assert_eq!(r.score, 100.0);
        assert!(r.details.contains("brand expertise stated"));
    }

    #[test]
    fn test_social_proof_tiers() {
        assert_eq!(score_with(&AuthorityRule, "Trusted by many.").score, 10.0);
        assert_eq!(
            score_with(&AuthorityRule, "Trusted, with reviews and feedback.").score,
            25.0
        );
    }
}
