//! Structure - headers, lists, emphasis and tables that make content easy to extract

use super::{tiered, ContentContext, RuleScore, ScoringRule};
use crate::analyzer::text::{bold_re, paragraphs, static_regex, word_count};
use crate::Dimension;

static_regex!(fn h1_re = r"(?m)^[ \t]*#[ \t]+\S");
static_regex!(fn h2_re = r"(?m)^[ \t]*##[ \t]+\S");
static_regex!(fn h3_re = r"(?m)^[ \t]*###[ \t]+\S");
static_regex!(fn list_item_re = r"(?m)^[ \t]*(?:[-*+•]|\d+[.)])[ \t]+\S");

/// Rule for scoring machine-readable structure
pub struct StructureRule;

impl StructureRule {
    /// A row with at least two non-empty pipe-delimited cells
    fn is_table_row(line: &str) -> bool {
        let trimmed = line.trim();
        if !trimmed.contains('|') {
            return false;
        }
        trimmed
            .trim_matches('|')
            .split('|')
            .filter(|cell| !cell.trim().is_empty())
            .count()
            >= 2
    }

    /// Header row plus at least one more row
    fn has_table(text: &str) -> bool {
        text.lines().filter(|l| Self::is_table_row(l)).count() >= 2
    }

    fn average_paragraph_words(text: &str) -> Option<f64> {
        let paras = paragraphs(text);
        if paras.is_empty() {
            return None;
        }
        let total: usize = paras.iter().map(|p| word_count(p)).sum();
        Some(total as f64 / paras.len() as f64)
    }

    /// Full credit for 30-100 word paragraphs; short ones still get a little
    fn paragraph_points(avg: Option<f64>) -> f64 {
        match avg {
            Some(avg) if (30.0..=100.0).contains(&avg) => 15.0,
            Some(avg) if avg > 0.0 && avg < 30.0 => 5.0,
            _ => 0.0,
        }
    }
}

impl ScoringRule for StructureRule {
    fn dimension(&self) -> Dimension {
        Dimension::Structure
    }

    fn score(&self, ctx: &ContentContext<'_>) -> RuleScore {
        let text = ctx.text;
        let h1 = h1_re().find_iter(text).count();
        let h2 = h2_re().find_iter(text).count();
        let h3 = h3_re().find_iter(text).count();
        let list_items = list_item_re().find_iter(text).count();
        let bold = bold_re().find_iter(text).count();
        let avg_para = Self::average_paragraph_words(text);
        let table = Self::has_table(text);

        let mut score = tiered(h2, &[(3, 25.0), (1, 15.0)]);
        score += tiered(h3, &[(2, 10.0)]);
        if h1 == 1 {
            score += 10.0;
        }
        score += tiered(list_items, &[(5, 20.0), (2, 10.0)]);
        score += tiered(bold, &[(3, 10.0)]);
        score += Self::paragraph_points(avg_para);
        if table {
            score += 10.0;
        }

        let details = format!(
            "{} H1, {} H2, {} H3 headers; {} list items; {} bold terms; avg paragraph {} words; {}",
            h1,
            h2,
            h3,
            list_items,
            bold,
            avg_para.map(|a| a.round() as usize).unwrap_or(0),
            if table { "table present" } else { "no table" }
        );

        RuleScore::new(score.min(100.0), details)
    }
}
