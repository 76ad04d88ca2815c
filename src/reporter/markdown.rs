//! Markdown reporter - human-readable report for pull requests and docs

use crate::analyzer::scoring::ScoreCalculator;
use crate::batch::AggregateStats;
use crate::DocumentReport;
use std::fmt::Write;

/// Reporter for Markdown output
#[derive(Default)]
pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn new() -> Self {
        Self
    }

    /// Render one document as a Markdown section
    pub fn report(&self, doc: &DocumentReport) -> String {
        let mut out = String::new();
        self.write_document(&mut out, doc);
        out
    }

    /// Render several documents followed by a summary table
    pub fn report_many(&self, docs: &[DocumentReport], stats: &AggregateStats) -> String {
        let mut out = String::new();
        for doc in docs {
            self.write_document(&mut out, doc);
            out.push_str("---\n\n");
        }

        out.push_str("## Summary\n\n");
        let _ = writeln!(out, "- Items analyzed: {}", stats.items_analyzed);
        if stats.failed > 0 {
            let _ = writeln!(out, "- Failed: {}", stats.failed);
        }
        let _ = writeln!(
            out,
            "- Average score: {:.1} ({})\n",
            stats.average_score, stats.average_grade
        );
        out.push_str("| Grade | Count |\n|-------|------:|\n");
        for (grade, count) in &stats.grade_distribution {
            let _ = writeln!(out, "| {} | {} |", grade, count);
        }
        out
    }

    fn write_document(&self, out: &mut String, doc: &DocumentReport) {
        let a = &doc.analysis;
        let _ = writeln!(out, "# AEO Report: {}\n", escape(&doc.path.display().to_string()));
        let _ = writeln!(
            out,
            "**Score:** {:.1}/100 (grade **{}**)  ",
            a.overall_score, a.grade
        );
        let _ = writeln!(out, "{}\n", ScoreCalculator::grade_description(a.grade));
        let _ = writeln!(
            out,
            "Content type: {} | Words: {} | Target queries: {}\n",
            escape(&a.metadata.content_type),
            a.word_count,
            a.metadata.target_queries_count
        );

        out.push_str("## Components\n\n");
        out.push_str("| Dimension | Score | Weight | Details |\n");
        out.push_str("|-----------|------:|-------:|---------|\n");
        for (dim, c) in a.component_scores.iter() {
            let _ = writeln!(
                out,
                "| {} | {:.1} | {}% | {} |",
                dim.label(),
                c.score,
                dim.weight_percent(),
                escape(&c.details)
            );
        }
        out.push('\n');

        write_list(out, "Strengths", &a.strengths);
        write_list(out, "Weaknesses", &a.weaknesses);

        if let Some(ref alignment) = a.query_alignment {
            out.push_str("## Query Alignment\n\n");
            out.push_str("| Query | Alignment | Match |\n|-------|-----------|------:|\n");
            for qa in alignment {
                let _ = writeln!(
                    out,
                    "| {} | {} | {:.0}% |",
                    escape(&qa.query),
                    qa.alignment,
                    qa.match_ratio * 100.0
                );
            }
            out.push('\n');
        }

        if !a.recommendations.is_empty() {
            out.push_str("## Recommendations\n\n");
            for (i, rec) in a.recommendations.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{}. **{}** ({} priority, {:.1}): {}",
                    i + 1,
                    rec.area.label(),
                    rec.priority,
                    rec.current_score,
                    rec.action
                );
            }
            out.push('\n');
        }
    }
}

fn write_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "## {}\n", title);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
    out.push('\n');
}

/// Keep table cells on one line and pipes literal
fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::aggregate_stats;
    use crate::AeoScorer;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn doc(content: &str, queries: &[&str]) -> DocumentReport {
        let queries: Vec<String> = queries.iter().map(|q| q.to_string()).collect();
        DocumentReport {
            path: PathBuf::from("blog/post.md"),
            analysis: AeoScorer::new()
                .with_clock(chrono::Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
                .analyze(content, Some(&queries), None, "article")
                .unwrap(),
        }
    }

    #[test]
    fn test_report_sections() {
        let md = MarkdownReporter::new().report(&doc(
            "Binders are useful for collectors.",
            &["best binder"],
        ));
        assert!(md.starts_with("# AEO Report: blog/post.md\n"));
        assert!(md.contains("## Components"));
        assert!(md.contains("| Structure |"));
        assert!(md.contains("| Authority |"));
        assert!(md.contains("## Weaknesses"));
        assert!(md.contains("## Query Alignment"));
        assert!(md.contains("| best binder |"));
        assert!(md.contains("## Recommendations\n\n1. **"));
    }

    #[test]
    fn test_report_omits_alignment_without_queries() {
        let md = MarkdownReporter::new().report(&doc("Binders are useful.", &[]));
        assert!(!md.contains("Query Alignment"));
    }

    #[test]
    fn test_escape_pipes() {
        assert_eq!(escape("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_report_many_summary() {
        let docs = vec![doc("Binders are useful.", &[]), doc("Sleeves help.", &[])];
        let stats = aggregate_stats(docs.iter().map(|d| &d.analysis), 0);
        let md = MarkdownReporter::new().report_many(&docs, &stats);
        assert_eq!(md.matches("# AEO Report:").count(), 2);
        assert!(md.contains("## Summary"));
        assert!(md.contains("- Items analyzed: 2"));
        assert!(md.contains("| A | 0 |"));
        assert!(!md.contains("Failed"));
    }
}
