//! JSON reporter for machine-readable output

use crate::batch::{AggregateStats, BatchEntry};
use crate::history::ProgressReport;
use crate::{ContentAnalysisResult, DocumentReport};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        out.unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize report");
            fallback.to_string()
        })
    }

    /// Report a single analysis result. The output can be read back by `aeo compare`.
    pub fn report(&self, result: &ContentAnalysisResult) -> String {
        self.render(result, "{}")
    }

    /// Report multiple documents as a JSON array
    pub fn report_many(&self, docs: &[DocumentReport]) -> String {
        self.render(docs, "[]")
    }

    /// Report documents with aggregate summary
    pub fn report_with_summary(&self, docs: &[DocumentReport], stats: &AggregateStats) -> String {
        self.render(
            &JsonOutput {
                results: docs,
                summary: stats,
            },
            "{}",
        )
    }

    /// Report a batch run
    pub fn report_batch(&self, entries: &[BatchEntry], stats: &AggregateStats) -> String {
        self.render(
            &JsonOutput {
                results: entries,
                summary: stats,
            },
            "{}",
        )
    }

    /// Report a before/after comparison
    pub fn report_progress(&self, progress: &ProgressReport) -> String {
        self.render(progress, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonOutput<'a, T> {
    results: &'a [T],
    summary: &'a AggregateStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{aggregate_stats, analyze_batch, batch_stats, BatchItem};
    use crate::history::compare;
    use crate::AeoScorer;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn scorer() -> AeoScorer {
        AeoScorer::new().with_clock(chrono::Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
    }

    fn doc(path: &str, content: &str) -> DocumentReport {
        let queries = vec!["best binder".to_string()];
        DocumentReport {
            path: PathBuf::from(path),
            analysis: scorer()
                .analyze(content, Some(&queries), None, "article")
                .unwrap(),
        }
    }

    #[test]
    fn test_single_result_has_expected_keys() {
        let d = doc("post.md", "The best binder holds 360 cards.");
        let json = JsonReporter::new().report(&d.analysis);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        for key in [
            "overall_score",
            "grade",
            "component_scores",
            "strengths",
            "weaknesses",
            "recommendations",
            "query_alignment",
            "word_count",
            "metadata",
        ] {
            assert!(parsed.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(parsed["component_scores"]["structure"]["weight"], 0.2);
        assert_eq!(parsed["query_alignment"][0]["alignment"], "strong");
        assert_eq!(parsed["metadata"]["content_type"], "article");
    }

    #[test]
    fn test_single_result_reads_back() {
        let d = doc("post.md", "The best binder holds 360 cards.");
        let json = JsonReporter::new().pretty().report(&d.analysis);
        assert!(json.contains('\n'), "pretty JSON should have newlines");
        let back: ContentAnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d.analysis);
    }

    #[test]
    fn test_report_many_and_summary() {
        let docs = vec![
            doc("a.md", "The best binder holds 360 cards."),
            doc("b.md", "Binders are useful for collectors who trade."),
        ];
        let reporter = JsonReporter::new();

        let parsed: serde_json::Value = serde_json::from_str(&reporter.report_many(&docs)).unwrap();
        let arr = parsed.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["path"], "a.md");
        assert!(arr[1]["analysis"]["overall_score"].is_number());

        let stats = aggregate_stats(docs.iter().map(|d| &d.analysis), 0);
        let parsed: serde_json::Value =
            serde_json::from_str(&reporter.report_with_summary(&docs, &stats)).unwrap();
        assert_eq!(parsed["results"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["summary"]["items_analyzed"], 2);
        assert_eq!(parsed["summary"]["grade_distribution"].as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_report_many_empty() {
        let json = JsonReporter::new().report_many(&[]);
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_report_batch_includes_errors() {
        let items = vec![BatchItem::new("The best binder holds 360 cards."), BatchItem::new("")];
        let entries = analyze_batch(&scorer(), &items, false);
        let json = JsonReporter::new().report_batch(&entries, &batch_stats(&entries));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let results = parsed["results"].as_array().unwrap();
        assert!(results[0].get("result").is_some());
        assert!(results[0].get("error").is_none());
        assert!(results[1]["error"].as_str().unwrap().contains("empty"));
        assert_eq!(parsed["summary"]["failed"], 1);
    }

    #[test]
    fn test_report_progress() {
        let before = doc("a.md", "Binders are useful.");
        let after = doc("a.md", "## Binders\n\nThe best binder holds 360 cards.");
        let json = JsonReporter::new().report_progress(&compare(&before.analysis, &after.analysis));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["dimension_deltas"].as_array().unwrap().len(), 7);
        assert_eq!(parsed["dimension_deltas"][0]["dimension"], "structure");
    }
}
