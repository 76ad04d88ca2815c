//! Batch analysis - score many content items at once and summarize them

use crate::analyzer::text::round1;
use crate::config::DEFAULT_CONTENT_TYPE;
use crate::{AeoScorer, ContentAnalysisResult, Grade};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One entry of a batch manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    /// Optional label echoed back in the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub target_queries: Vec<String>,
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl BatchItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
            target_queries: Vec::new(),
            content_url: None,
            content_type: None,
        }
    }
}

/// Manifest file shape: a bare array or `{ "items": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum Manifest {
    List(Vec<BatchItem>),
    Wrapped { items: Vec<BatchItem> },
}

/// Outcome for one item. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Position of the item in the manifest
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ContentAnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate statistics across analyzed items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub items_analyzed: usize,
    pub failed: usize,
    /// Mean overall score, one decimal
    pub average_score: f64,
    pub average_grade: Grade,
    /// Count per grade; every grade is present
    pub grade_distribution: BTreeMap<Grade, usize>,
}

/// Read a batch manifest
pub fn load_manifest(path: &Path) -> Result<Vec<BatchItem>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&content)
        .with_context(|| format!("Invalid batch manifest: {}", path.display()))?;
    Ok(match manifest {
        Manifest::List(items) => items,
        Manifest::Wrapped { items } => items,
    })
}

fn analyze_item(scorer: &AeoScorer, index: usize, item: &BatchItem) -> BatchEntry {
    let content_type = item.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
    let outcome = scorer.analyze(
        &item.content,
        Some(item.target_queries.as_slice()),
        item.content_url.as_deref(),
        content_type,
    );
    match outcome {
        Ok(result) => BatchEntry {
            index,
            id: item.id.clone(),
            result: Some(result),
            error: None,
        },
        Err(e) => {
            tracing::warn!(index, id = ?item.id, error = %e, "batch item rejected");
            BatchEntry {
                index,
                id: item.id.clone(),
                result: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Score every item. Output order always matches input order; a failing item
/// is reported in its entry and does not stop the rest.
pub fn analyze_batch(scorer: &AeoScorer, items: &[BatchItem], parallel: bool) -> Vec<BatchEntry> {
    let entries: Vec<BatchEntry> = if parallel {
        items
            .par_iter()
            .enumerate()
            .map(|(i, item)| analyze_item(scorer, i, item))
            .collect()
    } else {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| analyze_item(scorer, i, item))
            .collect()
    };

    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    tracing::info!(items = items.len(), failed, parallel, "batch analyzed");
    entries
}

/// Summarize a set of results; `failed` counts items that produced no result
pub fn aggregate_stats<'a>(
    results: impl IntoIterator<Item = &'a ContentAnalysisResult>,
    failed: usize,
) -> AggregateStats {
    let mut grade_distribution: BTreeMap<Grade, usize> =
        [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F]
            .into_iter()
            .map(|g| (g, 0))
            .collect();

    let mut count = 0usize;
    let mut total = 0.0;
    for r in results {
        count += 1;
        total += r.overall_score;
        *grade_distribution.entry(r.grade).or_insert(0) += 1;
    }

    let average_score = if count == 0 {
        0.0
    } else {
        round1(total / count as f64)
    };

    AggregateStats {
        items_analyzed: count,
        failed,
        average_score,
        average_grade: Grade::from_score(average_score),
        grade_distribution,
    }
}

/// Stats for a finished batch
pub fn batch_stats(entries: &[BatchEntry]) -> AggregateStats {
    let failed = entries.iter().filter(|e| e.result.is_none()).count();
    aggregate_stats(entries.iter().filter_map(|e| e.result.as_ref()), failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn scorer() -> AeoScorer {
        AeoScorer::new().with_clock(chrono::Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
    }

    fn items() -> Vec<BatchItem> {
        vec![
            BatchItem {
                id: Some("first".to_string()),
                ..BatchItem::new("## Binders\n\nA binder is the best way to store cards in 2025.")
            },
            BatchItem::new("   "),
            BatchItem {
                target_queries: vec!["best binder".to_string()],
                content_type: Some("faq".to_string()),
                ..BatchItem::new("What is the best binder? The best binder holds 360 cards.")
            },
        ]
    }

    #[test]
    fn test_order_preserved_and_failures_isolated() {
        for parallel in [false, true] {
            let entries = analyze_batch(&scorer(), &items(), parallel);
            assert_eq!(entries.len(), 3);
            assert_eq!(entries.iter().map(|e| e.index).collect::<Vec<_>>(), vec![0, 1, 2]);
            assert_eq!(entries[0].id.as_deref(), Some("first"));
            assert!(entries[0].result.is_some());
            assert!(entries[1].result.is_none());
            assert!(entries[1].error.as_deref().unwrap().contains("invalid input"));
            let third = entries[2].result.as_ref().unwrap();
            assert_eq!(third.metadata.content_type, "faq");
            assert!(third.query_alignment.is_some());
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let seq = analyze_batch(&scorer(), &items(), false);
        let par = analyze_batch(&scorer(), &items(), true);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_batch_stats() {
        let entries = analyze_batch(&scorer(), &items(), false);
        let stats = batch_stats(&entries);
        assert_eq!(stats.items_analyzed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.grade_distribution.values().sum::<usize>(), 2);
        assert_eq!(stats.grade_distribution.len(), 5);
        assert_eq!(stats.average_grade, Grade::from_score(stats.average_score));
    }

    #[test]
    fn test_aggregate_empty() {
        let stats = aggregate_stats(std::iter::empty(), 0);
        assert_eq!(stats.items_analyzed, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.average_grade, Grade::F);
    }

    #[test]
    fn test_load_manifest_both_shapes() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("list.json");
        fs::write(&list, r#"[{"content": "a"}, {"content": "b", "targetQueries": ["q"]}]"#).unwrap();
        let items = load_manifest(&list).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].target_queries, vec!["q"]);

        let wrapped = dir.path().join("wrapped.json");
        fs::write(&wrapped, r#"{"items": [{"id": "x", "content": "c", "contentUrl": "https://e.com"}]}"#)
            .unwrap();
        let items = load_manifest(&wrapped).unwrap();
        assert_eq!(items[0].id.as_deref(), Some("x"));
        assert_eq!(items[0].content_url.as_deref(), Some("https://e.com"));
    }

    #[test]
    fn test_load_manifest_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"nope": 1}"#).unwrap();
        assert!(load_manifest(&path).is_err());
        assert!(load_manifest(&dir.path().join("missing.json")).is_err());
    }
}
