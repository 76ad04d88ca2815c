//! Trend tracking - persist scores to .aeo-history.json and compare results

use crate::analyzer::scoring::WEAKNESS_THRESHOLD;
use crate::analyzer::text::round1;
use crate::config::CONFIG_FILENAME;
use crate::{ContentAnalysisResult, Dimension, DocumentReport, Grade};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const HISTORY_FILENAME: &str = ".aeo-history.json";
const MAX_RUNS: usize = 50;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct HistoryFile {
    pub runs: Vec<HistoryRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRun {
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    pub files: HashMap<String, FileScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileScore {
    pub score: f64,
    pub grade: Grade,
}

/// Find project root (directory containing .aeo-history.json, .aeorc.json or .git)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };

    loop {
        if dir.join(HISTORY_FILENAME).exists()
            || dir.join(CONFIG_FILENAME).exists()
            || dir.join(".git").exists()
        {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Load history from project root (or create empty)
pub fn load_history(project_root: &Path) -> HistoryFile {
    let path = project_root.join(HISTORY_FILENAME);
    fs::read_to_string(&path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

/// Save history to project root
pub fn save_history(project_root: &Path, history: &HistoryFile) -> std::io::Result<()> {
    let path = project_root.join(HISTORY_FILENAME);
    let content = serde_json::to_string_pretty(history).map_err(std::io::Error::other)?;
    fs::write(path, content)
}

/// Get the previous score for a file from the latest run
pub fn previous_score(history: &HistoryFile, file_path: &Path) -> Option<f64> {
    let run = history.runs.last()?;
    let key = file_path.to_string_lossy();
    run.files.get(key.as_ref()).map(|f| f.score)
}

/// Build a new run from scored documents and append to history
pub fn append_run(history: &mut HistoryFile, reports: &[DocumentReport], commit: Option<String>) {
    let files = reports
        .iter()
        .map(|r| {
            (
                r.path.to_string_lossy().to_string(),
                FileScore {
                    score: r.analysis.overall_score,
                    grade: r.analysis.grade,
                },
            )
        })
        .collect();
    history.runs.push(HistoryRun {
        timestamp: chrono::Utc::now().to_rfc3339(),
        commit,
        files,
    });
    if history.runs.len() > MAX_RUNS {
        history.runs.drain(0..history.runs.len() - MAX_RUNS);
    }
}

/// Format delta for console: " [was 82.0, down 4.5]", " [was 82.0, up 2.0]" or ""
pub fn format_delta(previous: Option<f64>, current: f64) -> String {
    let Some(prev) = previous else {
        return String::new();
    };
    let diff = round1(current - prev);
    if diff == 0.0 {
        format!(" [unchanged at {:.1}]", current)
    } else if diff > 0.0 {
        format!(" [was {:.1}, up {:.1}]", prev, diff)
    } else {
        format!(" [was {:.1}, down {:.1}]", prev, -diff)
    }
}

/// Change in one dimension between two results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionDelta {
    pub dimension: Dimension,
    pub before: f64,
    pub after: f64,
    pub delta: f64,
}

/// Difference between two independently produced results for the same content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub overall_before: f64,
    pub overall_after: f64,
    pub overall_delta: f64,
    pub grade_before: Grade,
    pub grade_after: Grade,
    /// Per-dimension changes in dimension order
    pub dimension_deltas: Vec<DimensionDelta>,
    /// Dimensions that were below 50 before and are not anymore
    pub resolved_weaknesses: Vec<Dimension>,
    /// Dimensions that dropped below 50
    pub new_weaknesses: Vec<Dimension>,
}

impl ProgressReport {
    pub fn improved(&self) -> bool {
        self.overall_delta > 0.0
    }

    pub fn grade_changed(&self) -> bool {
        self.grade_before != self.grade_after
    }
}

/// A saved result: `aeo --json` output for one file, or one `{path, analysis}` document
#[derive(Deserialize)]
#[serde(untagged)]
enum SavedResult {
    Bare(Box<ContentAnalysisResult>),
    Document(Box<DocumentReport>),
}

/// Read a previously saved analysis result
pub fn load_result(path: &Path) -> Result<ContentAnalysisResult> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read result: {}", path.display()))?;
    let saved: SavedResult = serde_json::from_str(&content)
        .with_context(|| format!("Not an analysis result: {}", path.display()))?;
    Ok(match saved {
        SavedResult::Bare(result) => *result,
        SavedResult::Document(doc) => doc.analysis,
    })
}

fn delta(before: f64, after: f64) -> f64 {
    round1(after - before)
}

/// Compare a before/after pair of analyses
pub fn compare(before: &ContentAnalysisResult, after: &ContentAnalysisResult) -> ProgressReport {
    let mut dimension_deltas = Vec::with_capacity(Dimension::ALL.len());
    let mut resolved_weaknesses = Vec::new();
    let mut new_weaknesses = Vec::new();

    for dim in Dimension::ALL {
        let b = before.component_scores.get(dim).score;
        let a = after.component_scores.get(dim).score;
        dimension_deltas.push(DimensionDelta {
            dimension: dim,
            before: b,
            after: a,
            delta: delta(b, a),
        });
        match (b < WEAKNESS_THRESHOLD, a < WEAKNESS_THRESHOLD) {
            (true, false) => resolved_weaknesses.push(dim),
            (false, true) => new_weaknesses.push(dim),
            _ => {}
        }
    }

    ProgressReport {
        overall_before: before.overall_score,
        overall_after: after.overall_score,
        overall_delta: delta(before.overall_score, after.overall_score),
        grade_before: before.grade,
        grade_after: after.grade,
        dimension_deltas,
        resolved_weaknesses,
        new_weaknesses,
    }
}
