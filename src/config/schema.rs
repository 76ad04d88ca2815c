//! Shape of .aeorc.json: brand profile, defaults and per-path overrides

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default content-type label when neither config nor CLI sets one
pub const DEFAULT_CONTENT_TYPE: &str = "article";

/// Brand-specific vocabulary used by the specificity and relevance rules
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    /// Brand name, counted as a whole phrase
    #[serde(default)]
    pub name: String,

    /// Product names and keywords the brand sells under
    #[serde(default)]
    pub product_keywords: Vec<String>,

    /// Search terms worth ranking for; a term matches at 60% word coverage
    #[serde(default)]
    pub high_value_terms: Vec<String>,

    /// Competitor names (reported, never scored)
    #[serde(default)]
    pub competitors: Vec<String>,
}

impl BrandProfile {
    /// Fill empty fields from `base`
    fn merge_from(&mut self, base: BrandProfile) {
        if self.name.is_empty() {
            self.name = base.name;
        }
        if self.product_keywords.is_empty() {
            self.product_keywords = base.product_keywords;
        }
        if self.high_value_terms.is_empty() {
            self.high_value_terms = base.high_value_terms;
        }
        if self.competitors.is_empty() {
            self.competitors = base.competitors;
        }
    }
}

/// Settings for a subset of documents, e.g. a looser bar for FAQ pages
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Globs selecting the documents this override covers
    pub files: Vec<String>,

    /// Content-type label for matched files (e.g. "faq")
    #[serde(default)]
    pub content_type: Option<String>,

    /// Minimum score for the matched documents
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Replaces the target queries for matched files
    #[serde(default)]
    pub target_queries: Option<Vec<String>>,
}

/// Root config structure for .aeorc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    #[serde(default)]
    pub brand: BrandProfile,

    /// Minimum overall score (exit 1 if below). Default: none
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Questions every document should answer
    #[serde(default)]
    pub target_queries: Vec<String>,

    /// Default content-type label
    #[serde(default)]
    pub content_type: Option<String>,

    /// Globs for content that should never be scored
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Content file suffixes (default: .md, .markdown, .txt)
    #[serde(default)]
    pub content_patterns: Vec<String>,

    /// Root directory to search for content recursively, relative to the scored
    /// path (its parent directory when a single file is given)
    #[serde(default)]
    pub content_root: Option<String>,

    /// Per-path configuration overrides
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI values into config. CLI values take precedence; repeated
    /// `--query` flags replace the configured queries.
    pub fn merge_with_cli(
        mut self,
        cli_threshold: Option<f64>,
        cli_queries: &[String],
        cli_content_type: Option<&str>,
    ) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if !cli_queries.is_empty() {
            self.target_queries = cli_queries.to_vec();
        }
        if let Some(content_type) = cli_content_type {
            self.content_type = Some(content_type.to_string());
        }
        self
    }

    /// Get effective config for a specific file path, applying overrides in order
    pub fn effective_for_file(&self, file_path: &Path) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            threshold: self.threshold,
            target_queries: self.target_queries.clone(),
            content_type: self
                .content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        };

        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(threshold) = override_cfg.threshold {
                    effective.threshold = Some(threshold);
                }
                if let Some(content_type) = &override_cfg.content_type {
                    effective.content_type = content_type.clone();
                }
                if let Some(queries) = &override_cfg.target_queries {
                    effective.target_queries = queries.clone();
                }
            }
        }

        effective
    }

    /// True when `file_path` falls under one of the override globs
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        let path_str = file_path.to_string_lossy();
        patterns.iter().any(|pattern| match globset::Glob::new(pattern) {
            Ok(glob) => {
                glob.compile_matcher().is_match(file_path)
                    || path_str.contains(pattern.trim_start_matches("**/"))
            }
            Err(_) => false,
        })
    }

    /// Fold a base config (from `extends`) underneath this one
    pub fn merge_from(&mut self, base: Config) {
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.content_type.is_none() {
            self.content_type = base.content_type;
        }
        if self.content_root.is_none() {
            self.content_root = base.content_root;
        }
        if self.target_queries.is_empty() {
            self.target_queries = base.target_queries;
        }
        if self.content_patterns.is_empty() {
            self.content_patterns = base.content_patterns;
        }
        self.brand.merge_from(base.brand);

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        // Base overrides first so this config's overrides win
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }

    /// Content file suffixes, defaulting to markdown and plain text
    pub fn get_content_patterns(&self) -> Vec<&str> {
        if self.content_patterns.is_empty() {
            vec![".md", ".markdown", ".txt"]
        } else {
            self.content_patterns.iter().map(|s| s.as_str()).collect()
        }
    }
}

/// Settings that apply to one document once overrides are folded in
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub threshold: Option<f64>,
    pub target_queries: Vec<String>,
    pub content_type: String,
}
