//! On-disk cache of analysis results
//!
//! Caches results keyed by file path. An entry is only reused while the fingerprint of
//! everything that feeds the score (content, target queries, content type, brand profile
//! and freshness year) is unchanged.

use crate::{BrandProfile, ContentAnalysisResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const CACHE_VERSION: u32 = 1;
const CACHE_FILENAME: &str = ".aeo-cache.json";

/// Inputs that determine a score besides the scorer itself
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub content: &'a str,
    pub target_queries: &'a [String],
    pub content_type: &'a str,
    pub content_url: Option<&'a str>,
    pub profile: &'a BrandProfile,
    pub year: i32,
}

impl ScoreInputs<'_> {
    /// SHA-256 over every input, hex encoded
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        let mut field = |bytes: &[u8]| {
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        };

        field(self.content.as_bytes());
        field(self.content_type.as_bytes());
        field(self.content_url.unwrap_or_default().as_bytes());
        field(&self.year.to_le_bytes());
        field(&(self.target_queries.len() as u64).to_le_bytes());
        for q in self.target_queries {
            field(q.as_bytes());
        }

        let p = self.profile;
        field(p.name.as_bytes());
        for list in [&p.product_keywords, &p.high_value_terms, &p.competitors] {
            field(&(list.len() as u64).to_le_bytes());
            for item in list {
                field(item.as_bytes());
            }
        }

        hex::encode(hasher.finalize())
    }
}

/// One cached result and the fingerprint it was scored under
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// Fingerprint of the inputs that produced `result`
    fingerprint: String,
    result: ContentAnalysisResult,
    /// Timestamp when cached
    cached_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheData {
    /// Cache format version
    version: u32,
    /// Keyed by document path
    entries: HashMap<String, CacheEntry>,
}

impl Default for CacheData {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// Previous results stored in .aeo-cache.json
pub struct AnalysisCache {
    cache_path: PathBuf,
    data: CacheData,
    /// Whether the cache has been modified since load
    dirty: bool,
    enabled: bool,
}

impl AnalysisCache {
    /// Open the cache stored in `project_root` (empty if missing or unreadable)
    pub fn new(project_root: &Path) -> Self {
        let cache_path = project_root.join(CACHE_FILENAME);
        let data = Self::load_cache(&cache_path).unwrap_or_default();

        Self {
            cache_path,
            data,
            dirty: false,
            enabled: true,
        }
    }

    /// A cache that never hits and never writes (`--no-cache`)
    pub fn disabled() -> Self {
        Self {
            cache_path: PathBuf::new(),
            data: CacheData::default(),
            dirty: false,
            enabled: false,
        }
    }

    fn load_cache(path: &Path) -> Option<CacheData> {
        let content = fs::read_to_string(path).ok()?;
        let data: CacheData = serde_json::from_str(&content).ok()?;
        if data.version != CACHE_VERSION {
            tracing::debug!(found = data.version, "discarding cache with old version");
            return None;
        }
        Some(data)
    }

    /// Save cache to disk if anything changed
    pub fn save(&self) -> Result<()> {
        if !self.enabled || !self.dirty {
            return Ok(());
        }

        let content =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize cache")?;
        fs::write(&self.cache_path, content)
            .with_context(|| format!("Failed to write cache to {}", self.cache_path.display()))?;

        Ok(())
    }

    /// Get cached result if the inputs are unchanged
    pub fn get(&self, path: &Path, inputs: &ScoreInputs<'_>) -> Option<ContentAnalysisResult> {
        if !self.enabled {
            return None;
        }

        let entry = self.data.entries.get(path.to_string_lossy().as_ref())?;
        if entry.fingerprint != inputs.fingerprint() {
            return None;
        }
        Some(entry.result.clone())
    }

    /// Remember a freshly computed result
    pub fn set(&mut self, path: &Path, inputs: &ScoreInputs<'_>, result: ContentAnalysisResult) {
        if !self.enabled {
            return;
        }

        let entry = CacheEntry {
            fingerprint: inputs.fingerprint(),
            result,
            cached_at: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };

        self.data
            .entries
            .insert(path.to_string_lossy().to_string(), entry);
        self.dirty = true;
    }

    /// Remove entries for files that are no longer analyzed
    pub fn cleanup(&mut self, existing_files: &[PathBuf]) {
        if !self.enabled {
            return;
        }

        let existing: HashSet<String> = existing_files
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        let before = self.data.entries.len();
        self.data.entries.retain(|k, _| existing.contains(k));
        if self.data.entries.len() != before {
            self.dirty = true;
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.data.entries.len(),
            enabled: self.enabled,
        }
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.data.entries.clear();
        self.dirty = true;
    }
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub entries: usize,
    pub enabled: bool,
}
