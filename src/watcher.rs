//! File system watcher for watch mode

use crate::config::is_content_file;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const DEBOUNCE_MS: u64 = 300;

/// Watches a file or directory for content changes
pub struct ContentWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<notify::Event>>,
    /// File suffixes that count as content (e.g. ".md")
    patterns: Vec<String>,
    /// Set when watching a single file; events for its siblings are dropped
    target: Option<PathBuf>,
}

fn is_create_or_modify(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

impl ContentWatcher {
    /// Start watching the given path (file or directory)
    pub fn watch(path: &Path, patterns: &[&str]) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(DEBOUNCE_MS)),
        )?;

        let mut target = None;
        if path.is_dir() {
            watcher.watch(path, RecursiveMode::Recursive)?;
        } else {
            // Editors often replace files on save, so watch the directory
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
            target = Some(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));
        }
        tracing::debug!(path = %path.display(), "watching for content changes");

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            target,
        })
    }

    /// Whether a changed path is a content file we should re-score
    pub fn is_content_path(p: &Path, patterns: &[&str]) -> bool {
        if p
            .components()
            .any(|c| c.as_os_str() == "node_modules" || c.as_os_str() == ".git")
        {
            return false;
        }
        is_content_file(p, patterns)
    }

    fn is_target(&self, p: &Path) -> bool {
        match self.target {
            Some(ref target) => {
                p == target.as_path() || p.canonicalize().is_ok_and(|c| &c == target)
            }
            None => true,
        }
    }

    fn paths_from_event(&self, event: &notify::Event) -> Vec<PathBuf> {
        if !is_create_or_modify(&event.kind) {
            return vec![];
        }
        let patterns: Vec<&str> = self.patterns.iter().map(String::as_str).collect();
        event
            .paths
            .iter()
            .filter(|p| Self::is_content_path(p, &patterns) && self.is_target(p))
            .cloned()
            .collect()
    }

    /// Block until at least one content file changes, then drain events for
    /// DEBOUNCE_MS. Returns the changed paths sorted and deduplicated.
    pub fn next_changes(&self) -> Vec<PathBuf> {
        let mut all = BTreeSet::new();

        match self.receiver.recv_timeout(Duration::from_secs(3600)) {
            Ok(Ok(event)) => all.extend(self.paths_from_event(&event)),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "watch error");
                return vec![];
            }
            Err(_) => return vec![],
        }

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS));
        while let Ok(ev) = self.receiver.try_recv() {
            if let Ok(event) = ev {
                all.extend(self.paths_from_event(&event));
            }
        }

        all.into_iter().collect()
    }
}
