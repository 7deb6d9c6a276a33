use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

/// Outcome of a single size observation that warrants a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First time this path has been observed; the size is the new baseline.
    First(u64),
    /// The path grew past its previous maximum.
    Grew { from: u64, to: u64 },
}

/// Per-run map from file path to the largest byte size observed.
///
/// Values are monotonically non-decreasing: a later smaller observation never
/// overwrites a larger prior one. The map starts empty; a path is recorded on
/// its first observed content change, not at watch start.
///
/// The check-then-update in [`observe`](Self::observe) runs under one lock
/// acquisition, so concurrent observations for the same path cannot race into
/// an inconsistent first/grew classification, and observations for different
/// paths cannot corrupt the map.
#[derive(Debug, Default)]
pub struct SizeTracker {
    max_seen: Mutex<BTreeMap<PathBuf, u64>>,
}

impl SizeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a size observation for `path`.
    ///
    /// Returns `Some` when the observation changed the map (and a log line
    /// should be emitted), `None` when the size did not exceed the stored
    /// maximum.
    pub fn observe(&self, path: &Path, size: u64) -> Option<Observation> {
        // A poisoned lock still holds structurally valid size data.
        let mut max_seen = self.max_seen.lock().unwrap_or_else(|e| e.into_inner());
        match max_seen.entry(path.to_path_buf()) {
            Entry::Vacant(entry) => {
                entry.insert(size);
                Some(Observation::First(size))
            }
            Entry::Occupied(mut entry) => {
                let prev = *entry.get();
                if size > prev {
                    entry.insert(size);
                    Some(Observation::Grew {
                        from: prev,
                        to: size,
                    })
                } else {
                    None
                }
            }
        }
    }

    /// Query the current on-disk size of `path` and record it.
    ///
    /// A path that no longer exists, or no longer refers to a regular file,
    /// at the moment of the check is silently skipped: no map mutation, no
    /// output. Rapid create+delete sequences routinely hit this window.
    pub fn observe_current(&self, path: &Path) -> Option<Observation> {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(err) => {
                debug!(path = %path.display(), %err, "file vanished before size check, skipping");
                return None;
            }
        };
        if !metadata.is_file() {
            return None;
        }
        self.observe(path, metadata.len())
    }

    /// Consume the tracker and return the final path → max-size map.
    ///
    /// Taking `self` by value means the snapshot is only reachable once the
    /// watch session has released the tracker.
    pub fn into_report(self) -> BTreeMap<PathBuf, u64> {
        self.max_seen.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}
