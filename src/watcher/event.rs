use std::path::PathBuf;

/// Classified watch event, after per-class gating and path filtering.
#[derive(Debug)]
pub enum WatchEvent {
    /// A file's content was modified; its current size should be tracked.
    SizeChange(PathBuf),
    /// A file was created.
    Created(PathBuf),
    /// A file was deleted.
    Deleted(PathBuf),
    /// A file was renamed from one full path to another.
    Renamed { from: PathBuf, to: PathBuf },
    /// The notification source reported an error.
    Error(notify::Error),
}
