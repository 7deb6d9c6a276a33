use std::path::PathBuf;

use clap::Parser;

/// A folder watching diagnostic for observing how file sizes evolve.
///
/// size-watch scans the folder up front, then follows live change
/// notifications and keeps a running per-file maximum size until you press
/// Enter (or Ctrl-C). Useful for watching a build or download grow.
#[derive(Parser, Debug)]
#[command(
    name = "size-watch",
    version,
    about,
    long_about = None,
)]
pub struct Cli {
    /// Folder to watch.
    pub folder: PathBuf,

    /// Glob pattern applied to file names (e.g. "*.log").
    #[arg(short, long, default_value = "*.*")]
    pub filter: String,

    /// Do not track content-change events.
    #[arg(long = "no-changed")]
    pub no_changed: bool,

    /// Log file creation events.
    #[arg(long)]
    pub created: bool,

    /// Log file deletion events.
    #[arg(long)]
    pub deleted: bool,

    /// Log file rename events.
    #[arg(long)]
    pub renamed: bool,

    /// Recurse into subdirectories.
    #[arg(short, long)]
    pub recursive: bool,

    /// Emit the final report as JSON instead of human-readable text.
    #[arg(long)]
    pub json: bool,
}
