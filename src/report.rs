use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Byte size broken down by successive integer division by 1024.
///
/// Each unit is derived from the previous one, so the kB/MB/GB figures are
/// floor-truncated relative to each other: 1500 bytes renders as
/// "1500 B, 1 kB, 0 MB, 0 GB".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeBreakdown {
    pub bytes: u64,
    pub kilobytes: u64,
    pub megabytes: u64,
    pub gigabytes: u64,
}

impl From<u64> for SizeBreakdown {
    fn from(bytes: u64) -> Self {
        let kilobytes = bytes / 1024;
        let megabytes = kilobytes / 1024;
        let gigabytes = megabytes / 1024;
        Self {
            bytes,
            kilobytes,
            megabytes,
            gigabytes,
        }
    }
}

impl fmt::Display for SizeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} B, {} kB, {} MB, {} GB",
            self.bytes, self.kilobytes, self.megabytes, self.gigabytes
        )
    }
}

/// One entry of the JSON final report.
#[derive(Debug, Serialize)]
struct ReportEntry<'a> {
    path: &'a Path,
    #[serde(flatten)]
    size: SizeBreakdown,
}

/// Local wall-clock timestamp for event log lines.
pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// "New size" log line: first observation of a path.
pub fn new_size_line(path: &Path, size: u64) -> String {
    format!(
        "[{}] New size: {} ({})",
        timestamp(),
        path.display(),
        SizeBreakdown::from(size)
    )
}

/// "Size changed" log line: a path grew past its previous maximum.
pub fn size_changed_line(path: &Path, size: u64) -> String {
    format!(
        "[{}] Size changed: {} ({})",
        timestamp(),
        path.display(),
        SizeBreakdown::from(size)
    )
}

pub fn created_line(path: &Path) -> String {
    format!("[{}] Created: {}", timestamp(), path.display())
}

pub fn deleted_line(path: &Path) -> String {
    format!("[{}] Deleted: {}", timestamp(), path.display())
}

/// Rename log message: old and new full paths on separate lines.
pub fn renamed_lines(from: &Path, to: &Path) -> String {
    format!(
        "[{}] Renamed: {}\n  -> {}",
        timestamp(),
        from.display(),
        to.display()
    )
}

/// Error log message: the message plus every nested cause, walking the
/// `source()` chain until no further cause exists.
pub fn error_lines(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = format!("[{}] Error: {}", timestamp(), err);
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    out
}

/// Print the "Initial File Sizes" report produced by the pre-watch scan.
pub fn print_initial_report(files: &[(PathBuf, u64)]) {
    println!("Initial File Sizes");
    if files.is_empty() {
        println!("No files.");
        return;
    }
    for (path, size) in files {
        println!("  {}: {}", path.display(), SizeBreakdown::from(*size));
    }
}

/// Print the final maximum-size report.
///
/// - `json = false`: human-readable listing, or exactly "No changes." when
///   nothing was recorded.
/// - `json = true`: a JSON array of per-path breakdowns (empty array when
///   nothing was recorded), keeping stdout machine-consumable.
pub fn print_final_report(max_sizes: &BTreeMap<PathBuf, u64>, json: bool) {
    if json {
        let entries: Vec<ReportEntry<'_>> = max_sizes
            .iter()
            .map(|(path, size)| ReportEntry {
                path,
                size: SizeBreakdown::from(*size),
            })
            .collect();
        match serde_json::to_string_pretty(&entries) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("error serialising report: {}", e),
        }
        return;
    }

    println!("Maximum File Sizes");
    if max_sizes.is_empty() {
        println!("No changes.");
        return;
    }
    for (path, size) in max_sizes {
        println!("  {}: {}", path.display(), SizeBreakdown::from(*size));
    }
}
