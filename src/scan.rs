use std::path::PathBuf;

use crate::config::WatchConfig;

/// Enumerate files under the configured folder and record their current
/// sizes, before live watching settles.
///
/// Applies the same file-name filter and exclusion rules as live
/// classification, recursing only when configured. The result feeds the
/// "Initial File Sizes" report and is never merged into the size tracker.
///
/// Entries are sorted by path for stable output.
pub fn scan_initial_sizes(config: &WatchConfig) -> anyhow::Result<Vec<(PathBuf, u64)>> {
    let mut files = Vec::new();

    let walker = ignore::WalkBuilder::new(&config.folder)
        // A diagnostic watcher must see every file, including hidden and
        // gitignored ones; the only rules are the user's filter and excludes.
        .standard_filters(false)
        .max_depth(if config.recursive { None } else { Some(1) })
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                eprintln!("warning: {err}");
                continue;
            }
        };

        let path = entry.path();

        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        if !config.matches_path(path) {
            continue;
        }

        // A file listed by the walk can vanish before the size query.
        let size = match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata.len(),
            _ => continue,
        };

        files.push((path.to_path_buf(), size));
    }

    files.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(files)
}
