use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::sync::oneshot;
use tracing::info;

use crate::config::WatchConfig;
use crate::report;
use crate::scan;
use crate::tracker::{Observation, SizeTracker};
use crate::watcher;
use crate::watcher::event::WatchEvent;

/// Drive one watch session through its whole lifecycle.
///
/// Scans and prints initial sizes (always, whatever the event-class flags),
/// then drains classified events until `shutdown` fires, then prints the
/// final maximum-size report. The report map is also returned for callers
/// that want it programmatically.
///
/// The session task is the single consumer of the event channel and the sole
/// owner of the tracker. On shutdown the watcher handle is dropped first, so
/// OS delivery stops and the final map is read only after watching is
/// disabled.
pub async fn run(
    config: WatchConfig,
    mut shutdown: oneshot::Receiver<()>,
) -> anyhow::Result<BTreeMap<PathBuf, u64>> {
    let initial = scan::scan_initial_sizes(&config)?;
    report::print_initial_report(&initial);

    let tracker = SizeTracker::new();
    let (handle, mut events) = watcher::start_watcher(&config)?;
    info!(folder = %config.folder.display(), filter = config.filter.as_str(), "watching");

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            maybe_event = events.recv() => match maybe_event {
                Some(event) => handle_event(&tracker, event),
                // Notification source went away; nothing more will arrive.
                None => break,
            },
        }
    }

    drop(handle);
    drop(events);

    let max_sizes = tracker.into_report();
    report::print_final_report(&max_sizes, config.json);
    Ok(max_sizes)
}

/// Dispatch one classified event: size changes feed the tracker, everything
/// else is a logging pass-through.
fn handle_event(tracker: &SizeTracker, event: WatchEvent) {
    match event {
        WatchEvent::SizeChange(path) => match tracker.observe_current(&path) {
            Some(Observation::First(size)) => println!("{}", report::new_size_line(&path, size)),
            Some(Observation::Grew { to, .. }) => {
                println!("{}", report::size_changed_line(&path, to))
            }
            // Vanished before the size query, or not a growth: stay silent.
            None => {}
        },
        WatchEvent::Created(path) => println!("{}", report::created_line(&path)),
        WatchEvent::Deleted(path) => println!("{}", report::deleted_line(&path)),
        WatchEvent::Renamed { from, to } => println!("{}", report::renamed_lines(&from, &to)),
        WatchEvent::Error(err) => println!("{}", report::error_lines(&err)),
    }
}
