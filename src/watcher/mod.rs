pub mod event;

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as tokio_mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::config::WatchConfig;
use event::WatchEvent;

/// Handle to a running watcher. Keeps the OS watcher alive (dropping stops
/// watching and lets the bridge task wind down).
pub struct WatcherHandle {
    /// Keep alive: dropping the watcher stops OS event delivery.
    _watcher: RecommendedWatcher,
    /// The bridge task forwarding events from std channel to tokio channel.
    _bridge_task: JoinHandle<()>,
}

/// Start watching the configured folder.
///
/// Returns a `WatcherHandle` (must be kept alive) and a tokio mpsc receiver
/// that yields classified `WatchEvent`s.
///
/// Classification runs inside the bridge, so disabled event classes and
/// filtered paths never enter the channel: all notifications funnel through
/// one ordered queue drained by a single consumer that owns the tracker.
pub fn start_watcher(
    config: &WatchConfig,
) -> anyhow::Result<(WatcherHandle, tokio_mpsc::Receiver<WatchEvent>)> {
    let (std_tx, std_rx) = std::sync::mpsc::channel::<Result<Event, notify::Error>>();

    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = std_tx.send(res);
        },
        Config::default(),
    )?;

    let mode = if config.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    watcher.watch(&config.folder, mode)?;

    // Tokio channel for classified events
    let (tokio_tx, tokio_rx) = tokio_mpsc::channel::<WatchEvent>(256);

    // Bridge: spawn_blocking to receive from std channel, classify, forward to tokio
    let config = config.clone();
    let bridge_task = tokio::task::spawn_blocking(move || {
        while let Ok(result) = std_rx.recv() {
            match result {
                Ok(raw) => {
                    for watch_event in classify_event(raw, &config) {
                        if tokio_tx.blocking_send(watch_event).is_err() {
                            return; // receiver dropped, shutdown
                        }
                    }
                }
                Err(err) => {
                    if config.watch_errors
                        && tokio_tx.blocking_send(WatchEvent::Error(err)).is_err()
                    {
                        return;
                    }
                }
            }
        }
    });

    Ok((
        WatcherHandle {
            _watcher: watcher,
            _bridge_task: bridge_task,
        },
        tokio_rx,
    ))
}

/// Classify a raw notification into zero or more `WatchEvent`s.
///
/// Gating order:
/// 1. Event-class flags: a disabled class yields nothing, whatever the paths.
/// 2. Modification subtype: only content-data modifications become
///    `SizeChange`; metadata-only changes are dropped.
/// 3. File-name filter and exclusion patterns, identical to the initial scan.
///
/// A rename is reported only when the notification carries both full paths;
/// unpaired halves (the counterpart left or entered the watched tree) are
/// dropped rather than inventing a missing path.
pub fn classify_event(raw: Event, config: &WatchConfig) -> Vec<WatchEvent> {
    match raw.kind {
        EventKind::Modify(ModifyKind::Data(_)) if config.watch_changed => raw
            .paths
            .into_iter()
            .filter(|p| config.matches_path(p))
            .map(WatchEvent::SizeChange)
            .collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if config.watch_renamed => {
            let mut paths = raw.paths.into_iter();
            match (paths.next(), paths.next()) {
                (Some(from), Some(to))
                    if config.matches_path(&from) || config.matches_path(&to) =>
                {
                    vec![WatchEvent::Renamed { from, to }]
                }
                _ => Vec::new(),
            }
        }
        EventKind::Create(_) if config.watch_created => raw
            .paths
            .into_iter()
            .filter(|p| config.matches_path(p))
            .map(WatchEvent::Created)
            .collect(),
        EventKind::Remove(_) if config.watch_deleted => raw
            .paths
            .into_iter()
            .filter(|p| config.matches_path(p))
            .map(WatchEvent::Deleted)
            .collect(),
        kind => {
            trace!(?kind, "dropping unclassified or disabled notification");
            Vec::new()
        }
    }
}
