/// Directory watching for continuous organization.
///
/// This module keeps a directory organized while a process runs. A
/// filesystem subscription pushes create and modify events onto a channel;
/// a single dispatcher thread consumes the channel, filters out noise, and
/// hands each new file to the engine. Completed moves are forwarded to the
/// caller through a second channel.
use crate::organizer::{ActionRecord, FileOrganizer, OrganizeError};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Window within which repeat events for the same path are dropped.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Errors that can occur while watching a directory.
#[derive(Debug)]
pub enum WatchError {
    /// The filesystem subscription could not be established.
    SubscriptionFailed {
        path: PathBuf,
        source: notify::Error,
    },
    /// The dispatcher thread ended abnormally.
    DispatcherPanicked,
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubscriptionFailed { path, source } => {
                write!(f, "Failed to watch {}: {}", path.display(), source)
            }
            Self::DispatcherPanicked => {
                write!(f, "Watch dispatcher thread panicked")
            }
        }
    }
}

impl std::error::Error for WatchError {}

/// Result type for watch operations.
pub type WatchResult<T> = Result<T, WatchError>;

enum WatchMessage {
    Event(PathBuf),
    Shutdown,
}

/// A running watch over one directory tree.
///
/// Constructed directly into the watching state by [`DirectoryWatcher::start`]
/// and consumed by [`DirectoryWatcher::stop`], so a stopped watcher cannot be
/// reused; start a fresh one instead.
pub struct DirectoryWatcher {
    watcher: Option<RecommendedWatcher>,
    control: Sender<WatchMessage>,
    handle: Option<JoinHandle<()>>,
}

impl DirectoryWatcher {
    /// Starts watching `root` recursively, organizing files as they appear.
    ///
    /// Create and modify events feed the dispatcher; every completed move
    /// is sent through `records`. Events for directories, hidden names,
    /// and paths already inside a category folder are ignored, as are
    /// repeat events for one path within [`DEBOUNCE_WINDOW`]. A file that
    /// fails to organize is logged and the watch keeps going.
    pub fn start(
        organizer: Arc<FileOrganizer>,
        root: &Path,
        records: Sender<ActionRecord>,
    ) -> WatchResult<Self> {
        let (tx, rx) = channel();

        let event_tx = tx.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                        for path in event.paths {
                            let _ = event_tx.send(WatchMessage::Event(path));
                        }
                    }
                }
                Err(error) => warn!(%error, "watch backend error"),
            },
            Config::default(),
        )
        .map_err(|e| WatchError::SubscriptionFailed {
            path: root.to_path_buf(),
            source: e,
        })?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::SubscriptionFailed {
                path: root.to_path_buf(),
                source: e,
            })?;

        info!(root = %root.display(), "watching directory");

        let handle = std::thread::spawn(move || Self::dispatch(organizer, rx, records));

        Ok(Self {
            watcher: Some(watcher),
            control: tx,
            handle: Some(handle),
        })
    }

    /// Stops the watch and waits for in-flight events to finish.
    ///
    /// The subscription is torn down first, then a shutdown sentinel is
    /// queued behind any pending events, so everything delivered before
    /// the call is still dispatched. When this returns, no further records
    /// will be sent and the record channel's sender side is closed.
    pub fn stop(mut self) -> WatchResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> WatchResult<()> {
        // Drop the backend before queueing the sentinel so no event can
        // arrive behind it.
        drop(self.watcher.take());
        let _ = self.control.send(WatchMessage::Shutdown);

        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| WatchError::DispatcherPanicked)?;
        }
        Ok(())
    }

    fn dispatch(
        organizer: Arc<FileOrganizer>,
        events: Receiver<WatchMessage>,
        records: Sender<ActionRecord>,
    ) {
        let mut debouncer = EventDebouncer::new(DEBOUNCE_WINDOW);

        while let Ok(message) = events.recv() {
            let path = match message {
                WatchMessage::Event(path) => path,
                WatchMessage::Shutdown => break,
            };

            // The engine's own moves raise create events inside the
            // category folders; re-processing those would rename files
            // endlessly.
            if path.is_dir() || is_hidden(&path) || organizer.is_destination(&path) {
                continue;
            }
            if !debouncer.should_process(&path) {
                continue;
            }

            match organizer.process(&path) {
                Ok(record) => {
                    let _ = records.send(record);
                }
                Err(OrganizeError::NotAFile { path }) => {
                    debug!(path = %path.display(), "event path no longer a file");
                }
                Err(error) => warn!(%error, "failed to organize file"),
            }
        }
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.shutdown();
        }
    }
}

/// Suppresses repeat events for one path inside a fixed window.
///
/// Most platforms report a new file as a create followed by one or more
/// modifies while the writer finishes; only the first should reach the
/// engine.
#[derive(Debug)]
struct EventDebouncer {
    window: Duration,
    recent: Vec<(Instant, PathBuf)>,
}

impl EventDebouncer {
    fn new(window: Duration) -> Self {
        Self {
            window,
            recent: Vec::new(),
        }
    }

    fn should_process(&mut self, path: &Path) -> bool {
        let now = Instant::now();
        self.recent
            .retain(|(seen, _)| now.duration_since(*seen) < self.window);

        if self.recent.iter().any(|(_, seen_path)| seen_path.as_path() == path) {
            return false;
        }

        self.recent.push((now, path.to_path_buf()));
        true
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
