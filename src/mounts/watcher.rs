//! Recursive folder watcher.

use std::fmt;
use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::broadcast;

const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Created,
    Modified,
    Removed,
    Other,
}

/// A change below the watched folder.
#[derive(Debug, Clone)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub paths: Vec<PathBuf>,
}

impl From<Event> for WatchEvent {
    fn from(event: Event) -> Self {
        let kind = if event.kind.is_create() {
            WatchEventKind::Created
        } else if event.kind.is_modify() {
            WatchEventKind::Modified
        } else if event.kind.is_remove() {
            WatchEventKind::Removed
        } else {
            WatchEventKind::Other
        };
        Self {
            kind,
            paths: event.paths,
        }
    }
}

/// Watches a folder and fans events out to subscribers.
///
/// Dropping the watcher stops notifications.
pub struct FolderWatcher {
    path: PathBuf,
    events: broadcast::Sender<WatchEvent>,
    _watcher: RecommendedWatcher,
}

impl FolderWatcher {
    /// Start watching `path` recursively on notify's background thread.
    pub fn start(path: &Path) -> Result<Self, notify::Error> {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let tx = events.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    // No subscribers yet is fine.
                    let _ = tx.send(WatchEvent::from(event));
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default(),
        )?;
        watcher.watch(path, RecursiveMode::Recursive)?;

        tracing::info!(path = ?path, "Folder watcher started");
        Ok(Self {
            path: path.to_path_buf(),
            events,
            _watcher: watcher,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WatchEvent> {
        self.events.subscribe()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for FolderWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolderWatcher")
            .field("path", &self.path)
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}
