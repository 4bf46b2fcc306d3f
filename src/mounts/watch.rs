//! Watch mount.
//!
//! # Responsibilities
//! - Check the watch folder exists
//! - Resolve the configured reporter by name
//! - Start the watcher and hand it to the reporter

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::app::App;
use crate::config::ActerConfig;
use crate::mounts::watcher::FolderWatcher;

/// Everything a reporter gets.
pub struct WatchContext {
    pub app: App,
    pub watcher: FolderWatcher,
    pub config: Arc<ActerConfig>,
}

/// Receives the watcher once the watch mount starts.
pub trait WatchReporter: Send + Sync {
    fn attach(&self, ctx: WatchContext);
}

impl<F> WatchReporter for F
where
    F: Fn(WatchContext) + Send + Sync,
{
    fn attach(&self, ctx: WatchContext) {
        self(ctx)
    }
}

/// Reporters available to `server.watch.report`, by name.
#[derive(Clone, Default)]
pub struct ReporterRegistry {
    reporters: HashMap<String, Arc<dyn WatchReporter>>,
}

impl ReporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: impl Into<String>, reporter: impl WatchReporter + 'static) -> Self {
        self.reporters.insert(name.into(), Arc::new(reporter));
        self
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn WatchReporter>> {
        self.reporters.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.reporters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ReporterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// What the watch mount did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    Started { folder: PathBuf, report: String },
    MissingFolder(PathBuf),
    UnresolvedReport(String),
    WatcherFailed(String),
}

/// Run the watch mount. Never fails the boot.
pub fn mount_watch(app: &App, config: &Arc<ActerConfig>, reporters: &ReporterRegistry) -> WatchOutcome {
    let watch = &config.server.watch;
    let folder = config.server.resolve(&watch.folder);

    if !folder.is_dir() {
        tracing::error!(
            "Can't find watch folder: \"{}\". Please create it or change config.",
            folder.display()
        );
        return WatchOutcome::MissingFolder(folder);
    }

    let Some(reporter) = reporters.resolve(&watch.report) else {
        tracing::error!(
            available = ?reporters.names(),
            "Watch reporter `{}` is not registered. Register it before boot or change watch.report.",
            watch.report
        );
        return WatchOutcome::UnresolvedReport(watch.report.clone());
    };

    let watcher = match FolderWatcher::start(&folder) {
        Ok(watcher) => watcher,
        Err(e) => {
            tracing::error!(folder = %folder.display(), error = %e, "Failed to start folder watcher");
            return WatchOutcome::WatcherFailed(e.to_string());
        }
    };

    tracing::info!(
        "Watching {} for changes and telling {}.",
        folder.display(),
        watch.report
    );
    reporter.attach(WatchContext {
        app: app.clone(),
        watcher,
        config: config.clone(),
    });

    WatchOutcome::Started {
        folder,
        report: watch.report.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn config(root: &std::path::Path, folder: &str, report: &str) -> Arc<ActerConfig> {
        let mut config = ActerConfig::default();
        config.server.root = Some(root.to_path_buf());
        config.server.watch.active = true;
        config.server.watch.folder = folder.into();
        config.server.watch.report = report.into();
        Arc::new(config)
    }

    #[test]
    fn test_missing_folder_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = mount_watch(&App::new(), &config(dir.path(), "nope", "r"), &ReporterRegistry::new());
        assert_eq!(outcome, WatchOutcome::MissingFolder(dir.path().join("nope")));
    }

    #[test]
    fn test_unregistered_reporter_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        let reporters = ReporterRegistry::new().register("other", |_ctx: WatchContext| {});

        let outcome = mount_watch(&App::new(), &config(dir.path(), "data", "r"), &reporters);
        assert_eq!(outcome, WatchOutcome::UnresolvedReport("r".into()));
    }

    #[test]
    fn test_reporter_receives_watcher() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();

        let received: Arc<Mutex<Option<PathBuf>>> = Arc::default();
        let sink = received.clone();
        let reporters = ReporterRegistry::new().register("r", move |ctx: WatchContext| {
            *sink.lock().unwrap() = Some(ctx.watcher.path().to_path_buf());
        });

        let outcome = mount_watch(&App::new(), &config(dir.path(), "data", "r"), &reporters);
        assert!(matches!(outcome, WatchOutcome::Started { .. }));
        assert_eq!(*received.lock().unwrap(), Some(dir.path().join("data")));
    }
}
