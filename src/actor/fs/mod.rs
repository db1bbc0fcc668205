//! FileSystem Actor
//!
//! Watches the playground files and feeds edits into the [`Store`].
//! The watcher is created before the initial render so no edit made in
//! between is lost.
//!
//! ```text
//! Watcher → Debouncer (settle bursts) → Classifier (buffer / config) → Store
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::{PlaygroundConfig, cfg, reload_config};
use crate::scheduler::SchedulerMsg;
use crate::store::{BufferKind, Store};

// Map settled paths to buffers and the config file.
mod classifier;
// Pure timing and deduplication.
mod debouncer;

use classifier::{FsChanges, classify};
use debouncer::Debouncer;

/// Directories holding the source files and the config file.
///
/// Watched non-recursively: editors that save by rename replace the file,
/// so watching the file itself would lose track of it.
pub fn watch_paths(config: &PlaygroundConfig) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    let files = BufferKind::ALL
        .into_iter()
        .map(|kind| config.source_path(kind))
        .chain(std::iter::once(config.config_path.clone()));

    for file in files {
        let Some(dir) = file.parent() else { continue };
        let dir = crate::utils::path::normalize_path(dir);
        if dir.is_dir() && !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    dirs
}

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    store: Arc<Store>,
    /// Config reloads may change the scheduler's quiet period
    control: mpsc::Sender<SchedulerMsg>,
    debouncer: Debouncer,
}

impl FsActor {
    pub fn new(paths: &[PathBuf], store: Arc<Store>, control: mpsc::Sender<SchedulerMsg>) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        for path in paths {
            watcher.watch(path, RecursiveMode::NonRecursive)?;
            crate::debug!("watch"; "{}", path.display());
        }

        Ok(Self {
            notify_rx,
            watcher,
            store,
            control,
            debouncer: Debouncer::new(),
        })
    }

    /// Run the actor event loop until the scheduler goes away.
    pub async fn run(self) {
        let Self {
            notify_rx,
            watcher,
            store,
            control,
            mut debouncer,
        } = self;
        // Dropping the watcher would close the notify channel
        let _watcher = watcher;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                event = async_rx.recv() => match event {
                    Some(event) => debouncer.add_event(&event),
                    None => break,
                },
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    // Hold events until the initial render is out
                    if !crate::core::is_serving() {
                        continue;
                    }
                    let Some(raw) = debouncer.take_if_ready() else { continue };
                    let changes = classify(raw, &cfg());
                    if changes.is_empty() {
                        continue;
                    }
                    if process_changes(changes, &store, &control).await.is_err() {
                        break;
                    }
                }
            }
        }
        crate::debug!("watch"; "stopped");
    }
}

/// Apply settled changes. Returns `Err(())` once the scheduler is gone.
async fn process_changes(
    changes: FsChanges,
    store: &Store,
    control: &mpsc::Sender<SchedulerMsg>,
) -> Result<(), ()> {
    if changes.config {
        let previous = cfg();
        match reload_config() {
            Ok(true) => {
                crate::log!("config"; "reloaded");
                if let Some(msg) = apply_config(store, &previous, &cfg()) {
                    control.send(msg).await.map_err(|_| ())?;
                }
            }
            Ok(false) => {}
            Err(e) => crate::logger::status_error("config error", &format!("{e:#}")),
        }
    }

    reload_buffers(store, &cfg(), changes.buffers);
    Ok(())
}

/// Re-read buffers from disk. A file that cannot be read keeps its old text.
fn reload_buffers(store: &Store, config: &PlaygroundConfig, kinds: impl IntoIterator<Item = BufferKind>) {
    for kind in kinds {
        let path = config.source_path(kind);
        if let Err(e) = store.reload_buffer(kind, &path) {
            crate::logger::status_warning(&format!("failed to read {}: {}", config.root_relative(&path).display(), e));
        }
    }
}

/// Carry a reloaded config into the store.
///
/// Resources and theme always follow the file. Moved source paths re-read
/// every buffer. A new `debounce_ms` comes back as a scheduler message.
fn apply_config(store: &Store, previous: &PlaygroundConfig, current: &PlaygroundConfig) -> Option<SchedulerMsg> {
    store.set_resources(current.resources.list.clone());
    store.set_theme(current.preview.theme);

    if previous.sources != current.sources {
        reload_buffers(store, current, BufferKind::ALL);
    }

    let delay = current.preview.debounce();
    (previous.preview.debounce() != delay).then_some(SchedulerMsg::SetDebounce(delay))
}
