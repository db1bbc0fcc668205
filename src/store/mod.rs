//! Source Buffer Store - the single source of truth for what gets previewed.
//!
//! Holds the three source buffers, the resource list and the render theme.
//! Writers (file watcher, config reload) mutate it; the render scheduler
//! watches its revision and snapshots it when committing.
//!
//! ```text
//! FsActor / config reload --set_*--> Store --revision--> RenderScheduler
//! ```

mod buffers;
mod resources;
mod theme;

pub use buffers::{BufferKind, SourceBuffers};
pub use resources::{PRESETS, Preset, ResourceError, ResourceKind, ResourceList, preset};
pub use theme::RenderTheme;

use std::fs;
use std::io;
use std::path::Path;

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::config::PlaygroundConfig;

/// Immutable copy of the store taken at one revision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub buffers: SourceBuffers,
    pub resources: ResourceList,
    pub theme: RenderTheme,
    pub revision: u64,
}

#[derive(Debug, Default)]
struct State {
    buffers: SourceBuffers,
    resources: ResourceList,
    theme: RenderTheme,
    revision: u64,
}

/// Shared, change-notifying store.
pub struct Store {
    state: RwLock<State>,
    revision_tx: watch::Sender<u64>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(SourceBuffers::default(), ResourceList::default(), RenderTheme::default())
    }
}

impl Store {
    pub fn new(buffers: SourceBuffers, resources: ResourceList, theme: RenderTheme) -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            state: RwLock::new(State {
                buffers,
                resources,
                theme,
                revision: 0,
            }),
            revision_tx,
        }
    }

    /// Build a store from the playground files and config.
    ///
    /// A missing source file yields an empty buffer.
    pub fn from_config(config: &PlaygroundConfig) -> io::Result<Self> {
        let mut buffers = SourceBuffers::default();
        for kind in BufferKind::ALL {
            buffers.set(kind, read_source(&config.source_path(kind))?);
        }
        Ok(Self::new(
            buffers,
            config.resources.list.clone(),
            config.preview.theme,
        ))
    }

    /// Subscribe to revision changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        Snapshot {
            buffers: state.buffers.clone(),
            resources: state.resources.clone(),
            theme: state.theme,
            revision: state.revision,
        }
    }

    /// Replace one buffer. Returns `false` (and does not notify) if unchanged.
    pub fn set_buffer(&self, kind: BufferKind, text: impl Into<String>) -> bool {
        self.update(|state| state.buffers.set(kind, text.into()))
    }

    /// Re-read one buffer from disk.
    pub fn reload_buffer(&self, kind: BufferKind, path: &Path) -> io::Result<bool> {
        let text = read_source(path)?;
        Ok(self.set_buffer(kind, text))
    }

    pub fn set_resources(&self, resources: ResourceList) -> bool {
        self.update(|state| {
            if state.resources == resources {
                return false;
            }
            state.resources = resources;
            true
        })
    }

    pub fn add_resource(&self, url: impl Into<String>) -> Result<(), ResourceError> {
        let mut result = Ok(());
        self.update(|state| {
            result = state.resources.add(url);
            result.is_ok()
        });
        result
    }

    pub fn remove_resource(&self, url: &str) -> Result<(), ResourceError> {
        let mut result = Ok(());
        self.update(|state| {
            result = state.resources.remove(url);
            result.is_ok()
        });
        result
    }

    pub fn set_theme(&self, theme: RenderTheme) -> bool {
        self.update(|state| {
            if state.theme == theme {
                return false;
            }
            state.theme = theme;
            true
        })
    }

    /// Apply a mutation; bump the revision and notify only if it changed something.
    fn update(&self, f: impl FnOnce(&mut State) -> bool) -> bool {
        let revision = {
            let mut state = self.state.write();
            if !f(&mut state) {
                return false;
            }
            state.revision += 1;
            state.revision
        };
        self.revision_tx.send_replace(revision);
        true
    }
}

/// Read a source file, treating a missing file as an empty buffer.
fn read_source(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e),
    }
}
