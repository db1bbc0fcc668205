//! Debounced Render Scheduler.
//!
//! Turns a stream of buffer edits into a small number of renders. Every store
//! change restarts the quiet period; when it elapses (auto-refresh) or when a
//! render is requested (manual), the scheduler snapshots the store, composes
//! the document and hands it to the preview host.
//!
//! ```text
//! Store --revision--> RenderScheduler --set_content--> PreviewHost
//!                          ^
//!   host page toolbar -----+ (SchedulerMsg)
//! ```

mod state;

pub use state::Debounce;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};

use crate::compose::compose_snapshot;
use crate::host::{Generation, PreviewHost};
use crate::store::Store;

/// Control messages for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerMsg {
    /// Render the current buffers immediately.
    RenderNow,
    /// Switch between auto-refresh and manual mode.
    SetAutoRefresh(bool),
    /// New quiet period, applied from the next change on.
    SetDebounce(Duration),
    Shutdown,
}

/// Scheduler actor. Owns the debounce state and the timer.
pub struct RenderScheduler<H: PreviewHost + ?Sized> {
    store: Arc<Store>,
    host: Arc<H>,
    debounce: Debounce,
    changes: watch::Receiver<u64>,
    rx: mpsc::Receiver<SchedulerMsg>,
}

impl<H: PreviewHost + ?Sized> RenderScheduler<H> {
    pub fn new(
        store: Arc<Store>,
        host: Arc<H>,
        delay: Duration,
        auto_refresh: bool,
        rx: mpsc::Receiver<SchedulerMsg>,
    ) -> Self {
        let changes = store.subscribe();
        Self {
            store,
            host,
            debounce: Debounce::new(delay, auto_refresh),
            changes,
            rx,
        }
    }

    /// Render once right away, then follow store changes.
    pub async fn run_with_initial_render(mut self) {
        self.debounce.render_now();
        self.commit();
        self.run().await;
    }

    /// Run the actor event loop until shutdown or until every sender is gone.
    pub async fn run(mut self) {
        loop {
            let deadline = self.debounce.next_deadline();
            tokio::select! {
                changed = self.changes.changed() => {
                    if changed.is_err() {
                        crate::debug!("render"; "store dropped, stopping");
                        break;
                    }
                    self.changes.borrow_and_update();
                    self.debounce.touch(Instant::now());
                }
                msg = self.rx.recv() => match msg {
                    Some(SchedulerMsg::RenderNow) => {
                        if self.debounce.render_now() {
                            self.commit();
                        }
                    }
                    Some(SchedulerMsg::SetAutoRefresh(enabled)) => {
                        crate::debug!("render"; "auto-refresh {}", if enabled { "on" } else { "off" });
                        if self.debounce.set_auto_refresh(enabled) {
                            self.commit();
                        }
                    }
                    Some(SchedulerMsg::SetDebounce(delay)) => {
                        crate::debug!("render"; "debounce {}ms", delay.as_millis());
                        self.debounce.set_delay(delay);
                    }
                    Some(SchedulerMsg::Shutdown) | None => break,
                },
                // The sleep future is built even when disabled, hence the fallback instant.
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if self.debounce.poll(Instant::now()) {
                        self.commit();
                    }
                }
            }
        }
    }

    /// Snapshot, compose, hand over.
    fn commit(&mut self) -> Generation {
        let snapshot = self.store.snapshot();
        let doc = compose_snapshot(&snapshot);
        let fingerprint = doc.fingerprint();
        let size = doc.len();
        let generation = self.host.set_content(doc);
        crate::debug!(
            "render";
            "{} revision {} -> {} ({} bytes)",
            generation, snapshot.revision, fingerprint, size
        );
        crate::logger::status_success(&format!("rendered {generation} ({fingerprint})"));
        generation
    }
}
