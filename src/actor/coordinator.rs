//! Actor Coordinator - wires up the live preview actors.
//!
//! The HTTP side builds the store, host and console log because it serves
//! them too; the coordinator only runs the actors on top of them.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::fs::{FsActor, watch_paths};
use crate::config::PlaygroundConfig;
use crate::host::{PreviewHost, WsHost};
use crate::observer::{ConsoleLog, run_observer};
use crate::scheduler::{RenderScheduler, SchedulerMsg};
use crate::store::Store;

/// Capacity of the scheduler's control channel.
pub const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<PlaygroundConfig>,
    store: Arc<Store>,
    host: Arc<WsHost>,
    log: Arc<Mutex<ConsoleLog>>,
    control: (mpsc::Sender<SchedulerMsg>, mpsc::Receiver<SchedulerMsg>),
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// `control` must be the channel whose sender the host was created with.
    pub fn new(
        config: Arc<PlaygroundConfig>,
        store: Arc<Store>,
        host: Arc<WsHost>,
        log: Arc<Mutex<ConsoleLog>>,
        control: (mpsc::Sender<SchedulerMsg>, mpsc::Receiver<SchedulerMsg>),
    ) -> Self {
        Self {
            config,
            store,
            host,
            log,
            control,
            shutdown_rx: None,
        }
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system until shutdown.
    pub async fn run(self) -> Result<()> {
        let Self {
            config,
            store,
            host,
            log,
            control: (control_tx, control_rx),
            shutdown_rx,
        } = self;

        // Watcher first: edits made during the initial render are buffered
        let fs_actor = if config.serve.watch {
            let paths = watch_paths(&config);
            let actor = FsActor::new(&paths, Arc::clone(&store), control_tx.clone())
                .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
            Some(actor)
        } else {
            None
        };

        // Subscribed before the first render so its events are not missed
        let subscription = host.subscribe();
        let observer_handle = tokio::spawn(run_observer(subscription, log, config.preview.console));

        let scheduler = RenderScheduler::new(
            Arc::clone(&store),
            Arc::clone(&host),
            config.preview.debounce(),
            config.preview.auto_refresh,
            control_rx,
        );
        let scheduler_handle = tokio::spawn(scheduler.run_with_initial_render());
        let fs_handle = fs_actor.map(|actor| tokio::spawn(actor.run()));

        crate::core::set_serving();
        crate::debug!("actor"; "start");

        match shutdown_rx {
            Some(rx) => loop {
                if rx.try_recv().is_ok() {
                    crate::debug!("actor"; "shutdown signal received");
                    break;
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            },
            None => {
                let _ = scheduler_handle.await;
                host.shutdown();
                return Ok(());
            }
        }

        let _ = control_tx.send(SchedulerMsg::Shutdown).await;
        let _ = tokio::time::timeout(Duration::from_millis(500), scheduler_handle).await;
        host.shutdown();
        observer_handle.abort();
        if let Some(handle) = fs_handle {
            handle.abort();
        }

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
