//! Event observer: the consumer side of the preview event stream.
//!
//! Keeps the console history and the runtime errors of the document that is
//! currently executing, and echoes them to the terminal while serving.
//!
//! - new content clears runtime errors, console history is kept
//! - reload clears both
//! - events stamped with an older generation are stale and dropped

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::bridge::event::{ConsoleEvent, PreviewEvent, RuntimeErrorEvent};
use crate::host::{Generation, HostEvent, Subscription};

/// Outcome of observing one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observed {
    Accepted,
    /// Reported by a document that has since been replaced.
    Stale,
}

/// Console history and runtime errors of the running document.
#[derive(Debug)]
pub struct ConsoleLog {
    generation: Generation,
    console: VecDeque<ConsoleEvent>,
    errors: Vec<RuntimeErrorEvent>,
    limit: usize,
}

impl ConsoleLog {
    pub fn new(limit: usize) -> Self {
        Self {
            generation: Generation::NONE,
            console: VecDeque::new(),
            errors: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn observe(&mut self, event: &HostEvent) -> Observed {
        if event.generation() < self.generation {
            return Observed::Stale;
        }

        match event {
            HostEvent::Executed { generation, reload } => {
                self.generation = *generation;
                self.errors.clear();
                if *reload {
                    self.console.clear();
                }
            }
            HostEvent::Preview { event, .. } => match event {
                PreviewEvent::Console(console) => {
                    if self.console.len() == self.limit {
                        self.console.pop_front();
                    }
                    self.console.push_back(console.clone());
                }
                PreviewEvent::RuntimeError(error) => self.errors.push(error.clone()),
            },
        }
        Observed::Accepted
    }

    /// Generation of the document whose events are being kept.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Console entries, oldest first.
    pub fn console(&self) -> impl Iterator<Item = &ConsoleEvent> {
        self.console.iter()
    }

    pub fn console_len(&self) -> usize {
        self.console.len()
    }

    /// Runtime errors of the current document, in the order reported.
    pub fn errors(&self) -> &[RuntimeErrorEvent] {
        &self.errors
    }

    /// Banner text for the most recent runtime error.
    pub fn latest_error(&self) -> Option<String> {
        self.errors.last().map(ToString::to_string)
    }
}

/// Follow a host's events until it goes away.
///
/// Accepted console events and runtime errors are echoed through the logger
/// when `echo` is set.
pub async fn run_observer(mut subscription: Subscription, log: Arc<Mutex<ConsoleLog>>, echo: bool) {
    while let Some(event) = subscription.recv().await {
        let observed = log.lock().observe(&event);
        if observed == Observed::Stale {
            crate::debug!("host"; "dropped stale event from {}", event.generation());
            continue;
        }

        match &event {
            HostEvent::Executed { generation, reload } => {
                crate::debug!("host"; "{} {}", if *reload { "reloaded" } else { "executing" }, generation);
            }
            HostEvent::Preview { event, .. } if echo => match event {
                PreviewEvent::Console(console) => crate::logger::console(console),
                PreviewEvent::RuntimeError(error) => crate::logger::runtime_error(error),
            },
            HostEvent::Preview { .. } => {}
        }
    }
    crate::debug!("host"; "event stream closed");
}
