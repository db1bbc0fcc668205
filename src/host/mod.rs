//! Isolated Preview Host.
//!
//! Executes composed documents in an isolated browsing context and streams
//! back what the document reports. The contract is [`PreviewHost`]; the
//! concrete host is [`WsHost`], which drives browser host pages over
//! WebSocket. Each page owns one sandboxed iframe (scripts allowed, no
//! same-origin access) and assigns the document to it wholesale.
//!
//! ```text
//! RenderScheduler --set_content--> WsHost --content--> host page --srcdoc--> iframe
//!                                    |                     ^                   |
//!   ConsoleLog <--HostEvent--  EventBus <--console/error---+----postMessage----+
//! ```

mod message;
mod server;
mod ws;

pub use server::start_ws_server;
pub use ws::WsHost;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::bridge::event::PreviewEvent;
use crate::compose::ComposedDocument;

/// Events buffered per subscriber before it starts lagging.
pub const EVENT_CAPACITY: usize = 1024;

/// Runs composed documents and publishes what they report.
pub trait PreviewHost: Send + Sync {
    /// Replace the running document. Starts a new generation.
    fn set_content(&self, doc: ComposedDocument) -> Generation;

    /// Re-execute the current document from scratch. Starts a new generation.
    fn reload(&self) -> Generation;

    /// Receive execution and preview events from now on.
    fn subscribe(&self) -> Subscription;
}

/// Execution id. Increases with every `set_content` and `reload`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    /// Nothing executed yet.
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What subscribers of a host receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The host started executing a document.
    Executed { generation: Generation, reload: bool },
    /// The running document reported something.
    Preview { generation: Generation, event: PreviewEvent },
}

impl HostEvent {
    pub fn generation(&self) -> Generation {
        match self {
            Self::Executed { generation, .. } | Self::Preview { generation, .. } => *generation,
        }
    }
}

/// A live subscription to a host's events. Dropping it unsubscribes.
pub struct Subscription {
    rx: broadcast::Receiver<HostEvent>,
}

impl Subscription {
    /// Next event, or `None` once the host is gone.
    ///
    /// A subscriber that fell behind skips the events it lost and continues
    /// with the oldest one still buffered.
    pub async fn recv(&mut self) -> Option<HostEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    crate::debug!("host"; "subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next buffered event without waiting.
    pub fn try_recv(&mut self) -> Option<HostEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    crate::debug!("host"; "subscriber lagged, skipped {} events", skipped);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Stop receiving events.
    pub fn unsubscribe(self) {}
}

/// Generation counter plus event fan-out, shared by host implementations.
pub struct EventBus {
    tx: broadcast::Sender<HostEvent>,
    generation: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription { rx: self.tx.subscribe() }
    }

    /// Start a new generation and announce it.
    pub fn begin(&self, reload: bool) -> Generation {
        let generation = Generation(self.generation.fetch_add(1, Ordering::AcqRel) + 1);
        self.publish(HostEvent::Executed { generation, reload });
        generation
    }

    /// Latest generation started.
    pub fn current(&self) -> Generation {
        Generation(self.generation.load(Ordering::Acquire))
    }

    /// Publish an event reported by a running document.
    pub fn report(&self, generation: Generation, event: impl Into<PreviewEvent>) {
        self.publish(HostEvent::Preview {
            generation,
            event: event.into(),
        });
    }

    fn publish(&self, event: HostEvent) {
        // No subscribers is fine: events are only for whoever listens.
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::event::{ConsoleEvent, ConsoleKind, RuntimeErrorEvent};

    fn log(text: &str) -> ConsoleEvent {
        ConsoleEvent::from_args(ConsoleKind::Log, &[text.to_string()], "12:00:00")
    }

    #[test]
    fn test_generation_increases_per_execution() {
        let bus = EventBus::default();
        assert_eq!(bus.current(), Generation::NONE);
        let a = bus.begin(false);
        let b = bus.begin(true);
        assert!(b > a);
        assert_eq!(bus.current(), b);
        assert_eq!(b.to_string(), "#2");
    }

    #[test]
    fn test_subscribers_see_events_in_order() {
        let bus = EventBus::default();
        let mut sub = bus.subscribe();

        let generation = bus.begin(false);
        bus.report(generation, log("1"));
        bus.report(generation, log("2"));

        assert_eq!(sub.try_recv(), Some(HostEvent::Executed { generation, reload: false }));
        for expected in ["1", "2"] {
            match sub.try_recv() {
                Some(HostEvent::Preview { event: PreviewEvent::Console(event), .. }) => {
                    assert_eq!(event.text, expected);
                    assert_eq!(event.kind, ConsoleKind::Log);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn test_unsubscribe_drops_receiver() {
        let bus = EventBus::default();
        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        sub.unsubscribe();
        assert_eq!(bus.subscriber_count(), 0);
        // publishing without subscribers is not an error
        bus.begin(false);
    }

    #[test]
    fn test_lagging_subscriber_keeps_receiving() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();
        let generation = bus.begin(false);
        for i in 0..5 {
            bus.report(generation, log(&i.to_string()));
        }
        let error = RuntimeErrorEvent {
            message: "late".into(),
            line: 1,
            column: 1,
        };
        bus.report(generation, error.clone());

        let mut last = None;
        while let Some(event) = sub.try_recv() {
            last = Some(event);
        }
        assert_eq!(
            last,
            Some(HostEvent::Preview {
                generation,
                event: PreviewEvent::RuntimeError(error)
            })
        );
    }

    #[tokio::test]
    async fn test_recv_ends_when_host_is_gone() {
        let bus = EventBus::default();
        let mut sub = bus.subscribe();
        bus.begin(false);
        drop(bus);
        assert!(matches!(sub.recv().await, Some(HostEvent::Executed { .. })));
        assert_eq!(sub.recv().await, None);
    }
}
