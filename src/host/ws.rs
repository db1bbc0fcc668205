//! WebSocket preview host.
//!
//! Drives any number of browser host pages. Each page runs the document in
//! its own sandboxed iframe; the newest document is kept so pages that
//! connect later (or reconnect) start from it.
//!
//! ```text
//! set_content/reload --broadcast--> pages
//! pages --console/error--> EventBus --> subscribers
//! pages --render/auto_refresh--> RenderScheduler
//! pages --reload--> WsHost::reload
//! ```

use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::message::{ClientMessage, HostMessage};
use super::{EventBus, Generation, PreviewHost, Subscription};
use crate::compose::ComposedDocument;
use crate::scheduler::SchedulerMsg;

/// How often the reader thread polls clients.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// The document most recently handed to the host.
struct Current {
    generation: Generation,
    html: Arc<str>,
}

struct Shared {
    clients: Mutex<Vec<WebSocket<TcpStream>>>,
    bus: EventBus,
    current: Mutex<Option<Current>>,
    auto_refresh: AtomicBool,
    control: Option<mpsc::Sender<SchedulerMsg>>,
    stopped: AtomicBool,
}

/// [`PreviewHost`] backed by WebSocket-connected host pages.
pub struct WsHost {
    shared: Arc<Shared>,
}

impl WsHost {
    /// Create the host and start its client reader thread.
    ///
    /// `control` receives the toolbar's render-now and auto-refresh requests.
    pub fn new(auto_refresh: bool, control: Option<mpsc::Sender<SchedulerMsg>>) -> Self {
        let shared = Arc::new(Shared {
            clients: Mutex::new(Vec::new()),
            bus: EventBus::default(),
            current: Mutex::new(None),
            auto_refresh: AtomicBool::new(auto_refresh),
            control,
            stopped: AtomicBool::new(false),
        });

        let reader = Arc::clone(&shared);
        std::thread::spawn(move || reader.client_reader_loop());

        Self { shared }
    }

    /// Handshake a freshly accepted connection and bring it up to date.
    pub fn add_client(&self, stream: TcpStream) {
        let mut ws = match tungstenite::accept(stream) {
            Ok(ws) => ws,
            Err(e) => {
                crate::log!("ws"; "handshake failed: {}", e);
                return;
            }
        };

        // Registered under the client lock: a document committed meanwhile is
        // either part of the greeting or broadcast after the push.
        let mut clients = self.shared.clients.lock();

        let mut greeting = vec![
            HostMessage::connected(),
            HostMessage::Mode {
                auto_refresh: self.shared.auto_refresh.load(Ordering::Relaxed),
            },
        ];
        // Snapshot recovery: new pages start from the latest document
        if let Some(current) = self.shared.current.lock().as_ref() {
            greeting.push(HostMessage::Content {
                generation: current.generation,
                html: current.html.to_string(),
            });
        }
        for msg in greeting {
            if let Err(e) = ws.send(Message::Text(msg.to_json().into())) {
                crate::log!("ws"; "failed to greet host page: {}", e);
                return;
            }
        }

        // Polled from the reader thread from now on
        let _ = ws.get_ref().set_nonblocking(true);

        clients.push(ws);
        crate::debug!("ws"; "host page registered (total: {})", clients.len());
    }

    /// Number of connected host pages.
    pub fn client_count(&self) -> usize {
        self.shared.clients.lock().len()
    }

    /// Mode last chosen on a host page toolbar (or the configured default).
    pub fn auto_refresh(&self) -> bool {
        self.shared.auto_refresh.load(Ordering::Relaxed)
    }

    /// HTML of the document currently shown, if any.
    pub fn current_html(&self) -> Option<Arc<str>> {
        self.shared.current.lock().as_ref().map(|c| Arc::clone(&c.html))
    }

    /// Close every connection and stop the reader thread.
    pub fn shutdown(&self) {
        self.shared.stopped.store(true, Ordering::Release);
        for mut ws in self.shared.clients.lock().drain(..) {
            let _ = ws.close(None);
            let _ = ws.flush();
        }
    }
}

impl Drop for WsHost {
    fn drop(&mut self) {
        self.shared.stopped.store(true, Ordering::Release);
    }
}

impl PreviewHost for WsHost {
    fn set_content(&self, doc: ComposedDocument) -> Generation {
        let html: Arc<str> = Arc::from(doc.into_string());
        let generation = {
            // Lock held across begin+store so a connecting page never sees
            // a generation without its document.
            let mut current = self.shared.current.lock();
            let generation = self.shared.bus.begin(false);
            *current = Some(Current {
                generation,
                html: Arc::clone(&html),
            });
            generation
        };

        self.shared.broadcast(&HostMessage::Content {
            generation,
            html: html.to_string(),
        });
        generation
    }

    fn reload(&self) -> Generation {
        self.shared.reload()
    }

    fn subscribe(&self) -> Subscription {
        self.shared.bus.subscribe()
    }
}

impl Shared {
    fn reload(&self) -> Generation {
        let generation = {
            let mut current = self.current.lock();
            let generation = self.bus.begin(true);
            if let Some(current) = current.as_mut() {
                current.generation = generation;
            }
            generation
        };
        self.broadcast(&HostMessage::Reload { generation });
        generation
    }

    /// Send a message to every page, dropping pages that went away.
    fn broadcast(&self, msg: &HostMessage) {
        let msg = Message::Text(msg.to_json().into());
        let mut clients = self.clients.lock();
        if clients.is_empty() {
            crate::debug!("ws"; "no host pages connected");
            return;
        }

        clients.retain_mut(|ws| match ws.send(msg.clone()) {
            Ok(()) => true,
            // Queued in the write buffer, flushed by the reader loop
            Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => true,
            Err(e) => {
                crate::debug!("ws"; "host page disconnected: {}", e);
                false
            }
        });
        crate::debug!("ws"; "broadcast to {} host pages", clients.len());
    }

    /// Background thread reading page messages (non-blocking poll).
    fn client_reader_loop(self: Arc<Self>) {
        while !self.stopped.load(Ordering::Acquire) {
            std::thread::sleep(POLL_INTERVAL);

            let mut incoming = Vec::new();
            {
                let mut clients = self.clients.lock();
                clients.retain_mut(|ws| {
                    // Drain everything this page sent since the last poll
                    loop {
                        match ws.read() {
                            Ok(Message::Text(text)) => incoming.push(text.as_str().to_owned()),
                            Ok(Message::Close(_)) => return false,
                            Ok(_) => {}
                            Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => {
                                break;
                            }
                            Err(_) => return false,
                        }
                    }
                    match ws.flush() {
                        Ok(()) => true,
                        Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => true,
                        Err(_) => false,
                    }
                });
            }

            // Handled outside the client lock: reload broadcasts
            for text in incoming {
                self.handle_message(&text);
            }
        }
        crate::debug!("ws"; "client reader stopped");
    }

    fn handle_message(&self, text: &str) {
        let msg = match ClientMessage::from_json(text) {
            Ok(msg) => msg,
            Err(e) => {
                crate::debug!("ws"; "ignoring malformed page message: {}", e);
                return;
            }
        };

        match msg {
            ClientMessage::Render => self.send_control(SchedulerMsg::RenderNow),
            ClientMessage::AutoRefresh { enabled } => {
                self.auto_refresh.store(enabled, Ordering::Relaxed);
                self.broadcast(&HostMessage::Mode { auto_refresh: enabled });
                self.send_control(SchedulerMsg::SetAutoRefresh(enabled));
            }
            ClientMessage::Reload => {
                self.reload();
            }
            event @ (ClientMessage::Console { .. } | ClientMessage::Error { .. }) => {
                if let Some((generation, event)) = event.into_preview_event() {
                    self.bus.report(generation, event);
                }
            }
        }
    }

    fn send_control(&self, msg: SchedulerMsg) {
        let Some(control) = &self.control else {
            return;
        };
        if control.blocking_send(msg).is_err() {
            crate::debug!("ws"; "scheduler gone, dropping control message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::event::{ConsoleKind, PreviewEvent};
    use crate::host::{HostEvent, start_ws_server};
    use crate::store::{RenderTheme, ResourceList, SourceBuffers};
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Instant;

    type Client = WebSocket<tungstenite::stream::MaybeTlsStream<TcpStream>>;

    fn connect(host: WsHost) -> (Arc<WsHost>, Client) {
        let host = Arc::new(host);
        let port = start_ws_server(IpAddr::V4(Ipv4Addr::LOCALHOST), 0, Arc::clone(&host)).unwrap();
        let (client, _) = tungstenite::connect(format!("ws://127.0.0.1:{port}")).unwrap();
        wait_until(|| host.client_count() == 1);
        (host, client)
    }

    fn wait_until(mut cond: impl FnMut() -> bool) {
        let start = Instant::now();
        while !cond() {
            assert!(start.elapsed() < Duration::from_secs(5), "timed out");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    fn read_msg(client: &mut Client) -> HostMessage {
        loop {
            if let Message::Text(text) = client.read().unwrap() {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    fn send(client: &mut Client, json: &str) {
        client.send(Message::Text(json.to_owned().into())).unwrap();
    }

    fn next_preview(sub: &mut Subscription) -> (Generation, PreviewEvent) {
        let start = Instant::now();
        loop {
            match sub.try_recv() {
                Some(HostEvent::Preview { generation, event }) => return (generation, event),
                Some(HostEvent::Executed { .. }) => {}
                None => {
                    assert!(start.elapsed() < Duration::from_secs(5), "no preview event");
                    std::thread::sleep(Duration::from_millis(10));
                }
            }
        }
    }

    fn doc(js: &str) -> ComposedDocument {
        crate::compose::compose(&SourceBuffers::new("", "", js), &ResourceList::new(), RenderTheme::Light)
    }

    #[test]
    fn test_new_page_receives_latest_document() {
        let host = WsHost::new(true, None);
        let generation = host.set_content(doc("console.log(1)"));
        let (_host, mut client) = connect(host);

        assert!(matches!(read_msg(&mut client), HostMessage::Connected { .. }));
        assert_eq!(read_msg(&mut client), HostMessage::Mode { auto_refresh: true });
        match read_msg(&mut client) {
            HostMessage::Content { generation: g, html } => {
                assert_eq!(g, generation);
                assert!(html.contains("console.log(1)"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_console_forwarding_order() {
        let (host, mut client) = connect(WsHost::new(true, None));
        let mut sub = host.subscribe();
        let generation = host.set_content(doc("console.log(1); console.log(2);"));

        for arg in ["1", "2"] {
            send(
                &mut client,
                &format!(
                    r#"{{"type":"console","generation":{},"kind":"log","args":["{arg}"],"timestamp":"t"}}"#,
                    generation.get()
                ),
            );
        }

        for expected in ["1", "2"] {
            let (g, event) = next_preview(&mut sub);
            assert_eq!(g, generation);
            let PreviewEvent::Console(event) = event else {
                panic!("expected console event");
            };
            assert_eq!(event.kind, ConsoleKind::Log);
            assert_eq!(event.text, expected);
        }
    }

    #[test]
    fn test_runtime_error_is_contained() {
        let (host, mut client) = connect(WsHost::new(true, None));
        let mut sub = host.subscribe();

        let first = host.set_content(doc("throw new Error('x')"));
        send(
            &mut client,
            &format!(
                r#"{{"type":"error","generation":{},"message":"Error: x","line":3,"column":7}}"#,
                first.get()
            ),
        );
        let (g, event) = next_preview(&mut sub);
        assert_eq!(g, first);
        let PreviewEvent::RuntimeError(error) = event else {
            panic!("expected runtime error");
        };
        assert!(error.message.contains('x'));
        assert!(sub.try_recv().is_none());

        // The host keeps working after the failed document
        let second = host.set_content(doc("console.log('ok')"));
        assert!(second > first);
        let html = loop {
            if let HostMessage::Content { generation, html } = read_msg(&mut client)
                && generation == second
            {
                break html;
            }
        };
        assert!(html.contains("console.log('ok')"));
    }

    #[test]
    fn test_page_reload_request_starts_new_generation() {
        let (host, mut client) = connect(WsHost::new(true, None));
        let mut sub = host.subscribe();
        let first = host.set_content(doc(""));

        send(&mut client, r#"{"type":"reload"}"#);
        let start = Instant::now();
        loop {
            match sub.try_recv() {
                Some(HostEvent::Executed { generation, reload: true }) => {
                    assert!(generation > first);
                    break;
                }
                Some(_) => {}
                None => {
                    assert!(start.elapsed() < Duration::from_secs(5), "no reload");
                    std::thread::sleep(Duration::from_millis(10));
                }
            }
        }
    }

    #[test]
    fn test_controls_reach_scheduler() {
        let (tx, mut rx) = mpsc::channel(8);
        let (_host, mut client) = connect(WsHost::new(true, Some(tx)));

        send(&mut client, r#"{"type":"auto_refresh","enabled":false}"#);
        send(&mut client, r#"{"type":"render"}"#);

        let start = Instant::now();
        let mut received = Vec::new();
        while received.len() < 2 {
            match rx.try_recv() {
                Ok(msg) => received.push(msg),
                Err(_) => {
                    assert!(start.elapsed() < Duration::from_secs(5), "controls not forwarded");
                    std::thread::sleep(Duration::from_millis(10));
                }
            }
        }
        assert_eq!(received, [SchedulerMsg::SetAutoRefresh(false), SchedulerMsg::RenderNow]);
    }

    #[test]
    fn test_malformed_messages_are_ignored() {
        let (host, mut client) = connect(WsHost::new(true, None));
        let mut sub = host.subscribe();
        let generation = host.set_content(doc(""));

        send(&mut client, "{not json");
        send(
            &mut client,
            &format!(r#"{{"type":"console","generation":{},"kind":"info","args":["still here"]}}"#, generation.get()),
        );

        let (_, event) = next_preview(&mut sub);
        assert!(matches!(event, PreviewEvent::Console(e) if e.text == "still here"));
    }
}
