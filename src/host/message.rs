//! WebSocket message protocol between the server and host pages.
//!
//! JSON objects tagged by `type`.
//!
//! Server → page ([`HostMessage`]):
//! - `connected`: handshake done
//! - `content`: execute a new document
//! - `reload`: re-execute the current document
//! - `mode`: auto-refresh toggled (keeps every page's checkbox in sync)
//!
//! Page → server ([`ClientMessage`]):
//! - `console` / `error`: bridged from the iframe, stamped with the generation
//!   the page was showing
//! - `render`, `auto_refresh`, `reload`: toolbar controls

use serde::{Deserialize, Serialize};

use super::Generation;
use crate::bridge::event::{ConsoleEvent, ConsoleKind, PreviewEvent, RuntimeErrorEvent};

/// Message sent to host pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    Connected { version: String },
    Content { generation: Generation, html: String },
    Reload { generation: Generation },
    Mode { auto_refresh: bool },
}

impl HostMessage {
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        // Plain enum of strings and integers, serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Message received from host pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Console {
        generation: Generation,
        kind: ConsoleKind,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        timestamp: String,
    },
    Error {
        generation: Generation,
        message: String,
        #[serde(default)]
        line: u32,
        #[serde(default)]
        column: u32,
    },
    /// Render now, regardless of the debounce timer.
    Render,
    AutoRefresh { enabled: bool },
    Reload,
}

impl ClientMessage {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// The preview event carried by a `console`/`error` message.
    pub fn into_preview_event(self) -> Option<(Generation, PreviewEvent)> {
        match self {
            Self::Console {
                generation,
                kind,
                args,
                timestamp,
            } => Some((generation, ConsoleEvent::from_args(kind, &args, timestamp).into())),
            Self::Error {
                generation,
                message,
                line,
                column,
            } => Some((generation, RuntimeErrorEvent { message, line, column }.into())),
            Self::Render | Self::AutoRefresh { .. } | Self::Reload => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_message_shape() {
        let json = HostMessage::Content {
            generation: Generation::new(3),
            html: "<p>hi</p>".into(),
        }
        .to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "content");
        assert_eq!(value["generation"], 3);
        assert_eq!(value["html"], "<p>hi</p>");

        let json = HostMessage::Mode { auto_refresh: false }.to_json();
        assert_eq!(json, r#"{"type":"mode","auto_refresh":false}"#);

        assert!(HostMessage::connected().to_json().contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_parse_console_message() {
        let msg = ClientMessage::from_json(
            r#"{"type":"console","generation":2,"kind":"warn","args":["a","{\n  \"b\": 1\n}"],"timestamp":"10:00:00"}"#,
        )
        .unwrap();
        let (generation, event) = msg.into_preview_event().unwrap();
        assert_eq!(generation, Generation::new(2));
        assert_eq!(
            event,
            PreviewEvent::Console(ConsoleEvent {
                kind: ConsoleKind::Warn,
                text: "a {\n  \"b\": 1\n}".into(),
                timestamp: "10:00:00".into(),
            })
        );
    }

    #[test]
    fn test_parse_error_message() {
        let msg = ClientMessage::from_json(
            r#"{"type":"error","generation":1,"message":"Uncaught Error: x","line":3,"column":9}"#,
        )
        .unwrap();
        let (_, event) = msg.into_preview_event().unwrap();
        let PreviewEvent::RuntimeError(error) = event else {
            panic!("expected runtime error");
        };
        assert!(error.message.contains('x'));
        assert_eq!(error.to_string(), "Uncaught Error: x (3:9)");
    }

    #[test]
    fn test_parse_controls() {
        assert_eq!(ClientMessage::from_json(r#"{"type":"render"}"#).unwrap(), ClientMessage::Render);
        assert_eq!(ClientMessage::from_json(r#"{"type":"reload"}"#).unwrap(), ClientMessage::Reload);
        assert_eq!(
            ClientMessage::from_json(r#"{"type":"auto_refresh","enabled":true}"#).unwrap(),
            ClientMessage::AutoRefresh { enabled: true }
        );
        assert!(ClientMessage::Render.into_preview_event().is_none());
    }

    #[test]
    fn test_reject_unknown_messages() {
        assert!(ClientMessage::from_json(r#"{"type":"page","path":"/"}"#).is_err());
        assert!(ClientMessage::from_json(r#"{"type":"console","generation":1,"kind":"debug"}"#).is_err());
        assert!(ClientMessage::from_json("not json").is_err());
    }
}
