//! Events produced inside the preview and bridged out to the host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four intercepted console methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleKind {
    Log,
    Error,
    Warn,
    Info,
}

impl ConsoleKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
        }
    }
}

/// One console call made by code running in the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEvent {
    pub kind: ConsoleKind,
    /// Arguments rendered to text and joined with a space
    pub text: String,
    /// Wall-clock time inside the preview when the call was made
    pub timestamp: String,
}

impl ConsoleEvent {
    /// Build an event from already-stringified arguments.
    pub fn from_args(kind: ConsoleKind, args: &[String], timestamp: impl Into<String>) -> Self {
        Self {
            kind,
            text: args.join(" "),
            timestamp: timestamp.into(),
        }
    }
}

/// An uncaught exception (or caught-and-reported one) in the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeErrorEvent {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for RuntimeErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.message, self.line, self.column)
    }
}

/// Anything the preview can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEvent {
    Console(ConsoleEvent),
    RuntimeError(RuntimeErrorEvent),
}

impl From<ConsoleEvent> for PreviewEvent {
    fn from(event: ConsoleEvent) -> Self {
        Self::Console(event)
    }
}

impl From<RuntimeErrorEvent> for PreviewEvent {
    fn from(event: RuntimeErrorEvent) -> Self {
        Self::RuntimeError(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_args_joined() {
        let event = ConsoleEvent::from_args(
            ConsoleKind::Log,
            &["a".to_string(), "{\n  \"b\": 1\n}".to_string()],
            "12:00:00",
        );
        assert_eq!(event.text, "a {\n  \"b\": 1\n}");
    }

    #[test]
    fn test_runtime_error_display() {
        let error = RuntimeErrorEvent {
            message: "Uncaught Error: x".into(),
            line: 3,
            column: 7,
        };
        assert_eq!(error.to_string(), "Uncaught Error: x (3:7)");
    }

    #[test]
    fn test_kind_serde() {
        let kind: ConsoleKind = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(kind, ConsoleKind::Warn);
        assert_eq!(serde_json::to_string(&ConsoleKind::Info).unwrap(), "\"info\"");
    }
}
