//! The three editable source buffers.

use std::fmt;

/// Which of the three panes a buffer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Html,
    Css,
    Js,
}

impl BufferKind {
    pub const ALL: [BufferKind; 3] = [BufferKind::Html, BufferKind::Css, BufferKind::Js];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::Js => "js",
        }
    }
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current HTML/CSS/JS text.
///
/// Contents are never parsed or validated: malformed markup, styles or
/// script are carried verbatim into the composed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBuffers {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl SourceBuffers {
    pub fn new(html: impl Into<String>, css: impl Into<String>, js: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            js: js.into(),
        }
    }

    pub fn get(&self, kind: BufferKind) -> &str {
        match kind {
            BufferKind::Html => &self.html,
            BufferKind::Css => &self.css,
            BufferKind::Js => &self.js,
        }
    }

    /// Replace one buffer. Returns `false` if the text was already identical.
    pub fn set(&mut self, kind: BufferKind, text: String) -> bool {
        let slot = match kind {
            BufferKind::Html => &mut self.html,
            BufferKind::Css => &mut self.css,
            BufferKind::Js => &mut self.js,
        };
        if *slot == text {
            return false;
        }
        *slot = text;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.css.is_empty() && self.js.is_empty()
    }
}
