//! Document Compositor.
//!
//! Turns the three source buffers, the resource list and the theme into one
//! self-contained HTML document. Pure and total: no I/O, no parsing of the
//! buffers, identical inputs give byte-identical output.
//!
//! # Layout
//!
//! ```text
//! <head>  meta, <base target="_blank">, stylesheet links, <style>(theme + css)
//! <body>  bridge <script>, html, resource <script src>, wrapped js <script>
//! ```

pub mod share;

use std::fmt::Write;

use crate::bridge;
use crate::store::{RenderTheme, ResourceKind, ResourceList, Snapshot, SourceBuffers};
use crate::utils::{hash, html::escape_attr};

/// Base styles every preview gets ahead of the user's CSS.
const BASE_STYLE: &str = "body { margin: 0; min-height: 100vh; }\n.dark body { background: #1a1a1a; color: #fff; }";

/// A complete HTML document ready to hand to the preview host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument(String);

impl ComposedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 8-char content fingerprint (logs, HTTP ETag).
    pub fn fingerprint(&self) -> String {
        hash::fingerprint(&self.0)
    }
}

impl AsRef<str> for ComposedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compose the preview document from a store snapshot.
pub fn compose_snapshot(snapshot: &Snapshot) -> ComposedDocument {
    compose(&snapshot.buffers, &snapshot.resources, snapshot.theme)
}

/// Compose the preview document.
///
/// The bridge script opens `<body>`, ahead of the user HTML, so inline
/// scripts in the markup are captured and unclosed markup cannot swallow it.
/// User
/// JS runs inside `try`/`catch`, reporting a thrown exception through the
/// bridge instead of aborting silently.
pub fn compose(buffers: &SourceBuffers, resources: &ResourceList, theme: RenderTheme) -> ComposedDocument {
    let mut out = String::with_capacity(
        buffers.html.len() + buffers.css.len() + buffers.js.len() + bridge::script().len() + 1024,
    );

    out.push_str("<!DOCTYPE html>\n");
    let _ = writeln!(out, "<html lang=\"en\" class=\"{}\">", theme.class());

    // head
    out.push_str("<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str("<base target=\"_blank\">\n");
    push_stylesheets(&mut out, resources);
    out.push_str("<style>\n");
    let _ = writeln!(out, ":root {{ color-scheme: {}; }}", theme.color_scheme());
    out.push_str(BASE_STYLE);
    out.push('\n');
    out.push_str(&buffers.css);
    out.push_str("\n</style>\n");
    out.push_str("</head>\n");

    // body
    out.push_str("<body>\n");
    out.push_str(&bridge::script_tag());
    out.push('\n');
    out.push_str(&buffers.html);
    out.push('\n');
    push_scripts(&mut out, resources);
    out.push_str("<script>\ntry {\n");
    out.push_str(&buffers.js);
    let _ = write!(out, "\n}} catch (error) {{\n  {}(error);\n}}\n</script>\n", bridge::REPORT_FN);
    out.push_str("</body>\n</html>\n");

    ComposedDocument(out)
}

/// One `<link rel="stylesheet">` per stylesheet resource, in list order.
pub(crate) fn push_stylesheets(out: &mut String, resources: &ResourceList) {
    for url in resources.of_kind(ResourceKind::Stylesheet) {
        let _ = writeln!(out, "<link rel=\"stylesheet\" href=\"{}\">", escape_attr(url));
    }
}

/// One `<script src>` per script resource, in list order.
pub(crate) fn push_scripts(out: &mut String, resources: &ResourceList) {
    for url in resources.of_kind(ResourceKind::Script) {
        let _ = writeln!(out, "<script src=\"{}\"></script>", escape_attr(url));
    }
}
