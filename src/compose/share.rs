//! Share/export variant of the composed document.
//!
//! What `livepad export` and `/export` hand out: the user's code with SEO
//! meta tags and no bridge, suitable for pasting elsewhere.

use std::fmt::Write;

use super::{ComposedDocument, push_scripts, push_stylesheets};
use crate::store::{RenderTheme, ResourceList, SourceBuffers};
use crate::utils::html::{escape, escape_attr};

/// Title/description used for the share document's meta tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMeta {
    pub title: String,
    pub description: String,
}

impl Default for ShareMeta {
    fn default() -> Self {
        Self {
            title: "Playground".into(),
            description: "Code preview generated in livepad".into(),
        }
    }
}

/// Compose the share document.
pub fn compose_share(
    buffers: &SourceBuffers,
    resources: &ResourceList,
    theme: RenderTheme,
    meta: &ShareMeta,
) -> ComposedDocument {
    let title = escape(&meta.title);
    let description = escape_attr(&meta.description);
    let title_attr = escape_attr(&meta.title);

    let mut out = String::with_capacity(buffers.html.len() + buffers.css.len() + buffers.js.len() + 1024);

    out.push_str("<!DOCTYPE html>\n");
    let _ = writeln!(out, "<html lang=\"en\" class=\"{}\">", theme.class());
    out.push_str("<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    let _ = writeln!(out, "<title>{title} | livepad</title>");
    let _ = writeln!(out, "<meta name=\"description\" content=\"{description}\">");
    out.push_str("<meta name=\"robots\" content=\"noindex, nofollow\">\n");
    let _ = writeln!(out, "<meta property=\"og:title\" content=\"{title_attr}\">");
    let _ = writeln!(out, "<meta property=\"og:description\" content=\"{description}\">");
    let _ = writeln!(out, "<meta name=\"twitter:title\" content=\"{title_attr}\">");
    let _ = writeln!(out, "<meta name=\"twitter:description\" content=\"{description}\">");
    out.push_str("<link rel=\"preconnect\" href=\"https://fonts.googleapis.com\">\n");
    out.push_str("<link rel=\"preconnect\" href=\"https://fonts.gstatic.com\" crossorigin>\n");
    push_stylesheets(&mut out, resources);
    out.push_str("<style>\n");
    let _ = writeln!(out, ":root {{ color-scheme: {}; }}", theme.color_scheme());
    out.push_str(&buffers.css);
    out.push_str("\n</style>\n");
    out.push_str("</head>\n");

    out.push_str("<body>\n<main>\n");
    out.push_str(&buffers.html);
    out.push_str("\n</main>\n");
    push_scripts(&mut out, resources);
    out.push_str("<script>\n");
    out.push_str(&buffers.js);
    out.push_str("\n</script>\n");
    out.push_str("</body>\n</html>\n");

    ComposedDocument(out)
}
