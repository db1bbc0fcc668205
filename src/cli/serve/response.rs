//! HTTP response handlers.
//!
//! Handlers build a [`Reply`]; [`send`] turns it into a tiny_http response.
//! Keeping them apart lets the routes be tested without a socket.

use anyhow::{Result, anyhow};
use tiny_http::{Header, Request, Response, StatusCode};

use super::Playground;
use crate::compose::ComposedDocument;
use crate::embed::host::{HOST_CSS, HOST_HTML, HOST_JS, HostVars};
use crate::utils::hash;
use crate::utils::mime::{CSS, HTML, JAVASCRIPT, JSON, PLAIN};

/// Same restrictions as the preview iframe's `sandbox` attribute, for user
/// documents opened directly.
pub const SANDBOX_POLICY: &str = "sandbox allow-scripts allow-modals allow-popups allow-popups-to-escape-sandbox";

/// A response waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub etag: Option<String>,
    /// Extra static header, e.g. the sandbox policy.
    pub header: Option<(&'static str, &'static str)>,
}

impl Reply {
    fn ok(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.into(),
            etag: None,
            header: None,
        }
    }

    fn plain(status: u16, text: &str) -> Self {
        Self {
            status,
            ..Self::ok(PLAIN, text)
        }
    }

    /// 304 when the client already has this version.
    fn with_etag(mut self, etag: String, if_none_match: Option<&str>) -> Self {
        if if_none_match.is_some_and(|tags| tags.split(',').any(|t| t.trim() == etag)) {
            self.status = 304;
            self.body.clear();
        }
        self.etag = Some(etag);
        self
    }

    /// User documents run with an opaque origin, as in the iframe.
    fn sandboxed(mut self) -> Self {
        self.header = Some(("Content-Security-Policy", SANDBOX_POLICY));
        self
    }
}

/// Host page: toolbar, sandboxed iframe, console pane.
pub fn host_page(playground: &Playground) -> Reply {
    let config = crate::config::cfg();
    let html = HOST_HTML.render(&HostVars {
        ws_port: playground.ws_port,
        theme: playground.store.snapshot().theme,
        auto_refresh: playground.host.auto_refresh(),
        version: env!("CARGO_PKG_VERSION"),
        title: config.share.title.clone(),
    });
    Reply::ok(HTML, html)
}

pub fn host_js() -> Reply {
    Reply::ok(JAVASCRIPT, HOST_JS)
}

pub fn host_css() -> Reply {
    Reply::ok(CSS, HOST_CSS)
}

/// The document the preview is running, composed from the store if no
/// render has happened yet.
pub fn preview(playground: &Playground, if_none_match: Option<&str>) -> Reply {
    let html: String = match playground.host.current_html() {
        Some(html) => html.to_string(),
        None => crate::compose::compose_snapshot(&playground.store.snapshot()).into_string(),
    };
    let etag = format!("\"{}\"", hash::fingerprint(&html));
    Reply::ok(HTML, html).with_etag(etag, if_none_match).sandboxed()
}

/// Share variant of the current buffers.
pub fn export(playground: &Playground) -> Reply {
    let doc: ComposedDocument =
        crate::cli::export::render(&playground.store.snapshot(), &crate::config::cfg(), false);
    Reply::ok(HTML, doc.into_string()).sandboxed()
}

/// Server and preview status as JSON.
pub fn health(playground: &Playground) -> Reply {
    let log = playground.log.lock();
    let body = serde_json::json!({
        "status": if crate::core::is_serving() { "ok" } else { "starting" },
        "version": env!("CARGO_PKG_VERSION"),
        "generation": log.generation().get(),
        "revision": playground.store.revision(),
        "clients": playground.host.client_count(),
        "auto_refresh": playground.host.auto_refresh(),
        "console": log.console_len(),
        "errors": log.errors().len(),
        "latest_error": log.latest_error(),
    });
    Reply::ok(JSON, body.to_string())
}

pub fn not_found() -> Reply {
    Reply::plain(404, "404 Not Found")
}

pub fn method_not_allowed() -> Reply {
    Reply::plain(405, "405 Method Not Allowed")
}

/// Server shutting down.
pub fn unavailable() -> Reply {
    Reply::plain(503, "503 Service Unavailable")
}

/// Send a reply. HEAD requests get the headers only.
pub fn send(request: Request, reply: Reply, head: bool) -> Result<()> {
    let mut response = Response::from_data(if head { Vec::new() } else { reply.body })
        .with_status_code(StatusCode(reply.status))
        .with_header(make_header("Content-Type", reply.content_type))
        .with_header(make_header("Cache-Control", "no-store"));

    if let Some(etag) = reply.etag {
        let header = Header::from_bytes("ETag", etag).map_err(|()| anyhow!("invalid ETag header"))?;
        response = response.with_header(header);
    }
    if let Some((key, value)) = reply.header {
        response = response.with_header(make_header(key, value));
    }

    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
