//! Preview server.
//!
//! Serves the host page over HTTP and drives it over WebSocket:
//!
//! | Route       | Response                                         |
//! |-------------|--------------------------------------------------|
//! | `/`         | host page (toolbar, sandboxed iframe, console)   |
//! | `/host.js`  | host page script                                 |
//! | `/host.css` | host page stylesheet                             |
//! | `/preview`  | document currently running, `ETag` fingerprint   |
//! | `/export`   | share variant of the current buffers             |
//! | `/health`   | JSON status                                      |

mod lifecycle;
mod response;

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;
use parking_lot::Mutex;
use tiny_http::{Method, Request, Server};
use tokio::sync::mpsc;

use crate::actor::Coordinator;
use crate::actor::coordinator::CHANNEL_BUFFER;
use crate::config::cfg;
use crate::host::{WsHost, start_ws_server};
use crate::observer::ConsoleLog;
use crate::store::Store;
use crate::{debug, log};

use response::Reply;

/// Number of threads answering HTTP requests.
const REQUEST_THREADS: usize = 4;

/// What the request handlers serve from.
pub struct Playground {
    pub store: Arc<Store>,
    pub host: Arc<WsHost>,
    pub log: Arc<Mutex<ConsoleLog>>,
    /// Port the WebSocket listener actually bound.
    pub ws_port: u16,
}

/// Run `livepad serve` until Ctrl+C.
pub fn serve() -> Result<()> {
    let config = cfg();
    let store = Arc::new(Store::from_config(&config).context("Failed to read playground sources")?);

    let (control_tx, control_rx) = mpsc::channel(CHANNEL_BUFFER);
    let host = Arc::new(WsHost::new(config.preview.auto_refresh, Some(control_tx.clone())));
    let ws_port = start_ws_server(config.serve.interface, config.serve.ws_port, Arc::clone(&host))
        .context("Failed to start WebSocket server")?;
    debug!("serve"; "ws://{}:{}", config.serve.interface, ws_port);

    let log = Arc::new(Mutex::new(ConsoleLog::new(config.preview.console_limit)));

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    crate::core::register_server(Arc::clone(&server), shutdown_tx);

    let coordinator = Coordinator::new(
        Arc::clone(&config),
        Arc::clone(&store),
        Arc::clone(&host),
        Arc::clone(&log),
        (control_tx, control_rx),
    )
    .with_shutdown_signal(shutdown_rx);
    let actor_handle = lifecycle::spawn_actors(coordinator)?;

    log!("serve"; "http://{}", addr);
    if !config.preview.auto_refresh {
        log!("serve"; "manual mode, render from the host page toolbar");
    }

    let playground = Arc::new(Playground {
        store,
        host,
        log,
        ws_port,
    });
    run_request_loop(&server, playground)?;

    lifecycle::wait_for_shutdown(actor_handle);
    crate::logger::status_detach();
    Ok(())
}

fn run_request_loop(server: &Server, playground: Arc<Playground>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("Failed to create thread pool")?;

    for request in server.incoming_requests() {
        let playground = Arc::clone(&playground);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &playground) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, playground: &Playground) -> Result<()> {
    let head = request.method() == &Method::Head;
    let reply = if crate::core::is_shutdown() {
        response::unavailable()
    } else if !matches!(request.method(), Method::Get | Method::Head) {
        response::method_not_allowed()
    } else {
        let if_none_match = request
            .headers()
            .iter()
            .find(|h| h.field.equiv("If-None-Match"))
            .map(|h| h.value.to_string());
        route(request.url(), if_none_match.as_deref(), playground)
    };

    debug!("serve"; "{} {} -> {}", request.method(), request.url(), reply.status);
    response::send(request, reply, head)
}

/// Pick the handler for a request path. Query strings are ignored.
fn route(url: &str, if_none_match: Option<&str>, playground: &Playground) -> Reply {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path {
        "/" | "/index.html" => response::host_page(playground),
        "/host.js" => response::host_js(),
        "/host.css" => response::host_css(),
        "/preview" => response::preview(playground, if_none_match),
        "/export" => response::export(playground),
        "/health" => response::health(playground),
        _ => response::not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PreviewHost;
    use crate::store::BufferKind;

    fn playground() -> Playground {
        let store = Arc::new(Store::default());
        store.set_buffer(BufferKind::Html, "<p>hi</p>");
        Playground {
            store,
            host: Arc::new(WsHost::new(true, None)),
            log: Arc::new(Mutex::new(ConsoleLog::new(10))),
            ws_port: 35999,
        }
    }

    fn body(reply: &Reply) -> &str {
        std::str::from_utf8(&reply.body).unwrap()
    }

    #[test]
    fn test_host_page_points_at_actual_ws_port() {
        let reply = route("/", None, &playground());
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, crate::utils::mime::HTML);
        assert!(body(&reply).contains("35999"));
    }

    #[test]
    fn test_host_assets() {
        let pg = playground();
        assert_eq!(route("/host.js?v=1", None, &pg).content_type, crate::utils::mime::JAVASCRIPT);
        assert_eq!(route("/host.css", None, &pg).content_type, crate::utils::mime::CSS);
    }

    #[test]
    fn test_preview_before_first_render_composes_store() {
        let pg = playground();
        let reply = route("/preview", None, &pg);
        assert_eq!(reply.status, 200);
        assert!(body(&reply).contains("<p>hi</p>"));
        assert!(body(&reply).contains(crate::bridge::REPORT_FN));
    }

    #[test]
    fn test_preview_serves_current_document_with_etag() {
        let pg = playground();
        let doc = crate::compose::compose_snapshot(&pg.store.snapshot());
        let etag = format!("\"{}\"", doc.fingerprint());
        pg.host.set_content(doc);

        let reply = route("/preview", None, &pg);
        assert_eq!(reply.etag.as_deref(), Some(etag.as_str()));

        let cached = route("/preview", Some(&etag), &pg);
        assert_eq!(cached.status, 304);
        assert!(cached.body.is_empty());

        let stale = route("/preview", Some("\"00000000\""), &pg);
        assert_eq!(stale.status, 200);
    }

    #[test]
    fn test_user_documents_are_sandboxed() {
        let pg = playground();
        let sandbox = Some(("Content-Security-Policy", response::SANDBOX_POLICY));
        assert_eq!(route("/preview", None, &pg).header, sandbox);
        assert_eq!(route("/export", None, &pg).header, sandbox);
        assert!(!response::SANDBOX_POLICY.contains("allow-same-origin"));
        assert_eq!(route("/", None, &pg).header, None);
    }

    #[test]
    fn test_export_has_no_bridge() {
        let reply = route("/export", None, &playground());
        assert!(body(&reply).contains("<p>hi</p>"));
        assert!(!body(&reply).contains(crate::bridge::REPORT_FN));
    }

    #[test]
    fn test_health_reports_state() {
        let pg = playground();
        let reply = route("/health", None, &pg);
        let value: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(value["clients"], 0);
        assert_eq!(value["revision"], 1);
        assert_eq!(value["latest_error"], serde_json::Value::Null);
    }

    #[test]
    fn test_unknown_path() {
        assert_eq!(route("/nope", None, &playground()).status, 404);
    }
}
