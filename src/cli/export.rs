//! `livepad export`: write the playground as one HTML document.
//!
//! The share variant carries meta tags and no bridge; `--preview` writes
//! the exact document the preview runs.

use std::fs;
use std::io::Write;

use anyhow::{Context, Result};

use crate::cli::ExportArgs;
use crate::compose::share::compose_share;
use crate::compose::{ComposedDocument, compose_snapshot};
use crate::config::PlaygroundConfig;
use crate::log;
use crate::store::{Snapshot, Store};

/// Export to the `-o` file, or to stdout.
pub fn export(config: &PlaygroundConfig, args: &ExportArgs) -> Result<()> {
    let store = Store::from_config(config).context("Failed to read playground sources")?;
    let doc = render(&store.snapshot(), config, args.preview);

    match &args.output {
        Some(path) => {
            fs::write(path, doc.as_str()).with_context(|| format!("Failed to write {}", path.display()))?;
            log!("export"; "{} ({} bytes, {})", path.display(), doc.len(), doc.fingerprint());
        }
        // stdout carries only the document; failures go back to main (stderr)
        None => write_document(std::io::stdout().lock(), &doc).context("Failed to write to stdout")?,
    }
    Ok(())
}

fn write_document(mut out: impl Write, doc: &ComposedDocument) -> std::io::Result<()> {
    out.write_all(doc.as_str().as_bytes())?;
    out.flush()
}

/// The document `export` writes, also served at `/export`.
pub fn render(snapshot: &Snapshot, config: &PlaygroundConfig, preview: bool) -> ComposedDocument {
    if preview {
        compose_snapshot(snapshot)
    } else {
        compose_share(&snapshot.buffers, &snapshot.resources, snapshot.theme, &config.share.meta())
    }
}
