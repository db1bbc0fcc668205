//! Console/Error Bridge Injector.
//!
//! Produces the bootstrap script embedded at the start of every preview
//! document. Inside the sandboxed frame it:
//! - wraps `console.log/error/warn/info`, posting each call to the host page
//!   and then calling the original method
//! - installs `window.onerror` (and an `unhandledrejection` listener) that
//!   reports the error and marks it handled
//! - exposes [`REPORT_FN`] for the user-script wrapper's `catch` block
//!
//! The patches apply to the frame's own globals only; the host page never
//! runs this script.

pub mod event;

use crate::embed::bridge::BRIDGE_JS;

/// Tag carried by every bridged message (`data.channel`).
pub const CHANNEL: &str = "livepad";

/// Global function the user-script wrapper calls with a caught exception.
pub const REPORT_FN: &str = "__livepad_report";

/// The bootstrap script source, without a `<script>` wrapper.
#[inline]
pub fn script() -> &'static str {
    BRIDGE_JS
}

/// The bootstrap script wrapped in a classic `<script>` element.
pub fn script_tag() -> String {
    format!("<script>{}</script>", script())
}
