//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `bridge` - Console/error bridge injected into every preview document
//! - `host` - Host page served at `/` (sandboxed iframe + console pane)
//! - `welcome` - Starter content written by `livepad init`
//!
//! JS and CSS are minified by `build.rs` into `OUT_DIR`.

mod template;

pub use template::{Template, TemplateVars};

pub mod bridge {
    /// Minified bridge bootstrap script (no `<script>` wrapper).
    pub const BRIDGE_JS: &str = include_str!(concat!(env!("OUT_DIR"), "/bridge.min.js"));
}

pub mod host {
    use super::{Template, TemplateVars};
    use crate::store::RenderTheme;

    /// Variables for host.html.
    pub struct HostVars {
        pub ws_port: u16,
        pub theme: RenderTheme,
        pub auto_refresh: bool,
        pub version: &'static str,
        pub title: String,
    }

    impl TemplateVars for HostVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__LIVEPAD_WS_PORT__", &self.ws_port.to_string())
                .replace("__LIVEPAD_THEME__", self.theme.class())
                .replace(
                    "__LIVEPAD_AUTO_REFRESH__",
                    if self.auto_refresh { "true" } else { "false" },
                )
                .replace("__LIVEPAD_VERSION__", self.version)
                .replace("__LIVEPAD_TITLE__", &crate::utils::html::escape(&self.title))
        }
    }

    /// Host page: toolbar, error banner, sandboxed iframe, console pane.
    pub const HOST_HTML: Template<HostVars> = Template::new(include_str!("host/host.html"));

    /// Host page script (WebSocket client + iframe driver).
    pub const HOST_JS: &str = include_str!(concat!(env!("OUT_DIR"), "/host.min.js"));

    /// Host page stylesheet.
    pub const HOST_CSS: &str = include_str!(concat!(env!("OUT_DIR"), "/host.min.css"));
}

pub mod welcome {
    /// Starter markup written by `livepad init`.
    pub const HTML: &str = include_str!("welcome/index.html");
    /// Starter stylesheet written by `livepad init`.
    pub const CSS: &str = include_str!("welcome/style.css");
    /// Starter script written by `livepad init`.
    pub const JS: &str = include_str!("welcome/script.js");
}

#[cfg(test)]
mod tests {
    use super::host::{HOST_HTML, HostVars};
    use crate::store::RenderTheme;

    #[test]
    fn test_host_page_vars() {
        let html = HOST_HTML.render(&HostVars {
            ws_port: 35730,
            theme: RenderTheme::Dark,
            auto_refresh: false,
            version: "0.1.0",
            title: "<demo>".into(),
        });
        assert!(html.contains("content=\"35730\""));
        assert!(html.contains("class=\"dark\""));
        assert!(html.contains("data-auto-refresh=\"false\""));
        assert!(html.contains("&lt;demo&gt;"));
        assert!(!html.contains("__LIVEPAD_"));
    }

    #[test]
    fn test_host_iframe_is_sandboxed_without_same_origin() {
        let html = HOST_HTML.content();
        assert!(html.contains("sandbox=\"allow-scripts"));
        assert!(!html.contains("allow-same-origin"));
        assert!(!html.contains("allow-top-navigation"));
    }
}
