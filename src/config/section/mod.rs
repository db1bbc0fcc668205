//! Configuration section definitions.
//!
//! Each module corresponds to a section in `livepad.toml`:
//!
//! | Module      | TOML Section   | Purpose                                |
//! |-------------|----------------|----------------------------------------|
//! | `sources`   | `[sources]`    | Paths of the three source buffers      |
//! | `preview`   | `[preview]`    | Theme, auto-refresh, debounce, console |
//! | `resources` | `[resources]`  | External stylesheets and scripts       |
//! | `share`     | `[share]`      | Title/description of exported pages    |
//! | `serve`     | `[serve]`      | Development server                     |

mod preview;
mod resources;
mod serve;
mod share;
mod sources;

pub use preview::PreviewConfig;
pub use resources::ResourcesConfig;
pub use serve::ServeConfig;
pub use share::ShareConfig;
pub use sources::SourcesConfig;
