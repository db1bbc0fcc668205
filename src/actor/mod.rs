//! Actor System for Live Preview
//!
//! Message-passing concurrency for `livepad serve`:
//!
//! ```text
//! FsActor --Store--> RenderScheduler --set_content--> WsHost --> host pages
//! (watch)            (debounce)                          |
//!                         ^------- render / auto_refresh -+
//!                                                        |
//!                    observer <------- console / error --+
//! ```
//!
//! # Module Structure
//!
//! - `fs` - File system watcher feeding the store
//! - `coordinator` - Wires up and runs the actors

pub mod coordinator;
pub mod fs;

pub use coordinator::Coordinator;
