// Library exports for the binary and integration tests

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod file_watcher;
pub mod inotify;
pub mod logging;
pub mod rename;
pub mod truncate;
pub mod usage;
pub mod validation;

pub use error::{LogWatchError, Result};
pub use file_watcher::{ExitReason, LogWatcher, WatchTarget};
