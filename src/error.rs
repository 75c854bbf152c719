use std::path::PathBuf;
use thiserror::Error;

/// logwatch errors
///
/// Every variant is fatal to the watcher. Deletion of the guarded log is not
/// an error and is reported through [`crate::file_watcher::ExitReason`].
#[derive(Debug, Error)]
pub enum LogWatchError {
    /// The log path could not be split into a directory and a file name
    #[error("Invalid log path: {0}")]
    InvalidPath(String),

    /// The log path exists but is not something we can guard
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors, tagged with the step that failed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to register an inotify watch
    #[error("inotify_add_watch [{}]: {source}", .path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed record in the notification stream
    #[error("Decode error: {0}")]
    Decode(String),
}

pub type Result<T, E = LogWatchError> = std::result::Result<T, E>;

impl From<std::io::Error> for LogWatchError {
    fn from(err: std::io::Error) -> Self {
        LogWatchError::Io {
            context: "I/O error".to_string(),
            source: err,
        }
    }
}

/// Helper trait for tagging I/O errors with the step that produced them
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> Result<T>;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|source| LogWatchError::Io {
            context: msg.to_string(),
            source,
        })
    }
}
