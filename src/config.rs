use crate::error::{ErrorContext, LogWatchError, Result};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Free-space threshold as a percentage of total filesystem capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold(u8);

impl Threshold {
    pub const DEFAULT_PERCENT: u8 = 5;

    /// Accepts any integer; values outside `0..=100` fall back to the default.
    pub fn new(percent: i64) -> Self {
        match u8::try_from(percent) {
            Ok(p) if p <= 100 => Self(p),
            _ => Self::default(),
        }
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(Self::DEFAULT_PERCENT)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Resolved runtime configuration for one watcher
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub log_dir: PathBuf,
    pub log_name: OsString,
    pub threshold: Threshold,
    pub debug: bool,
}

impl WatchConfig {
    pub fn new(log_path: &Path, threshold: Threshold, debug: bool) -> Result<Self> {
        let (log_dir, log_name) = split_log_path(log_path)?;
        Ok(Self {
            log_dir,
            log_name,
            threshold,
            debug,
        })
    }

    /// Full path of the log under its initial name
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_name)
    }
}

/// Split a log path into the directory to watch and the file name to track.
///
/// A bare file name resolves against the current working directory.
pub fn split_log_path(path: &Path) -> Result<(PathBuf, OsString)> {
    // `Path::file_name` skips trailing "/" and "/.", which would turn a
    // directory path into the name of its last component.
    let raw = path.as_os_str().as_bytes();
    let name = raw.rsplit(|b| *b == b'/').next().unwrap_or_default();
    if name.is_empty() || name == b"." || name == b".." {
        return Err(LogWatchError::InvalidPath(format!(
            "no file name in '{}'",
            path.display()
        )));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().context("getcwd")?,
    };

    Ok((dir, OsStr::from_bytes(name).to_os_string()))
}
