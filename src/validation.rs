use crate::error::LogWatchError;
use std::path::Path;

/// Validate that the log path names an existing regular file
///
/// Directories and other special files are rejected up front instead of
/// failing later with a less obvious inotify or compaction error. Symlinks
/// are followed, matching what the file watch itself does.
pub fn validate_log_file(path: &Path) -> Result<u64, LogWatchError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        LogWatchError::Validation(format!(
            "Failed to get file metadata for '{}': {}",
            path.display(),
            e
        ))
    })?;

    if !metadata.is_file() {
        return Err(LogWatchError::Validation(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }

    Ok(metadata.len())
}

/// Validate that the watch directory exists and is a directory
pub fn validate_log_dir(path: &Path) -> Result<(), LogWatchError> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(LogWatchError::Validation(format!(
            "Not a directory: {}",
            path.display()
        ))),
        Err(e) => Err(LogWatchError::Validation(format!(
            "Failed to get directory metadata for '{}': {}",
            path.display(),
            e
        ))),
    }
}
