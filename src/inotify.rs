//! inotify subscription.
//!
//! Watches are registered through the `inotify` crate, but reads go through
//! a duplicate of its descriptor so the watcher can do its own record
//! framing on the raw byte stream.

use crate::error::{ErrorContext, LogWatchError, Result};
use crate::events::WatchHandle;
use inotify::WatchMask;
use std::fs::File;
use std::io::{self, Read};
use std::os::fd::AsFd;
use std::path::Path;

/// Log file: content changes and removal
pub const FILE_MASK: WatchMask = WatchMask::MODIFY.union(WatchMask::DELETE_SELF);
/// Log directory: renames in and out
pub const DIR_MASK: WatchMask = WatchMask::MOVED_FROM.union(WatchMask::MOVED_TO);

#[derive(Debug)]
pub struct Inotify {
    inner: inotify::Inotify,
    /// Same open file description as `inner`
    stream: File,
}

impl Inotify {
    pub fn init() -> Result<Self> {
        let inner = inotify::Inotify::init().context("inotify_init")?;
        let stream = inner
            .as_fd()
            .try_clone_to_owned()
            .context("dup [inotify]")?;
        Ok(Self {
            inner,
            stream: File::from(stream),
        })
    }

    pub fn add_watch(&mut self, path: &Path, mask: WatchMask) -> Result<WatchHandle> {
        let wd = self
            .inner
            .watches()
            .add(path, mask)
            .map_err(|source| LogWatchError::Watch {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(WatchHandle(wd.get_watch_descriptor_id()))
    }
}

impl Read for Inotify {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}
