use crate::config::{Threshold, WatchConfig};
use crate::error::Result;
use crate::events::{Decoded, EventDecoder, EventMask, FilesystemEvent, WatchHandle};
use crate::inotify::{Inotify, DIR_MASK, FILE_MASK};
use crate::rename::RenameTracker;
use crate::truncate;
use crate::usage::{self, DiskStats, Statvfs};
use crate::validation::{validate_log_dir, validate_log_file};
use std::ffi::OsStr;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

/// Why the watcher stopped without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The guarded log was deleted; there is nothing left to watch
    LogDeleted,
}

/// A path and the watch registered on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    pub path: PathBuf,
    pub handle: WatchHandle,
}

enum Flow {
    Continue,
    Stop(ExitReason),
}

/// Guards one log file until it is deleted.
///
/// Owns the event stream, the decoder cursor over it, both watch targets and
/// the rename tracker holding the log's current name. The file watch follows
/// the inode across renames, so only the name used for `stat` and compaction
/// changes when the log is rotated.
#[derive(Debug)]
pub struct LogWatcher<R = Inotify, P = Statvfs> {
    source: R,
    decoder: EventDecoder,
    file: WatchTarget,
    dir: WatchTarget,
    tracker: RenameTracker,
    threshold: Threshold,
    disk: P,
    compactions: u64,
}

impl LogWatcher {
    /// Register the file and directory watches described by `config`.
    pub fn open(config: &WatchConfig) -> Result<Self> {
        let log_path = config.log_path();
        validate_log_dir(&config.log_dir)?;
        validate_log_file(&log_path)?;

        let mut inotify = Inotify::init()?;
        let file = WatchTarget {
            handle: inotify.add_watch(&log_path, FILE_MASK)?,
            path: log_path,
        };
        let dir = WatchTarget {
            handle: inotify.add_watch(&config.log_dir, DIR_MASK)?,
            path: config.log_dir.clone(),
        };
        debug!(file = %file.handle, dir = %dir.handle, "watches registered");

        Ok(Self::with_parts(inotify, Statvfs, file, dir, config))
    }
}

impl<R: Read, P: DiskStats> LogWatcher<R, P> {
    /// Build a watcher over an existing event stream and statistics source.
    pub fn with_parts(
        source: R,
        disk: P,
        file: WatchTarget,
        dir: WatchTarget,
        config: &WatchConfig,
    ) -> Self {
        Self {
            source,
            decoder: EventDecoder::new(),
            file,
            dir,
            tracker: RenameTracker::new(config.log_name.clone()),
            threshold: config.threshold,
            disk,
            compactions: 0,
        }
    }

    /// The log's current file name
    pub fn tracked_name(&self) -> &OsStr {
        self.tracker.tracked_name()
    }

    /// Current full path of the log
    pub fn log_path(&self) -> PathBuf {
        self.dir.path.join(self.tracker.tracked_name())
    }

    /// Number of compactions performed so far
    pub fn compactions(&self) -> u64 {
        self.compactions
    }

    /// Process events until the log is deleted or an error occurs.
    ///
    /// Every complete record already buffered is dispatched before the next
    /// blocking read.
    pub fn run(&mut self) -> Result<ExitReason> {
        info!(
            path = %self.log_path().display(),
            threshold = %self.threshold,
            "watching log"
        );

        loop {
            self.decoder.fill_from(&mut self.source)?;
            while let Decoded::Event(event) = self.decoder.try_decode_one()? {
                if let Flow::Stop(reason) = self.dispatch(&event)? {
                    return Ok(reason);
                }
            }
        }
    }

    fn dispatch(&mut self, event: &FilesystemEvent) -> Result<Flow> {
        if event.mask.contains(EventMask::OVERFLOW) {
            warn!("inotify queue overflowed, events were dropped");
            return Ok(Flow::Continue);
        }

        if event.watch == self.file.handle {
            if event.mask.contains(EventMask::DELETED) {
                info!(path = %self.log_path().display(), "log deleted");
                return Ok(Flow::Stop(ExitReason::LogDeleted));
            }
            if event.mask.contains(EventMask::MODIFIED) {
                trace!(path = %self.log_path().display(), "modified");
                self.check_usage()?;
            }
        } else if event.watch == self.dir.handle {
            self.tracker.observe(event);
        } else {
            trace!(watch = %event.watch, "event for unknown watch");
        }

        Ok(Flow::Continue)
    }

    fn check_usage(&mut self) -> Result<()> {
        let stats = self.disk.filesystem_stats(&self.dir.path)?;
        let log_path = self.log_path();
        let report = usage::evaluate(&log_path, &stats, self.threshold)?;

        if report.triggered {
            info!(
                free = report.free_bytes,
                barrier = report.barrier_bytes,
                "free space at or below barrier, compacting log"
            );
            truncate::compact(&log_path, report.log_len)?;
            self.compactions += 1;
        }

        Ok(())
    }
}
