//! Compaction: discard the older half of the log in place.
//!
//! The log is rewritten under an exclusive `flock(2)` advisory lock. Writers
//! that take the same lock before appending see either the old or the new
//! content. Writers that append without it can have lines lost or torn while
//! a compaction is in progress; the lock is cooperative and nothing here can
//! enforce it.

use crate::error::{ErrorContext, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, info};

const COPY_BUFFER_SIZE: usize = 128 * 1024;
const SCRATCH_PREFIX: &str = "logwatch.";

/// Keep bytes `[len / 2, EOF)` of `path`, moved to offset 0.
///
/// `len` is the length observed by the usage check; anything appended since
/// is kept too. Returns the new length of the file. An empty file is left
/// untouched.
pub fn compact(path: &Path, len: u64) -> Result<u64> {
    if len == 0 {
        debug!(path = %path.display(), "log is empty, nothing to compact");
        return Ok(0);
    }

    let mut target = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .context("open [logfile]")?;
    let mut scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempfile()
        .context("create [tmpfile]")?;

    // Exclusive lock (blocks until available)
    target.lock_exclusive().context("flock locking")?;

    target
        .seek(SeekFrom::Start(len / 2))
        .context("lseek [logfile]")?;
    copy_all(&target, scratch.as_file_mut()).context("copy [logfile -> tmpfile]")?;

    target.set_len(0).context("ftruncate")?;
    target.seek(SeekFrom::Start(0)).context("lseek [logfile]")?;
    scratch
        .as_file_mut()
        .seek(SeekFrom::Start(0))
        .context("lseek [tmpfile]")?;
    let kept = copy_all(scratch.as_file(), &mut target).context("copy [tmpfile -> logfile]")?;
    target.flush().context("write [logfile]")?;

    FileExt::unlock(&target).context("flock unlocking")?;
    drop(target);
    scratch.close().context("unlink [tmpfile]")?;

    info!(
        path = %path.display(),
        original = len,
        kept,
        "compacted log"
    );

    Ok(kept)
}

fn copy_all(from: &File, to: &mut File) -> io::Result<u64> {
    let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, from);
    io::copy(&mut reader, to)
}
