use super::types::{EventMask, FilesystemEvent, WatchHandle};
use crate::error::{LogWatchError, Result};
use std::ffi::OsStr;
use std::io::{self, Read};
use std::os::unix::ffi::OsStrExt;

/// Size of the fixed `inotify_event` header preceding each name
pub const HEADER_LEN: usize = std::mem::size_of::<libc::inotify_event>();

const NAME_MAX: usize = 255;

/// Largest record the kernel emits: header plus a NUL-terminated `NAME_MAX` name
pub const MAX_RECORD_LEN: usize = HEADER_LEN + NAME_MAX + 1;

const DEFAULT_CAPACITY: usize = 16 * MAX_RECORD_LEN;

/// Result of one decode attempt
#[derive(Debug, PartialEq, Eq)]
pub enum Decoded {
    Event(FilesystemEvent),
    /// The bytes at the cursor do not yet form a complete record
    NeedMoreBytes,
}

/// Cursor over a fixed buffer of raw inotify records.
///
/// Bytes in `buf[start..end]` are read but not yet decoded. Decoding only
/// advances `start`; a partial record left at the end of a batch is moved to
/// the buffer origin by the next [`fill_from`](Self::fill_from), so already
/// dispatched bytes are never looked at twice.
#[derive(Debug)]
pub struct EventDecoder {
    buf: Box<[u8]>,
    start: usize,
    end: usize,
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Capacity is raised to at least one maximal record.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity.max(MAX_RECORD_LEN)].into_boxed_slice(),
            start: 0,
            end: 0,
        }
    }

    /// Number of bytes read but not yet decoded
    pub fn buffered(&self) -> usize {
        self.end - self.start
    }

    /// Decode the record at the cursor, if it is complete.
    pub fn try_decode_one(&mut self) -> Result<Decoded> {
        let pending = &self.buf[self.start..self.end];
        if pending.len() < HEADER_LEN {
            return Ok(Decoded::NeedMoreBytes);
        }

        let wd = i32::from_ne_bytes(field(pending, 0));
        let mask = u32::from_ne_bytes(field(pending, 4));
        let cookie = u32::from_ne_bytes(field(pending, 8));
        let name_len = u32::from_ne_bytes(field(pending, 12)) as usize;

        let record_len = HEADER_LEN + name_len;
        if record_len > self.buf.len() {
            return Err(LogWatchError::Decode(format!(
                "record of {} bytes exceeds the {} byte event buffer",
                record_len,
                self.buf.len()
            )));
        }
        if pending.len() < record_len {
            return Ok(Decoded::NeedMoreBytes);
        }

        // The name is NUL-padded up to `name_len`.
        let raw_name = &pending[HEADER_LEN..record_len];
        let raw_name = raw_name
            .iter()
            .position(|b| *b == 0)
            .map_or(raw_name, |nul| &raw_name[..nul]);
        let name = (!raw_name.is_empty()).then(|| OsStr::from_bytes(raw_name).to_os_string());

        let event = FilesystemEvent {
            watch: WatchHandle(wd),
            mask: EventMask::from_kernel(mask),
            cookie,
            name,
        };

        self.start += record_len;
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        }

        Ok(Decoded::Event(event))
    }

    /// Move leftover bytes to the origin and append one read after them.
    ///
    /// Blocks until `reader` produces data. Interrupted reads are retried; a
    /// zero-length read means the stream ended and is an error.
    pub fn fill_from<R: Read>(&mut self, reader: &mut R) -> Result<usize> {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }

        loop {
            match reader.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    return Err(LogWatchError::Io {
                        context: "read [inotify]".to_string(),
                        source: io::Error::from(io::ErrorKind::UnexpectedEof),
                    })
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(LogWatchError::Io {
                        context: "read [inotify]".to_string(),
                        source,
                    })
                }
            }
        }
    }
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn field(bytes: &[u8], at: usize) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(&bytes[at..at + 4]);
    out
}
