#![allow(dead_code)]

use logwatch::events::HEADER_LEN;
use logwatch::usage::{DiskStats, FilesystemStats};
use std::cell::Cell;
use std::collections::VecDeque;
use std::io::{self, Read};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const FILE_WD: i32 = 1;
pub const DIR_WD: i32 = 2;

/// Encode one inotify record the way the kernel lays it out
pub fn record(wd: i32, mask: u32, cookie: u32, name: &str) -> Vec<u8> {
    let padded = if name.is_empty() {
        0
    } else {
        (name.len() + 1).div_ceil(HEADER_LEN) * HEADER_LEN
    };
    let mut out = Vec::with_capacity(HEADER_LEN + padded);
    out.extend_from_slice(&wd.to_ne_bytes());
    out.extend_from_slice(&mask.to_ne_bytes());
    out.extend_from_slice(&cookie.to_ne_bytes());
    out.extend_from_slice(&(padded as u32).to_ne_bytes());
    out.extend_from_slice(name.as_bytes());
    out.resize(HEADER_LEN + padded, 0);
    out
}

pub fn modified() -> Vec<u8> {
    record(FILE_WD, libc::IN_MODIFY, 0, "")
}

pub fn deleted() -> Vec<u8> {
    record(FILE_WD, libc::IN_DELETE_SELF, 0, "")
}

pub fn moved_from(cookie: u32, name: &str) -> Vec<u8> {
    record(DIR_WD, libc::IN_MOVED_FROM, cookie, name)
}

pub fn moved_to(cookie: u32, name: &str) -> Vec<u8> {
    record(DIR_WD, libc::IN_MOVED_TO, cookie, name)
}

/// Replays chunks, one per `read`, then reports end of stream
pub struct ScriptedReader {
    chunks: VecDeque<io::Result<Vec<u8>>>,
    pub reads: usize,
}

impl ScriptedReader {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self::with_results(chunks.into_iter().map(Ok).collect())
    }

    /// Like [`ScriptedReader::new`], but reads may also fail
    pub fn with_results(chunks: Vec<io::Result<Vec<u8>>>) -> Self {
        Self {
            chunks: chunks.into(),
            reads: 0,
        }
    }

    /// The whole stream, cut into chunks at the given byte offsets
    pub fn split_at(stream: &[u8], cuts: &[usize]) -> Self {
        let mut chunks = Vec::new();
        let mut from = 0;
        for &cut in cuts {
            chunks.push(stream[from..cut].to_vec());
            from = cut;
        }
        chunks.push(stream[from..].to_vec());
        Self::new(chunks)
    }
}

impl Read for ScriptedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        match self.chunks.pop_front() {
            Some(Ok(chunk)) => {
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
            Some(Err(e)) => Err(e),
            None => Ok(0),
        }
    }
}

/// Reports the same statistics on every call
pub struct FixedStats {
    pub stats: FilesystemStats,
    pub calls: Cell<usize>,
}

impl FixedStats {
    /// 100 blocks of 4 KiB with `available` of them free
    pub fn with_free_blocks(available: u64) -> Self {
        Self {
            stats: FilesystemStats {
                block_size: 4096,
                total_blocks: 100,
                available_blocks: available,
            },
            calls: Cell::new(0),
        }
    }
}

impl DiskStats for FixedStats {
    fn filesystem_stats(&self, _dir: &Path) -> logwatch::Result<FilesystemStats> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.stats)
    }
}

/// In-memory sink for a scoped tracing subscriber
#[derive(Clone, Default)]
pub struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
