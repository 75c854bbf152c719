use crate::config::Threshold;
use crate::error::{ErrorContext, Result};
use nix::sys::statvfs::statvfs;
use std::path::Path;
use tracing::debug;

/// Capacity figures for the filesystem hosting the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilesystemStats {
    pub block_size: u64,
    pub total_blocks: u64,
    /// Blocks available to unprivileged users
    pub available_blocks: u64,
}

impl FilesystemStats {
    pub fn total_bytes(&self) -> u64 {
        self.block_size.saturating_mul(self.total_blocks)
    }

    pub fn free_bytes(&self) -> u64 {
        self.block_size.saturating_mul(self.available_blocks)
    }

    /// Free-space floor: `percent * total / 100`, truncating
    pub fn barrier(&self, threshold: Threshold) -> u64 {
        let barrier = u128::from(threshold.percent()) * u128::from(self.total_bytes()) / 100;
        // percent <= 100, so the quotient never exceeds total
        barrier as u64
    }
}

/// Source of filesystem statistics for a directory
pub trait DiskStats {
    fn filesystem_stats(&self, dir: &Path) -> Result<FilesystemStats>;
}

impl<T: DiskStats + ?Sized> DiskStats for &T {
    fn filesystem_stats(&self, dir: &Path) -> Result<FilesystemStats> {
        (**self).filesystem_stats(dir)
    }
}

/// `statvfs(2)` on the given directory
#[derive(Debug, Clone, Copy, Default)]
pub struct Statvfs;

impl DiskStats for Statvfs {
    fn filesystem_stats(&self, dir: &Path) -> Result<FilesystemStats> {
        let stat = statvfs(dir)
            .map_err(std::io::Error::from)
            .context("statvfs")?;

        // f_blocks and f_bavail are counted in fragment-size units.
        Ok(FilesystemStats {
            block_size: stat.fragment_size() as u64,
            total_blocks: stat.blocks() as u64,
            available_blocks: stat.blocks_available() as u64,
        })
    }
}

/// Outcome of one usage evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageReport {
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub barrier_bytes: u64,
    /// Current length of the log file
    pub log_len: u64,
    /// Free space is at or below the barrier
    pub triggered: bool,
}

/// Compare free space against the barrier and read the log's current length.
pub fn evaluate(
    log_path: &Path,
    stats: &FilesystemStats,
    threshold: Threshold,
) -> Result<UsageReport> {
    let total_bytes = stats.total_bytes();
    let free_bytes = stats.free_bytes();
    let barrier_bytes = stats.barrier(threshold);
    let log_len = std::fs::metadata(log_path).context("stat")?.len();

    debug!(
        total = total_bytes,
        free = free_bytes,
        barrier = barrier_bytes,
        threshold = %threshold,
        log_size = log_len,
        "usage check"
    );

    Ok(UsageReport {
        total_bytes,
        free_bytes,
        barrier_bytes,
        log_len,
        triggered: free_bytes <= barrier_bytes,
    })
}
