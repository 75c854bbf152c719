use std::ffi::{OsStr, OsString};
use std::fmt;
use std::ops::BitOr;

/// Kernel watch descriptor identifying one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchHandle(pub i32);

impl fmt::Display for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wd {}", self.0)
    }
}

/// The subset of inotify event bits the watcher reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventMask(u8);

impl EventMask {
    pub const MODIFIED: Self = Self(1 << 0);
    /// File deleted, or its watch removed by the kernel
    pub const DELETED: Self = Self(1 << 1);
    pub const MOVED_FROM: Self = Self(1 << 2);
    pub const MOVED_TO: Self = Self(1 << 3);
    /// Kernel event queue overflowed; events were dropped
    pub const OVERFLOW: Self = Self(1 << 4);

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Map a raw `inotify_event.mask` onto the bits we care about
    pub fn from_kernel(raw: u32) -> Self {
        let mut mask = Self::empty();
        if raw & libc::IN_MODIFY != 0 {
            mask = mask | Self::MODIFIED;
        }
        if raw & (libc::IN_DELETE_SELF | libc::IN_IGNORED) != 0 {
            mask = mask | Self::DELETED;
        }
        if raw & libc::IN_MOVED_FROM != 0 {
            mask = mask | Self::MOVED_FROM;
        }
        if raw & libc::IN_MOVED_TO != 0 {
            mask = mask | Self::MOVED_TO;
        }
        if raw & libc::IN_Q_OVERFLOW != 0 {
            mask = mask | Self::OVERFLOW;
        }
        mask
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for EventMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One decoded change event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemEvent {
    pub watch: WatchHandle,
    pub mask: EventMask,
    /// Pairs a MovedFrom with its MovedTo; zero for other events
    pub cookie: u32,
    /// Entry name, present only for events reported on a directory watch
    pub name: Option<OsString>,
}

impl FilesystemEvent {
    pub fn name(&self) -> Option<&OsStr> {
        self.name.as_deref()
    }
}
