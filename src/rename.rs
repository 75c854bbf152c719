use crate::events::{EventMask, FilesystemEvent};
use std::ffi::{OsStr, OsString};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameState {
    Tracking,
    /// A MovedFrom for the tracked name was seen; waiting for its MovedTo
    PendingMove { cookie: u32 },
}

/// A confirmed rename of the tracked log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub from: OsString,
    pub to: OsString,
}

/// Follows the tracked log's name through renames inside its directory.
///
/// Only one pending move is remembered. A second MovedFrom of the tracked
/// name before the first one's MovedTo arrives replaces the pending cookie,
/// so the earlier rename is never matched.
#[derive(Debug, Clone)]
pub struct RenameTracker {
    name: OsString,
    state: RenameState,
}

impl RenameTracker {
    pub fn new(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            state: RenameState::Tracking,
        }
    }

    /// The log's current file name
    pub fn tracked_name(&self) -> &OsStr {
        &self.name
    }

    pub fn state(&self) -> RenameState {
        self.state
    }

    /// Feed one directory event. Returns the rename when it completes a
    /// pending move.
    pub fn observe(&mut self, event: &FilesystemEvent) -> Option<Renamed> {
        let name = event.name()?;

        if event.mask.contains(EventMask::MOVED_FROM) && name == self.name.as_os_str() {
            self.state = RenameState::PendingMove {
                cookie: event.cookie,
            };
        }

        if !event.mask.contains(EventMask::MOVED_TO) {
            return None;
        }
        match self.state {
            RenameState::PendingMove { cookie } if cookie == event.cookie => {
                let renamed = Renamed {
                    from: std::mem::replace(&mut self.name, name.to_os_string()),
                    to: name.to_os_string(),
                };
                self.state = RenameState::Tracking;
                debug!(
                    from = %renamed.from.to_string_lossy(),
                    to = %renamed.to.to_string_lossy(),
                    "rename"
                );
                Some(renamed)
            }
            _ => None,
        }
    }
}
