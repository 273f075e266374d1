//! Decoded event records.
//!
//! One [`EventRecord`] is one `(class, code, value, timestamp)` tuple read
//! from a device's stream. Records are ephemeral: the poller consumes each
//! one immediately and folds it into the owning device's live state; nothing
//! stores them.
//!
//! ## Value conventions
//! - **Key records:** `value != 0` means pressed (`2` is the kernel's key
//!   repeat, which still reads as pressed).
//! - **Relative records:** `value` is a signed delta, accumulated per code
//!   within a poll cycle.
//! - **Absolute records:** `value` is the new raw axis position; normalize
//!   against the device's [`AbsRange`](crate::caps::AbsRange) at read time.

use std::time::SystemTime;

/// Event class of a record, decoded from the raw `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    /// Synchronization marker: ends one coalesced burst of hardware
    /// updates. Not a drain terminator.
    Sync,
    Key,
    Relative,
    Absolute,
    /// Any class this crate does not track (MSC, LED, FF, ...).
    Other(u16),
}

impl RecordKind {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            crate::codes::EV_SYN => RecordKind::Sync,
            crate::codes::EV_KEY => RecordKind::Key,
            crate::codes::EV_REL => RecordKind::Relative,
            crate::codes::EV_ABS => RecordKind::Absolute,
            other => RecordKind::Other(other),
        }
    }
}

/// One decoded record from a device stream.
#[derive(Clone, Copy, Debug)]
pub struct EventRecord {
    pub kind: RecordKind,
    pub code: u16,
    pub value: i32,
    /// Kernel-reported capture time.
    pub at: SystemTime,
}

impl EventRecord {
    pub fn new(kind: RecordKind, code: u16, value: i32) -> Self {
        Self {
            kind,
            code,
            value,
            at: SystemTime::UNIX_EPOCH,
        }
    }

    /// A `SYN_REPORT` burst boundary.
    pub fn sync() -> Self {
        Self::new(RecordKind::Sync, crate::codes::SYN_REPORT, 0)
    }

    pub fn key(code: u16, value: i32) -> Self {
        Self::new(RecordKind::Key, code, value)
    }

    pub fn relative(code: u16, value: i32) -> Self {
        Self::new(RecordKind::Relative, code, value)
    }

    pub fn absolute(code: u16, value: i32) -> Self {
        Self::new(RecordKind::Absolute, code, value)
    }
}
