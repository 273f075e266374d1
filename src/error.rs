//! Error kinds for device admission and polling.
//!
//! None of these abort a scan or a poll pass; `init()` and `poll()` always
//! complete a full pass and collect per-device outcomes instead of failing
//! fast.

use crate::classify::Role;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    /// Opening the device node failed. The path is skipped, not retried.
    #[error("failed to open {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A capability query failed. The device is treated as inert, not retried.
    #[error("device capability query failed: {0}")]
    DeviceUnreadable(#[source] std::io::Error),

    /// The role's bounded set is full. The device is skipped until an
    /// existing device of that role is removed.
    #[error("{role:?} set is full ({capacity} devices)")]
    CapacityExceeded { role: Role, capacity: usize },

    /// The same resolved path is already active; prevents polling one
    /// physical device twice.
    #[error("device already registered: {0}")]
    AlreadyRegistered(PathBuf),

    /// A read failed mid-poll. The device is removed and its handle closed
    /// on the same cycle; reported as a poll note, never a hard failure.
    #[error("device disconnected: {0}")]
    Disconnected(PathBuf),
}
