//! Device metadata snapshot.
//!
//! [`DeviceMeta`] is a lightweight, cloneable description of a device
//! suitable for logging, diagnostics, and UI display. The event source
//! populates what the kernel reports; unknown fields remain `None`.
//!
//! `path` is the resolved device node and doubles as the duplicate-open
//! key; the id fields (`bus`/`vendor`/`product`/`version`) come from the
//! kernel device-id query and are stable across reconnects, so treat them
//! as identity first and `path` as diagnostic first.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Snapshot of metadata describing a single device.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Resolved device node path (e.g. `/dev/input/event3`).
    pub path: PathBuf,

    /// Kernel-reported device name, when available.
    pub name: Option<String>,

    /// Bus type (`BUS_USB` = 0x03, `BUS_BLUETOOTH` = 0x05, ...).
    pub bus: Option<u16>,

    /// Vendor ID, if known.
    pub vendor: Option<u16>,

    /// Product ID, if known.
    pub product: Option<u16>,

    /// Driver-reported version, if known.
    pub version: Option<u16>,
}

impl DeviceMeta {
    /// Best display label: the kernel name, falling back to the path.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.path.display().to_string(),
        }
    }
}
