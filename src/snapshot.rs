//! Per-tick snapshot of device states for one role.
//!
//! [`RoleSnapshot`] is an **owned**, read-only view of every active device
//! of a role at a point in time (typically "this frame"). It is produced by
//! [`Manager::snapshot`](crate::manager::Manager::snapshot) and is cheap to
//! clone for fan-out to multiple consumers.
//!
//! # Semantics
//! - A snapshot is **immutable**: it never touches registry membership or
//!   live state. To refresh, `poll()` and take a new snapshot.
//! - Relative deltas are "since the start of the cycle that produced this
//!   snapshot"; the poller resets them at the start of the *next* cycle, so
//!   reading a snapshot twice is safe and a quiet cycle reads as `(0, 0)`.
//! - Axis values are raw device units; [`DeviceView::axis_normalized`] maps
//!   them into `[-1.0, 1.0]` against the device's probed range.

use crate::caps::AbsRange;
use crate::classify::Role;
use crate::codes::{REL_X, REL_Y};
use crate::registry::Registry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Read-only copy of one device's current state.
#[derive(Clone, Debug)]
pub struct DeviceView {
    path: PathBuf,
    name: Option<String>,
    axes: HashMap<u16, i32>,
    ranges: HashMap<u16, AbsRange>,
    deltas: HashMap<u16, i32>,
    keys: HashMap<u16, bool>,
}

impl DeviceView {
    /// Device node path.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Kernel-reported name, when known.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Raw value of an absolute axis, if the device has it.
    #[inline]
    pub fn axis(&self, code: u16) -> Option<i32> {
        self.axes.get(&code).copied()
    }

    /// Axis value normalized into `[-1.0, 1.0]` against the probed range.
    pub fn axis_normalized(&self, code: u16) -> Option<f32> {
        let raw = self.axis(code)?;
        let range = self.ranges.get(&code)?;
        Some(range.normalize(raw))
    }

    /// Probed range of an absolute axis.
    #[inline]
    pub fn axis_range(&self, code: u16) -> Option<&AbsRange> {
        self.ranges.get(&code)
    }

    /// Accumulated relative delta for one code this cycle (0 if none).
    #[inline]
    pub fn delta(&self, code: u16) -> i32 {
        self.deltas.get(&code).copied().unwrap_or(0)
    }

    /// Convenience: the classic pointer `(REL_X, REL_Y)` motion pair.
    #[inline]
    pub fn motion(&self) -> (i32, i32) {
        (self.delta(REL_X), self.delta(REL_Y))
    }

    /// Current state of a key or button (false if never seen).
    #[inline]
    pub fn pressed(&self, code: u16) -> bool {
        self.keys.get(&code).copied().unwrap_or(false)
    }

    /// Codes currently held down, in no particular order.
    pub fn pressed_codes(&self) -> impl Iterator<Item = u16> + '_ {
        self.keys
            .iter()
            .filter_map(|(&code, &down)| down.then_some(code))
    }

    /// Axis codes present on this device, in no particular order.
    pub fn axis_codes(&self) -> impl Iterator<Item = u16> + '_ {
        self.axes.keys().copied()
    }
}

/// Owned snapshot of every active device of one role.
#[derive(Clone, Debug)]
pub struct RoleSnapshot {
    role: Role,
    devices: Vec<DeviceView>,
}

impl RoleSnapshot {
    /// Copy the current state of every device of `role` out of the
    /// registry.
    pub(crate) fn capture(registry: &Registry, role: Role) -> Self {
        let devices = registry
            .iter_role(role)
            .map(|(_, dev)| DeviceView {
                path: dev.path().to_owned(),
                name: dev.meta().name.clone(),
                axes: dev.state().axes().clone(),
                ranges: dev.absolute_ranges().clone(),
                deltas: dev.state().deltas().clone(),
                keys: dev.state().keys().clone(),
            })
            .collect();
        Self { role, devices }
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn devices(&self) -> &[DeviceView] {
        &self.devices
    }

    /// Find a device by node path.
    pub fn get(&self, path: &Path) -> Option<&DeviceView> {
        self.devices.iter().find(|view| view.path == path)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &DeviceView> {
        self.devices.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
