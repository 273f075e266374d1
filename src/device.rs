//! One OS input handle and its live state.
//!
//! A [`Device`] owns its handle exclusively; the handle is closed exactly
//! once, by whoever removes the device from the registry (or by manager
//! teardown). `capabilities` and `absolute_ranges` are write-once at
//! construction. `live_state` is mutated only by the poller, which is why
//! [`begin_cycle`](Device::begin_cycle) and [`apply`](Device::apply) are
//! crate-private.

use crate::backends::RawHandle;
use crate::caps::{AbsRange, Capabilities};
use crate::classify::Role;
use crate::event::{EventRecord, RecordKind};
use crate::metadata::DeviceMeta;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Mutable per-device input state, owned by the device and written by the
/// poller.
#[derive(Clone, Debug, Default)]
pub struct LiveState {
    keys: HashMap<u16, bool>,
    axes: HashMap<u16, i32>,
    /// Accumulated relative motion since the start of the current poll
    /// cycle, per relative code.
    deltas: HashMap<u16, i32>,
}

impl LiveState {
    pub fn pressed(&self, code: u16) -> bool {
        self.keys.get(&code).copied().unwrap_or(false)
    }

    pub fn axis(&self, code: u16) -> Option<i32> {
        self.axes.get(&code).copied()
    }

    pub fn delta(&self, code: u16) -> i32 {
        self.deltas.get(&code).copied().unwrap_or(0)
    }

    pub fn keys(&self) -> &HashMap<u16, bool> {
        &self.keys
    }

    pub fn axes(&self) -> &HashMap<u16, i32> {
        &self.axes
    }

    pub fn deltas(&self) -> &HashMap<u16, i32> {
        &self.deltas
    }
}

/// One registered input device.
#[derive(Debug)]
pub struct Device {
    handle: RawHandle,
    path: PathBuf,
    role: Role,
    capabilities: Capabilities,
    absolute_ranges: HashMap<u16, AbsRange>,
    meta: DeviceMeta,
    state: LiveState,
}

impl Device {
    /// Assemble a device from probe output. `role` is fixed from here on.
    ///
    /// Axis state is seeded from each range's probe-time `value`, so a
    /// snapshot taken before the first event still reports real positions.
    pub fn new(
        handle: RawHandle,
        path: PathBuf,
        role: Role,
        capabilities: Capabilities,
        absolute_ranges: HashMap<u16, AbsRange>,
        meta: DeviceMeta,
    ) -> Self {
        let mut state = LiveState::default();
        for (&code, range) in &absolute_ranges {
            state.axes.insert(code, range.value);
        }
        Self {
            handle,
            path,
            role,
            capabilities,
            absolute_ranges,
            meta,
            state,
        }
    }

    pub fn handle(&self) -> RawHandle {
        self.handle
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn absolute_ranges(&self) -> &HashMap<u16, AbsRange> {
        &self.absolute_ranges
    }

    pub fn abs_range(&self, code: u16) -> Option<&AbsRange> {
        self.absolute_ranges.get(&code)
    }

    pub fn meta(&self) -> &DeviceMeta {
        &self.meta
    }

    pub fn state(&self) -> &LiveState {
        &self.state
    }

    /// Start a poll cycle: deltas become "since this cycle".
    pub(crate) fn begin_cycle(&mut self) {
        self.state.deltas.clear();
    }

    /// Fold one record into the live state.
    ///
    /// Key records are last-write-wins within a burst; relative records
    /// accumulate; absolute records overwrite. Sync markers only close a
    /// coalesced burst and are no-ops here, so the caller keeps draining.
    pub(crate) fn apply(&mut self, record: &EventRecord) {
        match record.kind {
            RecordKind::Key => {
                self.state.keys.insert(record.code, record.value != 0);
            }
            RecordKind::Relative => {
                *self.state.deltas.entry(record.code).or_insert(0) += record.value;
            }
            RecordKind::Absolute => {
                self.state.axes.insert(record.code, record.value);
            }
            RecordKind::Sync | RecordKind::Other(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{ABS_X, REL_X, REL_Y};

    fn bare_device() -> Device {
        Device::new(
            RawHandle(3),
            PathBuf::from("/dev/input/event3"),
            Role::Joystick,
            Capabilities::default(),
            HashMap::new(),
            DeviceMeta::default(),
        )
    }

    #[test]
    fn key_records_are_last_write_wins() {
        let mut dev = bare_device();
        dev.apply(&EventRecord::key(288, 1));
        dev.apply(&EventRecord::key(288, 0));
        assert!(!dev.state().pressed(288));
    }

    #[test]
    fn relative_records_accumulate_until_cycle_reset() {
        let mut dev = bare_device();
        dev.begin_cycle();
        dev.apply(&EventRecord::relative(REL_X, 3));
        dev.apply(&EventRecord::relative(REL_Y, -2));
        dev.apply(&EventRecord::relative(REL_X, 1));
        assert_eq!(dev.state().delta(REL_X), 4);
        assert_eq!(dev.state().delta(REL_Y), -2);

        dev.begin_cycle();
        assert_eq!(dev.state().delta(REL_X), 0);
        assert_eq!(dev.state().delta(REL_Y), 0);
    }

    #[test]
    fn sync_records_do_not_touch_state() {
        let mut dev = bare_device();
        dev.apply(&EventRecord::absolute(ABS_X, 12));
        dev.apply(&EventRecord::sync());
        assert_eq!(dev.state().axis(ABS_X), Some(12));
    }

    #[test]
    fn axis_state_is_seeded_from_ranges() {
        let mut ranges = HashMap::new();
        ranges.insert(
            ABS_X,
            AbsRange {
                minimum: 0,
                maximum: 255,
                value: 128,
                ..AbsRange::default()
            },
        );
        let dev = Device::new(
            RawHandle(4),
            PathBuf::from("/dev/input/event4"),
            Role::Joystick,
            Capabilities::default(),
            ranges,
            DeviceMeta::default(),
        );
        assert_eq!(dev.state().axis(ABS_X), Some(128));
    }
}
