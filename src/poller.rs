//! Non-blocking drain pass over every registered device.
//!
//! One call to [`poll_all`] is one application tick. Per device: reset the
//! relative deltas, then read records until the stream reports no data.
//! Synchronization markers only close a coalesced burst — they never stop
//! the drain, so a flood of queued events cannot back up across cycles.
//! A hard read failure means the device is gone: it is unregistered and
//! its handle closed on the same cycle, and the pass moves on.

use crate::backends::{EventSource, ReadOutcome};
use crate::classify::Role;
use crate::registry::Registry;
use log::{debug, warn};
use std::path::PathBuf;

/// Non-fatal outcome of one poll pass, reported to the caller.
#[derive(Debug)]
pub enum PollNote {
    /// Read failure mid-poll; the device was removed and its handle closed.
    Disconnected { path: PathBuf, role: Role },
    /// The per-device drain cap was hit; remaining records stay queued for
    /// the next cycle.
    DrainCapped { path: PathBuf },
}

/// Drain all pollable devices once. Never blocks, never fails the pass.
pub fn poll_all<S: EventSource>(
    registry: &mut Registry,
    source: &mut S,
    drain_cap: usize,
) -> Vec<PollNote> {
    let mut notes = Vec::new();

    for id in registry.ids() {
        let Some(device) = registry.get_mut(id) else {
            continue;
        };
        if !device.role().is_pollable() {
            continue;
        }

        let handle = device.handle();
        let path = device.path().to_owned();
        device.begin_cycle();

        let mut drained = 0usize;
        let mut disconnected = false;
        loop {
            if drained >= drain_cap {
                warn!("{}: drain cap ({drain_cap}) hit, deferring backlog", path.display());
                notes.push(PollNote::DrainCapped { path: path.clone() });
                break;
            }
            match source.read_event(handle) {
                ReadOutcome::Record(record) => {
                    drained += 1;
                    device.apply(&record);
                }
                ReadOutcome::NoData => break,
                ReadOutcome::Failed(err) => {
                    debug!("{}: read failed ({err}), dropping device", path.display());
                    disconnected = true;
                    break;
                }
            }
        }

        if disconnected {
            if let Some(dead) = registry.unregister(id) {
                source.close(dead.handle());
                warn!("{}: disconnected, handle closed", path.display());
                notes.push(PollNote::Disconnected {
                    path,
                    role: dead.role(),
                });
            }
        }
    }

    notes
}
