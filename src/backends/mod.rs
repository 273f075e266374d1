//! Event sources for `evstick`.
//!
//! An [`EventSource`] supplies the primitive operations the core consumes
//! from the OS input subsystem: enumerate candidate nodes, open a node
//! non-blocking, query capability bitsets and absolute-axis ranges, read one
//! event record, and close a handle. Everything above this trait —
//! probing, classification, the registry, the poller — is OS-agnostic.
//!
//! # Feature flags
//! - **`evdev`** — enables the Linux evdev backend (default in this build).
//! - **`debug-log`** — verbose open/close tracing for device bring-up.
//!
//! The [`mock`] source is always available; tests and non-Linux builds use
//! it to script device trees and event streams.

use crate::caps::{AbsRange, CodeSet, EventClass};
use crate::event::EventRecord;
use crate::metadata::DeviceMeta;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(all(feature = "evdev", target_os = "linux"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "evdev", target_os = "linux"))))]
pub mod evdev;

pub mod mock;

/// Opaque device handle: a file descriptor on Linux, a slot index for the
/// mock. Exclusively owned by the [`Device`](crate::device::Device) it is
/// stored in; closed exactly once via [`EventSource::close`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawHandle(pub i32);

/// Result of one non-blocking read attempt.
#[derive(Debug)]
pub enum ReadOutcome {
    /// One decoded record; keep draining.
    Record(EventRecord),
    /// Nothing queued right now. Expected steady state, not an error.
    NoData,
    /// Hard read failure; the poller treats the device as disconnected.
    Failed(io::Error),
}

/// Primitive operations the core consumes from the OS input subsystem.
pub trait EventSource {
    /// List candidate device nodes. The core filters for the event-device
    /// name prefix; the source only enumerates.
    fn enumerate(&mut self) -> io::Result<Vec<PathBuf>>;

    /// Open a node for non-blocking reads.
    fn open(&mut self, path: &Path) -> io::Result<RawHandle>;

    /// Query the supported-code bitset for one event class.
    fn query_bits(&mut self, handle: RawHandle, class: EventClass) -> io::Result<CodeSet>;

    /// Query (min, max, value, resolution, flat) for one absolute axis.
    fn query_abs_range(&mut self, handle: RawHandle, code: u16) -> io::Result<AbsRange>;

    /// Read one queued event record without blocking.
    fn read_event(&mut self, handle: RawHandle) -> ReadOutcome;

    /// Best-effort identity snapshot; failures leave fields `None`.
    fn identity(&mut self, handle: RawHandle, path: &Path) -> DeviceMeta;

    /// Close a handle. Must be called exactly once per successful `open`.
    fn close(&mut self, handle: RawHandle);
}
