//! Consumer-facing surface: scan once, poll every tick, snapshot on demand.
//!
//! A [`Manager`] owns the event source and the registry, and is the only
//! place handles are opened and closed. The host integration is three
//! calls:
//!
//! ```no_run
//! use evstick::{Manager, Role};
//!
//! let (mut mgr, report) = Manager::discover();
//! println!("{} device(s) registered", report.registered);
//! loop {
//!     for note in mgr.poll() {
//!         println!("poll note: {note:?}");
//!     }
//!     let sticks = mgr.snapshot(Role::Joystick);
//!     // ... feed sticks into the frame ...
//! #   break;
//! }
//! ```
//!
//! Single-threaded by design: one polling pass per host tick, no blocking
//! reads, no internal locking. A multi-threaded host wraps the whole
//! manager in its own mutual exclusion; none of the internals are
//! reentrant-safe.

use crate::backends::EventSource;
use crate::classify::{classify, Role};
use crate::config::ManagerConfig;
use crate::device::Device;
use crate::error::InputError;
use crate::poller::{self, PollNote};
use crate::probe;
use crate::registry::{DeviceId, Registry};
use crate::snapshot::RoleSnapshot;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Event-device node name prefix the scan accepts.
const EVENT_PREFIX: &str = "event";

/// Outcome of one [`Manager::init`] scan. Per-device failures are collected
/// here; no candidate ever aborts the pass.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Devices admitted to the registry.
    pub registered: usize,
    /// Probed fine but matched no role; closed again, not an error.
    pub unclassified: usize,
    /// Candidates skipped, with the reason.
    pub skipped: Vec<(PathBuf, InputError)>,
}

pub struct Manager<S: EventSource> {
    source: S,
    registry: Registry,
    config: ManagerConfig,
}

impl<S: EventSource> Manager<S> {
    /// Build a manager over an explicit source. No scan happens yet; call
    /// [`init`](Manager::init).
    pub fn with_source(source: S, config: ManagerConfig) -> Self {
        let registry = Registry::new(config.capacity_per_role);
        Self {
            source,
            registry,
            config,
        }
    }

    /// One-time directory scan: probe, classify, and register every
    /// event-device candidate. Always completes the full pass; per-device
    /// failures land in the report.
    ///
    /// Calling it again re-scans; nodes already registered are skipped.
    pub fn init(&mut self) -> ScanReport {
        let mut report = ScanReport::default();

        let candidates = match self.source.enumerate() {
            Ok(paths) => paths,
            Err(err) => {
                warn!("device scan failed: {err}");
                return report;
            }
        };

        for path in candidates {
            let is_event_node = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(EVENT_PREFIX));
            if !is_event_node {
                continue;
            }

            if self.registry.contains_path(&path) {
                debug!("{}: already active, skipping", path.display());
                report
                    .skipped
                    .push((path.clone(), InputError::AlreadyRegistered(path)));
                continue;
            }

            let shown = path.clone();
            match self.admit(path) {
                Ok(Some(_)) => report.registered += 1,
                Ok(None) => report.unclassified += 1,
                Err(err) => {
                    warn!("{}: {err}", shown.display());
                    report.skipped.push((shown, err));
                }
            }
        }

        info!(
            "input scan: {} registered, {} unclassified, {} skipped",
            report.registered,
            report.unclassified,
            report.skipped.len()
        );
        report
    }

    /// Open, probe, classify, and register one candidate.
    ///
    /// Every failure path that still owns the open handle closes it before
    /// returning; nothing here may leak a descriptor.
    fn admit(&mut self, path: PathBuf) -> Result<Option<DeviceId>, InputError> {
        let handle = match self.source.open(&path) {
            Ok(handle) => handle,
            Err(source) => return Err(InputError::OpenFailed { path, source }),
        };

        let probed = match probe::probe(&mut self.source, handle) {
            Ok(probed) => probed,
            Err(err) => {
                self.source.close(handle);
                return Err(err);
            }
        };

        let role = classify(&path, &probed.caps);
        if !role.is_pollable() {
            debug!("{}: unclassified, closing", path.display());
            self.source.close(handle);
            return Ok(None);
        }

        let meta = self.source.identity(handle, &path);
        info!("{}: {:?} \"{}\"", path.display(), role, meta.label());

        let device = Device::new(handle, path, role, probed.caps, probed.ranges, meta);
        match self.registry.register(device) {
            Ok(id) => Ok(Some(id)),
            Err(rejection) => {
                self.source.close(rejection.device.handle());
                Err(rejection.reason)
            }
        }
    }

    /// One tick: drain every registered device without blocking. Returns
    /// the cycle's non-fatal notes (disconnects, drain caps).
    pub fn poll(&mut self) -> Vec<PollNote> {
        poller::poll_all(&mut self.registry, &mut self.source, self.config.drain_cap)
    }

    /// Read-only view of the current state of every device of `role`.
    pub fn snapshot(&self, role: Role) -> RoleSnapshot {
        RoleSnapshot::capture(&self.registry, role)
    }

    /// Remove one device by id, closing its handle.
    pub fn remove(&mut self, id: DeviceId) -> bool {
        match self.registry.unregister(id) {
            Some(device) => {
                self.source.close(device.handle());
                true
            }
            None => false,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Iterate `(id, device)` for diagnostics and UI listings.
    pub fn devices(&self) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.registry.iter()
    }
}

impl<S: EventSource> Drop for Manager<S> {
    /// Teardown closes every remaining handle exactly once.
    fn drop(&mut self) {
        for device in self.registry.drain_all() {
            self.source.close(device.handle());
        }
    }
}

#[cfg(all(feature = "evdev", target_os = "linux"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "evdev", target_os = "linux"))))]
impl Manager<crate::backends::evdev::EvdevSource> {
    /// Scan `/dev/input` with default configuration.
    pub fn discover() -> (Self, ScanReport) {
        Self::discover_with(ManagerConfig::default())
    }

    /// Scan with an explicit configuration (directory, capacities).
    pub fn discover_with(config: ManagerConfig) -> (Self, ScanReport) {
        let source = crate::backends::evdev::EvdevSource::with_dir(config.device_dir.clone());
        let mut manager = Manager::with_source(source, config);
        let report = manager.init();
        (manager, report)
    }
}
