//! Scripted event source for tests and demos.
//!
//! [`MockSource`] plays back a device tree and per-device event scripts
//! through the same [`EventSource`] contract the evdev backend implements,
//! so the probe → classify → register → poll pipeline can be exercised
//! without hardware. Handles are slot indices; state lives behind a shared
//! `Rc`, so a clone of the source kept by a test can still inspect open
//! flags and close counts after the manager is dropped.

use crate::backends::{EventSource, RawHandle, ReadOutcome};
use crate::caps::{AbsRange, CodeSet, EventClass};
use crate::event::EventRecord;
use crate::metadata::DeviceMeta;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Bus type reported for scripted devices (`BUS_VIRTUAL`).
const MOCK_BUS: u16 = 0x06;

/// Description of one scripted device.
pub struct MockDevice {
    path: PathBuf,
    name: String,
    keys: Vec<u16>,
    relative: Vec<u16>,
    absolute: Vec<(u16, AbsRange)>,
    unreadable: bool,
}

impl MockDevice {
    pub fn new(path: &str, name: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            name: name.to_string(),
            keys: Vec::new(),
            relative: Vec::new(),
            absolute: Vec::new(),
            unreadable: false,
        }
    }

    pub fn with_keys(mut self, codes: &[u16]) -> Self {
        self.keys.extend_from_slice(codes);
        self
    }

    pub fn with_relative(mut self, codes: &[u16]) -> Self {
        self.relative.extend_from_slice(codes);
        self
    }

    pub fn with_absolute(mut self, code: u16, range: AbsRange) -> Self {
        self.absolute.push((code, range));
        self
    }

    /// Make every capability query on this device fail.
    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }
}

enum Step {
    Record(EventRecord),
    Fail,
}

struct Entry {
    desc: MockDevice,
    script: VecDeque<Step>,
    open: bool,
    closes: u32,
    broken: bool,
}

#[derive(Default)]
struct Inner {
    entries: Vec<Entry>,
}

impl Inner {
    fn find(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.desc.path == path)
    }

    fn entry_mut(&mut self, handle: RawHandle) -> Option<&mut Entry> {
        self.entries.get_mut(handle.0 as usize)
    }
}

/// Shared-state scripted source. Cloning shares the device tree.
#[derive(Clone, Default)]
pub struct MockSource {
    inner: Rc<RefCell<Inner>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device to the tree before (or between) scans.
    pub fn add(&self, desc: MockDevice) {
        self.inner.borrow_mut().entries.push(Entry {
            desc,
            script: VecDeque::new(),
            open: false,
            closes: 0,
            broken: false,
        });
    }

    /// Queue one record on a device's stream.
    pub fn push_record(&self, path: &str, record: EventRecord) {
        let mut inner = self.inner.borrow_mut();
        let index = inner
            .find(Path::new(path))
            .unwrap_or_else(|| panic!("no mock device at {path}"));
        inner.entries[index].script.push_back(Step::Record(record));
    }

    pub fn push_key(&self, path: &str, code: u16, value: i32) {
        self.push_record(path, EventRecord::key(code, value));
    }

    pub fn push_rel(&self, path: &str, code: u16, value: i32) {
        self.push_record(path, EventRecord::relative(code, value));
    }

    pub fn push_abs(&self, path: &str, code: u16, value: i32) {
        self.push_record(path, EventRecord::absolute(code, value));
    }

    pub fn push_syn(&self, path: &str) {
        self.push_record(path, EventRecord::sync());
    }

    /// Queue a single failing read at this point in the script.
    pub fn push_fail(&self, path: &str) {
        let mut inner = self.inner.borrow_mut();
        let index = inner
            .find(Path::new(path))
            .unwrap_or_else(|| panic!("no mock device at {path}"));
        inner.entries[index].script.push_back(Step::Fail);
    }

    /// All further reads on this device fail, as if it were unplugged.
    pub fn break_device(&self, path: &str) {
        let mut inner = self.inner.borrow_mut();
        let index = inner
            .find(Path::new(path))
            .unwrap_or_else(|| panic!("no mock device at {path}"));
        inner.entries[index].broken = true;
    }

    pub fn is_open(&self, path: &str) -> bool {
        let inner = self.inner.borrow();
        inner
            .find(Path::new(path))
            .map(|i| inner.entries[i].open)
            .unwrap_or(false)
    }

    /// How many times `close` ran for this device.
    pub fn close_count(&self, path: &str) -> u32 {
        let inner = self.inner.borrow();
        inner
            .find(Path::new(path))
            .map(|i| inner.entries[i].closes)
            .unwrap_or(0)
    }
}

impl EventSource for MockSource {
    fn enumerate(&mut self) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|e| e.desc.path.clone())
            .collect())
    }

    fn open(&mut self, path: &Path) -> io::Result<RawHandle> {
        let mut inner = self.inner.borrow_mut();
        let index = inner
            .find(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such mock device"))?;
        inner.entries[index].open = true;
        Ok(RawHandle(index as i32))
    }

    fn query_bits(&mut self, handle: RawHandle, class: EventClass) -> io::Result<CodeSet> {
        let mut inner = self.inner.borrow_mut();
        let entry = inner
            .entry_mut(handle)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "bad mock handle"))?;
        if entry.desc.unreadable {
            return Err(io::Error::other("scripted capability failure"));
        }
        let mut set = CodeSet::for_class(class);
        let codes = match class {
            EventClass::Key => entry.desc.keys.iter(),
            EventClass::Relative => entry.desc.relative.iter(),
            EventClass::Absolute => {
                for &(code, _) in &entry.desc.absolute {
                    set.insert(code);
                }
                return Ok(set);
            }
        };
        for &code in codes {
            set.insert(code);
        }
        Ok(set)
    }

    fn query_abs_range(&mut self, handle: RawHandle, code: u16) -> io::Result<AbsRange> {
        let mut inner = self.inner.borrow_mut();
        let entry = inner
            .entry_mut(handle)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "bad mock handle"))?;
        if entry.desc.unreadable {
            return Err(io::Error::other("scripted capability failure"));
        }
        entry
            .desc
            .absolute
            .iter()
            .find(|&&(c, _)| c == code)
            .map(|&(_, range)| range)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "axis not scripted"))
    }

    fn read_event(&mut self, handle: RawHandle) -> ReadOutcome {
        let mut inner = self.inner.borrow_mut();
        let Some(entry) = inner.entry_mut(handle) else {
            return ReadOutcome::Failed(io::Error::new(io::ErrorKind::NotFound, "bad mock handle"));
        };
        if entry.broken {
            return ReadOutcome::Failed(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "scripted disconnect",
            ));
        }
        match entry.script.pop_front() {
            Some(Step::Record(record)) => ReadOutcome::Record(record),
            Some(Step::Fail) => ReadOutcome::Failed(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "scripted read failure",
            )),
            None => ReadOutcome::NoData,
        }
    }

    fn identity(&mut self, _handle: RawHandle, path: &Path) -> DeviceMeta {
        let inner = self.inner.borrow();
        let name = inner
            .find(path)
            .map(|i| inner.entries[i].desc.name.clone());
        DeviceMeta {
            path: path.to_owned(),
            name,
            bus: Some(MOCK_BUS),
            vendor: Some(0),
            product: Some(0),
            version: Some(0),
        }
    }

    fn close(&mut self, handle: RawHandle) {
        let mut inner = self.inner.borrow_mut();
        if let Some(entry) = inner.entry_mut(handle) {
            entry.open = false;
            entry.closes += 1;
        }
    }
}
