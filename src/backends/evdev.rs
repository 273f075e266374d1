#![cfg(target_os = "linux")]

//! Linux evdev event source.
//!
//! Talks to `/dev/input/event*` nodes directly: `open(2)` with
//! `O_NONBLOCK`, `EVIOCGBIT`/`EVIOCGABS` ioctls for capabilities,
//! `read(2)` of `struct input_event` for the stream. Raw bit-array and
//! ioctl-number arithmetic stays inside this module; everything above it
//! sees [`CodeSet`]s and [`EventRecord`]s.

use crate::backends::{EventSource, RawHandle, ReadOutcome};
use crate::caps::{AbsRange, CodeSet, EventClass};
use crate::event::{EventRecord, RecordKind};
use crate::metadata::DeviceMeta;
use std::ffi::CString;
use std::io;
use std::mem::size_of;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

// Linux generic ioctl encoding: dir(2) | size(14) | type(8) | nr(8).
const IOC_NRBITS: u64 = 8;
const IOC_TYPEBITS: u64 = 8;
const IOC_SIZEBITS: u64 = 14;
const IOC_READ: u64 = 2;

const IOC_NRSHIFT: u64 = 0;
const IOC_TYPESHIFT: u64 = IOC_NRSHIFT + IOC_NRBITS;
const IOC_SIZESHIFT: u64 = IOC_TYPESHIFT + IOC_TYPEBITS;
const IOC_DIRSHIFT: u64 = IOC_SIZESHIFT + IOC_SIZEBITS;

fn ioc_read(nr: u8, size: usize) -> u64 {
    (IOC_READ << IOC_DIRSHIFT)
        | ((b'E' as u64) << IOC_TYPESHIFT)
        | ((nr as u64) << IOC_NRSHIFT)
        | ((size as u64) << IOC_SIZESHIFT)
}

// #define EVIOCGID         _IOR('E', 0x02, struct input_id)
fn eviocgid() -> u64 {
    ioc_read(0x02, size_of::<libc::input_id>())
}

// #define EVIOCGNAME(len)  _IOC(_IOC_READ, 'E', 0x06, len)
fn eviocgname(len: usize) -> u64 {
    ioc_read(0x06, len)
}

// #define EVIOCGBIT(ev,len) _IOC(_IOC_READ, 'E', 0x20 + (ev), len)
fn eviocgbit(class: u16, len: usize) -> u64 {
    ioc_read(0x20 + class as u8, len)
}

// #define EVIOCGABS(abs)   _IOR('E', 0x40 + (abs), struct input_absinfo)
fn eviocgabs(code: u16) -> u64 {
    ioc_read(0x40 + code as u8, size_of::<libc::input_absinfo>())
}

/// Event source backed by the kernel evdev interface.
pub struct EvdevSource {
    dir: PathBuf,
}

impl EvdevSource {
    /// Source over the standard `/dev/input` directory.
    pub fn new() -> Self {
        Self::with_dir("/dev/input")
    }

    /// Source over an alternate device directory (containers, tests).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Default for EvdevSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for EvdevSource {
    fn enumerate(&mut self) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            paths.push(entry?.path());
        }
        Ok(paths)
    }

    fn open(&mut self, path: &Path) -> io::Result<RawHandle> {
        let node = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))?;
        let fd = unsafe {
            libc::open(
                node.as_ptr(),
                libc::O_RDONLY | libc::O_NONBLOCK | libc::O_CLOEXEC,
            )
        };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        #[cfg(all(feature = "debug-log", debug_assertions))]
        eprintln!("[EVDEV/OPEN] fd={fd} path={}", path.display());

        Ok(RawHandle(fd))
    }

    fn query_bits(&mut self, handle: RawHandle, class: EventClass) -> io::Result<CodeSet> {
        let mut bytes = vec![0u8; class.byte_len()];
        let rc = unsafe {
            libc::ioctl(
                handle.0,
                eviocgbit(class.raw(), bytes.len()) as _,
                bytes.as_mut_ptr(),
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(CodeSet::from_kernel_bytes(class, &bytes))
    }

    fn query_abs_range(&mut self, handle: RawHandle, code: u16) -> io::Result<AbsRange> {
        let mut info: libc::input_absinfo = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::ioctl(handle.0, eviocgabs(code) as _, &mut info) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(AbsRange {
            minimum: info.minimum,
            maximum: info.maximum,
            value: info.value,
            resolution: info.resolution,
            flat: info.flat,
        })
    }

    fn read_event(&mut self, handle: RawHandle) -> ReadOutcome {
        let mut ev: libc::input_event = unsafe { std::mem::zeroed() };
        let want = size_of::<libc::input_event>();
        let n = unsafe {
            libc::read(
                handle.0,
                &mut ev as *mut libc::input_event as *mut libc::c_void,
                want,
            )
        };

        if n == want as isize {
            let at = SystemTime::UNIX_EPOCH
                + Duration::new(ev.time.tv_sec.max(0) as u64, (ev.time.tv_usec.max(0) as u32) * 1000);
            return ReadOutcome::Record(EventRecord {
                kind: RecordKind::from_raw(ev.type_),
                code: ev.code,
                value: ev.value,
                at,
            });
        }
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::WouldBlock {
                return ReadOutcome::NoData;
            }
            return ReadOutcome::Failed(err);
        }
        // EOF or a partial record both mean the node is gone or unusable.
        ReadOutcome::Failed(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "short read from event node",
        ))
    }

    fn identity(&mut self, handle: RawHandle, path: &Path) -> DeviceMeta {
        let mut meta = DeviceMeta {
            path: path.to_owned(),
            ..DeviceMeta::default()
        };

        let mut name = [0u8; 256];
        let rc = unsafe { libc::ioctl(handle.0, eviocgname(name.len()) as _, name.as_mut_ptr()) };
        if rc > 0 {
            let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
            if end > 0 {
                meta.name = Some(String::from_utf8_lossy(&name[..end]).into_owned());
            }
        }

        let mut id: libc::input_id = unsafe { std::mem::zeroed() };
        if unsafe { libc::ioctl(handle.0, eviocgid() as _, &mut id) } == 0 {
            meta.bus = Some(id.bustype);
            meta.vendor = Some(id.vendor);
            meta.product = Some(id.product);
            meta.version = Some(id.version);
        }

        meta
    }

    fn close(&mut self, handle: RawHandle) {
        #[cfg(all(feature = "debug-log", debug_assertions))]
        eprintln!("[EVDEV/CLOSE] fd={}", handle.0);

        unsafe {
            libc::close(handle.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ioctl_numbers_match_the_kernel_header() {
        // Spot-check against values computed from <linux/input.h> on x86_64.
        assert_eq!(eviocgid(), 0x8008_4502);
        assert_eq!(eviocgname(256), 0x8100_4506);
        // EVIOCGBIT(EV_ABS, 8) = _IOC(_IOC_READ, 'E', 0x23, 8)
        assert_eq!(eviocgbit(crate::codes::EV_ABS, 8), 0x8008_4523);
        // EVIOCGABS(ABS_X) with a 24-byte input_absinfo
        assert_eq!(eviocgabs(0), 0x8018_4540);
    }
}
