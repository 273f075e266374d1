//! Capability prober.
//!
//! Runs once per freshly opened handle, before classification. Queries the
//! supported-code bitset for each event class, then the range metadata for
//! every supported absolute axis — so `ranges` always covers exactly the
//! codes in `caps.absolute`, nothing more and nothing less.
//!
//! Query calls are the only side effect; no device state is mutated.

use crate::backends::{EventSource, RawHandle};
use crate::caps::{AbsRange, Capabilities, EventClass};
use crate::error::InputError;
use std::collections::HashMap;

/// Everything learned about a device at open time.
#[derive(Debug, Default)]
pub struct ProbeReport {
    pub caps: Capabilities,
    pub ranges: HashMap<u16, AbsRange>,
}

/// Query a device's capabilities and absolute-axis ranges.
///
/// Any failed query yields [`InputError::DeviceUnreadable`]; the caller
/// must treat the device as inert and not retry. The handle stays open —
/// closing it on the failure path is the caller's job, since the caller
/// owns it.
pub fn probe<S: EventSource>(source: &mut S, handle: RawHandle) -> Result<ProbeReport, InputError> {
    let keys = source
        .query_bits(handle, EventClass::Key)
        .map_err(InputError::DeviceUnreadable)?;
    let relative = source
        .query_bits(handle, EventClass::Relative)
        .map_err(InputError::DeviceUnreadable)?;
    let absolute = source
        .query_bits(handle, EventClass::Absolute)
        .map_err(InputError::DeviceUnreadable)?;

    let mut ranges = HashMap::new();
    for code in absolute.iter() {
        let range = source
            .query_abs_range(handle, code)
            .map_err(InputError::DeviceUnreadable)?;
        ranges.insert(code, range);
    }

    Ok(ProbeReport {
        caps: Capabilities {
            keys,
            relative,
            absolute,
        },
        ranges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::mock::{MockDevice, MockSource};
    use crate::codes::{ABS_X, ABS_Y, BTN_JOYSTICK, REL_X};
    use std::path::Path;

    #[test]
    fn ranges_cover_exactly_the_absolute_codes() {
        let range = AbsRange {
            minimum: -128,
            maximum: 127,
            ..AbsRange::default()
        };
        let mut source = MockSource::new();
        source.add(
            MockDevice::new("/dev/input/event0", "pad")
                .with_keys(&[BTN_JOYSTICK])
                .with_relative(&[REL_X])
                .with_absolute(ABS_X, range)
                .with_absolute(ABS_Y, range),
        );
        let handle = source.open(Path::new("/dev/input/event0")).unwrap();

        let report = probe(&mut source, handle).unwrap();
        assert!(report.caps.keys.supports(BTN_JOYSTICK));
        assert!(report.caps.relative.supports(REL_X));

        for code in report.caps.absolute.iter() {
            assert!(report.ranges.contains_key(&code));
        }
        assert_eq!(report.ranges.len(), report.caps.absolute.len());
    }

    #[test]
    fn failed_query_is_device_unreadable() {
        let mut source = MockSource::new();
        source.add(MockDevice::new("/dev/input/event1", "flaky").unreadable());
        let handle = source.open(Path::new("/dev/input/event1")).unwrap();

        let err = probe(&mut source, handle).unwrap_err();
        assert!(matches!(err, InputError::DeviceUnreadable(_)));
    }
}
