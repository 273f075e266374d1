//! Capability sets and absolute-axis ranges.
//!
//! The kernel reports what a device can emit as one bit array per event
//! class. [`CodeSet`] wraps that bit array behind named queries so the rest
//! of the crate never touches word/offset arithmetic, and [`Capabilities`]
//! groups the three class sets the prober fills in.
//!
//! Both are populated once when a device is opened and never mutated
//! afterwards.

use crate::codes::{
    ABS_CNT, ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_X, ABS_Y, EV_ABS, EV_KEY, EV_REL, KEY_CNT,
    REL_CNT, REL_X, REL_Y,
};
use serde::{Deserialize, Serialize};

/// Event class a capability query targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventClass {
    Key,
    Relative,
    Absolute,
}

impl EventClass {
    /// Kernel `EV_*` value for this class.
    pub fn raw(self) -> u16 {
        match self {
            EventClass::Key => EV_KEY,
            EventClass::Relative => EV_REL,
            EventClass::Absolute => EV_ABS,
        }
    }

    /// Size of the code space for this class (kernel `*_CNT`).
    pub fn code_count(self) -> usize {
        match self {
            EventClass::Key => KEY_CNT,
            EventClass::Relative => REL_CNT,
            EventClass::Absolute => ABS_CNT,
        }
    }

    /// Bytes needed for the kernel bit array of this class.
    pub fn byte_len(self) -> usize {
        self.code_count().div_ceil(8)
    }
}

/// Fixed-size set of event codes for one class.
///
/// Backed by 64-bit words; empty by default. `supports` on a code past the
/// allocated words is simply `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeSet {
    words: Vec<u64>,
}

impl CodeSet {
    /// Empty set sized for `class`.
    pub fn for_class(class: EventClass) -> Self {
        Self {
            words: vec![0; class.code_count().div_ceil(64)],
        }
    }

    /// Decode a kernel capability bit array (`EVIOCGBIT` output): bit `i`
    /// lives at `bytes[i / 8]`, offset `i % 8`.
    pub fn from_kernel_bytes(class: EventClass, bytes: &[u8]) -> Self {
        let mut set = Self::for_class(class);
        let limit = class.code_count().min(bytes.len() * 8);
        for code in 0..limit {
            if bytes[code / 8] >> (code % 8) & 1 == 1 {
                set.insert(code as u16);
            }
        }
        set
    }

    pub fn insert(&mut self, code: u16) {
        let word = code as usize / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (code % 64);
    }

    /// Named query: does the device support this code?
    pub fn supports(&self, code: u16) -> bool {
        self.words
            .get(code as usize / 64)
            .is_some_and(|w| w >> (code % 64) & 1 == 1)
    }

    /// Iterate supported codes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            (0..64).filter_map(move |bit| {
                if w >> bit & 1 == 1 {
                    Some((i * 64 + bit) as u16)
                } else {
                    None
                }
            })
        })
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

/// Range metadata for one absolute axis (`EVIOCGABS` output).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsRange {
    pub minimum: i32,
    pub maximum: i32,
    /// Axis value at probe time; seeds the live state.
    pub value: i32,
    pub resolution: i32,
    /// Flat (deadzone) region around the neutral point, in raw units.
    pub flat: i32,
}

impl AbsRange {
    /// Map a raw axis value into `[-1.0, 1.0]`.
    ///
    /// A degenerate range (`maximum <= minimum`) normalizes to `0.0`.
    /// Deadzone shaping is caller policy; `flat` is exposed but not applied.
    pub fn normalize(&self, raw: i32) -> f32 {
        let span = i64::from(self.maximum) - i64::from(self.minimum);
        if span <= 0 {
            return 0.0;
        }
        let offset = i64::from(raw) - i64::from(self.minimum);
        let t = offset as f32 / span as f32;
        (t * 2.0 - 1.0).clamp(-1.0, 1.0)
    }
}

/// What a device can emit, per event class. Write-once at probe time.
#[derive(Clone, Debug, Default)]
pub struct Capabilities {
    pub keys: CodeSet,
    pub relative: CodeSet,
    pub absolute: CodeSet,
}

impl Capabilities {
    pub fn supports(&self, class: EventClass, code: u16) -> bool {
        match class {
            EventClass::Key => self.keys.supports(code),
            EventClass::Relative => self.relative.supports(code),
            EventClass::Absolute => self.absolute.supports(code),
        }
    }

    /// Absolute (X, Y) pair, the classic stick/tablet layout.
    pub fn has_abs_xy(&self) -> bool {
        self.absolute.supports(ABS_X) && self.absolute.supports(ABS_Y)
    }

    /// Multi-touch position pair.
    pub fn has_mt_position(&self) -> bool {
        self.absolute.supports(ABS_MT_POSITION_X) && self.absolute.supports(ABS_MT_POSITION_Y)
    }

    /// Relative (X, Y) pair, the classic pointer layout.
    pub fn has_rel_xy(&self) -> bool {
        self.relative.supports(REL_X) && self.relative.supports(REL_Y)
    }

    /// Any key code inside the joystick/gamepad button block.
    pub fn has_joystick_buttons(&self) -> bool {
        self.keys.iter().any(crate::codes::is_joystick_button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::BTN_JOYSTICK;

    #[test]
    fn kernel_bytes_round_trip_bit_positions() {
        // Bits 0, 9 and 130 set, LSB-first within each byte.
        let mut bytes = vec![0u8; EventClass::Key.byte_len()];
        bytes[0] = 0b0000_0001;
        bytes[1] = 0b0000_0010;
        bytes[16] = 0b0000_0100;
        let set = CodeSet::from_kernel_bytes(EventClass::Key, &bytes);

        assert!(set.supports(0));
        assert!(set.supports(9));
        assert!(set.supports(130));
        assert!(!set.supports(1));
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 9, 130]);
    }

    #[test]
    fn supports_out_of_range_is_false() {
        let set = CodeSet::for_class(EventClass::Relative);
        assert!(!set.supports(0x2ff));
        assert!(CodeSet::default().is_empty());
    }

    #[test]
    fn normalize_maps_endpoints_and_center() {
        let range = AbsRange {
            minimum: -32768,
            maximum: 32767,
            ..AbsRange::default()
        };
        assert_eq!(range.normalize(-32768), -1.0);
        assert_eq!(range.normalize(32767), 1.0);
        assert!(range.normalize(0).abs() < 0.001);
        // Out-of-range raw values clamp.
        assert_eq!(range.normalize(40000), 1.0);
    }

    #[test]
    fn normalize_degenerate_range_is_zero() {
        let range = AbsRange::default();
        assert_eq!(range.normalize(17), 0.0);
    }

    #[test]
    fn joystick_button_query_scans_the_block() {
        let mut caps = Capabilities::default();
        caps.keys.insert(30); // KEY_A
        assert!(!caps.has_joystick_buttons());
        caps.keys.insert(BTN_JOYSTICK);
        assert!(caps.has_joystick_buttons());
        assert!(caps.supports(EventClass::Key, BTN_JOYSTICK));
        assert!(!caps.supports(EventClass::Absolute, 0));
    }
}
