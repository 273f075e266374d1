//! Capability-based device classification.
//!
//! Roles are assigned from what a device *reports it can do*, not from its
//! path: capability bits are authoritative, while `/dev/input/by-id` name
//! suffixes vary across kernels and udev configurations. The path is only a
//! hint for logs.

use crate::caps::Capabilities;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Classified purpose of a device. Immutable after classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Joystick,
    Pointer,
    Keyboard,
    /// Probed but never polled; not an error.
    Unclassified,
}

/// All roles, in classification priority order.
pub const ROLES: [Role; 4] = [Role::Joystick, Role::Pointer, Role::Keyboard, Role::Unclassified];

impl Role {
    /// Unclassified devices are ignored by the poller.
    pub fn is_pollable(self) -> bool {
        self != Role::Unclassified
    }
}

/// Assign a role from probed capabilities.
///
/// Rules, in priority order:
/// 1. Absolute (X, Y) or multi-touch position pair, plus joystick-block
///    buttons → [`Role::Joystick`].
/// 2. Else an absolute or relative (X, Y) pair without joystick buttons →
///    [`Role::Pointer`].
/// 3. Else any key codes and no axis pair → [`Role::Keyboard`].
/// 4. Else → [`Role::Unclassified`].
///
/// A device satisfying both the joystick and pointer conditions resolves to
/// `Joystick`; rule order is the tie-break.
pub fn classify(path_hint: &Path, caps: &Capabilities) -> Role {
    let abs_pair = caps.has_abs_xy() || caps.has_mt_position();
    let any_pair = abs_pair || caps.has_rel_xy();

    let role = if abs_pair && caps.has_joystick_buttons() {
        Role::Joystick
    } else if any_pair && !caps.has_joystick_buttons() {
        Role::Pointer
    } else if !caps.keys.is_empty() && !any_pair {
        Role::Keyboard
    } else {
        Role::Unclassified
    };

    debug!(
        "{}: {:?} (abs={} rel={} keys={})",
        path_hint.display(),
        role,
        caps.absolute.len(),
        caps.relative.len(),
        caps.keys.len()
    );
    role
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::Capabilities;
    use crate::codes::{
        ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_X, ABS_Y, BTN_JOYSTICK, REL_X, REL_Y,
    };

    fn caps(abs: &[u16], rel: &[u16], keys: &[u16]) -> Capabilities {
        let mut c = Capabilities::default();
        for &code in abs {
            c.absolute.insert(code);
        }
        for &code in rel {
            c.relative.insert(code);
        }
        for &code in keys {
            c.keys.insert(code);
        }
        c
    }

    #[test]
    fn stick_with_buttons_is_joystick() {
        let c = caps(&[ABS_X, ABS_Y], &[], &[BTN_JOYSTICK]);
        assert_eq!(classify(Path::new("event3"), &c), Role::Joystick);
    }

    #[test]
    fn multitouch_pad_with_buttons_is_joystick() {
        let c = caps(&[ABS_MT_POSITION_X, ABS_MT_POSITION_Y], &[], &[BTN_JOYSTICK]);
        assert_eq!(classify(Path::new("event7"), &c), Role::Joystick);
    }

    #[test]
    fn tie_break_prefers_joystick_over_pointer() {
        // Absolute (X, Y) satisfies the pointer condition too; joystick
        // buttons decide it.
        let c = caps(&[ABS_X, ABS_Y], &[REL_X, REL_Y], &[BTN_JOYSTICK]);
        assert_eq!(classify(Path::new("event4"), &c), Role::Joystick);
    }

    #[test]
    fn rel_pair_without_buttons_is_pointer() {
        let c = caps(&[], &[REL_X, REL_Y], &[0x110]); // BTN_LEFT
        assert_eq!(classify(Path::new("event1"), &c), Role::Pointer);
    }

    #[test]
    fn abs_pair_without_buttons_is_pointer() {
        let c = caps(&[ABS_X, ABS_Y], &[], &[]);
        assert_eq!(classify(Path::new("event2"), &c), Role::Pointer);
    }

    #[test]
    fn plain_keys_are_keyboard() {
        let c = caps(&[], &[], &[30, 31, 32]);
        assert_eq!(classify(Path::new("event0"), &c), Role::Keyboard);
    }

    #[test]
    fn nothing_useful_is_unclassified() {
        let c = caps(&[], &[], &[]);
        assert_eq!(classify(Path::new("event9"), &c), Role::Unclassified);
        // Only a lone axis, no pair, no keys.
        let c = caps(&[ABS_X], &[], &[]);
        assert_eq!(classify(Path::new("event9"), &c), Role::Unclassified);
    }
}
