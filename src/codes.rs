//! Linux input event-code constants.
//!
//! Only the codes the prober and classifier actually reason about are named
//! here; everything else flows through the crate as a raw `u16` code inside a
//! [`CodeSet`](crate::caps::CodeSet).

/// Event classes (`struct input_event` `type` field).
pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_REL: u16 = 0x02;
pub const EV_ABS: u16 = 0x03;

/// End-of-burst synchronization marker (`EV_SYN` code).
pub const SYN_REPORT: u16 = 0x00;

/// Code-space sizes per class (kernel `*_CNT` values).
pub const KEY_CNT: usize = 0x300;
pub const REL_CNT: usize = 0x10;
pub const ABS_CNT: usize = 0x40;

pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;
pub const ABS_MT_POSITION_X: u16 = 0x35;
pub const ABS_MT_POSITION_Y: u16 = 0x36;

pub const REL_X: u16 = 0x00;
pub const REL_Y: u16 = 0x01;

/// First code of the joystick button block (`BTN_JOYSTICK` / `BTN_TRIGGER`).
pub const BTN_JOYSTICK: u16 = 0x120;
/// First code past the gamepad button block (`BTN_DIGI`).
pub const BTN_DIGI: u16 = 0x140;

/// `true` for key codes in the joystick/gamepad button block.
#[inline]
pub fn is_joystick_button(code: u16) -> bool {
    (BTN_JOYSTICK..BTN_DIGI).contains(&code)
}

/// Human-readable label for an absolute axis code, for logs and diagnostics.
pub fn abs_axis_name(code: u16) -> &'static str {
    match code {
        0x00 => "X",
        0x01 => "Y",
        0x02 => "Z",
        0x03 => "RX",
        0x04 => "RY",
        0x05 => "RZ",
        0x06 => "Throttle",
        0x07 => "Rudder",
        0x08 => "Wheel",
        0x09 => "Gas",
        0x0a => "Brake",
        0x10 => "Hat0X",
        0x11 => "Hat0Y",
        0x12 => "Hat1X",
        0x13 => "Hat1Y",
        0x14 => "Hat2X",
        0x15 => "Hat2Y",
        0x16 => "Hat3X",
        0x17 => "Hat3Y",
        0x18 => "Pressure",
        0x19 => "Distance",
        0x1a => "TiltX",
        0x1b => "TiltY",
        0x28 => "Misc",
        0x2f => "MtSlot",
        0x35 => "MtPositionX",
        0x36 => "MtPositionY",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joystick_button_block_bounds() {
        assert!(is_joystick_button(BTN_JOYSTICK));
        assert!(is_joystick_button(0x130)); // BTN_SOUTH / gamepad block
        assert!(!is_joystick_button(BTN_DIGI));
        assert!(!is_joystick_button(0x110)); // BTN_MOUSE block
        assert!(!is_joystick_button(30)); // KEY_A
    }

    #[test]
    fn axis_names_cover_the_common_pairs() {
        assert_eq!(abs_axis_name(ABS_X), "X");
        assert_eq!(abs_axis_name(ABS_MT_POSITION_Y), "MtPositionY");
        assert_eq!(abs_axis_name(0x3e), "?");
    }
}
