//! Protocol constants and small helpers for Sable device communication

/// Total length of one report record on the wire.
pub const REPORT_LEN: usize = 90;

/// Width of the argument region inside a report.
pub const ARGUMENTS_LEN: usize = 80;

/// XOR checksum window: raw report bytes at offsets `[2, 88)`.
///
/// The checksum byte at offset 88 and the trailing reserved byte are
/// excluded by construction, so the checksum never feeds into itself.
pub const CHECKSUM_START: usize = 2;
pub const CHECKSUM_END: usize = 88;

/// Transaction id placed into freshly built request reports.
pub const TRANSACTION_ID_DEFAULT: u8 = 0xFF;

/// Command classes (high-level command grouping)
pub mod class {
    /// Standard device commands (version, serial, mode)
    pub const DEVICE: u8 = 0x00;
    /// LED state, brightness, and effects
    pub const LED: u8 = 0x03;
    /// Power management (idle timeout)
    pub const POWER: u8 = 0x07;
}

/// Command ids within a class
pub mod cmd {
    // class DEVICE
    pub const GET_FIRMWARE_VERSION: u8 = 0x81;
    pub const GET_SERIAL: u8 = 0x82;

    // class LED
    pub const SET_LED_STATE: u8 = 0x00;
    pub const SET_LED_EFFECT: u8 = 0x02;
    pub const SET_LED_BRIGHTNESS: u8 = 0x03;
    pub const GET_LED_STATE: u8 = 0x80;
    pub const GET_LED_BRIGHTNESS: u8 = 0x83;

    // class POWER
    pub const SET_IDLE_TIMEOUT: u8 = 0x03;
    pub const GET_IDLE_TIMEOUT: u8 = 0x83;

    /// Get human-readable name for a (class, id) pair
    pub fn name(class: u8, id: u8) -> &'static str {
        use super::class;
        match (class, id) {
            (class::DEVICE, GET_FIRMWARE_VERSION) => "GET_FIRMWARE_VERSION",
            (class::DEVICE, GET_SERIAL) => "GET_SERIAL",
            (class::LED, SET_LED_STATE) => "SET_LED_STATE",
            (class::LED, SET_LED_EFFECT) => "SET_LED_EFFECT",
            (class::LED, SET_LED_BRIGHTNESS) => "SET_LED_BRIGHTNESS",
            (class::LED, GET_LED_STATE) => "GET_LED_STATE",
            (class::LED, GET_LED_BRIGHTNESS) => "GET_LED_BRIGHTNESS",
            (class::POWER, SET_IDLE_TIMEOUT) => "SET_IDLE_TIMEOUT",
            (class::POWER, GET_IDLE_TIMEOUT) => "GET_IDLE_TIMEOUT",
            _ => "UNKNOWN",
        }
    }
}

/// Device-reported status byte (offset 0 of a response report)
pub mod status {
    /// Outgoing request, not yet processed
    pub const NEW_COMMAND: u8 = 0x00;
    /// Firmware is still processing a previous command
    pub const BUSY: u8 = 0x01;
    /// Command executed
    pub const SUCCESS: u8 = 0x02;
    /// Command rejected by the firmware
    pub const FAILURE: u8 = 0x03;
    /// Firmware-side timeout
    pub const TIMEOUT: u8 = 0x04;
    /// Command not implemented on this device
    pub const NOT_SUPPORTED: u8 = 0x05;
}

/// LED identifiers and parameter ranges
pub mod led {
    /// Persist the setting in on-device flash
    pub const VARSTORE: u8 = 0x01;
    /// Apply without persisting
    pub const NOSTORE: u8 = 0x00;

    pub const SCROLL_WHEEL: u8 = 0x01;
    pub const LOGO: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x05;

    /// Effect speed range accepted by the firmware
    pub const SPEED_MIN: u8 = 0x01;
    pub const SPEED_MAX: u8 = 0x03;
}

/// USB HID class-request constants for the control channel
pub mod usb {
    use std::time::Duration;

    /// HID SET_REPORT bRequest
    pub const HID_REQ_SET_REPORT: u8 = 0x09;
    /// HID GET_REPORT bRequest
    pub const HID_REQ_GET_REPORT: u8 = 0x01;
    /// bmRequestType for host-to-device class-interface requests
    pub const REQUEST_TYPE_OUT: u8 = 0x21;
    /// bmRequestType for device-to-host class-interface requests
    pub const REQUEST_TYPE_IN: u8 = 0xA1;
    /// wValue for Feature report, report id 0
    pub const REPORT_VALUE: u16 = 0x0300;
    /// Timeout for a single control transfer
    pub const CONTROL_TIMEOUT: Duration = Duration::from_secs(2);
}

/// Settling-delay windows between consecutive control transfers.
///
/// The firmware needs time to process a transfer before the next one is
/// issued; skipping the delay wedges the command pipeline.
pub mod timing {
    use std::time::Duration;

    /// Standard window for most commands
    pub const STD_WAIT_MIN: Duration = Duration::from_micros(600);
    pub const STD_WAIT_MAX: Duration = Duration::from_micros(800);

    /// Extended window for flash-persisting commands
    pub const LONG_WAIT_MIN: Duration = Duration::from_micros(900);
    pub const LONG_WAIT_MAX: Duration = Duration::from_micros(1000);
}

/// Device identification constants
pub mod device {
    /// Sable vendor ID
    pub const VENDOR_ID: u16 = 0x35A9;

    /// Meridian full-size keyboard
    pub const PID_MERIDIAN: u16 = 0x0110;
    /// Meridian Pro (per-key RGB)
    pub const PID_MERIDIAN_PRO: u16 = 0x0112;
    /// Origin programmable keypad
    pub const PID_ORIGIN_KEYPAD: u16 = 0x0205;

    /// All PIDs this driver knows how to open
    pub const SUPPORTED_PIDS: &[u16] = &[PID_MERIDIAN, PID_MERIDIAN_PRO, PID_ORIGIN_KEYPAD];

    /// Interface index carrying the vendor control channel
    pub const REPORT_INDEX: u16 = 0x02;

    /// Get marketing name for a PID
    pub fn product_name(pid: u16) -> &'static str {
        match pid {
            PID_MERIDIAN => "Sable Meridian",
            PID_MERIDIAN_PRO => "Sable Meridian Pro",
            PID_ORIGIN_KEYPAD => "Sable Origin Keypad",
            _ => "Unknown Sable device",
        }
    }
}

/// Idle timeout range accepted by the firmware, in seconds
pub const IDLE_TIMEOUT_MIN_SECS: u16 = 60;
pub const IDLE_TIMEOUT_MAX_SECS: u16 = 900;

/// Clamp a user-supplied byte parameter into a hardware-accepted range
pub fn clamp_u8(value: u8, min: u8, max: u8) -> u8 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Clamp a user-supplied word parameter into a hardware-accepted range
pub fn clamp_u16(value: u16, min: u16, max: u16) -> u16 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}
