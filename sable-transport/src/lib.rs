//! Transport layer for Sable programmable input devices
//!
//! Sable devices speak a fixed-size binary report protocol over USB HID
//! control transfers. This crate provides:
//!
//! - the 90-byte [`Report`] record and its checksum rule
//! - the two-phase send/exchange sequencing required by the firmware
//! - a [`ControlTransport`] trait over the raw control-transfer primitive,
//!   with a libusb-backed implementation for real hardware

pub mod error;
pub mod exchange;
pub mod protocol;
pub mod report;
pub mod usb;

pub use error::TransportError;
pub use exchange::{exchange, log_erroneous_report, send_report};
pub use protocol::{clamp_u8, clamp_u16, REPORT_LEN};
pub use report::Report;
pub use usb::UsbControlTransport;

/// The raw synchronous control-transfer primitive.
///
/// Implemented by the USB binding ([`UsbControlTransport`]) and by test
/// doubles. Both calls are single-shot: one invocation maps to exactly one
/// control transfer, and the returned count is whatever the bus reported.
/// Length validation and settling delays belong to the [`exchange`] layer.
pub trait ControlTransport {
    /// Issue a SET_REPORT class request carrying `buf` to interface `index`.
    fn control_write(&self, index: u16, buf: &[u8]) -> Result<usize, TransportError>;

    /// Issue a GET_REPORT class request reading into `buf` from interface
    /// `index`.
    fn control_read(&self, index: u16, buf: &mut [u8]) -> Result<usize, TransportError>;
}
