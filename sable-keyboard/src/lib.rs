//! High-level device interface for Sable input devices
//!
//! This crate sits on top of any [`ControlTransport`] and provides typed
//! operations for device features (firmware info, LED control, power) plus
//! the per-device key-translation registry driven by control-file writes.

pub mod error;
pub mod translations;

pub use error::DeviceError;
pub use translations::{
    TranslationEntry, TranslationError, TranslationRegistry, UpdateOutcome,
};

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sable_transport::exchange::{exchange, log_erroneous_report, send_report};
use sable_transport::protocol::{
    class, clamp_u8, clamp_u16, cmd, device, led, status, timing, IDLE_TIMEOUT_MAX_SECS,
    IDLE_TIMEOUT_MIN_SECS,
};
use sable_transport::{ControlTransport, Report};

/// Firmware version reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/// Addressable LED region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    ScrollWheel,
    Logo,
    Backlight,
}

impl Led {
    /// Wire identifier for this LED region.
    pub fn id(self) -> u8 {
        match self {
            Led::ScrollWheel => led::SCROLL_WHEEL,
            Led::Logo => led::LOGO,
            Led::Backlight => led::BACKLIGHT,
        }
    }
}

/// LED effect, wire values as the firmware expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LedEffect {
    Off = 0,
    Wave = 1,
    Reactive = 2,
    Breathing = 3,
    Spectrum = 4,
    #[default]
    Static = 6,
}

impl LedEffect {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Off),
            1 => Some(Self::Wave),
            2 => Some(Self::Reactive),
            3 => Some(Self::Breathing),
            4 => Some(Self::Spectrum),
            6 => Some(Self::Static),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Wave => "wave",
            Self::Reactive => "reactive",
            Self::Breathing => "breathing",
            Self::Spectrum => "spectrum",
            Self::Static => "static",
        }
    }
}

impl FromStr for LedEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "wave" => Ok(Self::Wave),
            "reactive" => Ok(Self::Reactive),
            "breathing" | "breath" => Ok(Self::Breathing),
            "spectrum" => Ok(Self::Spectrum),
            "static" => Ok(Self::Static),
            _ => Err(format!(
                "unknown effect: \"{s}\". Use off/wave/reactive/breathing/spectrum/static"
            )),
        }
    }
}

/// High-level interface over one open device.
///
/// Every operation builds a request report, seals its checksum, runs the
/// two-phase exchange, and validates the response (command echo + status
/// byte) before parsing arguments out of it.
pub struct KeyboardInterface<T: ControlTransport> {
    transport: T,
    report_index: u16,
    wait_min: Duration,
    wait_max: Duration,
}

impl<T: ControlTransport> KeyboardInterface<T> {
    /// Wrap an open transport with the standard settling window.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            report_index: device::REPORT_INDEX,
            wait_min: timing::STD_WAIT_MIN,
            wait_max: timing::STD_WAIT_MAX,
        }
    }

    /// Override the settling window (flash-persisting command batches).
    pub fn with_timing(mut self, wait_min: Duration, wait_max: Duration) -> Self {
        self.wait_min = wait_min;
        self.wait_max = wait_max;
        self
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fire-and-forget command; no response is read.
    fn send(&self, mut report: Report) -> Result<(), DeviceError> {
        report.apply_checksum();
        send_report(
            &self.transport,
            &report,
            self.report_index,
            self.wait_min,
            self.wait_max,
        )?;
        Ok(())
    }

    /// Request/response command with full validation.
    fn request(&self, mut report: Report) -> Result<Report, DeviceError> {
        report.apply_checksum();
        let response = exchange(
            &self.transport,
            &report,
            self.report_index,
            self.report_index,
            self.wait_min,
            self.wait_max,
        )?;

        if response.command_class != report.command_class
            || response.command_id != report.command_id
        {
            log_erroneous_report(&response, "response does not match request");
            return Err(DeviceError::UnexpectedResponse(format!(
                "expected {}, got class 0x{:02X} cmd 0x{:02X}",
                cmd::name(report.command_class, report.command_id),
                response.command_class,
                response.command_id,
            )));
        }

        match response.status {
            status::SUCCESS | status::NEW_COMMAND => Ok(response),
            status::BUSY => Err(DeviceError::Busy),
            status::FAILURE => {
                log_erroneous_report(&response, "command failed");
                Err(DeviceError::CommandFailed)
            }
            status::TIMEOUT => Err(DeviceError::CommandTimeout),
            status::NOT_SUPPORTED => Err(DeviceError::NotSupported),
            other => {
                log_erroneous_report(&response, "unknown status");
                Err(DeviceError::UnknownStatus(other))
            }
        }
    }

    // === Device info ===

    pub fn get_firmware_version(&self) -> Result<FirmwareVersion, DeviceError> {
        let response = self.request(Report::request(
            class::DEVICE,
            cmd::GET_FIRMWARE_VERSION,
            0x02,
        ))?;
        Ok(FirmwareVersion {
            major: response.arguments[0],
            minor: response.arguments[1],
        })
    }

    /// Serial string, NUL-padded on the wire.
    pub fn get_serial(&self) -> Result<String, DeviceError> {
        let response = self.request(Report::request(class::DEVICE, cmd::GET_SERIAL, 0x16))?;
        let raw = &response.arguments[..0x16];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    // === LED control ===

    pub fn set_led_state(&self, led_region: Led, on: bool) -> Result<(), DeviceError> {
        let mut report = Report::request(class::LED, cmd::SET_LED_STATE, 0x03);
        report.set_arguments(&[led::VARSTORE, led_region.id(), on as u8]);
        self.send(report)
    }

    pub fn get_led_state(&self, led_region: Led) -> Result<bool, DeviceError> {
        let mut report = Report::request(class::LED, cmd::GET_LED_STATE, 0x03);
        report.set_arguments(&[led::VARSTORE, led_region.id(), 0x00]);
        let response = self.request(report)?;
        Ok(response.arguments[2] != 0)
    }

    pub fn set_brightness(&self, led_region: Led, brightness: u8) -> Result<(), DeviceError> {
        let mut report = Report::request(class::LED, cmd::SET_LED_BRIGHTNESS, 0x03);
        report.set_arguments(&[led::VARSTORE, led_region.id(), brightness]);
        self.send(report)
    }

    pub fn get_brightness(&self, led_region: Led) -> Result<u8, DeviceError> {
        let mut report = Report::request(class::LED, cmd::GET_LED_BRIGHTNESS, 0x03);
        report.set_arguments(&[led::VARSTORE, led_region.id(), 0x00]);
        let response = self.request(report)?;
        Ok(response.arguments[2])
    }

    /// Set an effect with its animation speed; the speed is clamped into
    /// the range the firmware accepts.
    pub fn set_led_effect(
        &self,
        led_region: Led,
        effect: LedEffect,
        speed: u8,
    ) -> Result<(), DeviceError> {
        let mut report = Report::request(class::LED, cmd::SET_LED_EFFECT, 0x04);
        report.set_arguments(&[
            led::VARSTORE,
            led_region.id(),
            effect as u8,
            clamp_u8(speed, led::SPEED_MIN, led::SPEED_MAX),
        ]);
        self.send(report)
    }

    // === Power ===

    /// Idle timeout before the device sleeps, clamped to the supported
    /// range and transmitted big-endian.
    pub fn set_idle_timeout(&self, seconds: u16) -> Result<(), DeviceError> {
        let seconds = clamp_u16(seconds, IDLE_TIMEOUT_MIN_SECS, IDLE_TIMEOUT_MAX_SECS);
        let mut report = Report::request(class::POWER, cmd::SET_IDLE_TIMEOUT, 0x02);
        report.set_arguments(&seconds.to_be_bytes());
        self.send(report)
    }

    pub fn get_idle_timeout(&self) -> Result<u16, DeviceError> {
        let response = self.request(Report::request(class::POWER, cmd::GET_IDLE_TIMEOUT, 0x02))?;
        Ok(u16::from_be_bytes([
            response.arguments[0],
            response.arguments[1],
        ]))
    }
}
