//! Integration tests for the device interface over a scripted transport.
//!
//! These exercise command encoding (argument layout, clamping, checksum
//! sealing) and response validation without a physical device: the mock
//! echoes back whatever response reports the test preloads.

use std::cell::RefCell;
use std::collections::VecDeque;

use sable_keyboard::{DeviceError, KeyboardInterface, Led, LedEffect};
use sable_transport::protocol::{class, cmd, led, status, REPORT_LEN};
use sable_transport::{ControlTransport, Report, TransportError};
use zerocopy::IntoBytes;

/// Records written request bytes; answers reads from a preloaded queue.
#[derive(Default)]
struct ScriptedTransport {
    written: RefCell<Vec<Vec<u8>>>,
    responses: RefCell<VecDeque<Report>>,
}

impl ScriptedTransport {
    fn push_response(&self, response: Report) {
        self.responses.borrow_mut().push_back(response);
    }

    fn last_written(&self) -> Vec<u8> {
        self.written.borrow().last().cloned().expect("nothing sent")
    }
}

impl ControlTransport for ScriptedTransport {
    fn control_write(&self, _index: u16, buf: &[u8]) -> Result<usize, TransportError> {
        self.written.borrow_mut().push(buf.to_vec());
        Ok(buf.len())
    }

    fn control_read(&self, _index: u16, buf: &mut [u8]) -> Result<usize, TransportError> {
        let response = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(Report::empty);
        buf[..REPORT_LEN].copy_from_slice(response.as_bytes());
        Ok(REPORT_LEN)
    }
}

/// Response that passes validation for the given command.
fn ok_response(command_class: u8, command_id: u8) -> Report {
    let mut response = Report::empty();
    response.status = status::SUCCESS;
    response.command_class = command_class;
    response.command_id = command_id;
    response
}

fn fast() -> (std::time::Duration, std::time::Duration) {
    (
        std::time::Duration::from_micros(1),
        std::time::Duration::from_micros(1),
    )
}

fn interface(transport: ScriptedTransport) -> KeyboardInterface<ScriptedTransport> {
    let (min, max) = fast();
    KeyboardInterface::new(transport).with_timing(min, max)
}

// ── Command encoding ──

#[test]
fn set_brightness_encodes_varstore_led_value() {
    let kb = interface(ScriptedTransport::default());
    kb.set_brightness(Led::Backlight, 0x7F).unwrap();

    let wire = kb.transport().last_written();
    assert_eq!(wire.len(), REPORT_LEN);
    assert_eq!(wire[5], 0x03); // data_size
    assert_eq!(wire[6], class::LED);
    assert_eq!(wire[7], cmd::SET_LED_BRIGHTNESS);
    assert_eq!(&wire[8..11], &[led::VARSTORE, led::BACKLIGHT, 0x7F]);
}

#[test]
fn sent_reports_carry_a_sealed_checksum() {
    let kb = interface(ScriptedTransport::default());
    kb.set_led_state(Led::Logo, true).unwrap();

    let wire = kb.transport().last_written();
    let expected = wire[2..88].iter().fold(0u8, |crc, b| crc ^ b);
    assert_eq!(wire[88], expected);
    assert_ne!(wire[88], 0x00); // this command's window is non-trivial
}

#[test]
fn effect_speed_is_clamped_into_firmware_range() {
    let kb = interface(ScriptedTransport::default());
    kb.set_led_effect(Led::Backlight, LedEffect::Breathing, 250)
        .unwrap();

    let wire = kb.transport().last_written();
    assert_eq!(&wire[8..12], &[led::VARSTORE, led::BACKLIGHT, 0x03, led::SPEED_MAX]);

    kb.set_led_effect(Led::Backlight, LedEffect::Wave, 0).unwrap();
    let wire = kb.transport().last_written();
    assert_eq!(wire[11], led::SPEED_MIN);
}

#[test]
fn idle_timeout_is_clamped_and_big_endian() {
    let kb = interface(ScriptedTransport::default());
    kb.set_idle_timeout(5000).unwrap();

    let wire = kb.transport().last_written();
    assert_eq!(wire[6], class::POWER);
    assert_eq!(wire[7], cmd::SET_IDLE_TIMEOUT);
    // Clamped to 900 seconds, big-endian.
    assert_eq!(&wire[8..10], &900u16.to_be_bytes());
}

// ── Response parsing ──

#[test]
fn firmware_version_parses_from_arguments() {
    let transport = ScriptedTransport::default();
    let mut response = ok_response(class::DEVICE, cmd::GET_FIRMWARE_VERSION);
    response.arguments[0] = 2;
    response.arguments[1] = 7;
    transport.push_response(response);

    let kb = interface(transport);
    let version = kb.get_firmware_version().unwrap();
    assert_eq!((version.major, version.minor), (2, 7));
    assert_eq!(version.to_string(), "v2.7");
}

#[test]
fn serial_stops_at_nul_padding() {
    let transport = ScriptedTransport::default();
    let mut response = ok_response(class::DEVICE, cmd::GET_SERIAL);
    response.set_arguments(b"SB0123456\0\0\0");
    transport.push_response(response);

    let kb = interface(transport);
    assert_eq!(kb.get_serial().unwrap(), "SB0123456");
}

#[test]
fn brightness_query_reads_third_argument() {
    let transport = ScriptedTransport::default();
    let mut response = ok_response(class::LED, cmd::GET_LED_BRIGHTNESS);
    response.set_arguments(&[led::VARSTORE, led::BACKLIGHT, 0xC8]);
    transport.push_response(response);

    let kb = interface(transport);
    assert_eq!(kb.get_brightness(Led::Backlight).unwrap(), 0xC8);
}

// ── Response validation ──

#[test]
fn busy_status_maps_to_busy_error() {
    let transport = ScriptedTransport::default();
    let mut response = ok_response(class::POWER, cmd::GET_IDLE_TIMEOUT);
    response.status = status::BUSY;
    transport.push_response(response);

    let kb = interface(transport);
    assert!(matches!(kb.get_idle_timeout(), Err(DeviceError::Busy)));
}

#[test]
fn failure_and_unsupported_statuses_map_to_typed_errors() {
    let transport = ScriptedTransport::default();
    let mut failed = ok_response(class::LED, cmd::GET_LED_STATE);
    failed.status = status::FAILURE;
    transport.push_response(failed);
    let mut unsupported = ok_response(class::LED, cmd::GET_LED_STATE);
    unsupported.status = status::NOT_SUPPORTED;
    transport.push_response(unsupported);

    let kb = interface(transport);
    assert!(matches!(
        kb.get_led_state(Led::ScrollWheel),
        Err(DeviceError::CommandFailed)
    ));
    assert!(matches!(
        kb.get_led_state(Led::ScrollWheel),
        Err(DeviceError::NotSupported)
    ));
}

#[test]
fn mismatched_command_echo_is_rejected() {
    let transport = ScriptedTransport::default();
    // Device answers with a different command id than requested.
    transport.push_response(ok_response(class::DEVICE, cmd::GET_SERIAL));

    let kb = interface(transport);
    assert!(matches!(
        kb.get_firmware_version(),
        Err(DeviceError::UnexpectedResponse(_))
    ));
}

#[test]
fn unknown_status_surfaces_raw_byte() {
    let transport = ScriptedTransport::default();
    let mut response = ok_response(class::DEVICE, cmd::GET_FIRMWARE_VERSION);
    response.status = 0x77;
    transport.push_response(response);

    let kb = interface(transport);
    assert!(matches!(
        kb.get_firmware_version(),
        Err(DeviceError::UnknownStatus(0x77))
    ));
}
