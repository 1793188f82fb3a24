//! Send and request/response sequencing over a control transport
//!
//! The firmware arms a response by first receiving a request report that
//! names what to report back; only then can the host read it. Both halves
//! need a settling delay after the transfer: issuing the next transfer too
//! early wedges the command pipeline, so the delay is unconditional and runs
//! on failure paths too.

use std::thread;
use std::time::Duration;

use tracing::warn;
use zerocopy::IntoBytes;

use crate::error::TransportError;
use crate::protocol::REPORT_LEN;
use crate::report::Report;
use crate::ControlTransport;

/// Send one report to the device.
///
/// The report is duplicated into a fresh buffer for the transfer so the
/// caller's record is never aliased by the bus stack mid-call. After the
/// transfer, successful or not, the settling delay runs, because the
/// firmware may have consumed part of the record regardless of the reported
/// status.
pub fn send_report<T: ControlTransport + ?Sized>(
    transport: &T,
    report: &Report,
    target_index: u16,
    wait_min: Duration,
    wait_max: Duration,
) -> Result<(), TransportError> {
    let buf = report.as_bytes().to_vec();
    let result = transport.control_write(target_index, &buf);

    settle(wait_min, wait_max);

    match result {
        Ok(wrote) if wrote == REPORT_LEN => Ok(()),
        Ok(wrote) => Err(TransportError::ShortWrite {
            wrote,
            expected: REPORT_LEN,
        }),
        Err(err) => Err(err),
    }
}

/// Send a request report, then read back the response it armed.
///
/// The read is issued even when the send fails: devices can still stage a
/// response from prior state, and the caller may want it for diagnostics.
/// A response of the wrong length is reported as
/// [`TransportError::ShortRead`] carrying the partially-populated record.
///
/// The SET_REPORT transfer fully completes, settling delay included, before
/// the GET_REPORT begins. The firmware requires this ordering.
pub fn exchange<T: ControlTransport + ?Sized>(
    transport: &T,
    request: &Report,
    request_index: u16,
    response_index: u16,
    wait_min: Duration,
    wait_max: Duration,
) -> Result<Report, TransportError> {
    if let Err(err) = send_report(transport, request, request_index, wait_min, wait_max) {
        warn!("request transfer failed, reading response anyway: {err}");
    }

    let mut response = Report::empty();
    let read = transport.control_read(response_index, response.as_mut_bytes())?;

    if read != REPORT_LEN {
        return Err(TransportError::ShortRead {
            read,
            expected: REPORT_LEN,
            response,
        });
    }

    Ok(response)
}

/// Log the fixed diagnostic dump of a malformed report.
///
/// Failure reporting only; never drives control flow.
pub fn log_erroneous_report(report: &Report, message: &str) {
    warn!("{message}. {report}");
}

fn settle(wait_min: Duration, wait_max: Duration) {
    // Any point inside the window satisfies the firmware; sleep may only
    // overshoot, so aim for the middle.
    thread::sleep((wait_min + wait_max) / 2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{class, cmd, status};
    use std::cell::RefCell;

    const WAIT: Duration = Duration::from_micros(1);

    #[derive(Debug, PartialEq)]
    enum Op {
        Write(u16, Vec<u8>),
        Read(u16),
    }

    /// Scripted transport double: records every call, answers writes and
    /// reads from preloaded results.
    struct MockTransport {
        ops: RefCell<Vec<Op>>,
        write_result: Result<usize, rusb::Error>,
        read_data: Vec<u8>,
        read_result: Result<usize, rusb::Error>,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                ops: RefCell::new(Vec::new()),
                write_result: Ok(REPORT_LEN),
                read_data: vec![0u8; REPORT_LEN],
                read_result: Ok(REPORT_LEN),
            }
        }

        fn with_response(mut self, response: &Report) -> Self {
            self.read_data = response.as_bytes().to_vec();
            self
        }
    }

    impl ControlTransport for MockTransport {
        fn control_write(&self, index: u16, buf: &[u8]) -> Result<usize, TransportError> {
            self.ops.borrow_mut().push(Op::Write(index, buf.to_vec()));
            self.write_result.map_err(TransportError::Transfer)
        }

        fn control_read(&self, index: u16, buf: &mut [u8]) -> Result<usize, TransportError> {
            self.ops.borrow_mut().push(Op::Read(index));
            let n = self.read_data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.read_data[..n]);
            self.read_result.map_err(TransportError::Transfer)
        }
    }

    fn sample_request() -> Report {
        let mut report = Report::request(class::LED, cmd::SET_LED_BRIGHTNESS, 0x03);
        report.set_arguments(&[0x01, 0x05, 0x7F]);
        report.apply_checksum();
        report
    }

    #[test]
    fn send_transfers_a_duplicate_of_the_report() {
        let transport = MockTransport::new();
        let report = sample_request();

        send_report(&transport, &report, 0x02, WAIT, WAIT).unwrap();

        let ops = transport.ops.borrow();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            Op::Write(index, buf) => {
                assert_eq!(*index, 0x02);
                assert_eq!(buf.as_slice(), report.as_bytes());
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn send_rejects_short_write() {
        let mut transport = MockTransport::new();
        transport.write_result = Ok(40);

        let err = send_report(&transport, &sample_request(), 0x02, WAIT, WAIT).unwrap_err();
        assert!(matches!(
            err,
            TransportError::ShortWrite { wrote: 40, expected: REPORT_LEN }
        ));
    }

    #[test]
    fn send_propagates_transfer_failure() {
        let mut transport = MockTransport::new();
        transport.write_result = Err(rusb::Error::Pipe);

        let err = send_report(&transport, &sample_request(), 0x02, WAIT, WAIT).unwrap_err();
        assert!(matches!(err, TransportError::Transfer(rusb::Error::Pipe)));
    }

    #[test]
    fn exchange_writes_then_reads_in_order() {
        let mut response = Report::request(class::LED, cmd::SET_LED_BRIGHTNESS, 0x03);
        response.status = status::SUCCESS;
        let transport = MockTransport::new().with_response(&response);

        let request = sample_request();
        let got = exchange(&transport, &request, 0x02, 0x02, WAIT, WAIT).unwrap();

        let ops = transport.ops.borrow();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], Op::Write(0x02, _)));
        assert_eq!(ops[1], Op::Read(0x02));
        assert_eq!(got.status, status::SUCCESS);
        assert_eq!(got.command_class, class::LED);
        assert_eq!(got.command_id, cmd::SET_LED_BRIGHTNESS);
    }

    #[test]
    fn exchange_reports_short_read_but_returns_partial_response() {
        let mut response = Report::empty();
        response.status = status::BUSY;
        response.command_class = class::LED;
        let mut transport = MockTransport::new().with_response(&response);
        transport.read_result = Ok(30);

        let err = exchange(&transport, &sample_request(), 0x02, 0x02, WAIT, WAIT).unwrap_err();
        match err {
            TransportError::ShortRead { read, expected, response } => {
                assert_eq!(read, 30);
                assert_eq!(expected, REPORT_LEN);
                // The partial record stays inspectable.
                assert_eq!(response.status, status::BUSY);
                assert_eq!(response.command_class, class::LED);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn exchange_reads_even_when_send_fails() {
        let mut response = Report::request(class::DEVICE, cmd::GET_FIRMWARE_VERSION, 0x02);
        response.status = status::SUCCESS;
        let mut transport = MockTransport::new().with_response(&response);
        transport.write_result = Err(rusb::Error::Io);

        let got = exchange(&transport, &sample_request(), 0x02, 0x02, WAIT, WAIT).unwrap();
        assert_eq!(got.status, status::SUCCESS);

        let ops = transport.ops.borrow();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[1], Op::Read(0x02)));
    }

    #[test]
    fn exchange_propagates_read_transfer_failure() {
        let mut transport = MockTransport::new();
        transport.read_result = Err(rusb::Error::NoDevice);

        let err = exchange(&transport, &sample_request(), 0x02, 0x02, WAIT, WAIT).unwrap_err();
        assert!(matches!(err, TransportError::Transfer(rusb::Error::NoDevice)));
    }
}
