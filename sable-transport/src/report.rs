//! The fixed-layout report record exchanged with the device
//!
//! Every command and every response is one 90-byte record. The layout is
//! pinned by `zerocopy` rather than left to the compiler, so the in-memory
//! representation is byte-for-byte the wire representation:
//!
//! | offset | field |
//! |---|---|
//! | 0 | status |
//! | 1 | transaction_id |
//! | 2–3 | remaining_packets (big-endian) |
//! | 4 | protocol_type |
//! | 5 | data_size |
//! | 6 | command_class |
//! | 7 | command_id |
//! | 8–87 | arguments |
//! | 88 | checksum |
//! | 89 | reserved |

use std::fmt;

use zerocopy::byteorder::{BigEndian, U16};
use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::protocol::{
    ARGUMENTS_LEN, CHECKSUM_END, CHECKSUM_START, REPORT_LEN, TRANSACTION_ID_DEFAULT,
};

/// One report record, request or response.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Report {
    /// Device-reported status; 0x00 on a freshly built request
    pub status: u8,
    /// Correlates a response with the request that armed it
    pub transaction_id: u8,
    /// Continuation counter for multi-packet transfers; 0 for single-packet
    pub remaining_packets: U16<BigEndian>,
    /// Reserved, always 0
    pub protocol_type: u8,
    /// Number of meaningful bytes in `arguments`
    pub data_size: u8,
    pub command_class: u8,
    pub command_id: u8,
    pub arguments: [u8; ARGUMENTS_LEN],
    /// XOR of raw bytes [2, 88); not authoritative until [`Report::apply_checksum`]
    pub checksum: u8,
    reserved: u8,
}

const _: () = assert!(std::mem::size_of::<Report>() == REPORT_LEN);

impl Report {
    /// Build a request report for the given command.
    ///
    /// Everything except the command triple starts zeroed; the transaction
    /// id gets its default tag so the firmware treats this as a new request.
    pub fn request(command_class: u8, command_id: u8, data_size: u8) -> Self {
        let mut report = Self::new_zeroed();
        report.transaction_id = TRANSACTION_ID_DEFAULT;
        report.command_class = command_class;
        report.command_id = command_id;
        report.data_size = data_size;
        report
    }

    /// Fully zeroed scratch/response record.
    pub fn empty() -> Self {
        Self::new_zeroed()
    }

    /// XOR-reduce the checksum window.
    ///
    /// Pure; reads the stored bytes as-is and never includes the checksum
    /// byte itself.
    pub fn calculate_checksum(&self) -> u8 {
        self.as_bytes()[CHECKSUM_START..CHECKSUM_END]
            .iter()
            .fold(0, |crc, byte| crc ^ byte)
    }

    /// Recompute and store the checksum byte.
    ///
    /// Must run after the last field mutation and before every send.
    pub fn apply_checksum(&mut self) {
        self.checksum = self.calculate_checksum();
    }

    /// Copy `data` into the argument region starting at offset 0.
    ///
    /// Oversized payloads are truncated to the region width.
    pub fn set_arguments(&mut self, data: &[u8]) {
        let len = data.len().min(ARGUMENTS_LEN);
        self.arguments[..len].copy_from_slice(&data[..len]);
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Report")
            .field("status", &self.status)
            .field("transaction_id", &self.transaction_id)
            .field("remaining_packets", &self.remaining_packets.get())
            .field("data_size", &self.data_size)
            .field("command_class", &self.command_class)
            .field("command_id", &self.command_id)
            .finish_non_exhaustive()
    }
}

/// Single-line dump used in failure reports: status, transaction id, data
/// size, command triple, and the first 16 argument bytes.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status: {:02x} id: {:02x} len: {:02x} class: {:02x} cmd: {:02x} args:",
            self.status, self.transaction_id, self.data_size, self.command_class, self.command_id
        )?;
        for byte in &self.arguments[..16] {
            write!(f, " {byte:02x}")?;
        }
        Ok(())
    }
}
