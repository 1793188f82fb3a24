//! Transport error types

use thiserror::Error;

use crate::report::Report;

/// Errors from the control-transfer layer
#[derive(Error, Debug)]
pub enum TransportError {
    /// The underlying USB transfer failed outright
    #[error("USB transfer failed: {0}")]
    Transfer(#[from] rusb::Error),

    /// The bus accepted fewer bytes than one full report.
    ///
    /// Not a retryable partial write: the record size is fixed and the
    /// firmware discards fragments.
    #[error("short write: sent {wrote} of {expected} bytes")]
    ShortWrite { wrote: usize, expected: usize },

    /// The device returned fewer bytes than one full report.
    ///
    /// Carries whatever was read so callers can dump it for diagnostics.
    #[error("short read: received {read} of {expected} bytes")]
    ShortRead {
        read: usize,
        expected: usize,
        response: Report,
    },

    /// No matching device on the bus
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Detaching the kernel driver or claiming the control interface failed
    #[error("failed to claim control interface {interface}: {source}")]
    Claim { interface: u8, source: rusb::Error },
}
