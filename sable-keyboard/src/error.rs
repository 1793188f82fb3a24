//! Device interface error types

use sable_transport::TransportError;
use thiserror::Error;

/// Errors from high-level device operations
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Transport layer error
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Firmware is still processing a previous command
    #[error("device is busy")]
    Busy,

    /// Firmware rejected the command
    #[error("device reported command failure")]
    CommandFailed,

    /// Firmware-side timeout
    #[error("device timed out processing the command")]
    CommandTimeout,

    /// Command not implemented on this device
    #[error("command not supported by this device")]
    NotSupported,

    /// Response did not echo the request's command triple
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Status byte outside the documented set
    #[error("device returned unknown status 0x{0:02X}")]
    UnknownStatus(u8),
}
