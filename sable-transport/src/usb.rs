//! libusb-backed control transport for real hardware
//!
//! Vendor commands travel as HID Feature reports (SET_REPORT/GET_REPORT
//! class requests, wValue 0x0300) on the device's vendor interface. hidraw
//! does not expose a caller-chosen wIndex, so this goes through libusb
//! directly: detach the kernel driver from the control interface, claim it,
//! and issue raw control transfers.

use rusb::{DeviceHandle, GlobalContext};
use tracing::{debug, info};

use crate::error::TransportError;
use crate::protocol::{device, usb};
use crate::ControlTransport;

/// Interface number claimed for the control channel.
///
/// Matches [`device::REPORT_INDEX`]: the class requests are addressed to
/// the same interface the handle claims.
const CONTROL_INTERFACE: u8 = device::REPORT_INDEX as u8;

/// An open Sable device ready for control transfers.
pub struct UsbControlTransport {
    handle: DeviceHandle<GlobalContext>,
    /// True when a kernel driver was detached and should be reattached on drop
    reattach: bool,
    pid: u16,
}

impl UsbControlTransport {
    /// Open a specific device by vendor/product id.
    pub fn open(vid: u16, pid: u16) -> Result<Self, TransportError> {
        let handle = rusb::open_device_with_vid_pid(vid, pid)
            .ok_or_else(|| TransportError::DeviceNotFound(format!("{vid:04x}:{pid:04x}")))?;

        let reattach = match handle.kernel_driver_active(CONTROL_INTERFACE) {
            Ok(true) => {
                debug!("detaching kernel driver from interface {CONTROL_INTERFACE}");
                handle
                    .detach_kernel_driver(CONTROL_INTERFACE)
                    .map_err(|source| TransportError::Claim {
                        interface: CONTROL_INTERFACE,
                        source,
                    })?;
                true
            }
            _ => false,
        };

        handle
            .claim_interface(CONTROL_INTERFACE)
            .map_err(|source| TransportError::Claim {
                interface: CONTROL_INTERFACE,
                source,
            })?;

        info!("opened {} ({vid:04x}:{pid:04x})", device::product_name(pid));
        Ok(Self {
            handle,
            reattach,
            pid,
        })
    }

    /// Open the first supported device found on the bus.
    pub fn open_any() -> Result<Self, TransportError> {
        for &pid in device::SUPPORTED_PIDS {
            match Self::open(device::VENDOR_ID, pid) {
                Ok(transport) => return Ok(transport),
                Err(TransportError::DeviceNotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Err(TransportError::DeviceNotFound(
            "no supported Sable device on the bus".into(),
        ))
    }

    /// Product id of the opened device.
    pub fn pid(&self) -> u16 {
        self.pid
    }

    /// Marketing name of the opened device.
    pub fn product_name(&self) -> &'static str {
        device::product_name(self.pid)
    }
}

impl ControlTransport for UsbControlTransport {
    fn control_write(&self, index: u16, buf: &[u8]) -> Result<usize, TransportError> {
        self.handle
            .write_control(
                usb::REQUEST_TYPE_OUT,
                usb::HID_REQ_SET_REPORT,
                usb::REPORT_VALUE,
                index,
                buf,
                usb::CONTROL_TIMEOUT,
            )
            .map_err(TransportError::from)
    }

    fn control_read(&self, index: u16, buf: &mut [u8]) -> Result<usize, TransportError> {
        self.handle
            .read_control(
                usb::REQUEST_TYPE_IN,
                usb::HID_REQ_GET_REPORT,
                usb::REPORT_VALUE,
                index,
                buf,
                usb::CONTROL_TIMEOUT,
            )
            .map_err(TransportError::from)
    }
}

impl Drop for UsbControlTransport {
    fn drop(&mut self) {
        let _ = self.handle.release_interface(CONTROL_INTERFACE);
        if self.reattach {
            let _ = self.handle.attach_kernel_driver(CONTROL_INTERFACE);
        }
    }
}
