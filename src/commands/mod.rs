// Command handlers, one module per CLI area

pub mod led;
pub mod query;
pub mod remap;

use anyhow::{Context, Result};
use sable_keyboard::KeyboardInterface;
use sable_transport::UsbControlTransport;

/// Open the first supported device and wrap it in the high-level interface.
pub fn open_keyboard() -> Result<KeyboardInterface<UsbControlTransport>> {
    let transport =
        UsbControlTransport::open_any().context("no supported Sable device found")?;
    Ok(KeyboardInterface::new(transport))
}
