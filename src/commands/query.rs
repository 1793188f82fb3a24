// Device information queries

use anyhow::Result;

use super::open_keyboard;

/// Print product name, firmware version, and serial.
pub fn info() -> Result<()> {
    let kb = open_keyboard()?;

    println!("Device:   {}", kb.transport().product_name());
    println!("Firmware: {}", kb.get_firmware_version()?);
    println!("Serial:   {}", kb.get_serial()?);

    Ok(())
}
