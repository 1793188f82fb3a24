// CLI definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use sable_keyboard::{Led, LedEffect};

#[derive(Parser)]
#[command(name = "sablectl")]
#[command(author, version, about = "Sable input device driver")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Get device name, firmware version, and serial
    #[command(visible_aliases = ["version", "ver", "i"])]
    Info,

    /// Get or set LED brightness (0-255)
    #[command(visible_alias = "b")]
    Brightness {
        /// LED region to address
        #[arg(long, value_enum, default_value = "backlight")]
        led: LedArg,
        /// New brightness; omit to read the current value
        value: Option<u8>,
    },

    /// Switch an LED region on or off
    #[command(visible_alias = "l")]
    Led {
        /// LED region to address
        #[arg(long, value_enum, default_value = "backlight")]
        led: LedArg,
        #[arg(value_enum)]
        state: SwitchArg,
    },

    /// Set an LED effect
    #[command(visible_alias = "e")]
    Effect {
        /// LED region to address
        #[arg(long, value_enum, default_value = "backlight")]
        led: LedArg,
        /// off/wave/reactive/breathing/spectrum/static
        effect: LedEffect,
        /// Animation speed (clamped to the firmware range)
        #[arg(default_value_t = 2)]
        speed: u8,
    },

    /// Get or set the idle timeout before sleep, in seconds
    #[command(visible_alias = "idle")]
    IdleTimeout {
        /// New timeout; omit to read the current value
        seconds: Option<u16>,
    },

    /// Manage per-device key translations
    #[command(subcommand, visible_alias = "r")]
    Remap(RemapCommands),
}

#[derive(Subcommand)]
pub enum RemapCommands {
    /// Replace a device's translation table
    Set {
        /// Device id the table belongs to
        device_id: u16,
        /// Remappings as FROM=TO keycode pairs, e.g. 0x02=0x1E 0x03=0x30
        #[arg(required = true)]
        pairs: Vec<String>,
        /// Directory holding the binary translation files
        #[arg(long, default_value = "sable-translations")]
        state: PathBuf,
    },

    /// Show a device's translation table
    Show {
        device_id: u16,
        #[arg(long, default_value = "sable-translations")]
        state: PathBuf,
    },

    /// Dump a device's table in the wire format (hex) or as JSON
    Export {
        device_id: u16,
        /// Emit JSON instead of hex
        #[arg(long)]
        json: bool,
        #[arg(long, default_value = "sable-translations")]
        state: PathBuf,
    },

    /// Delete a device's translation table
    Clear {
        device_id: u16,
        #[arg(long, default_value = "sable-translations")]
        state: PathBuf,
    },
}

/// On/off switch argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SwitchArg {
    On,
    Off,
}

impl SwitchArg {
    pub fn is_on(self) -> bool {
        matches!(self, SwitchArg::On)
    }
}

/// CLI-facing LED region names
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LedArg {
    Backlight,
    Logo,
    #[value(name = "scroll-wheel")]
    ScrollWheel,
}

impl From<LedArg> for Led {
    fn from(arg: LedArg) -> Self {
        match arg {
            LedArg::Backlight => Led::Backlight,
            LedArg::Logo => Led::Logo,
            LedArg::ScrollWheel => Led::ScrollWheel,
        }
    }
}
