//! Sable Driver CLI
//!
//! Command-line interface for Sable programmable input devices: device
//! queries, LED control, and key-translation management.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, Commands, RemapCommands};

mod commands;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Info) => {
            commands::query::info()?;
        }

        Some(Commands::Brightness { led, value }) => match value {
            Some(value) => commands::led::set_brightness(led, value)?,
            None => commands::led::get_brightness(led)?,
        },

        Some(Commands::Led { led, state }) => {
            commands::led::set_state(led, state.is_on())?;
        }

        Some(Commands::Effect { led, effect, speed }) => {
            commands::led::set_effect(led, effect, speed)?;
        }

        Some(Commands::IdleTimeout { seconds }) => match seconds {
            Some(seconds) => commands::led::set_idle_timeout(seconds)?,
            None => commands::led::get_idle_timeout()?,
        },

        Some(Commands::Remap(remap)) => match remap {
            RemapCommands::Set {
                device_id,
                pairs,
                state,
            } => commands::remap::set(&state, device_id, &pairs)?,
            RemapCommands::Show { device_id, state } => {
                commands::remap::show(&state, device_id)?;
            }
            RemapCommands::Export {
                device_id,
                json,
                state,
            } => commands::remap::export(&state, device_id, json)?,
            RemapCommands::Clear { device_id, state } => {
                commands::remap::clear(&state, device_id)?;
            }
        },
    }

    Ok(())
}
