// LED and power command handlers

use anyhow::Result;
use sable_keyboard::LedEffect;

use super::open_keyboard;
use crate::cli::LedArg;

pub fn get_brightness(led: LedArg) -> Result<()> {
    let kb = open_keyboard()?;
    let value = kb.get_brightness(led.into())?;
    println!("{value}");
    Ok(())
}

pub fn set_brightness(led: LedArg, value: u8) -> Result<()> {
    let kb = open_keyboard()?;
    kb.set_brightness(led.into(), value)?;
    println!("Brightness set to {value}");
    Ok(())
}

pub fn set_state(led: LedArg, on: bool) -> Result<()> {
    let kb = open_keyboard()?;
    kb.set_led_state(led.into(), on)?;
    println!("LED {}", if on { "on" } else { "off" });
    Ok(())
}

pub fn set_effect(led: LedArg, effect: LedEffect, speed: u8) -> Result<()> {
    let kb = open_keyboard()?;
    kb.set_led_effect(led.into(), effect, speed)?;
    println!("Effect set to {}", effect.name());
    Ok(())
}

pub fn get_idle_timeout() -> Result<()> {
    let kb = open_keyboard()?;
    println!("{} s", kb.get_idle_timeout()?);
    Ok(())
}

pub fn set_idle_timeout(seconds: u16) -> Result<()> {
    let kb = open_keyboard()?;
    kb.set_idle_timeout(seconds)?;
    println!("Idle timeout set");
    Ok(())
}
