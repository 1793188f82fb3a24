// Key-translation management
//
// Tables live as one binary file per device id under the state directory,
// in the registry's wire format (the same bytes a control-file write
// carries). Every command loads the file into a registry, mutates it
// through the normal update path, and persists the serialized result.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sable_keyboard::TranslationRegistry;
use tracing::debug;

fn table_path(state: &Path, device_id: u16) -> PathBuf {
    state.join(format!("{device_id}.bin"))
}

/// Load a device's persisted table, if any, into the registry.
fn load(state: &Path, device_id: u16) -> Result<TranslationRegistry> {
    let mut registry = TranslationRegistry::new();
    let path = table_path(state, device_id);
    if path.exists() {
        let buf = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        debug!("loaded {} bytes from {}", buf.len(), path.display());
        registry
            .apply_update(device_id, &buf)
            .with_context(|| format!("corrupt translation file {}", path.display()))?;
    }
    Ok(registry)
}

fn persist(state: &Path, device_id: u16, registry: &TranslationRegistry) -> Result<()> {
    fs::create_dir_all(state)
        .with_context(|| format!("creating state directory {}", state.display()))?;
    let path = table_path(state, device_id);
    fs::write(&path, registry.serialize(device_id))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Parse one FROM=TO keycode pair, decimal or 0x-prefixed hex.
fn parse_pair(pair: &str) -> Result<(u16, u16)> {
    let Some((from, to)) = pair.split_once('=') else {
        bail!("expected FROM=TO, got \"{pair}\"");
    };
    Ok((parse_keycode(from)?, parse_keycode(to)?))
}

fn parse_keycode(s: &str) -> Result<u16> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.with_context(|| format!("invalid keycode \"{s}\""))
}

pub fn set(state: &Path, device_id: u16, pairs: &[String]) -> Result<()> {
    let mut buf = Vec::with_capacity(pairs.len() * 4);
    for pair in pairs {
        let (from, to) = parse_pair(pair)?;
        buf.extend_from_slice(&from.to_le_bytes());
        buf.extend_from_slice(&to.to_le_bytes());
    }

    let mut registry = load(state, device_id)?;
    let outcome = registry.apply_update(device_id, &buf)?;
    persist(state, device_id, &registry)?;

    println!(
        "{} translations for device {device_id} (result {})",
        registry.entry_count(device_id),
        outcome.wire_code()
    );
    Ok(())
}

pub fn show(state: &Path, device_id: u16) -> Result<()> {
    let registry = load(state, device_id)?;
    let entries = registry.entries(device_id);
    if entries.is_empty() {
        println!("No translations for device {device_id}");
        return Ok(());
    }

    println!("Device {device_id}: {} translations", entries.len());
    for entry in entries {
        println!("  0x{:04X} -> 0x{:04X}", entry.from, entry.to);
    }
    Ok(())
}

pub fn export(state: &Path, device_id: u16, json: bool) -> Result<()> {
    let registry = load(state, device_id)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(registry.entries(device_id))?
        );
    } else {
        let wire = registry.serialize(device_id);
        let hex: Vec<String> = wire.iter().map(|b| format!("{b:02x}")).collect();
        println!("{}", hex.join(" "));
    }
    Ok(())
}

pub fn clear(state: &Path, device_id: u16) -> Result<()> {
    let mut registry = load(state, device_id)?;
    // A single-byte write is the protocol's clear request.
    registry.apply_update(device_id, &[0x00])?;

    let path = table_path(state, device_id);
    if path.exists() {
        fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
    }

    println!("Cleared translations for device {device_id}");
    Ok(())
}
