//! Per-device key-translation registry
//!
//! Each device instance can carry a table of keycode remappings: when the
//! driver sees a physical key with keycode `from`, it reports `to` instead.
//! Tables are replaced wholesale by writes to the device's control file and
//! read back through the same file, so the wire format matters:
//!
//! - a write of N entries is `4 * N` bytes, each entry two little-endian
//!   u16 words `(from, to)`; `flags` is in-memory state only and resets to
//!   0 on every (re)write
//! - a write of exactly one byte (any value) clears the device's table
//! - reading a device with no table yields a single NUL byte
//!
//! A rejected write never touches the existing table: either the whole
//! update applies or nothing changes.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use zerocopy::byteorder::{LittleEndian, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Bytes in one serialized entry: two u16 words.
pub const ENTRY_WIRE_LEN: usize = std::mem::size_of::<WireEntry>();

/// Byte length of a clear write.
pub const CLEAR_LEN: usize = 1;

/// Marker emitted when serializing a device that has no table.
pub const NULL_MARKER: u8 = 0x00;

/// On-wire shape of one entry.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct WireEntry {
    from: U16<LittleEndian>,
    to: U16<LittleEndian>,
}

/// One keycode remapping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TranslationEntry {
    /// Physical keycode to intercept
    pub from: u16,
    /// Logical keycode to report instead
    pub to: u16,
    /// Runtime-only state, never serialized
    #[serde(skip)]
    pub flags: u8,
}

impl From<&WireEntry> for TranslationEntry {
    fn from(wire: &WireEntry) -> Self {
        Self {
            from: wire.from.get(),
            to: wire.to.get(),
            flags: 0,
        }
    }
}

impl From<&TranslationEntry> for WireEntry {
    fn from(entry: &TranslationEntry) -> Self {
        Self {
            from: U16::new(entry.from),
            to: U16::new(entry.to),
        }
    }
}

/// What a successful update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Table created, replaced, or overwritten
    Applied,
    /// Table removed (or was already absent)
    Cleared,
}

impl UpdateOutcome {
    /// Result code surfaced on the control-file write path.
    pub fn wire_code(self) -> u8 {
        match self {
            UpdateOutcome::Applied => 0,
            UpdateOutcome::Cleared => 1,
        }
    }
}

/// A rejected update. The registry is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// Buffer length is not a whole number of 4-byte entries.
    ///
    /// Lengths that are multiples of 2 but not of 4 land here too: an entry
    /// count is only well-defined in whole entries.
    #[error("translation buffer of {0} bytes is not a whole number of entries")]
    InvalidLength(usize),
}

impl TranslationError {
    /// Result code surfaced on the control-file write path.
    pub fn wire_code(&self) -> u8 {
        match self {
            TranslationError::InvalidLength(_) => 2,
        }
    }
}

/// All translation tables, keyed by device id.
///
/// At most one table per device id. The registry itself does no locking;
/// the embedding application serializes mutations against concurrent reads
/// for the same device.
#[derive(Debug, Default)]
pub struct TranslationRegistry {
    tables: HashMap<u16, Vec<TranslationEntry>>,
}

impl TranslationRegistry {
    /// Empty registry; tables appear lazily on first write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one control-file write to the device's table.
    ///
    /// A single-byte buffer clears the table (idempotent). Otherwise the
    /// buffer must be a whole number of entries; the table is created,
    /// replaced, or overwritten in place so its entry count always matches
    /// the last successful write.
    pub fn apply_update(
        &mut self,
        device_id: u16,
        buf: &[u8],
    ) -> Result<UpdateOutcome, TranslationError> {
        if buf.len() == CLEAR_LEN {
            self.tables.remove(&device_id);
            return Ok(UpdateOutcome::Cleared);
        }

        let wire = <[WireEntry]>::ref_from_bytes(buf)
            .map_err(|_| TranslationError::InvalidLength(buf.len()))?;

        let table = self.tables.entry(device_id).or_default();
        if table.len() == wire.len() {
            for (slot, entry) in table.iter_mut().zip(wire) {
                *slot = entry.into();
            }
        } else {
            *table = wire.iter().map(TranslationEntry::from).collect();
        }

        Ok(UpdateOutcome::Applied)
    }

    /// First entry whose `from` matches `key`, in stored order.
    pub fn lookup(&self, device_id: u16, key: u16) -> Option<&TranslationEntry> {
        self.tables
            .get(&device_id)?
            .iter()
            .find(|entry| entry.from == key)
    }

    /// Control-file read image of the device's table.
    ///
    /// 4 bytes per entry in table order, or the single-byte null marker
    /// when the device has no table.
    pub fn serialize(&self, device_id: u16) -> Vec<u8> {
        match self.tables.get(&device_id) {
            Some(table) => {
                let mut out = Vec::with_capacity(table.len() * ENTRY_WIRE_LEN);
                for entry in table {
                    out.extend_from_slice(WireEntry::from(entry).as_bytes());
                }
                out
            }
            None => vec![NULL_MARKER],
        }
    }

    /// Entries of the device's table, empty when absent.
    pub fn entries(&self, device_id: u16) -> &[TranslationEntry] {
        self.tables
            .get(&device_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Entry count of the device's table, 0 when absent.
    pub fn entry_count(&self, device_id: u16) -> usize {
        self.tables.get(&device_id).map_or(0, Vec::len)
    }

    /// Device ids that currently have a table.
    pub fn device_ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.tables.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Drop every table. Idempotent.
    pub fn clear_all(&mut self) {
        self.tables.clear();
    }
}
