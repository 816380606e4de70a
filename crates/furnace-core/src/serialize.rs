//! Persistence of furnace state.
//!
//! [`snapshot`] turns a [`FurnaceRegistry`] into a [`SaveFragment`], a plain
//! serde record the host stores inside its own save file. [`restore`] does
//! the reverse and re-resolves every item reference against the current
//! item tables, so removed items degrade to empty slots instead of failing
//! the load.
//!
//! For hosts that want an opaque blob, [`SaveFragment::to_bytes`] encodes
//! via `bitcode` behind a versioned header.

use crate::furnace::{FuelSlot, FurnaceRegistry, FurnaceState, InputSlot, OutputAccumulator};
use crate::id::{FurnaceId, ItemCategory, ItemRef};
use crate::registry::Registry;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying an encoded furnace save fragment.
pub const SNAPSHOT_MAGIC: u32 = 0xF0_4A_CE_01;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during serialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur during deserialization.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("data too short for snapshot header")]
    TooShort,
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Snapshot header
// ---------------------------------------------------------------------------

/// Header prepended to every encoded fragment. Checked before the payload
/// is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
        }
    }
}

impl SnapshotHeader {
    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Save records
// ---------------------------------------------------------------------------

/// An item quantity as stored in a save: the item is kept as a raw
/// `(category, id)` pair and resolved again on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRecord {
    pub category: ItemCategory,
    pub id: u32,
    pub quantity: u32,
}

impl StackRecord {
    pub fn item(&self) -> ItemRef {
        ItemRef::new(self.category, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub category: ItemCategory,
    pub id: u32,
    pub quantity: u32,
    pub progress: u32,
}

impl InputRecord {
    pub fn item(&self) -> ItemRef {
        ItemRef::new(self.category, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnaceRecord {
    pub id: FurnaceId,
    #[serde(default)]
    pub fuel: Option<StackRecord>,
    #[serde(default)]
    pub input: Option<InputRecord>,
    #[serde(default)]
    pub fuel_level: u32,
    #[serde(default)]
    pub outputs: Vec<StackRecord>,
}

/// The furnace portion of a save game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFragment {
    pub furnaces: Vec<FurnaceRecord>,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    header: SnapshotHeader,
    fragment: SaveFragment,
}

impl SaveFragment {
    /// Encode to a binary blob via bitcode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializeError> {
        let envelope = Envelope {
            header: SnapshotHeader::default(),
            fragment: self.clone(),
        };
        bitcode::serialize(&envelope).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    /// Decode a blob produced by [`to_bytes`](Self::to_bytes). The header is
    /// validated before the fragment is returned.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DeserializeError> {
        if data.is_empty() {
            return Err(DeserializeError::TooShort);
        }
        let envelope: Envelope =
            bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
        envelope.header.validate()?;
        Ok(envelope.fragment)
    }
}

// ---------------------------------------------------------------------------
// Snapshot / restore
// ---------------------------------------------------------------------------

/// Capture every furnace, in furnace-id order.
pub fn snapshot(furnaces: &FurnaceRegistry) -> SaveFragment {
    let furnaces = furnaces
        .iter()
        .map(|(id, state)| FurnaceRecord {
            id: id.clone(),
            fuel: state.fuel.map(|slot| StackRecord {
                category: slot.item.category,
                id: slot.item.id,
                quantity: slot.quantity,
            }),
            input: state.input.map(|slot| InputRecord {
                category: slot.item.category,
                id: slot.item.id,
                quantity: slot.quantity,
                progress: slot.progress,
            }),
            fuel_level: state.fuel_level,
            outputs: state
                .outputs
                .iter()
                .map(|stack| StackRecord {
                    category: stack.item.category,
                    id: stack.item.id,
                    quantity: stack.quantity,
                })
                .collect(),
        })
        .collect();
    SaveFragment { furnaces }
}

/// Rebuild the furnace collection from a save, resolving every item
/// against `registry`.
///
/// References that no longer resolve are logged and dropped: the slot comes
/// back empty, or the single output entry is skipped. Zero quantities are
/// normalised to empty. Restored furnaces start with no refresh pending.
pub fn restore(fragment: &SaveFragment, registry: &Registry) -> FurnaceRegistry {
    let mut furnaces = FurnaceRegistry::new();

    for record in &fragment.furnaces {
        let fuel = record
            .fuel
            .filter(|slot| slot.quantity > 0)
            .and_then(|slot| {
                resolve(registry, &record.id, slot.item()).map(|item| FuelSlot {
                    item,
                    quantity: slot.quantity,
                })
            });

        let input = record
            .input
            .filter(|slot| slot.quantity > 0)
            .and_then(|slot| {
                resolve(registry, &record.id, slot.item()).map(|item| InputSlot {
                    item,
                    quantity: slot.quantity,
                    progress: slot.progress,
                })
            });

        let mut outputs = OutputAccumulator::new();
        for stack in &record.outputs {
            if let Some(item) = resolve(registry, &record.id, stack.item()) {
                outputs.add(item, stack.quantity);
            }
        }

        let state = FurnaceState {
            fuel,
            input,
            fuel_level: record.fuel_level,
            outputs,
            dirty: false,
        };
        if furnaces.insert(record.id.clone(), state).is_some() {
            tracing::warn!(furnace = %record.id, "duplicate furnace record in save, keeping the last");
        }
    }

    tracing::debug!(furnaces = furnaces.len(), "furnace state restored");
    furnaces
}

fn resolve(registry: &Registry, furnace: &FurnaceId, item: ItemRef) -> Option<ItemRef> {
    match registry.resolve(item) {
        Ok(def) => Some(def.item),
        Err(e) => {
            tracing::warn!(%furnace, error = %e, "dropping saved furnace item");
            None
        }
    }
}
