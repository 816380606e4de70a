//! Per-furnace state and the collection that owns it.
//!
//! A [`FurnaceState`] is mutated from two sides: the Presentation layer
//! through [`set_fuel`](FurnaceState::set_fuel),
//! [`set_input`](FurnaceState::set_input) and
//! [`withdraw_output`](FurnaceState::withdraw_output), and the tick engine.
//! Both run on the host's single game-loop thread, so they are strictly
//! interleaved and hold only transient `&mut` borrows into the
//! [`FurnaceRegistry`].

use crate::id::{FurnaceId, ItemRef};
use crate::inventory::ItemStack;
use std::collections::BTreeMap;
use std::collections::btree_map;

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// The combustible item waiting to be burned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuelSlot {
    pub item: ItemRef,
    pub quantity: u32,
}

/// The item being smelted and how far the current unit has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSlot {
    pub item: ItemRef,
    pub quantity: u32,
    pub progress: u32,
}

/// Produced items awaiting withdrawal. Never holds a zero-quantity entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputAccumulator {
    entries: BTreeMap<ItemRef, u32>,
}

impl OutputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add produced items, creating the entry as needed.
    pub fn add(&mut self, item: ItemRef, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self.entries.entry(item).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Remove up to `quantity`. Returns the amount actually removed.
    pub fn withdraw(&mut self, item: ItemRef, quantity: u32) -> u32 {
        let Some(stored) = self.entries.get_mut(&item) else {
            return 0;
        };
        let taken = quantity.min(*stored);
        *stored -= taken;
        if *stored == 0 {
            self.entries.remove(&item);
        }
        taken
    }

    pub fn quantity(&self, item: ItemRef) -> u32 {
        self.entries.get(&item).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemStack> + '_ {
        self.entries.iter().map(|(&item, &quantity)| ItemStack::new(item, quantity))
    }

    pub fn items(&self) -> Vec<ItemRef> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FurnaceState
// ---------------------------------------------------------------------------

/// One furnace: fuel slot, input slot, burn reserve and produced items.
#[derive(Debug, Clone, Default)]
pub struct FurnaceState {
    pub fuel: Option<FuelSlot>,
    pub input: Option<InputSlot>,
    /// Burn ticks left from fuel already consumed.
    pub fuel_level: u32,
    pub outputs: OutputAccumulator,
    /// A view refresh is owed. Cleared by the Presentation layer.
    pub dirty: bool,
}

/// Compares simulation state only; `dirty` is view bookkeeping.
impl PartialEq for FurnaceState {
    fn eq(&self, other: &Self) -> bool {
        self.fuel == other.fuel
            && self.input == other.input
            && self.fuel_level == other.fuel_level
            && self.outputs == other.outputs
    }
}

impl Eq for FurnaceState {}

impl FurnaceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fuel(&self) -> bool {
        self.fuel.is_some()
    }

    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    /// Burning off previously consumed fuel.
    pub fn is_active(&self) -> bool {
        self.fuel_level > 0
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Read and clear the refresh flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Put fuel in the fuel slot.
    ///
    /// The same item accumulates. A different item (or `None`) first empties
    /// the slot; the previous contents are returned for the caller to hand
    /// back to the party.
    pub fn set_fuel(&mut self, item: Option<ItemRef>, quantity: u32) -> Option<ItemStack> {
        if let (Some(item), Some(slot)) = (item, self.fuel.as_mut())
            && slot.item == item
        {
            if quantity > 0 {
                slot.quantity = slot.quantity.saturating_add(quantity);
                self.dirty = true;
            }
            return None;
        }

        let returned = self
            .fuel
            .take()
            .map(|slot| ItemStack::new(slot.item, slot.quantity));
        if let Some(item) = item
            && quantity > 0
        {
            self.fuel = Some(FuelSlot { item, quantity });
        }
        if returned.is_some() || self.fuel.is_some() {
            self.dirty = true;
        }
        returned
    }

    /// Put items in the input slot.
    ///
    /// Same semantics as [`set_fuel`](Self::set_fuel). Progress survives when
    /// more of the same item is added and restarts at 0 for a new item.
    pub fn set_input(&mut self, item: Option<ItemRef>, quantity: u32) -> Option<ItemStack> {
        if let (Some(item), Some(slot)) = (item, self.input.as_mut())
            && slot.item == item
        {
            if quantity > 0 {
                slot.quantity = slot.quantity.saturating_add(quantity);
                self.dirty = true;
            }
            return None;
        }

        let returned = self
            .input
            .take()
            .map(|slot| ItemStack::new(slot.item, slot.quantity));
        if let Some(item) = item
            && quantity > 0
        {
            self.input = Some(InputSlot {
                item,
                quantity,
                progress: 0,
            });
        }
        if returned.is_some() || self.input.is_some() {
            self.dirty = true;
        }
        returned
    }

    /// Take produced items. Returns the amount withdrawn, which the caller
    /// grants to the party.
    pub fn withdraw_output(&mut self, item: ItemRef, quantity: u32) -> u32 {
        let taken = self.outputs.withdraw(item, quantity);
        if taken > 0 {
            self.dirty = true;
        }
        taken
    }
}

// ---------------------------------------------------------------------------
// FurnaceRegistry
// ---------------------------------------------------------------------------

/// Every furnace in a save game, keyed by furnace id.
///
/// Furnaces are created on first reference and live as long as the save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FurnaceRegistry {
    furnaces: BTreeMap<FurnaceId, FurnaceState>,
}

impl FurnaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &FurnaceId) -> Option<&FurnaceState> {
        self.furnaces.get(id)
    }

    pub fn get_mut(&mut self, id: &FurnaceId) -> Option<&mut FurnaceState> {
        self.furnaces.get_mut(id)
    }

    /// Look up a furnace, initialising an empty one for an unknown id.
    pub fn get_or_init(&mut self, id: impl Into<FurnaceId>) -> &mut FurnaceState {
        self.furnaces.entry(id.into()).or_default()
    }

    pub fn insert(&mut self, id: FurnaceId, state: FurnaceState) -> Option<FurnaceState> {
        self.furnaces.insert(id, state)
    }

    pub fn contains(&self, id: &FurnaceId) -> bool {
        self.furnaces.contains_key(id)
    }

    /// Furnace ids in scan order.
    pub fn ids(&self) -> Vec<FurnaceId> {
        self.furnaces.keys().cloned().collect()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, FurnaceId, FurnaceState> {
        self.furnaces.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, FurnaceId, FurnaceState> {
        self.furnaces.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.furnaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.furnaces.is_empty()
    }
}
