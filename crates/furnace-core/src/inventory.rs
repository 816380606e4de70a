use crate::id::ItemRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Party-side item limit used by [`Bag::new`].
pub const DEFAULT_MAX_PER_ITEM: u32 = 99;

/// A quantity of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemRef,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item: ItemRef, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

/// The host's party inventory, as seen by the furnace session.
///
/// The tick engine never touches an inventory; only the Presentation-facing
/// session moves items between the party and furnace slots.
pub trait Inventory {
    fn gain_item(&mut self, item: ItemRef, quantity: u32);
    fn lose_item(&mut self, item: ItemRef, quantity: u32);
    fn num_items(&self, item: ItemRef) -> u32;
    /// Every item currently held, in a stable order.
    fn items(&self) -> Vec<ItemRef>;
}

/// In-memory inventory with a per-item cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bag {
    stacks: BTreeMap<ItemRef, u32>,
    pub max_per_item: u32,
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}

impl Bag {
    pub fn new() -> Self {
        Self::with_max(DEFAULT_MAX_PER_ITEM)
    }

    pub fn with_max(max_per_item: u32) -> Self {
        Self {
            stacks: BTreeMap::new(),
            max_per_item,
        }
    }

    /// Add items. Returns the amount that didn't fit.
    #[must_use = "overflow count indicates items that did not fit"]
    pub fn add(&mut self, item: ItemRef, quantity: u32) -> u32 {
        let current = self.quantity(item);
        let space = self.max_per_item.saturating_sub(current);
        let to_add = quantity.min(space);
        if to_add > 0 {
            *self.stacks.entry(item).or_insert(0) += to_add;
        }
        quantity - to_add
    }

    /// Remove items. Returns the amount actually removed.
    #[must_use = "returns the quantity actually removed, which may be less than requested"]
    pub fn remove(&mut self, item: ItemRef, quantity: u32) -> u32 {
        let Some(stack) = self.stacks.get_mut(&item) else {
            return 0;
        };
        let to_remove = quantity.min(*stack);
        *stack -= to_remove;
        if *stack == 0 {
            self.stacks.remove(&item);
        }
        to_remove
    }

    pub fn quantity(&self, item: ItemRef) -> u32 {
        self.stacks.get(&item).copied().unwrap_or(0)
    }

    /// Total items across all types.
    pub fn total(&self) -> u64 {
        self.stacks.values().map(|&n| u64::from(n)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

impl Inventory for Bag {
    fn gain_item(&mut self, item: ItemRef, quantity: u32) {
        let overflow = self.add(item, quantity);
        if overflow > 0 {
            tracing::debug!(%item, overflow, "inventory full, excess discarded");
        }
    }

    fn lose_item(&mut self, item: ItemRef, quantity: u32) {
        let _ = self.remove(item, quantity);
    }

    fn num_items(&self, item: ItemRef) -> u32 {
        self.quantity(item)
    }

    fn items(&self) -> Vec<ItemRef> {
        self.stacks.keys().copied().collect()
    }
}
