//! The host-facing furnace session.
//!
//! A [`FurnaceSession`] lives as long as one save game. It owns the frozen
//! item tables and recipe catalog, every furnace, and the tick timer, and
//! exposes the small set of calls a host needs: scene lifecycle hooks, an
//! elapsed-time update, item movement between the party and a furnace, and
//! save hooks.

use crate::catalog::RecipeCatalog;
use crate::config::FurnaceConfig;
use crate::engine::{TickEngine, TickReport};
use crate::furnace::{FurnaceRegistry, FurnaceState};
use crate::id::{FurnaceId, ItemRef};
use crate::inventory::{Inventory, ItemStack};
use crate::registry::Registry;
use crate::serialize::{self, SaveFragment};
use crate::sim::{ContextGate, TickTimer};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("party holds no {0}")]
    NotInInventory(ItemRef),
    #[error("{0} cannot be used as furnace fuel")]
    NotFuel(ItemRef),
    #[error("{0} cannot be smelted")]
    NotSmeltable(ItemRef),
}

/// Which furnace slot an item is being moved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Fuel,
    Input,
}

#[derive(Debug)]
pub struct FurnaceSession {
    registry: Registry,
    catalog: RecipeCatalog,
    config: FurnaceConfig,
    furnaces: FurnaceRegistry,
    engine: TickEngine,
    timer: TickTimer,
    gate: ContextGate,
}

impl FurnaceSession {
    /// Build the catalog from `registry` and start with no furnaces and the
    /// timer stopped.
    pub fn new(registry: Registry, config: FurnaceConfig) -> Self {
        let catalog = RecipeCatalog::build(&registry);
        Self::with_catalog(registry, catalog, config)
    }

    pub fn with_catalog(registry: Registry, catalog: RecipeCatalog, config: FurnaceConfig) -> Self {
        Self {
            engine: TickEngine::new(config.tick_policy),
            timer: config.timer(),
            gate: config.context_gate(),
            registry,
            catalog,
            config,
            furnaces: FurnaceRegistry::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &FurnaceConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Scene lifecycle and time
    // -----------------------------------------------------------------------

    pub fn on_context_start(&mut self, context: &str) {
        self.gate.on_context_start(context, &mut self.timer);
    }

    pub fn on_context_end(&mut self) {
        self.gate.on_context_end(&mut self.timer);
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.is_running()
    }

    /// Feed elapsed wall-clock time and run every tick that fell due.
    pub fn update(&mut self, elapsed_ms: u64) -> Vec<TickReport> {
        let due = self.timer.advance(elapsed_ms);
        (0..due).map(|_| self.tick()).collect()
    }

    /// Run one tick now, regardless of the timer.
    pub fn tick(&mut self) -> TickReport {
        self.engine.step(&mut self.furnaces, &self.catalog)
    }

    // -----------------------------------------------------------------------
    // Furnace access
    // -----------------------------------------------------------------------

    pub fn furnace(&self, id: &FurnaceId) -> Option<&FurnaceState> {
        self.furnaces.get(id)
    }

    /// The furnace with this id, created empty on first use.
    pub fn furnace_mut(&mut self, id: impl Into<FurnaceId>) -> &mut FurnaceState {
        self.furnaces.get_or_init(id)
    }

    pub fn furnaces(&self) -> &FurnaceRegistry {
        &self.furnaces
    }

    /// Read and clear a furnace's refresh flag.
    pub fn take_dirty(&mut self, id: &FurnaceId) -> bool {
        self.furnaces.get_mut(id).is_some_and(FurnaceState::take_dirty)
    }

    // -----------------------------------------------------------------------
    // Item movement
    // -----------------------------------------------------------------------

    /// Move one unit of `item` from the party into the fuel slot. Passing
    /// `None` empties the slot back into the party.
    pub fn select_fuel(
        &mut self,
        id: impl Into<FurnaceId>,
        item: Option<ItemRef>,
        inventory: &mut impl Inventory,
    ) -> Result<(), SessionError> {
        self.select(Slot::Fuel, id.into(), item, inventory)
    }

    /// Move one unit of `item` from the party into the input slot. Passing
    /// `None` empties the slot back into the party.
    pub fn select_input(
        &mut self,
        id: impl Into<FurnaceId>,
        item: Option<ItemRef>,
        inventory: &mut impl Inventory,
    ) -> Result<(), SessionError> {
        self.select(Slot::Input, id.into(), item, inventory)
    }

    fn select(
        &mut self,
        slot: Slot,
        id: FurnaceId,
        item: Option<ItemRef>,
        inventory: &mut impl Inventory,
    ) -> Result<(), SessionError> {
        if let Some(item) = item {
            match slot {
                Slot::Fuel if !self.catalog.is_fuel(item) => return Err(SessionError::NotFuel(item)),
                Slot::Input if !self.catalog.is_smeltable(item) => {
                    return Err(SessionError::NotSmeltable(item));
                }
                _ => {}
            }
            if inventory.num_items(item) == 0 {
                return Err(SessionError::NotInInventory(item));
            }
        }

        let furnace = self.furnaces.get_or_init(id);
        let returned = match slot {
            Slot::Fuel => furnace.set_fuel(item, 1),
            Slot::Input => furnace.set_input(item, 1),
        };
        if let Some(ItemStack { item, quantity }) = returned {
            inventory.gain_item(item, quantity);
        }
        if let Some(item) = item {
            inventory.lose_item(item, 1);
        }
        Ok(())
    }

    /// Move up to `quantity` of a produced item into the party. Returns the
    /// amount moved.
    pub fn collect_output(
        &mut self,
        id: &FurnaceId,
        item: ItemRef,
        quantity: u32,
        inventory: &mut impl Inventory,
    ) -> u32 {
        let Some(furnace) = self.furnaces.get_mut(id) else {
            return 0;
        };
        let taken = furnace.withdraw_output(item, quantity);
        if taken > 0 {
            inventory.gain_item(item, taken);
        }
        taken
    }

    // -----------------------------------------------------------------------
    // Candidate lists
    // -----------------------------------------------------------------------

    /// Items the party holds that can go in a fuel slot.
    pub fn fuel_candidates(&self, inventory: &impl Inventory) -> Vec<ItemRef> {
        inventory
            .items()
            .into_iter()
            .filter(|&item| self.catalog.is_fuel(item) && inventory.num_items(item) > 0)
            .collect()
    }

    /// Items the party holds that can go in an input slot.
    pub fn input_candidates(&self, inventory: &impl Inventory) -> Vec<ItemRef> {
        inventory
            .items()
            .into_iter()
            .filter(|&item| self.catalog.is_smeltable(item) && inventory.num_items(item) > 0)
            .collect()
    }

    /// Produced items waiting in a furnace.
    pub fn output_candidates(&self, id: &FurnaceId) -> Vec<ItemStack> {
        self.furnaces
            .get(id)
            .map(|furnace| furnace.outputs.iter().collect())
            .unwrap_or_default()
    }

    /// An item's name shortened for display, or `None` for an unknown item.
    pub fn display_name(&self, item: ItemRef) -> Option<String> {
        self.registry
            .name(item)
            .map(|name| self.config.truncate_name(name))
    }

    // -----------------------------------------------------------------------
    // Save hooks
    // -----------------------------------------------------------------------

    pub fn to_save_fragment(&self) -> SaveFragment {
        serialize::snapshot(&self.furnaces)
    }

    /// Replace every furnace with the saved ones.
    pub fn load_save_fragment(&mut self, fragment: &SaveFragment) {
        self.furnaces = serialize::restore(fragment, &self.registry);
        tracing::info!(furnaces = self.furnaces.len(), "furnace save data loaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Bag;
    use crate::test_utils::*;

    fn bag_with(items: &[(ItemRef, u32)]) -> Bag {
        let mut bag = Bag::new();
        for &(item, quantity) in items {
            bag.gain_item(item, quantity);
        }
        bag
    }

    #[test]
    fn select_moves_one_unit() {
        let mut session = sample_session();
        let mut bag = bag_with(&[(coal(), 3), (ore(), 2)]);

        session.select_fuel(1, Some(coal()), &mut bag).unwrap();
        session.select_fuel(1, Some(coal()), &mut bag).unwrap();
        session.select_input(1, Some(ore()), &mut bag).unwrap();

        let furnace = session.furnace(&FurnaceId::from(1)).unwrap();
        assert_eq!(furnace.fuel.map(|f| f.quantity), Some(2));
        assert_eq!(furnace.input.map(|i| i.quantity), Some(1));
        assert_eq!(bag.quantity(coal()), 1);
        assert_eq!(bag.quantity(ore()), 1);
    }

    #[test]
    fn switching_fuel_returns_old_stack() {
        let mut session = sample_session();
        let mut bag = bag_with(&[(coal(), 3), (lava(), 1)]);

        session.select_fuel(1, Some(coal()), &mut bag).unwrap();
        session.select_fuel(1, Some(coal()), &mut bag).unwrap();
        session.select_fuel(1, Some(lava()), &mut bag).unwrap();

        assert_eq!(bag.quantity(coal()), 3);
        assert_eq!(bag.quantity(lava()), 0);
        let furnace = session.furnace(&FurnaceId::from(1)).unwrap();
        assert_eq!(furnace.fuel.map(|f| (f.item, f.quantity)), Some((lava(), 1)));
    }

    #[test]
    fn selecting_none_empties_the_slot() {
        let mut session = sample_session();
        let mut bag = bag_with(&[(ore(), 2)]);
        session.select_input(1, Some(ore()), &mut bag).unwrap();
        session.select_input(1, None, &mut bag).unwrap();
        assert_eq!(bag.quantity(ore()), 2);
        assert!(session.furnace(&FurnaceId::from(1)).unwrap().input.is_none());
    }

    #[test]
    fn select_rejects_missing_and_wrong_items() {
        let mut session = sample_session();
        let mut bag = bag_with(&[(ore(), 1), (ingot(), 1)]);

        assert!(matches!(
            session.select_fuel(1, Some(coal()), &mut bag),
            Err(SessionError::NotInInventory(item)) if item == coal()
        ));
        assert!(matches!(
            session.select_fuel(1, Some(ore()), &mut bag),
            Err(SessionError::NotFuel(_))
        ));
        assert!(matches!(
            session.select_input(1, Some(ingot()), &mut bag),
            Err(SessionError::NotSmeltable(_))
        ));
        assert_eq!(bag.quantity(ore()), 1);
    }

    #[test]
    fn collect_output_moves_into_party() {
        let mut session = sample_session();
        session.furnace_mut(5).outputs.add(ingot(), 3);
        let mut bag = Bag::new();

        let id = FurnaceId::from(5);
        assert_eq!(session.collect_output(&id, ingot(), 2, &mut bag), 2);
        assert_eq!(session.collect_output(&id, ingot(), 2, &mut bag), 1);
        assert_eq!(session.collect_output(&id, ingot(), 2, &mut bag), 0);
        assert_eq!(bag.quantity(ingot()), 3);
        assert_eq!(session.collect_output(&FurnaceId::from(9), ingot(), 1, &mut bag), 0);
    }

    #[test]
    fn candidates_follow_catalog() {
        let session = sample_session();
        let bag = bag_with(&[(coal(), 1), (ore(), 1), (ingot(), 1), (slag(), 2)]);
        assert_eq!(session.fuel_candidates(&bag), vec![coal()]);
        assert_eq!(session.input_candidates(&bag), vec![ore(), slag()]);
    }

    #[test]
    fn update_only_ticks_while_running() {
        let mut session = sample_session();
        let mut bag = bag_with(&[(coal(), 1), (ore(), 1)]);
        session.select_fuel(1, Some(coal()), &mut bag).unwrap();
        session.select_input(1, Some(ore()), &mut bag).unwrap();

        assert!(session.update(5_000).is_empty());

        session.on_context_start("Scene_Map");
        assert!(session.is_ticking());
        let reports = session.update(2_500);
        assert_eq!(reports.len(), 2);
        assert_eq!(session.furnace(&FurnaceId::from(1)).unwrap().fuel_level, 9);

        session.on_context_start("Scene_Save");
        assert!(session.update(10_000).is_empty());
    }

    #[test]
    fn save_fragment_round_trip() {
        let mut session = sample_session();
        let mut bag = bag_with(&[(coal(), 2), (ore(), 2)]);
        session.select_fuel("forge", Some(coal()), &mut bag).unwrap();
        session.select_input("forge", Some(ore()), &mut bag).unwrap();
        for _ in 0..3 {
            session.tick();
        }

        let fragment = session.to_save_fragment();
        let mut loaded = sample_session();
        loaded.load_save_fragment(&fragment);
        assert_eq!(loaded.furnaces(), session.furnaces());
    }

    #[test]
    fn display_name_truncates() {
        let session = sample_session();
        assert_eq!(session.display_name(coal()).as_deref(), Some("Coal"));
        assert_eq!(session.display_name(lava()).as_deref(), Some("Everburning L.."));
        assert_eq!(session.display_name(ItemRef::armor(99)), None);
    }

    #[test]
    fn take_dirty_reads_and_clears() {
        let mut session = sample_session();
        let mut bag = bag_with(&[(coal(), 1)]);
        session.select_fuel(2, Some(coal()), &mut bag).unwrap();
        let id = FurnaceId::from(2);
        assert!(session.take_dirty(&id));
        assert!(!session.take_dirty(&id));
        assert!(!session.take_dirty(&FurnaceId::from(3)));
    }
}
