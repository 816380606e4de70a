//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::catalog::RecipeCatalog;
use crate::config::FurnaceConfig;
use crate::furnace::{FurnaceRegistry, FurnaceState};
use crate::id::{ItemCategory, ItemRef};
use crate::registry::{Registry, RegistryBuilder};
use crate::session::FurnaceSession;

pub const COAL_BURN: u32 = 10;
pub const LAVA_BURN: u32 = 5;
pub const ORE_COST: u32 = 3;

// ===========================================================================
// Item constructors
// ===========================================================================

/// `<fuel:10>`
pub fn coal() -> ItemRef {
    ItemRef::item(1)
}
/// Smelts into one [`ingot`] after [`ORE_COST`] ticks.
pub fn ore() -> ItemRef {
    ItemRef::item(2)
}
pub fn ingot() -> ItemRef {
    ItemRef::item(3)
}
/// Infinite fuel source.
pub fn lava() -> ItemRef {
    ItemRef::item(4)
}
/// Smeltable but with no valid recipe output.
pub fn slag() -> ItemRef {
    ItemRef::item(5)
}
/// Fuel with a non-numeric burn value.
pub fn damp_wood() -> ItemRef {
    ItemRef::item(6)
}
/// Weapon that smelts back into ingots.
pub fn rusty_sword() -> ItemRef {
    ItemRef::weapon(1)
}

// ===========================================================================
// Registry / catalog
// ===========================================================================

/// Builder pre-loaded with the sample items, for tests that add their own.
pub fn sample_registry_builder() -> RegistryBuilder {
    let mut b = RegistryBuilder::new();
    b.register(ItemCategory::Item, 1, "Coal", "Burns hot.\n<fuel:10>");
    b.register(
        ItemCategory::Item,
        2,
        "Iron Ore",
        "<furnaceRecipeCost:3>\n<furnaceRecipeItem:i3,1>",
    );
    b.register(ItemCategory::Item, 3, "Iron Ingot", "");
    b.register(
        ItemCategory::Item,
        4,
        "Everburning Lava",
        "<fuel:5>\n<infiniteFuelSource>",
    );
    b.register(
        ItemCategory::Item,
        5,
        "Slag",
        "<furnaceRecipeCost:2>\n<furnaceRecipeItem:X5,2>",
    );
    b.register(ItemCategory::Item, 6, "Damp Wood", "<fuel:soggy>");
    b.register(
        ItemCategory::Weapon,
        1,
        "Rusty Sword",
        "<furnaceRecipeCost:5>\n<furnaceRecipeItem:i3,2>\n<furnaceRecipeItem:i1,1>",
    );
    b
}

pub fn sample_registry() -> Registry {
    sample_registry_builder()
        .build()
        .expect("sample items have unique ids")
}

pub fn sample_catalog() -> RecipeCatalog {
    RecipeCatalog::build(&sample_registry())
}

pub fn sample_session() -> FurnaceSession {
    FurnaceSession::new(sample_registry(), FurnaceConfig::default())
}

// ===========================================================================
// Furnace constructors
// ===========================================================================

/// A furnace with the given slot contents and no burn reserve.
pub fn loaded_furnace(fuel: Option<(ItemRef, u32)>, input: Option<(ItemRef, u32)>) -> FurnaceState {
    let mut furnace = FurnaceState::new();
    if let Some((item, quantity)) = fuel {
        furnace.set_fuel(Some(item), quantity);
    }
    if let Some((item, quantity)) = input {
        furnace.set_input(Some(item), quantity);
    }
    furnace
}

/// `count` furnaces numbered from 0, each loaded with coal and ore.
pub fn busy_registry(count: i64, coal_each: u32, ore_each: u32) -> FurnaceRegistry {
    let mut furnaces = FurnaceRegistry::new();
    for id in 0..count {
        *furnaces.get_or_init(id) = loaded_furnace(Some((coal(), coal_each)), Some((ore(), ore_each)));
    }
    furnaces
}
