//! Save/load example: furnace state survives a save round trip.
//!
//! Runs a furnace for a few ticks, encodes the save fragment to bytes,
//! decodes it into a fresh session, and verifies both sessions stay in step.
//!
//! Run with: `cargo run -p furnace-core --example save_load`

use furnace_core::config::FurnaceConfig;
use furnace_core::id::*;
use furnace_core::registry::{Registry, RegistryBuilder};
use furnace_core::serialize::SaveFragment;
use furnace_core::session::FurnaceSession;

fn item_tables() -> Registry {
    let mut tables = RegistryBuilder::new();
    tables.register(ItemCategory::Item, 1, "Coal", "<fuel:10>");
    tables.register(
        ItemCategory::Item,
        2,
        "Iron Ore",
        "<furnaceRecipeCost:3>\n<furnaceRecipeItem:i3,1>",
    );
    tables.register(ItemCategory::Item, 3, "Iron Ingot", "");
    tables.build().expect("item ids are unique")
}

fn main() {
    // --- Step 1: Build and run ---

    let mut session = FurnaceSession::new(item_tables(), FurnaceConfig::default());
    let furnace = session.furnace_mut("forge");
    furnace.set_fuel(Some(ItemRef::item(1)), 3);
    furnace.set_input(Some(ItemRef::item(2)), 6);

    println!("Running 8 ticks...\n");
    for _ in 0..8 {
        session.tick();
    }

    // --- Step 2: Encode ---

    let bytes = session
        .to_save_fragment()
        .to_bytes()
        .expect("encoding should succeed");
    println!("Encoded {} furnaces to {} bytes", session.furnaces().len(), bytes.len());

    // --- Step 3: Decode into a new session ---

    let fragment = SaveFragment::from_bytes(&bytes).expect("decoding should succeed");
    let mut restored = FurnaceSession::new(item_tables(), FurnaceConfig::default());
    restored.load_save_fragment(&fragment);
    assert_eq!(restored.furnaces(), session.furnaces());

    // --- Step 4: Both sessions stay in step ---

    for _ in 0..20 {
        session.tick();
        restored.tick();
    }
    assert_eq!(restored.furnaces(), session.furnaces());

    let id = FurnaceId::from("forge");
    let ingots = session
        .furnace(&id)
        .map(|f| f.outputs.quantity(ItemRef::item(3)))
        .unwrap_or(0);
    println!("Ingots after 28 ticks: {ingots}");
    println!("\nSave/load round trip verified successfully.");
}
