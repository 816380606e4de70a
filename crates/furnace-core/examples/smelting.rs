//! Smelting walkthrough: a party loads a furnace and collects the results.
//!
//! Builds item tables from notes, moves coal and ore from the party into a
//! furnace, feeds the session elapsed time, and collects the ingots.
//!
//! Run with: `cargo run -p furnace-core --example smelting`

use furnace_core::config::FurnaceConfig;
use furnace_core::id::*;
use furnace_core::inventory::{Bag, Inventory};
use furnace_core::registry::RegistryBuilder;
use furnace_core::session::FurnaceSession;

fn main() {
    let mut tables = RegistryBuilder::new();
    let coal = tables.register(ItemCategory::Item, 1, "Coal", "<fuel:10>");
    let ore = tables.register(
        ItemCategory::Item,
        2,
        "Iron Ore",
        "<furnaceRecipeCost:3>\n<furnaceRecipeItem:i3,1>",
    );
    let ingot = tables.register(ItemCategory::Item, 3, "Iron Ingot", "");
    let registry = tables.build().expect("item ids are unique");

    let mut session = FurnaceSession::new(registry, FurnaceConfig::default());
    let mut party = Bag::new();
    party.gain_item(coal, 2);
    party.gain_item(ore, 5);

    // --- Step 1: Load the furnace ---

    let furnace = FurnaceId::from(1);
    for _ in 0..2 {
        session.select_fuel(1, Some(coal), &mut party).expect("party has coal");
    }
    for _ in 0..5 {
        session.select_input(1, Some(ore), &mut party).expect("party has ore");
    }
    println!("Fuel candidates left: {:?}", session.fuel_candidates(&party));

    // --- Step 2: Let time pass on the map ---

    session.on_context_start("Scene_Map");
    let mut ticks = 0;
    for second in 1..=30 {
        for report in session.update(1_000) {
            ticks += 1;
            for (id, conversion) in report.conversions() {
                println!("[{second:>2}s] furnace {id} smelted {}", conversion.input);
            }
        }
    }
    println!("\n{ticks} ticks run");

    let state = session.furnace(&furnace).expect("furnace was loaded");
    println!("Fuel level: {}", state.fuel_level);
    for stack in state.outputs.iter() {
        let name = session.display_name(stack.item).unwrap_or_default();
        println!("Output: {name} x{}", stack.quantity);
    }

    // --- Step 3: Collect ---

    let collected = session.collect_output(&furnace, ingot, u32::MAX, &mut party);
    println!("\nCollected {collected} ingots; party now holds {}", party.num_items(ingot));
}
