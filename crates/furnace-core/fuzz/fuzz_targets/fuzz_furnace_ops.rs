#![no_main]
use arbitrary::Arbitrary;
use furnace_core::engine::advance;
use furnace_core::furnace::FurnaceState;
use furnace_core::id::ItemRef;
use furnace_core::test_utils::*;
use libfuzzer_sys::fuzz_target;

/// A structured furnace operation for fuzzing.
#[derive(Arbitrary, Debug)]
enum FuzzOp {
    SetFuel { item: Option<u8>, quantity: u8 },
    SetInput { item: Option<u8>, quantity: u8 },
    Withdraw { item: u8, quantity: u8 },
    Tick,
}

fn item(index: u8) -> ItemRef {
    ItemRef::item(u32::from(index % 8))
}

fuzz_target!(|ops: Vec<FuzzOp>| {
    let catalog = sample_catalog();
    let mut furnace = FurnaceState::new();

    // Limit operations to prevent timeouts.
    for op in ops.into_iter().take(512) {
        match op {
            FuzzOp::SetFuel { item: i, quantity } => {
                furnace.set_fuel(i.map(item), u32::from(quantity));
            }
            FuzzOp::SetInput { item: i, quantity } => {
                furnace.set_input(i.map(item), u32::from(quantity));
            }
            FuzzOp::Withdraw { item: i, quantity } => {
                furnace.withdraw_output(item(i), u32::from(quantity));
            }
            FuzzOp::Tick => {
                advance(&mut furnace, &catalog);
            }
        }

        assert!(furnace.fuel.is_none_or(|f| f.quantity > 0));
        assert!(furnace.input.is_none_or(|i| i.quantity > 0));
        assert!(furnace.outputs.iter().all(|s| s.quantity > 0));
    }
});
