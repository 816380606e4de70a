//! Property-based tests for the furnace core.
//!
//! Uses proptest to generate random furnace collections and slot
//! operations, then verify the accumulation, withdrawal and save round-trip
//! invariants hold.

use furnace_core::engine::{TickEngine, TickPolicy};
use furnace_core::furnace::{FurnaceRegistry, FurnaceState};
use furnace_core::id::*;
use furnace_core::serialize::{restore, snapshot};
use furnace_core::test_utils::*;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

fn arb_item() -> impl Strategy<Value = ItemRef> {
    prop_oneof![
        Just(coal()),
        Just(ore()),
        Just(ingot()),
        Just(lava()),
        Just(slag()),
        Just(damp_wood()),
        Just(rusty_sword()),
    ]
}

fn arb_furnace_id() -> impl Strategy<Value = FurnaceId> {
    prop_oneof![
        (-5i64..50).prop_map(FurnaceId::from),
        "[a-z]{1,8}".prop_map(FurnaceId::from),
    ]
}

fn arb_furnace() -> impl Strategy<Value = FurnaceState> {
    (
        proptest::option::of((arb_item(), 1..20u32)),
        proptest::option::of((arb_item(), 1..20u32, 0..5u32)),
        0..30u32,
        proptest::collection::vec((arb_item(), 0..10u32), 0..4),
    )
        .prop_map(|(fuel, input, fuel_level, outputs)| {
            let mut furnace = loaded_furnace(fuel, input.map(|(item, qty, _)| (item, qty)));
            if let (Some(slot), Some((_, _, progress))) = (furnace.input.as_mut(), input) {
                slot.progress = progress;
            }
            furnace.fuel_level = fuel_level;
            for (item, quantity) in outputs {
                furnace.outputs.add(item, quantity);
            }
            furnace
        })
}

fn arb_registry() -> impl Strategy<Value = FurnaceRegistry> {
    proptest::collection::vec((arb_furnace_id(), arb_furnace()), 0..8).prop_map(|entries| {
        let mut furnaces = FurnaceRegistry::new();
        for (id, furnace) in entries {
            furnaces.insert(id, furnace);
        }
        furnaces
    })
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    /// Setting the same fuel twice accumulates both quantities.
    #[test]
    fn same_fuel_accumulates(item in arb_item(), q1 in 1..1000u32, q2 in 1..1000u32) {
        let mut furnace = FurnaceState::new();
        prop_assert_eq!(furnace.set_fuel(Some(item), q1), None);
        prop_assert_eq!(furnace.set_fuel(Some(item), q2), None);
        prop_assert_eq!(furnace.fuel.map(|f| f.quantity), Some(q1 + q2));
    }

    /// Withdrawing returns min(q, s) and leaves max(0, s - q).
    #[test]
    fn withdrawal_clamps(stored in 1..100u32, requested in 0..150u32) {
        let mut furnace = FurnaceState::new();
        furnace.outputs.add(ingot(), stored);
        let taken = furnace.withdraw_output(ingot(), requested);
        prop_assert_eq!(taken, requested.min(stored));
        prop_assert_eq!(furnace.outputs.quantity(ingot()), stored.saturating_sub(requested));
        if stored <= requested {
            prop_assert!(furnace.outputs.is_empty());
        }
    }

    /// A snapshot restored against the same item tables is the same state.
    #[test]
    fn snapshot_restore_round_trip(furnaces in arb_registry()) {
        let registry = sample_registry();
        let restored = restore(&snapshot(&furnaces), &registry);
        prop_assert_eq!(&restored, &furnaces);

        let bytes = snapshot(&furnaces).to_bytes().unwrap();
        let decoded = furnace_core::serialize::SaveFragment::from_bytes(&bytes).unwrap();
        prop_assert_eq!(restore(&decoded, &registry), furnaces);
    }

    /// Ticking never leaves an empty slot or a zero output entry behind, and
    /// the default policy never advances more than one furnace.
    #[test]
    fn ticks_preserve_slot_invariants(furnaces in arb_registry(), ticks in 1..60usize) {
        let catalog = sample_catalog();
        let mut furnaces = furnaces;
        let engine = TickEngine::new(TickPolicy::SingleTransition);
        for _ in 0..ticks {
            let report = engine.step(&mut furnaces, &catalog);
            prop_assert!(report.len() <= 1);
        }
        for (_, furnace) in furnaces.iter() {
            prop_assert!(furnace.fuel.is_none_or(|f| f.quantity > 0));
            prop_assert!(furnace.input.is_none_or(|i| i.quantity > 0));
            prop_assert!(furnace.outputs.iter().all(|s| s.quantity > 0));
        }
    }
}
