//! The tick engine: advances furnaces by one simulated time unit.
//!
//! Each furnace is in one of three phases when a tick reaches it:
//!
//! - **Idle** -- no burn reserve and either slot empty. Nothing happens.
//! - **Igniting** -- no burn reserve, fuel and input both present. One unit
//!   of fuel is consumed (kept if the fuel is infinite) and its burn value
//!   is added to the reserve.
//! - **Active** -- burn reserve left. One unit of reserve is spent and, if
//!   the input has a recipe, the current unit progresses toward conversion.
//!
//! The engine never touches the party inventory.

use crate::catalog::{FuelSpec, RecipeCatalog};
use crate::furnace::{FuelSlot, FurnaceRegistry, FurnaceState};
use crate::id::{FurnaceId, ItemRef};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tick policy
// ---------------------------------------------------------------------------

/// How many furnaces a single tick may advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickPolicy {
    /// Scan in furnace-id order and stop after the first furnace that
    /// transitions. With N busy furnaces each one advances roughly once
    /// every N ticks.
    #[default]
    SingleTransition,
    /// Every furnace advances once per tick.
    AllEligible,
}

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// One completed conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub input: ItemRef,
    pub outputs: Vec<(ItemRef, u32)>,
}

/// What happened to a furnace during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Fuel was lit.
    Ignited {
        fuel: ItemRef,
        burn_value: u32,
        /// False for infinite fuel sources.
        consumed: bool,
    },
    /// One unit of burn reserve was spent.
    Burned {
        /// The input moved one step toward conversion.
        progressed: bool,
        converted: Option<Conversion>,
    },
}

/// The outcome of one [`TickEngine::step`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub transitions: Vec<(FurnaceId, Transition)>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// The transition a furnace made this tick, if any.
    pub fn transition(&self, id: &FurnaceId) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|(furnace, _)| furnace == id)
            .map(|(_, transition)| transition)
    }

    /// Conversions completed this tick.
    pub fn conversions(&self) -> impl Iterator<Item = (&FurnaceId, &Conversion)> {
        self.transitions.iter().filter_map(|(id, transition)| match transition {
            Transition::Burned {
                converted: Some(conversion),
                ..
            } => Some((id, conversion)),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// TickEngine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct TickEngine {
    pub policy: TickPolicy,
}

impl TickEngine {
    pub fn new(policy: TickPolicy) -> Self {
        Self { policy }
    }

    /// Run one tick over every furnace, in furnace-id order.
    pub fn step(&self, furnaces: &mut FurnaceRegistry, catalog: &RecipeCatalog) -> TickReport {
        let mut report = TickReport::default();
        for (id, state) in furnaces.iter_mut() {
            let Some(transition) = advance(state, catalog) else {
                continue;
            };
            report.transitions.push((id.clone(), transition));
            if self.policy == TickPolicy::SingleTransition {
                break;
            }
        }
        report
    }
}

/// Advance a single furnace by one tick. Returns `None` when idle or when
/// ignition would leave the furnace unchanged.
pub fn advance(state: &mut FurnaceState, catalog: &RecipeCatalog) -> Option<Transition> {
    if state.fuel_level > 0 {
        return Some(burn(state, catalog));
    }

    let Some(fuel) = state.fuel else {
        return None;
    };
    if state.input.is_none() {
        return None;
    }

    // An item without a fuel entry still burns, for nothing.
    let fuel_spec = catalog.fuel(fuel.item).copied().unwrap_or(FuelSpec {
        burn_value: None,
        infinite: false,
    });
    let burn_value = fuel_spec.effective_burn_value(fuel.item);
    let consumed = !fuel_spec.infinite;
    // Lighting an infinite source that grants no burn changes nothing, so it
    // must not claim the tick from other furnaces.
    if burn_value == 0 && !consumed {
        return None;
    }
    if consumed {
        let remaining = fuel.quantity.saturating_sub(1);
        state.fuel = (remaining > 0).then_some(FuelSlot {
            item: fuel.item,
            quantity: remaining,
        });
    }
    state.fuel_level = state.fuel_level.saturating_add(burn_value);
    state.dirty = true;

    tracing::debug!(fuel = %fuel.item, burn_value, consumed, "furnace ignited");
    Some(Transition::Ignited {
        fuel: fuel.item,
        burn_value,
        consumed,
    })
}

fn burn(state: &mut FurnaceState, catalog: &RecipeCatalog) -> Transition {
    state.fuel_level -= 1;
    state.dirty = true;

    let Some(slot) = state.input.as_mut() else {
        return Transition::Burned {
            progressed: false,
            converted: None,
        };
    };
    let Some(recipe) = catalog.recipe(slot.item) else {
        tracing::trace!(input = %slot.item, "input has no furnace recipe");
        return Transition::Burned {
            progressed: false,
            converted: None,
        };
    };

    slot.progress = slot.progress.saturating_add(1);
    if slot.progress < recipe.effective_required_progress(slot.item) {
        return Transition::Burned {
            progressed: true,
            converted: None,
        };
    }

    slot.progress = 0;
    slot.quantity = slot.quantity.saturating_sub(1);
    let input = slot.item;
    if slot.quantity == 0 {
        state.input = None;
    }
    for &(output, quantity) in &recipe.outputs {
        state.outputs.add(output, quantity);
    }

    tracing::debug!(%input, outputs = recipe.outputs.len(), "furnace conversion complete");
    Transition::Burned {
        progressed: true,
        converted: Some(Conversion {
            input,
            outputs: recipe.outputs.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::furnace::InputSlot;
    use crate::id::ItemCategory;
    use crate::test_utils::*;

    #[test]
    fn idle_without_fuel_or_input() {
        let catalog = sample_catalog();
        let mut furnace = FurnaceState::new();
        assert_eq!(advance(&mut furnace, &catalog), None);

        furnace.set_input(Some(ore()), 1);
        assert_eq!(advance(&mut furnace, &catalog), None);
    }

    #[test]
    fn fuel_without_input_never_ignites() {
        let catalog = sample_catalog();
        let mut furnace = loaded_furnace(Some((coal(), 5)), None);
        furnace.take_dirty();
        for _ in 0..20 {
            assert_eq!(advance(&mut furnace, &catalog), None);
        }
        assert_eq!(furnace.fuel_level, 0);
        assert_eq!(furnace.fuel.map(|f| f.quantity), Some(5));
        assert!(!furnace.dirty);
    }

    #[test]
    fn scenario_coal_and_ore() {
        let catalog = sample_catalog();
        let mut furnace = loaded_furnace(Some((coal(), 1)), Some((ore(), 1)));

        assert_eq!(
            advance(&mut furnace, &catalog),
            Some(Transition::Ignited {
                fuel: coal(),
                burn_value: 10,
                consumed: true
            })
        );
        assert_eq!(furnace.fuel_level, 10);
        assert!(furnace.fuel.is_none());

        advance(&mut furnace, &catalog);
        assert_eq!(furnace.fuel_level, 9);
        assert_eq!(furnace.input.map(|i| i.progress), Some(1));

        advance(&mut furnace, &catalog);
        assert!(furnace.outputs.is_empty());

        let transition = advance(&mut furnace, &catalog);
        assert_eq!(
            transition,
            Some(Transition::Burned {
                progressed: true,
                converted: Some(Conversion {
                    input: ore(),
                    outputs: vec![(ingot(), 1)],
                }),
            })
        );
        assert_eq!(furnace.fuel_level, 7);
        assert!(furnace.input.is_none());
        assert_eq!(furnace.outputs.quantity(ingot()), 1);
    }

    #[test]
    fn conversion_needs_exactly_required_progress() {
        let catalog = sample_catalog();
        let mut furnace = loaded_furnace(Some((coal(), 1)), Some((ore(), 2)));
        advance(&mut furnace, &catalog);

        for _ in 0..ORE_COST - 1 {
            advance(&mut furnace, &catalog);
            assert!(furnace.outputs.is_empty());
        }
        advance(&mut furnace, &catalog);
        assert_eq!(furnace.outputs.quantity(ingot()), 1);
        assert_eq!(
            furnace.input,
            Some(InputSlot {
                item: ore(),
                quantity: 1,
                progress: 0
            })
        );
    }

    #[test]
    fn burns_down_without_input() {
        let catalog = sample_catalog();
        let mut furnace = loaded_furnace(None, None);
        furnace.fuel_level = 2;
        assert_eq!(
            advance(&mut furnace, &catalog),
            Some(Transition::Burned {
                progressed: false,
                converted: None
            })
        );
        advance(&mut furnace, &catalog);
        assert_eq!(furnace.fuel_level, 0);
        assert_eq!(advance(&mut furnace, &catalog), None);
    }

    #[test]
    fn input_without_recipe_burns_without_progress() {
        let catalog = sample_catalog();
        let mut furnace = loaded_furnace(Some((coal(), 1)), Some((slag(), 1)));
        advance(&mut furnace, &catalog);
        for _ in 0..10 {
            advance(&mut furnace, &catalog);
        }
        assert_eq!(furnace.fuel_level, 0);
        assert_eq!(furnace.input.map(|i| (i.quantity, i.progress)), Some((1, 0)));
        assert!(furnace.outputs.is_empty());
    }

    #[test]
    fn infinite_fuel_is_not_consumed() {
        let catalog = sample_catalog();
        let mut furnace = loaded_furnace(Some((lava(), 1)), Some((ore(), 1)));
        assert_eq!(
            advance(&mut furnace, &catalog),
            Some(Transition::Ignited {
                fuel: lava(),
                burn_value: LAVA_BURN,
                consumed: false
            })
        );
        assert_eq!(furnace.fuel.map(|f| f.quantity), Some(1));
    }

    #[test]
    fn malformed_burn_value_consumes_fuel_for_nothing() {
        let catalog = sample_catalog();
        let mut furnace = loaded_furnace(Some((damp_wood(), 2)), Some((ore(), 1)));
        assert_eq!(
            advance(&mut furnace, &catalog),
            Some(Transition::Ignited {
                fuel: damp_wood(),
                burn_value: 0,
                consumed: true
            })
        );
        assert_eq!(furnace.fuel_level, 0);
        assert_eq!(furnace.fuel.map(|f| f.quantity), Some(1));
    }

    #[test]
    fn single_transition_policy_advances_one_furnace() {
        let catalog = sample_catalog();
        let mut furnaces = FurnaceRegistry::new();
        *furnaces.get_or_init(1) = loaded_furnace(Some((coal(), 1)), Some((ore(), 1)));
        *furnaces.get_or_init(2) = loaded_furnace(Some((coal(), 1)), Some((ore(), 1)));

        let report = TickEngine::default().step(&mut furnaces, &catalog);
        assert_eq!(report.len(), 1);
        assert!(report.transition(&FurnaceId::from(1)).is_some());
        assert_eq!(furnaces.get(&FurnaceId::from(2)).map(|f| f.fuel_level), Some(0));

        // The first furnace keeps winning while it has reserve.
        let report = TickEngine::default().step(&mut furnaces, &catalog);
        assert!(report.transition(&FurnaceId::from(1)).is_some());
        assert_eq!(furnaces.get(&FurnaceId::from(2)).map(|f| f.fuel_level), Some(0));
    }

    #[test]
    fn idle_furnaces_do_not_block_later_ones() {
        let catalog = sample_catalog();
        let mut furnaces = FurnaceRegistry::new();
        furnaces.get_or_init(1);
        *furnaces.get_or_init(2) = loaded_furnace(Some((coal(), 1)), Some((ore(), 1)));

        let report = TickEngine::default().step(&mut furnaces, &catalog);
        assert_eq!(report.len(), 1);
        assert!(report.transition(&FurnaceId::from(2)).is_some());
    }

    #[test]
    fn broken_infinite_fuel_does_not_starve_later_furnaces() {
        let mut builder = sample_registry_builder();
        let ember = builder.register(
            ItemCategory::Item,
            7,
            "Ember",
            "<fuel:abc><infiniteFuelSource>",
        );
        let catalog = RecipeCatalog::build(&builder.build().unwrap());

        let mut furnaces = FurnaceRegistry::new();
        *furnaces.get_or_init(0) = loaded_furnace(Some((ember, 1)), Some((ore(), 1)));
        *furnaces.get_or_init(1) = loaded_furnace(Some((coal(), 1)), Some((ore(), 3)));

        let engine = TickEngine::default();
        let mut healthy = 0;
        for _ in 0..20 {
            let report = engine.step(&mut furnaces, &catalog);
            assert!(report.transition(&FurnaceId::from(0)).is_none());
            if report.transition(&FurnaceId::from(1)).is_some() {
                healthy += 1;
            }
        }

        // One ignition and ten burns.
        assert_eq!(healthy, 11);
        let first = furnaces.get(&FurnaceId::from(0)).unwrap();
        assert_eq!(first.fuel_level, 0);
        assert_eq!(first.fuel.map(|f| f.quantity), Some(1));
        assert_eq!(furnaces.get(&FurnaceId::from(1)).unwrap().outputs.quantity(ingot()), 3);
    }

    #[test]
    fn all_eligible_policy_advances_every_furnace() {
        let catalog = sample_catalog();
        let mut furnaces = FurnaceRegistry::new();
        *furnaces.get_or_init(1) = loaded_furnace(Some((coal(), 1)), Some((ore(), 1)));
        *furnaces.get_or_init("forge") = loaded_furnace(Some((coal(), 1)), Some((ore(), 1)));
        furnaces.get_or_init(3);

        let report = TickEngine::new(TickPolicy::AllEligible).step(&mut furnaces, &catalog);
        assert_eq!(report.len(), 2);
        assert!(furnaces.iter().filter(|(_, f)| f.fuel_level == 10).count() == 2);
    }

    #[test]
    fn report_lists_conversions() {
        let catalog = sample_catalog();
        let mut furnaces = FurnaceRegistry::new();
        *furnaces.get_or_init(1) = loaded_furnace(Some((coal(), 1)), Some((ore(), 1)));
        let engine = TickEngine::default();

        let reports: Vec<TickReport> = (0..=ORE_COST).map(|_| engine.step(&mut furnaces, &catalog)).collect();
        let conversions: Vec<_> = reports.iter().flat_map(|r| r.conversions()).collect();
        assert_eq!(conversions.len(), 1);
        assert_eq!(conversions[0].1.input, ore());
    }

    #[test]
    fn tick_policy_serde_names() {
        let policy: TickPolicy = serde_json::from_str("\"all_eligible\"").unwrap();
        assert_eq!(policy, TickPolicy::AllEligible);
        assert_eq!(
            serde_json::to_string(&TickPolicy::SingleTransition).unwrap(),
            "\"single_transition\""
        );
    }
}
