//! Furnace recipes, fuels and conversion costs parsed from item notes.
//!
//! Three note tags drive the catalog:
//!
//! - `<furnaceRecipeItem:i5,2>` (repeatable) -- smelting this item yields two
//!   of item 5. The letter selects the table: `i`tem, `w`eapon or `a`rmor.
//! - `<furnaceRecipeCost:3>` -- ticks of active burning per conversion.
//! - `<fuel:10>` / `<infiniteFuelSource>` -- burn ticks granted per unit, and
//!   whether the unit is kept after ignition.
//!
//! The catalog is built once from a frozen [`Registry`] and never mutated.
//! Malformed entries are logged and skipped; malformed numbers are kept as
//! `None` so the tick engine can substitute its defaults.

use crate::id::{ItemCategory, ItemRef};
use crate::registry::Registry;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

pub const FUEL_TAG: &str = "fuel";
pub const INFINITE_FUEL_TAG: &str = "infiniteFuelSource";
pub const RECIPE_COST_TAG: &str = "furnaceRecipeCost";

/// Burn value used when a fuel's `<fuel>` tag is missing or not a number.
pub const DEFAULT_BURN_VALUE: u32 = 0;

/// Required progress used when `<furnaceRecipeCost>` is missing or not a
/// number. Large enough that the conversion effectively never completes.
pub const FALLBACK_REQUIRED_PROGRESS: u32 = 9999;

static RECIPE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<furnaceRecipeItem\s*:([^<>]*)>").expect("recipe tag pattern is valid")
});

static RECIPE_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([IiAaWw])\s*(\d+)\s*,\s*(\d+)\s*$").expect("recipe body pattern is valid")
});

// ---------------------------------------------------------------------------
// Note parsing
// ---------------------------------------------------------------------------

/// Parse a positive integer parameter. Zero counts as malformed.
pub fn parse_count(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|&n| n > 0)
}

/// Parse the body of one recipe tag, e.g. `i5,2` or ` W 12 , 1`.
fn parse_recipe_entry(body: &str) -> Option<(ItemRef, u32)> {
    let caps = RECIPE_BODY.captures(body)?;
    let category = ItemCategory::parse(&caps[1])?;
    let id = parse_count(&caps[2])?;
    let quantity = parse_count(&caps[3])?;
    Some((ItemRef::new(category, id), quantity))
}

/// Scan a note for every `<furnaceRecipeItem:...>` tag, in order.
///
/// Tags with an unknown category letter, or an id or quantity that is not a
/// plain positive decimal number, are skipped.
pub fn parse_recipe_tags(note: &str) -> Vec<(ItemRef, u32)> {
    let mut outputs = Vec::new();
    for caps in RECIPE_TAG.captures_iter(note) {
        let body = &caps[1];
        match parse_recipe_entry(body) {
            Some(entry) => outputs.push(entry),
            None => tracing::warn!(tag = &caps[0], "skipping malformed furnace recipe tag"),
        }
    }
    outputs
}

// ---------------------------------------------------------------------------
// Catalog entries
// ---------------------------------------------------------------------------

/// What smelting one unit of an input produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FurnaceRecipe {
    pub outputs: Vec<(ItemRef, u32)>,
    /// `None` when `<furnaceRecipeCost>` is missing or malformed.
    pub required_progress: Option<u32>,
}

impl FurnaceRecipe {
    /// The conversion threshold, falling back to
    /// [`FALLBACK_REQUIRED_PROGRESS`] with an error log.
    pub fn effective_required_progress(&self, input: ItemRef) -> u32 {
        match self.required_progress {
            Some(cost) => cost,
            None => {
                tracing::error!(%input, "furnace recipe cost is not a number");
                FALLBACK_REQUIRED_PROGRESS
            }
        }
    }
}

/// How an item behaves in the fuel slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuelSpec {
    /// `None` when `<fuel>` is missing or malformed.
    pub burn_value: Option<u32>,
    /// The unit is not consumed on ignition.
    pub infinite: bool,
}

impl FuelSpec {
    /// Burn ticks per unit, falling back to [`DEFAULT_BURN_VALUE`] with an
    /// error log.
    pub fn effective_burn_value(&self, fuel: ItemRef) -> u32 {
        match self.burn_value {
            Some(value) => value,
            None => {
                tracing::error!(%fuel, "tried to add fuel that was not a number");
                DEFAULT_BURN_VALUE
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RecipeCatalog
// ---------------------------------------------------------------------------

/// Immutable furnace rule tables, keyed by item.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: HashMap<ItemRef, FurnaceRecipe>,
    fuels: HashMap<ItemRef, FuelSpec>,
    smeltable: HashSet<ItemRef>,
}

impl RecipeCatalog {
    /// Scan every item, weapon and armor definition once.
    pub fn build(registry: &Registry) -> Self {
        let mut catalog = RecipeCatalog::default();

        for def in registry.defs() {
            // `<infiniteFuelSource>` alone does not make an item fuel.
            if def.has_meta(FUEL_TAG) {
                let burn_value = def.meta_text(FUEL_TAG).and_then(parse_count);
                if burn_value.is_none() {
                    tracing::warn!(item = %def.item, name = %def.name, "fuel item has no numeric burn value");
                }
                catalog.fuels.insert(
                    def.item,
                    FuelSpec {
                        burn_value,
                        infinite: def.has_meta(INFINITE_FUEL_TAG),
                    },
                );
            }

            if def.has_meta(RECIPE_COST_TAG) {
                catalog.smeltable.insert(def.item);
            }

            let outputs: Vec<(ItemRef, u32)> = parse_recipe_tags(&def.note)
                .into_iter()
                .filter(|(output, _)| {
                    let known = registry.contains(*output);
                    if !known {
                        tracing::warn!(input = %def.item, %output, "furnace recipe output does not exist");
                    }
                    known
                })
                .collect();
            if outputs.is_empty() {
                continue;
            }

            let required_progress = def.meta_text(RECIPE_COST_TAG).and_then(parse_count);
            catalog.recipes.insert(
                def.item,
                FurnaceRecipe {
                    outputs,
                    required_progress,
                },
            );
        }

        tracing::debug!(
            recipes = catalog.recipes.len(),
            fuels = catalog.fuels.len(),
            "furnace catalog built"
        );
        catalog
    }

    pub fn recipe(&self, input: ItemRef) -> Option<&FurnaceRecipe> {
        self.recipes.get(&input)
    }

    pub fn fuel(&self, item: ItemRef) -> Option<&FuelSpec> {
        self.fuels.get(&item)
    }

    /// Whether the item may be placed in a fuel slot.
    pub fn is_fuel(&self, item: ItemRef) -> bool {
        self.fuels.contains_key(&item)
    }

    /// Whether the item may be placed in an input slot.
    pub fn is_smeltable(&self, item: ItemRef) -> bool {
        self.smeltable.contains(&item)
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn fuel_count(&self) -> usize {
        self.fuels.len()
    }
}
