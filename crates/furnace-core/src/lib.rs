//! Furnace Core -- a tick-driven furnace crafting engine for RPG hosts.
//!
//! Each furnace turns fuel and an input item into output items over time.
//! The host owns rendering, menus and the save file; this crate owns the
//! rules and the state, and is driven entirely through explicit calls.
//!
//! # Tick Phases
//!
//! Each call to [`engine::TickEngine::step`] visits furnaces in id order.
//! A furnace is in one of three phases:
//!
//! 1. **Idle** -- no burn reserve and a slot is empty. Skipped.
//! 2. **Igniting** -- no burn reserve, fuel and input present. One unit of
//!    fuel is consumed and its burn value becomes the reserve.
//! 3. **Active** -- reserve left. One unit is spent and the input progresses;
//!    at the recipe's cost one input unit converts into its outputs.
//!
//! By default a tick stops after the first furnace that changes, see
//! [`engine::TickPolicy`].
//!
//! # Host Integration
//!
//! ```rust,ignore
//! let mut session = FurnaceSession::new(registry, FurnaceConfig::default());
//! session.on_context_start("Scene_Map");
//! session.select_fuel(7, Some(coal), &mut party)?;
//! session.select_input(7, Some(ore), &mut party)?;
//! for report in session.update(elapsed_ms) { /* refresh views */ }
//! let fragment = session.to_save_fragment();
//! ```
//!
//! # Key Types
//!
//! - [`registry::Registry`] -- Immutable item, weapon and armor tables with
//!   parsed note metadata (frozen at startup).
//! - [`catalog::RecipeCatalog`] -- Recipes, fuels and costs parsed from notes.
//! - [`furnace::FurnaceRegistry`] -- Every furnace in the save, by id.
//! - [`engine::TickEngine`] -- Advances furnaces by one tick.
//! - [`sim::TickTimer`] -- Converts elapsed milliseconds into ticks.
//! - [`session::FurnaceSession`] -- The host-facing facade.
//! - [`serialize`] -- Save fragments and versioned binary encoding via bitcode.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod furnace;
pub mod id;
pub mod inventory;
pub mod registry;
pub mod serialize;
pub mod session;
pub mod sim;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
