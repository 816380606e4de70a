//! Furnace Data -- loads item definition tables and furnace settings from
//! RON, TOML or JSON files.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, GameData, load_game_data};
