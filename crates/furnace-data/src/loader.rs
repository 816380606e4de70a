//! Loading pipeline: reads data files, checks ids, builds the item registry
//! and recipe catalog.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus [`load_game_data`] which ties them
//! together.

use crate::schema::{ItemData, ItemEntry};
use furnace_core::catalog::RecipeCatalog;
use furnace_core::config::FurnaceConfig;
use furnace_core::id::ItemCategory;
use furnace_core::registry::{Registry, RegistryBuilder, RegistryError};
use furnace_core::session::FurnaceSession;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The same id appears twice in one table.
    #[error("duplicate id {id} in {file}")]
    DuplicateId { file: PathBuf, id: u32 },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, e: impl std::fmt::Display) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: e.to_string(),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

/// Fail if `id` was already seen in this table.
pub fn check_duplicate_id(seen: &mut HashSet<u32>, id: u32, file: &Path) -> Result<(), DataLoadError> {
    if seen.insert(id) {
        Ok(())
    } else {
        Err(DataLoadError::DuplicateId {
            file: file.to_path_buf(),
            id,
        })
    }
}

// ===========================================================================
// Game data
// ===========================================================================

/// Base file name of each definition table.
pub fn table_name(category: ItemCategory) -> &'static str {
    match category {
        ItemCategory::Item => "items",
        ItemCategory::Weapon => "weapons",
        ItemCategory::Armor => "armors",
    }
}

/// Base file name of the optional furnace settings file.
pub const CONFIG_FILE: &str = "furnace";

/// Everything a [`FurnaceSession`] needs, loaded from a data directory.
#[derive(Debug)]
pub struct GameData {
    pub registry: Registry,
    pub catalog: RecipeCatalog,
    pub config: FurnaceConfig,
}

impl GameData {
    pub fn into_session(self) -> FurnaceSession {
        FurnaceSession::with_catalog(self.registry, self.catalog, self.config)
    }
}

/// Read one definition table into the builder. Returns the number of
/// definitions registered.
fn load_table(
    builder: &mut RegistryBuilder,
    category: ItemCategory,
    path: &Path,
) -> Result<usize, DataLoadError> {
    let entries: Vec<ItemEntry> = deserialize_list(path, table_name(category))?;
    let mut seen = HashSet::new();
    let mut count = 0;
    for data in entries.into_iter().filter_map(ItemEntry::into_def) {
        let ItemData { id, name, note } = data;
        check_duplicate_id(&mut seen, id, path)?;
        builder.register(category, id, &name, &note);
        count += 1;
    }
    tracing::debug!(file = %path.display(), %category, count, "loaded definition table");
    Ok(count)
}

/// Load item tables and furnace settings from `dir`.
///
/// `items` is required; `weapons`, `armors` and `furnace` are optional. Each
/// may be `.ron`, `.toml` or `.json`, but only one format per base name.
pub fn load_game_data(dir: &Path) -> Result<GameData, DataLoadError> {
    let mut builder = RegistryBuilder::new();

    let items = require_data_file(dir, table_name(ItemCategory::Item))?;
    load_table(&mut builder, ItemCategory::Item, &items)?;
    for category in [ItemCategory::Weapon, ItemCategory::Armor] {
        if let Some(path) = find_data_file(dir, table_name(category))? {
            load_table(&mut builder, category, &path)?;
        }
    }

    let config = match find_data_file(dir, CONFIG_FILE)? {
        Some(path) => deserialize_file(&path)?,
        None => FurnaceConfig::default(),
    };

    let registry = builder.build()?;
    let catalog = RecipeCatalog::build(&registry);
    tracing::info!(
        dir = %dir.display(),
        definitions = registry.len(),
        recipes = catalog.recipe_count(),
        fuels = catalog.fuel_count(),
        "game data loaded"
    );

    Ok(GameData {
        registry,
        catalog,
        config,
    })
}

// ===========================================================================
// Tests
// ===========================================================================
