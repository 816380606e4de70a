use crate::engine::TickPolicy;
use crate::sim::{ContextGate, DEFAULT_TICK_INTERVAL_MS, TickTimer};
use serde::{Deserialize, Serialize};

/// Scenes during which furnaces never tick, unless configured otherwise.
pub const DEFAULT_EXCLUDED_CONTEXTS: [&str; 5] = [
    "Scene_Title",
    "Scene_Save",
    "Scene_Load",
    "Scene_Boot",
    "Scene_Splash",
];

pub const DEFAULT_NAME_MAX_CHARS: usize = 13;

/// Limit applied when `item_name_max_chars` is configured as 0.
pub const FALLBACK_NAME_MAX_CHARS: usize = 99;

pub const DEFAULT_TRUNCATED_SUFFIX: &str = "..";

/// Host-tunable furnace settings. Every field has a default, so a partial
/// (or empty) config file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FurnaceConfig {
    /// Wall-clock milliseconds per tick. 0 means the default.
    pub tick_interval_ms: u64,
    /// Display names longer than this are truncated. 0 means
    /// [`FALLBACK_NAME_MAX_CHARS`].
    pub item_name_max_chars: usize,
    pub truncated_name_suffix: String,
    pub excluded_contexts: Vec<String>,
    pub tick_policy: TickPolicy,
}

impl Default for FurnaceConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            item_name_max_chars: DEFAULT_NAME_MAX_CHARS,
            truncated_name_suffix: DEFAULT_TRUNCATED_SUFFIX.to_string(),
            excluded_contexts: DEFAULT_EXCLUDED_CONTEXTS.iter().map(|s| s.to_string()).collect(),
            tick_policy: TickPolicy::default(),
        }
    }
}

impl FurnaceConfig {
    pub fn effective_tick_interval_ms(&self) -> u64 {
        if self.tick_interval_ms == 0 {
            DEFAULT_TICK_INTERVAL_MS
        } else {
            self.tick_interval_ms
        }
    }

    pub fn effective_name_max_chars(&self) -> usize {
        if self.item_name_max_chars == 0 {
            FALLBACK_NAME_MAX_CHARS
        } else {
            self.item_name_max_chars
        }
    }

    /// A stopped timer with the configured interval.
    pub fn timer(&self) -> TickTimer {
        TickTimer::new(self.effective_tick_interval_ms())
    }

    pub fn context_gate(&self) -> ContextGate {
        ContextGate::new(self.excluded_contexts.iter().cloned())
    }

    /// Shorten an item name for display, appending the configured suffix
    /// when anything was cut. Counts characters, not bytes.
    pub fn truncate_name(&self, name: &str) -> String {
        let max = self.effective_name_max_chars();
        match name.char_indices().nth(max) {
            Some((cut, _)) => format!("{}{}", &name[..cut], self.truncated_name_suffix),
            None => name.to_string(),
        }
    }
}
