//! Serde data file structs for item definition tables.
//!
//! Each table (`items`, `weapons`, `armors`) is a list of entries. An entry
//! may be `null` so database exports that pad index 0 load unchanged.
//! Fields other than `id`, `name` and `note` are ignored.

use serde::Deserialize;

// ===========================================================================
// Item tables
// ===========================================================================

/// An item, weapon or armor definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub id: u32,
    pub name: String,
    /// Free text carrying `<key:value>` metadata tags.
    #[serde(default)]
    pub note: String,
}

/// One slot in a table: a definition or a placeholder.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemEntry {
    Def(ItemData),
    Empty(()),
}

impl ItemEntry {
    pub fn into_def(self) -> Option<ItemData> {
        match self {
            ItemEntry::Def(data) => Some(data),
            ItemEntry::Empty(()) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_entries_allow_null_and_extra_fields() {
        let entries: Vec<ItemEntry> = serde_json::from_str(
            r#"[null, {"id": 1, "name": "Coal", "note": "<fuel:10>", "iconIndex": 12, "price": 5}]"#,
        )
        .unwrap();
        let defs: Vec<ItemData> = entries.into_iter().filter_map(ItemEntry::into_def).collect();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].id, 1);
        assert_eq!(defs[0].note, "<fuel:10>");
    }

    #[test]
    fn ron_entry_note_defaults_to_empty() {
        let entries: Vec<ItemEntry> =
            ron::from_str(r#"[(id: 3, name: "Iron Ingot")]"#).unwrap();
        let defs: Vec<ItemData> = entries.into_iter().filter_map(ItemEntry::into_def).collect();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "Iron Ingot");
        assert!(defs[0].note.is_empty());
    }
}
