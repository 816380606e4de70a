use crate::id::{ItemCategory, ItemRef};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

static META_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([^<>:]+)(:?)([^>]*)>").expect("metadata pattern is valid")
});

/// A value extracted from an item note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    /// `<key>` with no value.
    Flag,
    /// `<key:value>`; the raw text after the colon.
    Text(String),
}

impl MetaValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Flag => None,
            MetaValue::Text(s) => Some(s),
        }
    }
}

/// Extract `<key>` / `<key:value>` metadata from a free-text note. Later
/// occurrences of a key overwrite earlier ones.
pub fn extract_meta(note: &str) -> BTreeMap<String, MetaValue> {
    let mut meta = BTreeMap::new();
    for caps in META_TAG.captures_iter(note) {
        let key = caps[1].to_string();
        let value = if caps[2].is_empty() {
            MetaValue::Flag
        } else {
            MetaValue::Text(caps[3].to_string())
        };
        meta.insert(key, value);
    }
    meta
}

/// An item, weapon or armor definition.
#[derive(Debug, Clone)]
pub struct ItemDef {
    pub item: ItemRef,
    pub name: String,
    pub note: String,
    pub meta: BTreeMap<String, MetaValue>,
}

impl ItemDef {
    pub fn has_meta(&self, key: &str) -> bool {
        self.meta.contains_key(key)
    }

    pub fn meta_text(&self, key: &str) -> Option<&str> {
        self.meta.get(key).and_then(MetaValue::as_text)
    }
}

/// Builder for the item-definition tables. Freeze with [`build`](Self::build)
/// once every table has been loaded.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    defs: Vec<ItemDef>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. Metadata is extracted from `note` immediately.
    pub fn register(&mut self, category: ItemCategory, id: u32, name: &str, note: &str) -> ItemRef {
        let item = ItemRef::new(category, id);
        self.defs.push(ItemDef {
            item,
            name: name.to_string(),
            note: note.to_string(),
            meta: extract_meta(note),
        });
        item
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Freeze the tables. Fails on a repeated `(category, id)`.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut tables: HashMap<ItemRef, ItemDef> = HashMap::with_capacity(self.defs.len());
        for def in self.defs {
            let item = def.item;
            if tables.insert(item, def).is_some() {
                return Err(RegistryError::Duplicate(item));
            }
        }
        Ok(Registry { tables })
    }
}

/// Immutable item-definition tables. Frozen after build().
#[derive(Debug)]
pub struct Registry {
    tables: HashMap<ItemRef, ItemDef>,
}

impl Registry {
    pub fn get(&self, item: ItemRef) -> Option<&ItemDef> {
        self.tables.get(&item)
    }

    /// Resolve a reference to its definition.
    pub fn resolve(&self, item: ItemRef) -> Result<&ItemDef, RegistryError> {
        self.tables.get(&item).ok_or(RegistryError::NotFound(item))
    }

    pub fn contains(&self, item: ItemRef) -> bool {
        self.tables.contains_key(&item)
    }

    pub fn name(&self, item: ItemRef) -> Option<&str> {
        self.get(item).map(|def| def.name.as_str())
    }

    /// All definitions in `(category, id)` order.
    pub fn defs(&self) -> Vec<&ItemDef> {
        let mut defs: Vec<&ItemDef> = self.tables.values().collect();
        defs.sort_by_key(|def| def.item);
        defs
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("item not found: {0}")]
    NotFound(ItemRef),
    #[error("duplicate item definition: {0}")]
    Duplicate(ItemRef),
}
