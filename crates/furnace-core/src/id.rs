use serde::{Deserialize, Serialize};
use std::fmt;

/// Which item-definition table an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Item,
    Weapon,
    Armor,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 3] = [ItemCategory::Item, ItemCategory::Weapon, ItemCategory::Armor];

    /// Parse a category letter (`i`, `w`, `a`) or full name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i" | "item" => Some(ItemCategory::Item),
            "w" | "weapon" => Some(ItemCategory::Weapon),
            "a" | "armor" => Some(ItemCategory::Armor),
            _ => None,
        }
    }

    /// The single-letter code used in note tags.
    pub fn letter(self) -> char {
        match self {
            ItemCategory::Item => 'i',
            ItemCategory::Weapon => 'w',
            ItemCategory::Armor => 'a',
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemCategory::Item => "item",
            ItemCategory::Weapon => "weapon",
            ItemCategory::Armor => "armor",
        };
        f.write_str(name)
    }
}

/// Identifies an item definition by table and id. Cheap to copy and compare,
/// and usable directly as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    pub category: ItemCategory,
    pub id: u32,
}

impl ItemRef {
    pub const fn new(category: ItemCategory, id: u32) -> Self {
        Self { category, id }
    }

    pub const fn item(id: u32) -> Self {
        Self::new(ItemCategory::Item, id)
    }

    pub const fn weapon(id: u32) -> Self {
        Self::new(ItemCategory::Weapon, id)
    }

    pub const fn armor(id: u32) -> Self {
        Self::new(ItemCategory::Armor, id)
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.category.letter(), self.id)
    }
}

/// Identifies a furnace instance. Supplied by the host (map events use
/// numbers, scripted furnaces may use names).
///
/// Ordering puts numbers first, ascending, then names; the tick engine scans
/// furnaces in this order.
///
/// Serialized externally tagged (`{"number":7}`) so self-describing and
/// binary encoders agree on the layout.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnaceId {
    Number(i64),
    Name(String),
}

impl From<i64> for FurnaceId {
    fn from(n: i64) -> Self {
        FurnaceId::Number(n)
    }
}

impl From<&str> for FurnaceId {
    fn from(s: &str) -> Self {
        FurnaceId::Name(s.to_string())
    }
}

impl From<String> for FurnaceId {
    fn from(s: String) -> Self {
        FurnaceId::Name(s)
    }
}

impl fmt::Display for FurnaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FurnaceId::Number(n) => write!(f, "{n}"),
            FurnaceId::Name(s) => f.write_str(s),
        }
    }
}
