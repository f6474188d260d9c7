//! Inventory rows and the snapshot held between fetches

use serde::{Deserialize, Serialize};

/// A single inventory row as stored in the `inventory` table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Assigned by the store on insert
    pub id: i64,
    pub product_name: String,
    pub quantity: i64,
}

/// Row payload for inserts (the store assigns `id`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub product_name: String,
    pub quantity: i64,
}

impl NewInventoryItem {
    /// A freshly added product always starts out of stock
    pub fn named(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            quantity: 0,
        }
    }
}

/// Partial update applied to an existing row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityPatch {
    pub quantity: i64,
}

/// Complete copy of the inventory table as of the last successful fetch.
///
/// Replaced wholesale on every fetch; items are never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InventorySnapshot {
    items: Vec<InventoryItem>,
}

impl InventorySnapshot {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by its store id
    pub fn find_by_id(&self, id: i64) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }
}
