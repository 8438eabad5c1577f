//! In-memory item collection.
//!
//! Lookups are linear scans over insertion order. Ids are caller supplied and
//! not checked for uniqueness; when duplicates exist every operation acts on
//! the first match.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::errors::{LabResult, SafeReadLock, SafeWriteLock};

const RESOURCE: &str = "item_store";

/// The CRUD record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Item {
    pub fn new(id: i64, name: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.map(str::to_string),
        }
    }
}

pub trait ItemStore: Send + Sync {
    fn list(&self) -> LabResult<Vec<Item>>;

    fn get(&self, id: i64) -> LabResult<Option<Item>>;

    fn create(&self, item: Item) -> LabResult<Item>;

    /// Replaces the whole record at the first match. The stored id becomes
    /// whatever `item` carries, which may differ from `id`.
    fn update(&self, id: i64, item: Item) -> LabResult<Option<Item>>;

    fn delete(&self, id: i64) -> LabResult<bool>;

    fn len(&self) -> LabResult<usize>;

    fn is_empty(&self) -> LabResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    items: RwLock<Vec<Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Store pre-populated with the three demo items.
    pub fn seeded() -> Self {
        Self::with_items(vec![
            Item::new(1, "Item One", Some("This is the first item.")),
            Item::new(2, "Item Two", Some("This is the second item.")),
            Item::new(3, "Item Three", Some("This is the third item.")),
        ])
    }
}

impl ItemStore for InMemoryItemStore {
    fn list(&self) -> LabResult<Vec<Item>> {
        Ok(self.items.safe_read(RESOURCE)?.clone())
    }

    fn get(&self, id: i64) -> LabResult<Option<Item>> {
        let items = self.items.safe_read(RESOURCE)?;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    fn create(&self, item: Item) -> LabResult<Item> {
        let mut items = self.items.safe_write(RESOURCE)?;
        items.push(item.clone());
        tracing::debug!(id = item.id, total = items.len(), "item created");
        Ok(item)
    }

    fn update(&self, id: i64, item: Item) -> LabResult<Option<Item>> {
        let mut items = self.items.safe_write(RESOURCE)?;
        match items.iter_mut().find(|existing| existing.id == id) {
            Some(slot) => {
                if item.id != id {
                    tracing::warn!(from = id, to = item.id, "update changes item id");
                }
                *slot = item.clone();
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, id: i64) -> LabResult<bool> {
        let mut items = self.items.safe_write(RESOURCE)?;
        match items.iter().position(|item| item.id == id) {
            Some(index) => {
                items.remove(index);
                tracing::debug!(id, total = items.len(), "item deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn len(&self) -> LabResult<usize> {
        Ok(self.items.safe_read(RESOURCE)?.len())
    }
}
