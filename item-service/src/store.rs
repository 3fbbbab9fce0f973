//! In-memory item store
//!
//! Items live in an insertion-ordered arena of slots with a hash index from
//! id to slot. A single `RwLock` guards both, so every mutation and every id
//! allocation is serialized while reads run concurrently and always observe a
//! consistent table.
//!
//! Deleted slots are tombstoned and the arena is compacted once tombstones
//! outnumber live items, keeping enumeration in insertion order without
//! shifting on every delete.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::ids::ItemId;
use crate::models::{Item, ItemPatch, NewItem};

/// Failures raised by the store itself
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A thread panicked while holding the store lock
    #[error("item store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Default)]
struct Table {
    slots: Vec<Option<Item>>,
    index: HashMap<ItemId, usize>,
    tombstones: usize,
}

impl Table {
    fn live(&self) -> usize {
        self.index.len()
    }

    fn get(&self, id: &ItemId) -> Option<&Item> {
        self.index
            .get(id)
            .and_then(|&slot| self.slots.get(slot))
            .and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        let slot = *self.index.get(id)?;
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    fn insert(&mut self, item: Item) {
        self.index.insert(item.id.clone(), self.slots.len());
        self.slots.push(Some(item));
    }

    fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let slot = self.index.remove(id)?;
        let item = self.slots.get_mut(slot).and_then(Option::take)?;
        self.tombstones += 1;
        if self.tombstones > self.live() {
            self.compact();
        }
        Some(item)
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        self.index = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(slot, item)| item.as_ref().map(|item| (item.id.clone(), slot)))
            .collect();
        self.tombstones = 0;
    }

    fn fresh_id(&self) -> ItemId {
        loop {
            let id = ItemId::new();
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Shared handle to the item collection
///
/// Cloning is cheap; all clones see the same items.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    table: Arc<RwLock<Table>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, op: &'static str) -> StoreResult<RwLockReadGuard<'_, Table>> {
        self.table.read().map_err(|_| StoreError::LockPoisoned(op))
    }

    fn write(&self, op: &'static str) -> StoreResult<RwLockWriteGuard<'_, Table>> {
        self.table.write().map_err(|_| StoreError::LockPoisoned(op))
    }

    /// Insert a new item built from validated input
    ///
    /// Returns a copy of the stored item.
    pub fn create(&self, input: NewItem) -> StoreResult<Item> {
        let mut table = self.write("create")?;
        let item = Item::new(table.fresh_id(), input, Utc::now());
        table.insert(item.clone());

        tracing::info!(item_id = %item.id, name = %item.name, "Created item");
        Ok(item)
    }

    pub fn get(&self, id: &ItemId) -> StoreResult<Option<Item>> {
        Ok(self.read("get")?.get(id).cloned())
    }

    /// Merge `patch` into the stored item and return the result
    pub fn update(&self, id: &ItemId, patch: ItemPatch) -> StoreResult<Option<Item>> {
        let mut table = self.write("update")?;
        let Some(item) = table.get_mut(id) else {
            return Ok(None);
        };
        item.apply(patch, Utc::now());

        tracing::info!(item_id = %item.id, name = %item.name, "Updated item");
        Ok(Some(item.clone()))
    }

    /// Remove an item, returning it if it existed
    pub fn delete(&self, id: &ItemId) -> StoreResult<Option<Item>> {
        let removed = self.write("delete")?.remove(id);
        if let Some(item) = &removed {
            tracing::info!(item_id = %item.id, name = %item.name, "Deleted item");
        }
        Ok(removed)
    }

    /// Snapshot of every item in insertion order
    pub fn list_all(&self) -> StoreResult<Vec<Item>> {
        let table = self.read("list")?;
        Ok(table.slots.iter().flatten().cloned().collect())
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read("len")?.live())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
