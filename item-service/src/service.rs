//! Item operations exposed to the HTTP layer
//!
//! [`ItemService`] validates raw input, then calls into the store or the
//! query engine and converts every failure into [`Error`]. Validation always
//! runs before the store is touched, so a rejected request never mutates
//! anything.

use std::collections::HashMap;
use std::str::FromStr;

use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::ids::ItemId;
use crate::models::Item;
use crate::query::{ItemStats, QueryEngine, QueryPage};
use crate::store::ItemStore;
use crate::validation::{validate_create, validate_query, validate_update};

/// Request orchestrator over a shared [`ItemStore`]
#[derive(Debug, Clone, Default)]
pub struct ItemService {
    store: ItemStore,
}

impl ItemService {
    pub fn new(store: ItemStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn create(&self, raw: &Value) -> Result<Item> {
        let input = validate_create(raw)?;
        Ok(self.store.create(input)?)
    }

    pub fn list(&self, raw: &HashMap<String, String>) -> Result<QueryPage> {
        let options = validate_query(raw)?;
        let snapshot = self.store.list_all()?;
        let page = QueryEngine::query(&snapshot, &options);

        tracing::debug!(
            total = page.pagination.total,
            returned = page.items.len(),
            page = options.page,
            "Listed items"
        );
        Ok(page)
    }

    pub fn get(&self, id: &str) -> Result<Item> {
        let item_id = parse_id(id)?;
        self.store
            .get(&item_id)?
            .ok_or_else(|| not_found(id))
    }

    pub fn update(&self, id: &str, raw: &Value) -> Result<Item> {
        let patch = validate_update(raw)?;
        let item_id = parse_id(id)?;
        self.store
            .update(&item_id, patch)?
            .ok_or_else(|| not_found(id))
    }

    pub fn delete(&self, id: &str) -> Result<Item> {
        let item_id = parse_id(id)?;
        self.store.delete(&item_id)?.ok_or_else(|| not_found(id))
    }

    pub fn stats(&self) -> Result<ItemStats> {
        let snapshot = self.store.list_all()?;
        let stats = QueryEngine::stats(&snapshot);
        tracing::debug!(total_items = stats.total_items, "Computed item statistics");
        Ok(stats)
    }

    /// Insert the sample catalogue through the normal create path
    ///
    /// Returns the number of items inserted.
    pub fn seed_sample_data(&self) -> Result<usize> {
        let samples = sample_items();
        for sample in &samples {
            self.create(sample)?;
        }
        tracing::info!(count = samples.len(), "Seeded sample items");
        Ok(samples.len())
    }
}

/// Ids that cannot name an item are reported the same way as missing ones
fn parse_id(id: &str) -> Result<ItemId> {
    ItemId::from_str(id).map_err(|e| {
        tracing::warn!(item_id = %id, error = %e, "Rejected malformed item id");
        Error::item_not_found()
    })
}

fn not_found(id: &str) -> Error {
    tracing::warn!(item_id = %id, "Item not found");
    Error::item_not_found()
}

fn sample_items() -> Vec<Value> {
    vec![
        json!({
            "name": "MacBook Pro",
            "description": "High-performance laptop for development and creative work",
            "price": 2499.99,
            "category": "electronics",
            "tags": ["laptop", "apple", "development", "creative"]
        }),
        json!({
            "name": "Wireless Mouse",
            "description": "Ergonomic wireless mouse with precision tracking",
            "price": 79.99,
            "category": "electronics",
            "tags": ["mouse", "wireless", "ergonomic"]
        }),
        json!({
            "name": "Coffee Mug",
            "description": "Ceramic coffee mug perfect for morning coffee",
            "price": 15.99,
            "category": "kitchen",
            "tags": ["coffee", "ceramic", "mug"]
        }),
        json!({
            "name": "Mechanical Keyboard",
            "description": "Premium mechanical keyboard with RGB lighting",
            "price": 149.99,
            "category": "electronics",
            "tags": ["keyboard", "mechanical", "rgb", "gaming"]
        }),
        json!({
            "name": "Notebook",
            "description": "High-quality lined notebook for writing",
            "price": 12.99,
            "category": "stationery",
            "tags": ["notebook", "writing", "paper"]
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> ItemService {
        let service = ItemService::default();
        assert_eq!(service.seed_sample_data().unwrap(), 5);
        service
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_create_applies_defaults() {
        let service = ItemService::default();
        let item = service.create(&json!({ "name": "Lamp" })).unwrap();

        assert_eq!(item.category, "general");
        assert_eq!(item.price, 0.0);
        assert!(item.is_active);
        assert!(item.id.as_str().starts_with("item_"));
    }

    #[test]
    fn test_invalid_create_does_not_mutate() {
        let service = ItemService::default();
        let err = service.create(&json!({ "price": -1 })).unwrap_err();

        assert!(matches!(err, Error::Validation(ref v) if v.error_count() == 2));
        assert!(service.store().is_empty().unwrap());
    }

    #[test]
    fn test_create_and_get_serialize_identically() {
        let service = ItemService::default();
        let created = service
            .create(&json!({ "name": "Lamp", "tags": ["desk"], "price": 9.5 }))
            .unwrap();
        let fetched = service.get(created.id.as_str()).unwrap();

        assert_eq!(
            serde_json::to_value(&created).unwrap(),
            serde_json::to_value(&fetched).unwrap()
        );
    }

    #[test]
    fn test_get_malformed_id_is_not_found() {
        let service = seeded();
        for id in ["42", "not-an-id", "req_01h455vb4pex5vsknk084sn02q"] {
            let err = service.get(id).unwrap_err();
            assert!(matches!(err, Error::NotFound(ref msg) if msg == "Item not found"));
        }
    }

    #[test]
    fn test_update_preserves_other_fields() {
        let service = seeded();
        let original = service
            .list(&params(&[("search", "mouse")]))
            .unwrap()
            .items
            .remove(0);

        let updated = service
            .update(original.id.as_str(), &json!({ "price": 69.99 }))
            .unwrap();

        assert_eq!(updated.price, 69.99);
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.tags, original.tags);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at > original.updated_at);
    }

    #[test]
    fn test_update_validates_before_lookup() {
        let service = seeded();
        let err = service
            .update(ItemId::new().as_str(), &json!({}))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = service
            .update(ItemId::new().as_str(), &json!({ "isActive": false }))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = service.update("not-an-id", &json!({})).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = service
            .update("not-an-id", &json!({ "isActive": false }))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let service = seeded();
        let item = service.list(&HashMap::new()).unwrap().items.remove(0);

        let deleted = service.delete(item.id.as_str()).unwrap();
        assert_eq!(deleted, item);
        assert!(matches!(
            service.get(item.id.as_str()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            service.delete(item.id.as_str()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_filter_and_search_compose_on_sample_data() {
        let service = seeded();
        let page = service
            .list(&params(&[("category", "electronics"), ("search", "wireless")]))
            .unwrap();

        let names: Vec<&str> = page.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Wireless Mouse"]);
        assert_eq!(page.pagination.total, 1);
    }

    #[test]
    fn test_list_rejects_bad_query() {
        let service = seeded();
        let err = service.list(&params(&[("limit", "0")])).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_stats_on_sample_data() {
        let service = seeded();
        let stats = service.stats().unwrap();

        assert_eq!(stats.total_items, 5);
        assert_eq!(stats.active_items, 5);
        assert_eq!(stats.categories.total, 3);
        assert_eq!(stats.categories.distribution["electronics"], 3);
        assert_eq!(stats.pricing.minimum, 12.99);
        assert_eq!(stats.pricing.maximum, 2499.99);
        assert_eq!(stats.pricing.items_with_price, 5);
        assert_eq!(stats.pricing.average, 551.79);
    }
}
