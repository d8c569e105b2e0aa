//! In-process store backing the integration tests and offline demo mode.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Value, json};

use super::{DocumentStore, ID_FIELD, StoreError, doc_id};

type Collections = BTreeMap<String, Vec<Value>>;

/// A [`DocumentStore`] held entirely in memory.
///
/// Filters use top-level field equality: every key of the filter object
/// must be present with an equal value in a matching document. Documents
/// inserted without an id get a process-unique integer one.
#[derive(Debug, Default)]
pub struct MemoryStore {
    databases: Mutex<BTreeMap<String, Collections>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one collection with documents, creating the database as needed.
    pub fn seed(&self, db: &str, collection: &str, docs: Vec<Value>) {
        let mut databases = self.databases.lock().expect("store lock");
        databases
            .entry(db.to_string())
            .or_default()
            .insert(collection.to_string(), docs);
    }

    fn matches(filter: &Value, doc: &Value) -> bool {
        match filter.as_object() {
            Some(map) => map.iter().all(|(key, want)| doc.get(key) == Some(want)),
            None => true,
        }
    }
}

impl DocumentStore for MemoryStore {
    fn list_databases(&self) -> Result<Vec<String>, StoreError> {
        let databases = self.databases.lock().expect("store lock");
        Ok(databases.keys().cloned().collect())
    }

    fn list_collections(&self, db: &str) -> Result<Vec<String>, StoreError> {
        let databases = self.databases.lock().expect("store lock");
        let collections = databases.get(db).ok_or(StoreError::NotFound)?;
        Ok(collections.keys().cloned().collect())
    }

    fn query(
        &self,
        db: &str,
        collection: &str,
        filter: &Value,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let databases = self.databases.lock().expect("store lock");
        let docs = databases
            .get(db)
            .and_then(|colls| colls.get(collection))
            .ok_or(StoreError::NotFound)?;
        Ok(docs
            .iter()
            .filter(|doc| Self::matches(filter, doc))
            .take(limit)
            .cloned()
            .collect())
    }

    fn insert(&self, db: &str, collection: &str, mut doc: Value) -> Result<Value, StoreError> {
        let map = doc
            .as_object_mut()
            .ok_or_else(|| StoreError::Conversion("document must be an object".into()))?;
        if !map.contains_key(ID_FIELD) {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            map.insert(ID_FIELD.to_string(), json!(id));
        }

        let mut databases = self.databases.lock().expect("store lock");
        databases
            .entry(db.to_string())
            .or_default()
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    fn update(
        &self,
        db: &str,
        collection: &str,
        id: &Value,
        doc: Value,
    ) -> Result<Value, StoreError> {
        let mut databases = self.databases.lock().expect("store lock");
        let docs = databases
            .get_mut(db)
            .and_then(|colls| colls.get_mut(collection))
            .ok_or(StoreError::NotFound)?;
        let slot = docs
            .iter_mut()
            .find(|d| doc_id(d) == Some(id))
            .ok_or(StoreError::NotFound)?;
        *slot = doc.clone();
        Ok(doc)
    }

    fn delete(&self, db: &str, collection: &str, id: &Value) -> Result<(), StoreError> {
        let mut databases = self.databases.lock().expect("store lock");
        let docs = databases
            .get_mut(db)
            .and_then(|colls| colls.get_mut(collection))
            .ok_or(StoreError::NotFound)?;
        let before = docs.len();
        docs.retain(|d| doc_id(d) != Some(id));
        if docs.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.seed(
            "app",
            "users",
            vec![
                json!({"_id": 1, "name": "ada", "admin": true}),
                json!({"_id": 2, "name": "grace", "admin": false}),
            ],
        );
        store
    }

    #[test]
    fn test_listing() {
        let store = store();
        assert_eq!(store.list_databases().unwrap(), vec!["app"]);
        assert_eq!(store.list_collections("app").unwrap(), vec!["users"]);
        assert!(matches!(
            store.list_collections("nope"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_query_filters_by_field_equality() {
        let store = store();
        let all = store.query("app", "users", &json!({}), 20).unwrap();
        assert_eq!(all.len(), 2);

        let admins = store
            .query("app", "users", &json!({"admin": true}), 20)
            .unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0]["name"], json!("ada"));
    }

    #[test]
    fn test_query_honors_limit() {
        let store = store();
        let one = store.query("app", "users", &json!({}), 1).unwrap();
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_insert_assigns_an_id() {
        let store = store();
        let doc = store.insert("app", "users", json!({"name": "lin"})).unwrap();
        assert!(doc_id(&doc).is_some());
        assert_eq!(store.query("app", "users", &json!({}), 20).unwrap().len(), 3);
    }

    #[test]
    fn test_update_replaces_by_id() {
        let store = store();
        let updated = store
            .update("app", "users", &json!(1), json!({"_id": 1, "name": "ada2"}))
            .unwrap();
        assert_eq!(updated["name"], json!("ada2"));
        assert!(matches!(
            store.update("app", "users", &json!(9), json!({"_id": 9})),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_delete_removes_by_id() {
        let store = store();
        store.delete("app", "users", &json!(1)).unwrap();
        assert_eq!(store.query("app", "users", &json!({}), 20).unwrap().len(), 1);
        assert!(matches!(
            store.delete("app", "users", &json!(1)),
            Err(StoreError::NotFound)
        ));
    }
}
