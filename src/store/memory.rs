//! In-memory document store, for tests and throwaway sessions

use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use serde_json::Value;

use super::{collection_of, merge, DocumentStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn docs(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Value>>> {
        self.docs.lock().map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, path: &str) -> Result<Option<Value>> {
        Ok(self.docs()?.get(path).cloned())
    }

    fn set(&self, path: &str, doc: &Value) -> Result<()> {
        self.docs()?.insert(path.to_string(), doc.clone());
        Ok(())
    }

    fn update(&self, path: &str, patch: &Value) -> Result<Option<Value>> {
        let mut docs = self.docs()?;
        Ok(docs.get_mut(path).map(|doc| {
            merge(doc, patch);
            doc.clone()
        }))
    }

    fn list(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        Ok(self
            .docs()?
            .iter()
            .filter(|(path, _)| collection_of(path) == collection)
            .map(|(path, doc)| (path.clone(), doc.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_only_direct_children() {
        let store = MemoryStore::new();
        store.set("users/u1/characters/a", &json!({"name": "Dusty"})).unwrap();
        store.set("users/u1/characters/b", &json!({"name": "Rowdy"})).unwrap();
        store.set("users/u1/characters/a/notes/1", &json!({})).unwrap();
        store.set("users/u2/characters/c", &json!({})).unwrap();

        let docs = store.list("users/u1/characters").unwrap();
        let paths: Vec<&str> = docs.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["users/u1/characters/a", "users/u1/characters/b"]);
    }

    #[test]
    fn test_update_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(store.update("users/u1/ranch/main", &json!({"coins": 1})).unwrap().is_none());

        store.set("users/u1/ranch/main", &json!({"coins": 1, "experience": 5})).unwrap();
        let merged = store.update("users/u1/ranch/main", &json!({"coins": 9})).unwrap().unwrap();
        assert_eq!(merged, json!({"coins": 9, "experience": 5}));
    }
}
