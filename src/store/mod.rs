//! Document store for learner state
//!
//! Documents are JSON values addressed by slash-separated paths, one
//! collection per entity under a per-user namespace:
//!
//! ```text
//! users/{uid}
//! users/{uid}/ranch/main
//! users/{uid}/progress/{lessonId}
//! users/{uid}/rewardNfts/{id}
//! users/{uid}/characters/{id}
//! users/{uid}/buildings/{id}
//! ```

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use anyhow::Result;
use serde_json::Value;

/// Key-value document interface used by sessions and the CRUD endpoints
pub trait DocumentStore: Send + Sync {
    fn get(&self, path: &str) -> Result<Option<Value>>;

    /// Create or replace a document
    fn set(&self, path: &str, doc: &Value) -> Result<()>;

    /// Shallow-merge `patch` into an existing document.
    /// Returns the merged document, or None if it does not exist.
    fn update(&self, path: &str, patch: &Value) -> Result<Option<Value>>;

    /// Documents directly inside `collection`, ordered by path
    fn list(&self, collection: &str) -> Result<Vec<(String, Value)>>;
}

/// Parent collection of a document path (`users/u1/progress/3` -> `users/u1/progress`)
pub fn collection_of(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Last segment of a document path
pub fn doc_id(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, id)| id)
}

/// Shallow merge of object fields; non-object patches replace the document
pub fn merge(doc: &mut Value, patch: &Value) {
    match (doc.as_object_mut(), patch.as_object()) {
        (Some(target), Some(fields)) => {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        _ => *doc = patch.clone(),
    }
}

/// Document path builders
pub mod paths {
    pub fn user(uid: &str) -> String {
        format!("users/{}", uid)
    }

    pub fn ranch(uid: &str) -> String {
        format!("users/{}/ranch/main", uid)
    }

    pub fn progress_collection(uid: &str) -> String {
        format!("users/{}/progress", uid)
    }

    pub fn progress(uid: &str, lesson_id: u32) -> String {
        format!("users/{}/progress/{}", uid, lesson_id)
    }

    pub fn rewards_collection(uid: &str) -> String {
        format!("users/{}/rewardNfts", uid)
    }

    pub fn reward(uid: &str, id: &str) -> String {
        format!("users/{}/rewardNfts/{}", uid, id)
    }

    pub fn collection(uid: &str, name: &str) -> String {
        format!("users/{}/{}", uid, name)
    }

    pub fn document(uid: &str, collection: &str, id: &str) -> String {
        format!("users/{}/{}/{}", uid, collection, id)
    }
}
