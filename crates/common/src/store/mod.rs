//! Document-store capability.
//!
//! The relay only ever needs two reads: a document by id, and the documents whose
//! field equals a value. `FirestoreClient` serves them over the Firestore REST API;
//! `MemoryStore` serves them from process memory.

pub mod firestore;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

pub use firestore::FirestoreClient;
pub use memory::MemoryStore;

/// A document with its fields decoded into plain JSON values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Build a document from a JSON object; non-object values yield no fields.
    pub fn from_json(id: impl Into<String>, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// String field, treating empty strings the same as absent ones.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Read access to a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document; `Ok(None)` when it does not exist.
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Documents in `collection` whose `field` equals `value`, at most `limit` of them.
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;
}
