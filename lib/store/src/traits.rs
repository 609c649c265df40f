use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

/// Acknowledgment for a completed insert. Carries the generated id,
/// distinct from the written document itself.
#[derive(Debug, Clone, Serialize)]
pub struct InsertAck {
    pub inserted_id: String,
}

/// Acknowledgment for a field update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateAck {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Acknowledgment for a delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteAck {
    pub deleted_count: u64,
}

/// DocStore provides named, schema-flexible document collections.
///
/// Documents are JSON objects keyed by a store-assigned `_id`. On the
/// backing store, keys follow a namespaced convention: `course/<id>`,
/// `user/<id>`, etc. An absent document is `None`, never an error.
pub trait DocStore: Send + Sync {
    /// Insert a document, assigning a fresh `_id`. The document must be a
    /// JSON object. Returns the generated id in the acknowledgment.
    fn insert(&self, collection: &str, doc: Value) -> Result<InsertAck, StoreError>;

    /// Fetch one document by id. Returns None if the document does not exist.
    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// All documents in a collection, in id order.
    fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// Documents whose top-level `field` equals the given string value.
    fn find(&self, collection: &str, field: &str, value: &str)
        -> Result<Vec<Value>, StoreError>;

    /// First document whose top-level `field` equals the given string value.
    fn find_one(&self, collection: &str, field: &str, value: &str)
        -> Result<Option<Value>, StoreError>;

    /// Set one top-level field on a document by id. `matched_count` is 0
    /// when the document is absent; `modified_count` is 0 when the field
    /// already holds the value.
    fn set_field(&self, collection: &str, id: &str, field: &str, value: Value)
        -> Result<UpdateAck, StoreError>;

    /// Delete one document by id.
    fn delete(&self, collection: &str, id: &str) -> Result<DeleteAck, StoreError>;

    /// Number of documents in a collection.
    fn count(&self, collection: &str) -> Result<u64, StoreError>;
}
