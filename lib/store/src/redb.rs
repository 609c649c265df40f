use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use serde_json::Value;

use crate::error::StoreError;
use crate::new_id;
use crate::traits::{DeleteAck, DocStore, InsertAck, UpdateAck};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("docs");

/// RedbStore is a DocStore implementation backed by redb — a pure-Rust
/// embedded key-value database. Each document is stored as JSON bytes
/// under `collection/id`; per-document atomicity comes from redb write
/// transactions.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(|e| StoreError::Storage(e.to_string()))?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        tracing::debug!("opened document store at {}", path.display());
        Ok(Self { db: Arc::new(db) })
    }

    fn key(collection: &str, id: &str) -> String {
        format!("{}/{}", collection, id)
    }

    fn prefix(collection: &str) -> String {
        format!("{}/", collection)
    }

    /// All documents in a collection, decoded.
    fn scan(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let prefix = Self::prefix(collection);
        let mut results = Vec::new();
        let iter = table
            .range(prefix.as_str()..)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        for entry in iter {
            let entry = entry.map_err(|e| StoreError::Storage(e.to_string()))?;
            if !entry.0.value().starts_with(&prefix) {
                break;
            }
            results.push(decode(entry.1.value())?);
        }

        Ok(results)
    }
}

fn decode(bytes: &[u8]) -> Result<Value, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn encode(doc: &Value) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(doc).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Equality on a top-level string field.
fn field_matches(doc: &Value, field: &str, value: &str) -> bool {
    doc.get(field).and_then(Value::as_str) == Some(value)
}

impl DocStore for RedbStore {
    fn insert(&self, collection: &str, doc: Value) -> Result<InsertAck, StoreError> {
        let id = new_id();
        let mut doc = doc;
        match doc.as_object_mut() {
            Some(map) => {
                map.insert("_id".to_string(), Value::String(id.clone()));
            }
            None => {
                return Err(StoreError::Serialization(
                    "document must be a JSON object".to_string(),
                ));
            }
        }
        let bytes = encode(&doc)?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .insert(Self::key(collection, &id).as_str(), bytes.as_slice())
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(InsertAck { inserted_id: id })
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        match table.get(Self::key(collection, id).as_str()) {
            Ok(Some(val)) => Ok(Some(decode(val.value())?)),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }

    fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        self.scan(collection)
    }

    fn find(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let docs = self.scan(collection)?;
        Ok(docs
            .into_iter()
            .filter(|doc| field_matches(doc, field, value))
            .collect())
    }

    fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        let docs = self.scan(collection)?;
        Ok(docs.into_iter().find(|doc| field_matches(doc, field, value)))
    }

    fn set_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<UpdateAck, StoreError> {
        let key = Self::key(collection, id);
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let ack;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;

            let current = match table.get(key.as_str()) {
                Ok(Some(val)) => Some(val.value().to_vec()),
                Ok(None) => None,
                Err(e) => return Err(StoreError::Storage(e.to_string())),
            };

            match current {
                None => {
                    ack = UpdateAck {
                        matched_count: 0,
                        modified_count: 0,
                    };
                }
                Some(bytes) => {
                    let mut doc = decode(&bytes)?;
                    let map = doc.as_object_mut().ok_or_else(|| {
                        StoreError::Serialization(
                            "stored document is not a JSON object".to_string(),
                        )
                    })?;

                    if map.get(field) == Some(&value) {
                        ack = UpdateAck {
                            matched_count: 1,
                            modified_count: 0,
                        };
                    } else {
                        map.insert(field.to_string(), value);
                        let bytes = encode(&doc)?;
                        table
                            .insert(key.as_str(), bytes.as_slice())
                            .map_err(|e| StoreError::Storage(e.to_string()))?;
                        ack = UpdateAck {
                            matched_count: 1,
                            modified_count: 1,
                        };
                    }
                }
            }
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(ack)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<DeleteAck, StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let deleted;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            let removed = table
                .remove(Self::key(collection, id).as_str())
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            deleted = removed.is_some();
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(DeleteAck {
            deleted_count: if deleted { 1 } else { 0 },
        })
    }

    fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let prefix = Self::prefix(collection);
        let mut count = 0u64;
        let iter = table
            .range(prefix.as_str()..)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        for entry in iter {
            let entry = entry.map_err(|e| StoreError::Storage(e.to_string()))?;
            if !entry.0.value().starts_with(&prefix) {
                break;
            }
            count += 1;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_store() -> (tempfile::TempDir, RedbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_insert_and_get() {
        let (_dir, store) = test_store();

        let ack = store
            .insert("course", json!({"title": "Intro", "level": "beginner"}))
            .unwrap();
        assert!(!ack.inserted_id.is_empty());

        let doc = store.get("course", &ack.inserted_id).unwrap().unwrap();
        assert_eq!(doc["title"], "Intro");
        assert_eq!(doc["_id"], ack.inserted_id.as_str());
    }

    #[test]
    fn test_get_absent_is_none() {
        let (_dir, store) = test_store();
        assert!(store.get("course", "nope").unwrap().is_none());
    }

    #[test]
    fn test_insert_rejects_non_object() {
        let (_dir, store) = test_store();
        assert!(store.insert("course", json!("just a string")).is_err());
    }

    #[test]
    fn test_list_and_count() {
        let (_dir, store) = test_store();

        store.insert("blog", json!({"title": "one"})).unwrap();
        store.insert("blog", json!({"title": "two"})).unwrap();
        store.insert("event", json!({"title": "other"})).unwrap();

        assert_eq!(store.list("blog").unwrap().len(), 2);
        assert_eq!(store.count("blog").unwrap(), 2);
        assert_eq!(store.count("event").unwrap(), 1);
        assert_eq!(store.count("empty").unwrap(), 0);
    }

    #[test]
    fn test_collections_do_not_bleed_on_shared_prefix() {
        let (_dir, store) = test_store();

        store.insert("user", json!({"email": "a@x.com"})).unwrap();
        store.insert("users", json!({"email": "b@x.com"})).unwrap();

        assert_eq!(store.count("user").unwrap(), 1);
        assert_eq!(store.count("users").unwrap(), 1);
    }

    #[test]
    fn test_find_by_field() {
        let (_dir, store) = test_store();

        store
            .insert("apply", json!({"email": "a@x.com", "course": "rust"}))
            .unwrap();
        store
            .insert("apply", json!({"email": "a@x.com", "course": "go"}))
            .unwrap();
        store
            .insert("apply", json!({"email": "b@x.com", "course": "rust"}))
            .unwrap();

        let mine = store.find("apply", "email", "a@x.com").unwrap();
        assert_eq!(mine.len(), 2);

        let one = store.find_one("apply", "email", "b@x.com").unwrap().unwrap();
        assert_eq!(one["course"], "rust");

        assert!(store.find_one("apply", "email", "c@x.com").unwrap().is_none());
    }

    #[test]
    fn test_set_field_is_idempotent() {
        let (_dir, store) = test_store();

        let ack = store.insert("user", json!({"email": "a@x.com"})).unwrap();

        let first = store
            .set_field("user", &ack.inserted_id, "role", json!("admin"))
            .unwrap();
        assert_eq!(first.matched_count, 1);
        assert_eq!(first.modified_count, 1);

        let second = store
            .set_field("user", &ack.inserted_id, "role", json!("admin"))
            .unwrap();
        assert_eq!(second.matched_count, 1);
        assert_eq!(second.modified_count, 0);

        let doc = store.get("user", &ack.inserted_id).unwrap().unwrap();
        assert_eq!(doc["role"], "admin");
    }

    #[test]
    fn test_set_field_on_absent_document() {
        let (_dir, store) = test_store();

        let ack = store
            .set_field("user", "missing", "role", json!("admin"))
            .unwrap();
        assert_eq!(ack.matched_count, 0);
        assert_eq!(ack.modified_count, 0);
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = test_store();

        let ack = store.insert("user", json!({"email": "a@x.com"})).unwrap();

        let deleted = store.delete("user", &ack.inserted_id).unwrap();
        assert_eq!(deleted.deleted_count, 1);
        assert!(store.get("user", &ack.inserted_id).unwrap().is_none());

        // Deleting again is a no-op.
        let again = store.delete("user", &ack.inserted_id).unwrap();
        assert_eq!(again.deleted_count, 0);
    }
}
