pub mod error;
pub mod redb;
pub mod traits;

pub use error::StoreError;
pub use redb::RedbStore;
pub use traits::{DeleteAck, DocStore, InsertAck, UpdateAck};

/// Generate a fresh document id (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
