//! The document store the browser navigates.
//!
//! The navigation engine only ever talks to the [`DocumentStore`] trait;
//! [`MongoStore`] backs it with a real MongoDB deployment and
//! [`MemoryStore`] backs it with an in-process map for tests and offline
//! use. Documents are JSON values carrying a stable unique identifier in
//! [`ID_FIELD`].

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use serde_json::Value;
use thiserror::Error;

/// Field every stored document is identified by.
pub const ID_FIELD: &str = "_id";

/// A document's unique identifier, if it carries one.
pub fn doc_id(doc: &Value) -> Option<&Value> {
    doc.get(ID_FIELD)
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("unsupported value: {0}")]
    Conversion(String),

    #[error(transparent)]
    Backend(#[from] mongodb::error::Error),
}

/// Abstract document store: named databases holding named collections of
/// identified documents.
pub trait DocumentStore {
    fn list_databases(&self) -> Result<Vec<String>, StoreError>;

    fn list_collections(&self, db: &str) -> Result<Vec<String>, StoreError>;

    /// Fetch up to `limit` documents of `collection` matching `filter`.
    fn query(
        &self,
        db: &str,
        collection: &str,
        filter: &Value,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError>;

    /// Insert a document, returning it with its assigned identifier.
    fn insert(&self, db: &str, collection: &str, doc: Value) -> Result<Value, StoreError>;

    /// Replace the document identified by `id`, returning the stored form.
    fn update(&self, db: &str, collection: &str, id: &Value, doc: Value)
    -> Result<Value, StoreError>;

    /// Delete the document identified by `id`.
    fn delete(&self, db: &str, collection: &str, id: &Value) -> Result<(), StoreError>;
}
