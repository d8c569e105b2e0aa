//! MongoDB-backed document store using the driver's sync API.
//!
//! Documents cross the boundary as relaxed extended JSON, so types JSON
//! cannot express natively (object ids, dates) survive the round trip:
//! `{"$oid": "..."}` in a filter or edit converts back into a real
//! `ObjectId` on the way in.

use mongodb::bson::{Bson, Document};
use mongodb::sync::Client;
use serde_json::Value;

use super::{DocumentStore, ID_FIELD, StoreError};

pub struct MongoStore {
    client: Client,
}

impl MongoStore {
    /// Connect to a deployment. The driver connects lazily; the first
    /// listing surfaces unreachable-host errors.
    pub fn connect(uri: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)?;
        Ok(Self { client })
    }

    fn collection(&self, db: &str, collection: &str) -> mongodb::sync::Collection<Document> {
        self.client.database(db).collection::<Document>(collection)
    }
}

impl DocumentStore for MongoStore {
    fn list_databases(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.client.list_database_names().run()?)
    }

    fn list_collections(&self, db: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.client.database(db).list_collection_names().run()?)
    }

    fn query(
        &self,
        db: &str,
        collection: &str,
        filter: &Value,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let filter = to_bson_document(filter)?;
        let cursor = self
            .collection(db, collection)
            .find(filter)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .run()?;

        let mut docs = Vec::new();
        for doc in cursor {
            docs.push(to_json(doc?));
        }
        Ok(docs)
    }

    fn insert(&self, db: &str, collection: &str, doc: Value) -> Result<Value, StoreError> {
        let mut bson_doc = to_bson_document(&doc)?;
        let result = self.collection(db, collection).insert_one(&bson_doc).run()?;
        bson_doc.insert(ID_FIELD, result.inserted_id);
        Ok(to_json(bson_doc))
    }

    fn update(
        &self,
        db: &str,
        collection: &str,
        id: &Value,
        doc: Value,
    ) -> Result<Value, StoreError> {
        let replacement = to_bson_document(&doc)?;
        let result = self
            .collection(db, collection)
            .replace_one(id_filter(id)?, &replacement)
            .run()?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(to_json(replacement))
    }

    fn delete(&self, db: &str, collection: &str, id: &Value) -> Result<(), StoreError> {
        let result = self
            .collection(db, collection)
            .delete_one(id_filter(id)?)
            .run()?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn id_filter(id: &Value) -> Result<Document, StoreError> {
    let mut filter = Document::new();
    filter.insert(ID_FIELD, to_bson(id)?);
    Ok(filter)
}

fn to_bson(value: &Value) -> Result<Bson, StoreError> {
    Bson::try_from(value.clone()).map_err(|e| StoreError::Conversion(e.to_string()))
}

fn to_bson_document(value: &Value) -> Result<Document, StoreError> {
    match to_bson(value)? {
        Bson::Document(doc) => Ok(doc),
        other => Err(StoreError::Conversion(format!(
            "expected a document, got {other}"
        ))),
    }
}

fn to_json(doc: Document) -> Value {
    Bson::Document(doc).into_relaxed_extjson()
}
