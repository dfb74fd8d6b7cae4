use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use mongodb::Client;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no database connection")]
    Unavailable,

    #[error("database error: {0}")]
    Backend(#[from] mongodb::error::Error),
}

/// Access to the document database.
///
/// The server owns exactly one implementation for its whole lifetime and
/// hands it to the request handlers through `actix_web::web::Data`. There
/// are no retries and no timeouts on this layer, every failure goes
/// straight back to the caller.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores a new document and returns the identifier the store picked
    /// for it. The document must not carry an identifier field itself.
    async fn insert(&self, collection: &str, document: Document) -> Result<String, StoreError>;

    /// Returns at most `limit` documents matching all fields of `filter`
    /// exactly (an empty filter matches everything), in store-native
    /// order. No matches is an empty list, not an error.
    async fn query(&self, collection: &str, filter: Document, limit: i64) -> Result<Vec<Document>, StoreError>;

    /// Names of the collections that currently exist.
    /// Only the diagnostic endpoint cares about this.
    async fn collection_names(&self) -> Result<Vec<String>, StoreError>;
}

/// The MongoDB-backed store used in production.
pub struct MongoStore {
    database: Option<mongodb::Database>,
}

impl MongoStore {
    /// Parses the connection string and selects the database. The driver
    /// connects lazily, so an unreachable server only shows up once the
    /// first operation runs.
    pub async fn connect(url: &str, name: &str) -> Result<MongoStore, StoreError> {
        let client = Client::with_uri_str(url).await?;

        Ok(MongoStore {
            database: Some(client.database(name)),
        })
    }

    /// A store without a connection. Every operation fails with
    /// [`StoreError::Unavailable`]. This lets the server boot without
    /// database settings and report the gap on `/info`.
    pub fn disconnected() -> MongoStore {
        MongoStore { database: None }
    }

    fn database(&self) -> Result<&mongodb::Database, StoreError> {
        self.database.as_ref().ok_or(StoreError::Unavailable)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, collection: &str, document: Document) -> Result<String, StoreError> {
        let result = self.database()?.collection::<Document>(collection).insert_one(document).await?;

        // Mongo assigns ObjectIds, but the contract only promises an
        // opaque string.
        Ok(match result.inserted_id {
            Bson::ObjectId(id) => id.to_hex(),
            other => other.to_string(),
        })
    }

    async fn query(&self, collection: &str, filter: Document, limit: i64) -> Result<Vec<Document>, StoreError> {
        let cursor = self.database()?.collection::<Document>(collection).find(filter).limit(limit).await?;

        Ok(cursor.try_collect().await?)
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.database()?.list_collection_names().await?)
    }
}

/// In-memory store for the test suite. It assigns real ObjectIds so code
/// that parses identifiers behaves exactly like it does against MongoDB.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, mut document: Document) -> Result<String, StoreError> {
        let id = ObjectId::new();
        document.insert("_id", id);

        let mut collections = self.collections.lock().unwrap();
        collections.entry(collection.to_string()).or_default().push(document);

        Ok(id.to_hex())
    }

    async fn query(&self, collection: &str, filter: Document, limit: i64) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.lock().unwrap();

        let documents = match collections.get(collection) {
            Some(documents) => documents,
            None => return Ok(Vec::new()),
        };

        Ok(documents
            .iter()
            .filter(|document| filter.iter().all(|(field, value)| document.get(field) == Some(value)))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.lock().unwrap();

        Ok(collections.keys().cloned().collect())
    }
}
