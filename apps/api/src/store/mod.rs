//! Document store: the persistence collaborator.
//!
//! Records are JSON objects grouped into named collections and addressed by a
//! store-assigned id. Timestamps are assigned by the store, never by callers:
//! a caller writes the `server_timestamp()` sentinel and the backend resolves it
//! at write time.
//!
//! There is no optimistic locking. Two concurrent writes to one id are last-write-wins.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Top-level fields of a stored record.
pub type Fields = Map<String, Value>;

const SERVER_TIMESTAMP_KEY: &str = "$serverTimestamp";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("Could not decode document: {0}")]
    Decode(String),
}

/// A stored record together with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Deserializes the record, exposing the document id as the `id` field.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id));
        serde_json::from_value(Value::Object(fields)).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name reported by `/health`.
    fn backend(&self) -> &'static str;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Inserts a new record and returns the id the store assigned to it.
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Merges `fields` into an existing record. Fields not named are left untouched.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Creates or fully replaces the record at a caller-chosen id.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// All records whose top-level `field` equals `value`.
    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;
}

/// Sentinel replaced by the store with the write time.
pub fn server_timestamp() -> Value {
    json!({ SERVER_TIMESTAMP_KEY: true })
}

fn is_server_timestamp(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| o.len() == 1 && o.get(SERVER_TIMESTAMP_KEY) == Some(&Value::Bool(true)))
}

/// Replaces every top-level sentinel with `now` in RFC 3339 form.
pub(crate) fn resolve_server_timestamps(fields: &mut Fields, now: DateTime<Utc>) {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Micros, true);
    for value in fields.values_mut() {
        if is_server_timestamp(value) {
            *value = Value::String(stamp.clone());
        }
    }
}

/// Converts a serializable value into top-level fields.
pub fn to_fields<T: serde::Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value).map_err(|e| StoreError::Decode(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Decode(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
