use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::{resolve_server_timestamps, Document, DocumentStore, Fields, StoreError};

/// Document store over a single `documents` table (see `db::ensure_schema`).
/// `update` is a top-level JSONB merge (`data || patch`).
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_document(id: String, data: Value) -> Result<Document, StoreError> {
    match data {
        Value::Object(fields) => Ok(Document { id, fields }),
        other => Err(StoreError::Decode(format!(
            "document {id} is not a JSON object: {other}"
        ))),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<(Value,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(data,)| into_document(id.to_string(), data))
            .transpose()
    }

    async fn create(&self, collection: &str, mut fields: Fields) -> Result<String, StoreError> {
        resolve_server_timestamps(&mut fields, Utc::now());
        let id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Value::Object(fields))
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, mut fields: Fields) -> Result<(), StoreError> {
        resolve_server_timestamps(&mut fields, Utc::now());

        let result = sqlx::query(
            "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn set(&self, collection: &str, id: &str, mut fields: Fields) -> Result<(), StoreError> {
        resolve_server_timestamps(&mut fields, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<(String, Value)> = sqlx::query_as(
            "SELECT id, data FROM documents WHERE collection = $1 AND data -> $2 = $3",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, data)| into_document(id, data))
            .collect()
    }
}
