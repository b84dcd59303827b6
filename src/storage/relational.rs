use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgConnection;
use sqlx::Connection;

use super::{StorageBackend, WriteError, WriteReceipt};

/// Direct-Postgres backend. A connection is opened per write and closed
/// right after, matching the short-lived-invocation model; no pool is held
/// across requests.
pub struct RelationalBackend {
    database_url: String,
}

impl RelationalBackend {
    pub fn new(database_url: String) -> Self {
        Self { database_url }
    }
}

#[async_trait]
impl StorageBackend for RelationalBackend {
    fn name(&self) -> &'static str {
        "relational"
    }

    async fn write(&self, payload: &serde_json::Value) -> Result<WriteReceipt, WriteError> {
        let mut conn = PgConnection::connect(&self.database_url)
            .await
            .map_err(|e| WriteError(format!("database connection failed: {e}")))?;

        // Single INSERT .. RETURNING statement: the id and timestamp become
        // visible atomically with the row itself, and a failure leaves
        // nothing committed.
        let row: (i64, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO submissions (data) VALUES ($1) RETURNING id, created_at",
        )
        .bind(payload)
        .fetch_one(&mut conn)
        .await
        .map_err(|e| WriteError(format!("insert failed: {e}")))?;

        // The insert is committed at this point; a noisy close changes nothing.
        let _ = conn.close().await;

        Ok(WriteReceipt::Row {
            id: row.0,
            created_at: row.1,
        })
    }
}
