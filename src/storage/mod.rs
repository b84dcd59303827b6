pub mod managed;
pub mod relational;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::Config;
use self::managed::ManagedBackend;
use self::relational::RelationalBackend;

/// Outcome of a successful write. The two backends do not expose the same
/// synchronous information (the managed service does not always echo an id
/// and timestamp), so the shapes stay distinct until the ingestion handler
/// maps them onto the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteReceipt {
    /// Direct SQL insert: server-generated row id and creation timestamp.
    Row {
        id: i64,
        created_at: DateTime<Utc>,
    },
    /// Managed-service insert: whatever record set the service echoed back,
    /// or `None` when the response carried no recognizable records.
    Remote {
        records: Option<serde_json::Value>,
    },
}

/// A failed write. The underlying cause is preserved verbatim so it can be
/// surfaced to the caller. Nothing is committed when this is returned.
#[derive(Debug)]
pub struct WriteError(pub String);

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Identifier used in logs and selection diagnostics.
    fn name(&self) -> &'static str;

    /// Persist one JSON payload. Writes are independent of one another and
    /// are never retried here.
    async fn write(&self, payload: &serde_json::Value) -> Result<WriteReceipt, WriteError>;
}

#[derive(Debug)]
pub enum SelectError {
    NoBackend,
}

impl std::fmt::Display for SelectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectError::NoBackend => write!(
                f,
                "no usable storage backend: set DATABASE_URL or SUPABASE_URL + SUPABASE_SERVICE_KEY"
            ),
        }
    }
}

impl std::error::Error for SelectError {}

/// Resolve the storage backend for this process. Runs once at startup; the
/// returned handle is immutable for the process lifetime.
pub fn select_backend(config: &Config) -> Result<Arc<dyn StorageBackend>, SelectError> {
    select_backend_with(config, ManagedBackend::new)
}

/// Selector with an injectable managed-client constructor.
///
/// Preference order: managed backend when fully configured and its client
/// constructs, else the relational backend when a connection string is
/// present, else a startup error. A managed client that fails to construct
/// does not block startup as long as the relational backend is available.
pub fn select_backend_with<F>(
    config: &Config,
    construct: F,
) -> Result<Arc<dyn StorageBackend>, SelectError>
where
    F: FnOnce(&str, &str) -> Result<ManagedBackend, String>,
{
    if let Some(managed) = &config.managed {
        match construct(&managed.url, &managed.service_key) {
            Ok(backend) => {
                tracing::info!("Selected managed storage backend at {}", managed.url);
                return Ok(Arc::new(backend));
            }
            Err(e) => {
                tracing::warn!("Managed backend unavailable ({e}), trying relational");
            }
        }
    }

    if let Some(database_url) = &config.database_url {
        tracing::info!("Selected relational storage backend");
        return Ok(Arc::new(RelationalBackend::new(database_url.clone())));
    }

    Err(SelectError::NoBackend)
}
