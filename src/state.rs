use std::sync::Arc;

use crate::config::Config;
use crate::storage::StorageBackend;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub backend: Arc<dyn StorageBackend>,
    pub config: Config,
}
