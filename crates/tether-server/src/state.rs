//! Shared router state

use std::sync::Arc;

use tether_core::{Storage, StorageError};

use crate::config::Config;
use crate::error::ApiError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(storage: Arc<Storage>, config: Arc<Config>) -> Self {
        Self { storage, config }
    }

    /// Run a storage operation on the blocking pool
    pub async fn with_storage<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Storage) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        let result = tokio::task::spawn_blocking(move || op(&storage)).await?;
        result.map_err(ApiError::from)
    }
}
