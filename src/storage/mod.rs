// src/storage/mod.rs
// DOCUMENTATION: Storage engine interface and backend selection
// PURPOSE: Let the API switch between the JSON file store and PostgreSQL
// through configuration alone

pub mod db;
pub mod error;
pub mod file;
pub mod scope;

pub use db::DbStorage;
pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use scope::RequestScope;

use crate::config::{Config, StorageMode};
use crate::models::{Entity, EntityKind, Model};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared handle injected into request handlers
pub type SharedStorage = Arc<dyn StorageEngine>;

/// Persistence contract honoured identically by every backend
/// DOCUMENTATION: Writes are two-phase: `new`/`delete` stage changes and
/// `save` makes them durable. Staged changes belong to the caller's
/// `RequestScope`: `save`, `reload` and `close` only act on that scope.
/// Absence is never an error: `get` returns `None` and `delete` of an
/// unknown entity does nothing.
#[async_trait]
pub trait StorageEngine: Send + Sync {
    /// All stored entities keyed by "ClassName.id", optionally one kind only
    async fn all(&self, kind: Option<EntityKind>) -> StorageResult<HashMap<String, Entity>>;

    /// Stage an entity for the next `save`. Inserts or replaces by key.
    async fn new(&self, entity: Entity);

    /// Commit staged writes and deletions
    async fn save(&self) -> StorageResult<()>;

    /// Remove an entity and everything it owns. `None` is a no-op.
    async fn delete(&self, entity: Option<&Entity>) -> StorageResult<()>;

    /// Point lookup; `None` for unknown or malformed ids
    async fn get(&self, kind: EntityKind, id: &str) -> StorageResult<Option<Entity>>;

    /// Number of stored entities, optionally one kind only
    async fn count(&self, kind: Option<EntityKind>) -> StorageResult<usize>;

    /// Resynchronize with the backing store, dropping uncommitted changes
    async fn reload(&self) -> StorageResult<()>;

    /// Release per-request resources. Safe to call repeatedly.
    async fn close(&self) -> StorageResult<()>;

    /// Release process-wide resources (connection pool) at exit
    async fn shutdown(&self) {}

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Build the engine selected by configuration and load its initial state
/// DOCUMENTATION: Called once at startup in main.rs
pub async fn open(config: &Config) -> StorageResult<SharedStorage> {
    let mode = config.storage_mode().map_err(StorageError::Config)?;
    let storage: SharedStorage = match mode {
        StorageMode::File => {
            let storage = FileStorage::new(&config.file_path);
            log::info!("Using file storage at {}", storage.path().display());
            Arc::new(storage)
        }
        StorageMode::Db => {
            let pool = crate::config::init_db_pool(config).await?;
            let storage = DbStorage::new(pool);
            if config.is_test_env() {
                storage.drop_all().await?;
            }
            Arc::new(storage)
        }
    };

    storage.reload().await?;
    log::info!("Storage engine ready: {}", storage.backend_name());
    Ok(storage)
}

/// Typed point lookup
pub async fn get_as<T: Model>(storage: &dyn StorageEngine, id: &str) -> StorageResult<Option<T>> {
    Ok(storage.get(T::KIND, id).await?.and_then(T::from_entity))
}

/// Every stored entity of one kind, oldest first
pub async fn all_as<T: Model>(storage: &dyn StorageEngine) -> StorageResult<Vec<T>> {
    let mut entities: Vec<Entity> = storage.all(Some(T::KIND)).await?.into_values().collect();
    entities.sort_by_key(|entity| (entity.created_at(), entity.id()));
    Ok(entities.into_iter().filter_map(T::from_entity).collect())
}
