pub mod config;
pub mod entries;
pub mod timer;

use optitask_core::storage::ApiConfig;
use optitask_core::{HttpTimeEntryStore, MemoryTimeEntryStore, PersistenceError, TimeEntryStore};
use optitask_core::{NewTimeEntry, TimeEntry, TimeEntryFilter};
use tokio::runtime::Runtime;
use uuid::Uuid;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

/// HTTP store when `[api]` is configured, otherwise an in-memory one.
#[derive(Debug, Clone)]
pub enum Store {
    Http(HttpTimeEntryStore),
    Memory(MemoryTimeEntryStore),
}

impl Store {
    pub fn from_config(api: &ApiConfig) -> Result<Self, PersistenceError> {
        if api.base_url.is_none() {
            let user = api.user_id.clone().unwrap_or_else(|| "local".to_string());
            return Ok(Store::Memory(MemoryTimeEntryStore::new(user)));
        }
        Ok(Store::Http(HttpTimeEntryStore::from_config(api)?))
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Store::Memory(_))
    }
}

impl TimeEntryStore for Store {
    async fn save(&self, entry: NewTimeEntry) -> Result<TimeEntry, PersistenceError> {
        match self {
            Store::Http(s) => s.save(entry).await,
            Store::Memory(s) => s.save(entry).await,
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), PersistenceError> {
        match self {
            Store::Http(s) => s.delete(id).await,
            Store::Memory(s) => s.delete(id).await,
        }
    }

    async fn list(&self, filter: TimeEntryFilter) -> Result<Vec<TimeEntry>, PersistenceError> {
        match self {
            Store::Http(s) => s.list(filter).await,
            Store::Memory(s) => s.list(filter).await,
        }
    }
}
