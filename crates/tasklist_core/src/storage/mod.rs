use crate::config::StoreBackend;
use crate::error::AppError;
use std::path::Path;
use std::sync::Arc;

mod file_store;
pub mod json_store;
mod memory_store;

pub use file_store::{FileKvStore, default_data_dir};
pub use memory_store::MemoryKvStore;

/// Key under which the task collection is stored unless configured otherwise.
pub const DEFAULT_STORE_KEY: &str = "user_tasks";

/// String-valued key-value storage. Each call stands alone: there is no
/// transaction spanning a `get` and a later `put`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn put(&self, key: &str, value: &str) -> Result<(), AppError>;
}

pub fn validate_key(key: &str) -> Result<(), AppError> {
    if key.is_empty() {
        return Err(AppError::invalid_input("store key is required"));
    }

    let valid = key
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if !valid {
        return Err(AppError::invalid_input(format!(
            "store key '{key}' may only contain letters, digits, '-' and '_'"
        )));
    }

    Ok(())
}

/// Opens the configured backend. `data_dir` falls back to the default data
/// directory for the file backend and is ignored for the memory backend.
pub fn open_store(
    backend: StoreBackend,
    data_dir: Option<&Path>,
) -> Result<Arc<dyn KeyValueStore>, AppError> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryKvStore::new())),
        StoreBackend::File => {
            let dir = match data_dir {
                Some(dir) => dir.to_path_buf(),
                None => default_data_dir()?,
            };
            tracing::debug!(dir = %dir.display(), "using file store");
            Ok(Arc::new(FileKvStore::new(dir)))
        }
    }
}
