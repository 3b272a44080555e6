pub mod api;
pub mod cli;

use tasklist_core::config::ServerConfig;
use tasklist_core::error::AppError;
use tasklist_core::storage::open_store;
use tasklist_core::task_api::TaskService;

pub use api::{AppState, router};

/// Wires the configured store into an application router.
pub fn build_app(config: &ServerConfig) -> Result<axum::Router, AppError> {
    let store = open_store(config.store, config.data_dir.as_deref())?;
    let service = TaskService::with_key(store, &config.store_key)?;
    Ok(router(AppState::new(service), config.static_dir.clone()))
}
