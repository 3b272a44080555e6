//! HTTP surface over the task store.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/api/tasks` | [`handlers::list_tasks`] |
//! | POST | `/api/tasks` | [`handlers::create_task`] |
//! | PUT | `/api/tasks/bulk` | [`handlers::bulk_replace_tasks`] |
//! | PUT | `/api/tasks/{id}` | [`handlers::update_task`] |
//! | DELETE | `/api/tasks/{id}` | [`handlers::delete_task`] |
//!
//! Anything else under `/api` is a JSON 404. The CORS layer answers every
//! `OPTIONS` request itself with an empty 200, and every response carries
//! permissive CORS headers.

pub mod error;
pub mod handlers;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, put};
use std::path::PathBuf;
use tasklist_core::task_api::TaskService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use handlers::{
    bulk_replace_tasks, create_task, delete_task, health_check, list_tasks,
    not_found, update_task,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: TaskService,
}

impl AppState {
    pub fn new(service: TaskService) -> Self {
        Self { service }
    }
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

fn task_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tasks",
            get(list_tasks).post(create_task).fallback(not_found),
        )
        .route("/tasks/bulk", put(bulk_replace_tasks).fallback(not_found))
        .route(
            "/tasks/{id}",
            put(update_task).delete(delete_task).fallback(not_found),
        )
        .fallback(not_found)
}

/// Builds the application. Non-API paths are served from `static_dir` when
/// one is given and are a 404 otherwise.
pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let application = Router::new()
        .route("/health", get(health_check))
        .nest("/api", task_routes());

    let application = match static_dir {
        Some(dir) => application.fallback_service(ServeDir::new(dir)),
        None => application.fallback(not_found),
    };

    application
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
