use super::AppState;
use super::error::ApiErrorResponse;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tasklist_core::error::AppError;
use tasklist_core::model::{Task, TaskCollection, TaskPatch};
use tasklist_core::task_api::{Ack, TaskService};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkReplaceRequest {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<TaskCollection>, ApiErrorResponse> {
    let collection = run_blocking(&state, |service| service.list()).await?;
    Ok(Json(collection))
}

pub async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Task>, ApiErrorResponse> {
    let request: CreateTaskRequest = parse_body(&body)?;
    let text = request.text.unwrap_or_default();
    let task = run_blocking(&state, move |service| service.create(&text)).await?;
    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Task>, ApiErrorResponse> {
    let id = parse_task_id(&raw_id)?;
    let patch: TaskPatch = parse_body(&body)?;
    let task = run_blocking(&state, move |service| service.update(id, &patch)).await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Ack>, ApiErrorResponse> {
    let id = parse_task_id(&raw_id)?;
    let ack = run_blocking(&state, move |service| service.delete(id)).await?;
    Ok(Json(ack))
}

pub async fn bulk_replace_tasks(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Ack>, ApiErrorResponse> {
    let request: BulkReplaceRequest = parse_body(&body)?;
    let ack = run_blocking(&state, move |service| service.bulk_replace(request.tasks)).await?;
    Ok(Json(ack))
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn not_found() -> ApiErrorResponse {
    ApiErrorResponse::not_found("Not Found")
}

fn parse_task_id(raw: &str) -> Result<u64, ApiErrorResponse> {
    raw.parse::<u64>()
        .map_err(|_| ApiErrorResponse::not_found("Task not found"))
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiErrorResponse> {
    serde_json::from_slice(body)
        .map_err(|err| ApiErrorResponse::bad_request(format!("Invalid JSON body: {err}")))
}

/// Store access is blocking file I/O, so it runs off the async workers.
async fn run_blocking<T, F>(state: &AppState, operation: F) -> Result<T, ApiErrorResponse>
where
    T: Send + 'static,
    F: FnOnce(&TaskService) -> Result<T, AppError> + Send + 'static,
{
    let service = state.service.clone();
    match tokio::task::spawn_blocking(move || operation(&service)).await {
        Ok(result) => result.map_err(ApiErrorResponse::from),
        Err(error) => {
            tracing::error!(%error, "task store worker failed");
            Err(ApiErrorResponse::internal_error())
        }
    }
}
