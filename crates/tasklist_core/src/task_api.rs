use crate::error::AppError;
use crate::model::{Task, TaskCollection, TaskPatch, normalize_text};
use crate::storage::{DEFAULT_STORE_KEY, KeyValueStore, json_store, validate_key};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub const OK: Ack = Ack { success: true };
}

/// Operations over the single task collection held under one store key.
///
/// Every call loads the whole record, applies one change and writes the whole
/// record back. Nothing serializes concurrent callers: two overlapping writes
/// race and the later one wins.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskService")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl TaskService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: DEFAULT_STORE_KEY.to_string(),
        }
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: &str) -> Result<Self, AppError> {
        validate_key(key)?;
        Ok(Self {
            store,
            key: key.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn list(&self) -> Result<TaskCollection, AppError> {
        self.load()
    }

    pub fn create(&self, text: &str) -> Result<Task, AppError> {
        let text = normalize_text(text)?;
        let created_at = now_rfc3339()?;

        let mut collection = self.load()?;
        if let Some(max_id) = collection.max_id()
            && max_id >= collection.task_id_counter
        {
            tracing::warn!(
                max_id,
                counter = collection.task_id_counter,
                "task id counter behind stored ids, advancing"
            );
            collection.task_id_counter = next_id(max_id)?;
        }

        let task = Task {
            id: collection.task_id_counter,
            text,
            completed: false,
            is_editing: false,
            created_at: Some(created_at),
        };
        collection.task_id_counter = next_id(task.id)?;
        collection.tasks.push(task.clone());
        self.save(&collection)?;

        tracing::info!(id = task.id, "task created");
        Ok(task)
    }

    pub fn update(&self, id: u64, patch: &TaskPatch) -> Result<Task, AppError> {
        let mut collection = self.load()?;
        let index = collection
            .position(id)
            .ok_or_else(|| AppError::not_found("Task not found"))?;

        let task = &mut collection.tasks[index];
        patch.apply(task)?;
        let updated = task.clone();
        self.save(&collection)?;

        tracing::info!(id, "task updated");
        Ok(updated)
    }

    pub fn delete(&self, id: u64) -> Result<Ack, AppError> {
        let mut collection = self.load()?;
        let index = collection
            .position(id)
            .ok_or_else(|| AppError::not_found("Task not found"))?;

        collection.tasks.remove(index);
        self.save(&collection)?;

        tracing::info!(id, "task deleted");
        Ok(Ack::OK)
    }

    /// Replaces the stored list wholesale. Every task must carry a usable id
    /// and non-blank text; the list is rejected as a whole otherwise.
    pub fn bulk_replace(&self, mut tasks: Vec<Task>) -> Result<Ack, AppError> {
        if let Some(id) = TaskCollection::duplicate_id(&tasks) {
            return Err(AppError::invalid_input(format!(
                "task id {id} appears more than once"
            )));
        }
        for task in &mut tasks {
            if task.id == 0 || task.id == u64::MAX {
                return Err(AppError::invalid_input(format!(
                    "task id {} is out of range",
                    task.id
                )));
            }
            task.text = normalize_text(&task.text)?;
        }

        let mut collection = self.load()?;
        let count = tasks.len();
        collection.tasks = tasks;
        self.save(&collection)?;

        tracing::info!(count, "task list replaced");
        Ok(Ack::OK)
    }

    fn load(&self) -> Result<TaskCollection, AppError> {
        json_store::load_collection(self.store.as_ref(), &self.key)
    }

    fn save(&self, collection: &TaskCollection) -> Result<(), AppError> {
        json_store::save_collection(self.store.as_ref(), &self.key, collection)
    }
}

fn next_id(id: u64) -> Result<u64, AppError> {
    id.checked_add(1)
        .ok_or_else(|| AppError::invalid_data("task id space exhausted"))
}

fn now_rfc3339() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
