use crate::error::AppError;
use serde::{Deserialize, Serialize};

pub const INITIAL_TASK_ID: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub is_editing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// The whole persisted record: every task plus the next id to hand out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCollection {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default = "initial_task_id")]
    pub task_id_counter: u64,
}

fn initial_task_id() -> u64 {
    INITIAL_TASK_ID
}

impl Default for TaskCollection {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            task_id_counter: INITIAL_TASK_ID,
        }
    }
}

impl TaskCollection {
    pub fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn max_id(&self) -> Option<u64> {
        self.tasks.iter().map(|task| task.id).max()
    }

    /// Returns the first id that occurs more than once, if any.
    pub fn duplicate_id(tasks: &[Task]) -> Option<u64> {
        let mut seen = std::collections::HashSet::with_capacity(tasks.len());
        tasks
            .iter()
            .map(|task| task.id)
            .find(|id| !seen.insert(*id))
    }
}

/// Partial update for a stored task. Present fields overwrite, absent fields
/// are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_editing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn finish_edit(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            is_editing: Some(false),
            ..Self::default()
        }
    }

    /// Validates the whole patch against `task` before touching it, so a
    /// rejected patch never leaves the task half-updated.
    pub fn apply(&self, task: &mut Task) -> Result<(), AppError> {
        if let Some(id) = self.id
            && id != task.id
        {
            return Err(AppError::invalid_input("task id cannot be changed"));
        }

        if let Some(created_at) = self.created_at.as_deref()
            && task.created_at.as_deref() != Some(created_at)
        {
            return Err(AppError::invalid_input("createdAt cannot be changed"));
        }

        let text = match self.text.as_deref() {
            Some(raw) => Some(normalize_text(raw)?),
            None => None,
        };

        if let Some(text) = text {
            task.text = text;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(is_editing) = self.is_editing {
            task.is_editing = is_editing;
        }

        Ok(())
    }
}

pub fn normalize_text(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("Task text is required"));
    }
    Ok(trimmed.to_string())
}
