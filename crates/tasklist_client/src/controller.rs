//! Client-side task state and the operations that move it forward.
//!
//! Every operation takes the current [`ClientState`] and returns the next
//! one. Operations that talk to the gateway build the next state from the
//! gateway's response only, so a failed request hands back an error and the
//! caller keeps the state it already had.

use crate::error::ClientError;
use crate::gateway::TaskGateway;
use tasklist_core::model::{INITIAL_TASK_ID, Task, TaskPatch};

/// Input-length convention for task text, counted in characters.
pub const MAX_TEXT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    pub tasks: Vec<Task>,
    pub task_id_counter: u64,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            task_id_counter: INITIAL_TASK_ID,
        }
    }
}

impl ClientState {
    pub fn find(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn editing_id(&self) -> Option<u64> {
        self.tasks.iter().find(|task| task.is_editing).map(|task| task.id)
    }

    fn require(&self, id: u64) -> Result<&Task, ClientError> {
        self.find(id).ok_or(ClientError::UnknownTask(id))
    }

    fn with_task(&self, updated: Task) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next.tasks.iter_mut().find(|task| task.id == updated.id) {
            *slot = updated;
        }
        next
    }
}

fn validate_text(raw: &str, empty_message: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::validation(empty_message));
    }
    if trimmed.chars().count() > MAX_TEXT_CHARS {
        return Err(ClientError::validation(format!(
            "Task must be at most {MAX_TEXT_CHARS} characters!"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn load(gateway: &dyn TaskGateway) -> Result<ClientState, ClientError> {
    let collection = gateway.list()?;
    Ok(ClientState {
        tasks: collection.tasks,
        task_id_counter: collection.task_id_counter,
    })
}

pub fn add_task(
    state: &ClientState,
    gateway: &dyn TaskGateway,
    text: &str,
) -> Result<ClientState, ClientError> {
    let text = validate_text(text, "Please enter a task!")?;
    let created = gateway.create(&text)?;

    let mut next = state.clone();
    next.task_id_counter = next.task_id_counter.max(created.id.saturating_add(1));
    next.tasks.push(created);
    Ok(next)
}

pub fn toggle_complete(
    state: &ClientState,
    gateway: &dyn TaskGateway,
    id: u64,
) -> Result<ClientState, ClientError> {
    let task = state.require(id)?;
    let updated = gateway.update(id, &TaskPatch::completed(!task.completed))?;
    Ok(state.with_task(updated))
}

/// Puts one task into editing mode and takes every other task out of it.
pub fn start_edit(state: &ClientState, id: u64) -> Result<ClientState, ClientError> {
    let task = state.require(id)?;
    if task.completed {
        return Err(ClientError::validation("Completed tasks cannot be edited!"));
    }

    let mut next = state.clone();
    for task in &mut next.tasks {
        task.is_editing = task.id == id;
    }
    Ok(next)
}

pub fn cancel_edit(state: &ClientState, id: u64) -> Result<ClientState, ClientError> {
    state.require(id)?;

    let mut next = state.clone();
    if let Some(task) = next.tasks.iter_mut().find(|task| task.id == id) {
        task.is_editing = false;
    }
    Ok(next)
}

pub fn save_edit(
    state: &ClientState,
    gateway: &dyn TaskGateway,
    id: u64,
    text: &str,
) -> Result<ClientState, ClientError> {
    state.require(id)?;
    let text = validate_text(text, "Task cannot be empty!")?;
    let updated = gateway.update(id, &TaskPatch::finish_edit(text))?;
    Ok(state.with_task(updated))
}

pub fn delete_task(
    state: &ClientState,
    gateway: &dyn TaskGateway,
    id: u64,
) -> Result<ClientState, ClientError> {
    state.require(id)?;
    gateway.delete(id)?;

    let mut next = state.clone();
    next.tasks.retain(|task| task.id != id);
    Ok(next)
}

pub fn remove_completed(
    state: &ClientState,
    gateway: &dyn TaskGateway,
) -> Result<ClientState, ClientError> {
    let survivors: Vec<Task> = state
        .tasks
        .iter()
        .filter(|task| !task.completed)
        .cloned()
        .collect();
    gateway.bulk_replace(&survivors)?;

    Ok(ClientState {
        tasks: survivors,
        task_id_counter: state.task_id_counter,
    })
}

pub fn remove_all(
    state: &ClientState,
    gateway: &dyn TaskGateway,
) -> Result<ClientState, ClientError> {
    gateway.bulk_replace(&[])?;

    Ok(ClientState {
        tasks: Vec::new(),
        task_id_counter: state.task_id_counter,
    })
}
