use super::TaskGateway;
use crate::error::ClientError;
use std::path::Path;
use std::sync::Arc;
use tasklist_core::config::StoreBackend;
use tasklist_core::model::{Task, TaskCollection, TaskPatch};
use tasklist_core::storage::{KeyValueStore, open_store};
use tasklist_core::task_api::{Ack, TaskService};

/// Runs the task store in-process against a local store, with no server.
#[derive(Debug, Clone)]
pub struct LocalGateway {
    service: TaskService,
}

impl LocalGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            service: TaskService::new(store),
        }
    }

    pub fn open(data_dir: Option<&Path>) -> Result<Self, ClientError> {
        let store = open_store(StoreBackend::File, data_dir)?;
        tracing::debug!("using local gateway");
        Ok(Self::new(store))
    }
}

impl TaskGateway for LocalGateway {
    fn list(&self) -> Result<TaskCollection, ClientError> {
        Ok(self.service.list()?)
    }

    fn create(&self, text: &str) -> Result<Task, ClientError> {
        Ok(self.service.create(text)?)
    }

    fn update(&self, id: u64, patch: &TaskPatch) -> Result<Task, ClientError> {
        Ok(self.service.update(id, patch)?)
    }

    fn delete(&self, id: u64) -> Result<Ack, ClientError> {
        Ok(self.service.delete(id)?)
    }

    fn bulk_replace(&self, tasks: &[Task]) -> Result<Ack, ClientError> {
        Ok(self.service.bulk_replace(tasks.to_vec())?)
    }
}
