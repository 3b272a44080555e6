use crate::error::ClientError;
use tasklist_core::config::{ClientConfig, ClientMode};
use tasklist_core::model::{Task, TaskCollection, TaskPatch};
use tasklist_core::task_api::Ack;

mod http;
mod local;

pub use http::HttpGateway;
pub use local::LocalGateway;

/// The persistence strategy behind the client: one method per store
/// operation, each a single round trip.
pub trait TaskGateway {
    fn list(&self) -> Result<TaskCollection, ClientError>;

    fn create(&self, text: &str) -> Result<Task, ClientError>;

    fn update(&self, id: u64, patch: &TaskPatch) -> Result<Task, ClientError>;

    fn delete(&self, id: u64) -> Result<Ack, ClientError>;

    fn bulk_replace(&self, tasks: &[Task]) -> Result<Ack, ClientError>;
}

pub fn gateway_from_config(config: &ClientConfig) -> Result<Box<dyn TaskGateway>, ClientError> {
    match config.mode {
        ClientMode::Remote => {
            tracing::debug!(api_url = %config.api_url, "using http gateway");
            Ok(Box::new(HttpGateway::new(&config.api_url)?))
        }
        ClientMode::Local => Ok(Box::new(LocalGateway::open(config.data_dir.as_deref())?)),
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::{LocalGateway, TaskGateway};
    use crate::error::ClientError;
    use std::cell::{Cell, RefCell};
    use std::sync::Arc;
    use tasklist_core::model::{Task, TaskCollection, TaskPatch};
    use tasklist_core::storage::MemoryKvStore;
    use tasklist_core::task_api::Ack;

    /// In-memory gateway that records calls and can be told to fail.
    pub(crate) struct FakeGateway {
        inner: LocalGateway,
        pub(crate) failing: Cell<bool>,
        pub(crate) calls: RefCell<Vec<&'static str>>,
    }

    impl FakeGateway {
        pub(crate) fn new() -> Self {
            Self {
                inner: LocalGateway::new(Arc::new(MemoryKvStore::new())),
                failing: Cell::new(false),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn record(&self, call: &'static str) -> Result<(), ClientError> {
            self.calls.borrow_mut().push(call);
            if self.failing.get() {
                return Err(ClientError::request("503: unavailable"));
            }
            Ok(())
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl TaskGateway for FakeGateway {
        fn list(&self) -> Result<TaskCollection, ClientError> {
            self.record("list")?;
            self.inner.list()
        }

        fn create(&self, text: &str) -> Result<Task, ClientError> {
            self.record("create")?;
            self.inner.create(text)
        }

        fn update(&self, id: u64, patch: &TaskPatch) -> Result<Task, ClientError> {
            self.record("update")?;
            self.inner.update(id, patch)
        }

        fn delete(&self, id: u64) -> Result<Ack, ClientError> {
            self.record("delete")?;
            self.inner.delete(id)
        }

        fn bulk_replace(&self, tasks: &[Task]) -> Result<Ack, ClientError> {
            self.record("bulk_replace")?;
            self.inner.bulk_replace(tasks)
        }
    }
}
