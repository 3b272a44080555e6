pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod task_api;

pub use error::AppError;
pub use model::{Task, TaskCollection, TaskPatch};
pub use task_api::{Ack, TaskService};
