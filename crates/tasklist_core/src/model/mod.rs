mod task;

pub use task::{INITIAL_TASK_ID, Task, TaskCollection, TaskPatch, normalize_text};
