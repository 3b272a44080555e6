pub mod app;
pub mod cli;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod prompt;
pub mod render;
pub mod view;

pub use app::{Outcome, TodoApp};
pub use controller::ClientState;
pub use error::ClientError;
pub use gateway::TaskGateway;
