pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod storage;
pub mod workflow;

pub use config::Config;
pub use error::{IdeaflowError, Result};
pub use storage::{InMemoryStore, SqliteStore};
pub use workflow::DecisionWorkflow;
