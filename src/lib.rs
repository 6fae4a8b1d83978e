// TodoStore - Personal task list with JSON file persistence

pub mod config;
pub mod error;
pub mod models;
pub mod persistence;
pub mod query;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use error::{ErrorKind, Result, StoreError};
pub use models::{Priority, Task, TaskId, parse_date, today};
pub use persistence::{JsonFile, Persistence};
pub use query::{DueStatus, Statistics, StatusFilter, due_status, filter, statistics};
pub use store::TaskStore;
