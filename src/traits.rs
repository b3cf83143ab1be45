use async_trait::async_trait;

use crate::error::ViewError;
use crate::task::{Task, TaskDraft, TaskIndex};

/// The server that owns the durable task list, and addresses tasks by their position in it
#[async_trait]
pub trait TaskBackend {
    /// Returns the whole task list, in server order
    async fn get_tasks(&mut self) -> Result<Vec<Task>, ViewError>;

    /// Appends a new task, and returns the task as stored by the server
    async fn add_task(&mut self, draft: &TaskDraft) -> Result<Task, ViewError>;

    /// Overwrites every field of the task at `index`, and returns the task as stored by the server
    async fn update_task(&mut self, index: TaskIndex, task: &Task) -> Result<Task, ViewError>;

    /// Marks the task at `index` as completed
    async fn complete_task(&mut self, index: TaskIndex) -> Result<(), ViewError>;

    /// Removes the task at `index`. Every later task shifts down by one position
    async fn delete_task(&mut self, index: TaskIndex) -> Result<(), ViewError>;
}

/// A local key/value store that survives restarts (the equivalent of a browser's `localStorage`)
#[async_trait]
pub trait TodayStore {
    /// Returns the raw value stored for `key`, if any
    async fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` for `key`
    async fn set_item(&mut self, key: &str, value: String) -> Result<(), ViewError>;
}
