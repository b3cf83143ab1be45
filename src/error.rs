//! Errors raised by the view-model and its collaborators

use thiserror::Error;

use crate::task::TaskIndex;

/// Everything that can go wrong while talking to the backend or handling a user action
#[derive(Debug, Error)]
pub enum ViewError {
    /// A task name was empty or blank
    #[error("a task name is required")]
    EmptyName,
    /// A position outside of the currently cached task list
    #[error("task index {index} is out of range (the list has {len} tasks)")]
    IndexOutOfRange { index: TaskIndex, len: usize },

    /// The request could not be sent, or its response could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status code
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    /// The response does not have the expected shape
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    /// A non-HTTP backend refused the operation
    #[error("backend error: {0}")]
    Backend(String),
    /// The local store could not be written
    #[error("storage error: {0}")]
    Storage(String),
}

impl ViewError {
    /// Whether this error was detected locally, before anything was sent to the backend
    pub fn is_validation(&self) -> bool {
        match self {
            ViewError::EmptyName | ViewError::IndexOutOfRange { .. } => true,
            _ => false,
        }
    }

    /// The message that should be shown to the user
    pub fn notice(&self) -> String {
        match self {
            ViewError::EmptyName => "Please enter a task name.".to_string(),
            ViewError::IndexOutOfRange { .. } => "This task no longer exists. Please reload the list.".to_string(),
            ViewError::MalformedPayload(_) => "The task list could not be read. Please try again later.".to_string(),
            ViewError::Storage(_) => "Your \"today\" list could not be saved.".to_string(),
            _ => "Could not reach the task server. Please try again.".to_string(),
        }
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        ViewError::MalformedPayload(err.to_string())
    }
}
