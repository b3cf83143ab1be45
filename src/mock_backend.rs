//! An in-memory task backend, with the same positional semantics as the task server
#![cfg(feature = "mocks")]

use async_trait::async_trait;

use crate::error::ViewError;
use crate::mock_behaviour::MockBehaviour;
use crate::task::{Task, TaskDraft, TaskIndex};
use crate::traits::TaskBackend;


/// A [`TaskBackend`] that keeps its tasks in memory.
///
/// Useful for tests and offline use. Failures can be scripted with a [`MockBehaviour`].
#[derive(Clone, Debug, Default)]
pub struct MockBackend {
    tasks: Vec<Task>,
    behaviour: MockBehaviour,
    requests: usize,
    /// When true, `get_tasks` behaves like a server that answers without a `tasks` array
    malformed_listing: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks, ..Self::default() }
    }

    pub fn set_behaviour(&mut self, behaviour: MockBehaviour) {
        self.behaviour = behaviour;
    }

    pub fn set_malformed_listing(&mut self, malformed: bool) {
        self.malformed_listing = malformed;
    }

    /// The tasks as currently stored
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Change the stored tasks behind the client's back, as another browser tab would
    pub fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    /// How many requests have been received so far (including failed ones)
    pub fn request_count(&self) -> usize {
        self.requests
    }

    fn check_index(&self, index: TaskIndex) -> Result<usize, ViewError> {
        let i = index.get();
        if i >= self.tasks.len() {
            log::warn!("Invalid task index: {}", index);
            return Err(ViewError::Status{ status: 400, body: "Invalid task index.".to_string() });
        }
        Ok(i)
    }
}

#[async_trait]
impl TaskBackend for MockBackend {
    async fn get_tasks(&mut self) -> Result<Vec<Task>, ViewError> {
        self.requests += 1;
        self.behaviour.can_get_tasks()?;
        if self.malformed_listing {
            return Err(ViewError::MalformedPayload("the reply has no `tasks` array".to_string()));
        }
        Ok(self.tasks.clone())
    }

    async fn add_task(&mut self, draft: &TaskDraft) -> Result<Task, ViewError> {
        self.requests += 1;
        self.behaviour.can_add_task()?;
        let task = Task::from_draft(draft);
        self.tasks.push(task.clone());
        log::debug!("Mock backend: added task {:?} at index {}", task.name(), self.tasks.len() - 1);
        Ok(task)
    }

    async fn update_task(&mut self, index: TaskIndex, task: &Task) -> Result<Task, ViewError> {
        self.requests += 1;
        self.behaviour.can_update_task()?;
        let i = self.check_index(index)?;
        self.tasks[i] = task.clone();
        Ok(task.clone())
    }

    async fn complete_task(&mut self, index: TaskIndex) -> Result<(), ViewError> {
        self.requests += 1;
        self.behaviour.can_complete_task()?;
        let i = self.check_index(index)?;
        self.tasks[i].set_completed(true);
        Ok(())
    }

    async fn delete_task(&mut self, index: TaskIndex) -> Result<(), ViewError> {
        self.requests += 1;
        self.behaviour.can_delete_task()?;
        let i = self.check_index(index)?;
        self.tasks.remove(i);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    #[tokio::test]
    async fn deletion_shifts_positions() {
        let mut backend = MockBackend::with_tasks(vec![
            Task::new("a", Priority::Low, None, None),
            Task::new("b", Priority::Low, None, None),
            Task::new("c", Priority::Low, None, None),
        ]);
        backend.delete_task(TaskIndex::from(0)).await.unwrap();
        backend.complete_task(TaskIndex::from(0)).await.unwrap();

        let tasks = backend.get_tasks().await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name(), "b");
        assert!(tasks[0].completed());
        assert_eq!(backend.request_count(), 3);
    }

    #[tokio::test]
    async fn out_of_range_is_rejected() {
        let mut backend = MockBackend::new();
        match backend.delete_task(TaskIndex::from(0)).await {
            Err(ViewError::Status{ status, .. }) => assert_eq!(status, 400),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
