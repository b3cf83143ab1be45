//! The task view-model.
//!
//! A [`ViewModel`] holds the last fetched copy of the server's task list, derives the
//! "today" / "pending" / "completed" lists from it, keeps the client-only [`TodaySet`] in sync,
//! and turns user actions into backend requests.
//!
//! Every operation takes `&mut self`: there is one actor (the user) driving one view-model,
//! and an operation is never interleaved with another one.

use std::borrow::Borrow;
use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::calendar::{self, MonthGrid};
use crate::config::TODAY_TASKS_KEY;
use crate::error::ViewError;
use crate::task::{Task, TaskDraft, TaskIndex};
use crate::traits::{TaskBackend, TodayStore};

pub mod partition;
pub mod sort;
pub mod today;

pub use partition::{partition, Bucket, Partition};
pub use sort::{sort_by, SortMethod};
pub use today::TodaySet;


/// A task, together with its position in the last fetched list
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedTask {
    pub index: TaskIndex,
    pub task: Task,
}

impl Borrow<Task> for IndexedTask {
    fn borrow(&self) -> &Task {
        &self.task
    }
}

/// What should currently be displayed
#[derive(Clone, Debug, PartialEq)]
pub enum Board {
    /// The sorted and partitioned task list
    Tasks(Partition<IndexedTask>),
    /// The last refresh failed. This message replaces the task list
    Error(String),
}

impl Board {
    /// Returns the partition, unless an error banner is displayed
    pub fn partition(&self) -> Option<&Partition<IndexedTask>> {
        match self {
            Board::Tasks(p) => Some(p),
            Board::Error(_) => None,
        }
    }
}

/// Asks the user whether a task should really be deleted
pub trait Confirm {
    fn confirm(&mut self, task: &Task) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Task) -> bool,
{
    fn confirm(&mut self, task: &Task) -> bool {
        self(task)
    }
}

/// A user action, as emitted by whatever renders the board
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    Refresh,
    SetSort(SortMethod),
    Add(TaskDraft),
    Update { index: TaskIndex, draft: TaskDraft },
    Complete(TaskIndex),
    Delete(TaskIndex),
    /// A drag-and-drop from one list to another
    Move { index: TaskIndex, from: Bucket, to: Bucket },
}


/// The state of the task board, and the operations a user can perform on it
pub struct ViewModel<B, S>
where
    B: TaskBackend,
    S: TodayStore,
{
    backend: B,
    store: S,

    tasks: Vec<Task>,
    sort: SortMethod,
    today: TodaySet,
    board: Board,
}

impl<B, S> ViewModel<B, S>
where
    B: TaskBackend,
    S: TodayStore,
{
    /// Create an empty view-model. Call [`Self::refresh`] to actually fetch the tasks
    pub fn new(backend: B, store: S) -> Self {
        Self {
            backend,
            store,
            tasks: Vec::new(),
            sort: SortMethod::default(),
            today: TodaySet::new(),
            board: Board::Tasks(Partition::default()),
        }
    }

    pub fn backend(&self) -> &B                { &self.backend }
    pub fn backend_mut(&mut self) -> &mut B    { &mut self.backend }
    pub fn store(&self) -> &S                  { &self.store }
    /// The last fetched tasks, in server order (i.e. `tasks()[i]` has index `i`)
    pub fn tasks(&self) -> &[Task]             { &self.tasks }
    pub fn today(&self) -> &TodaySet           { &self.today }
    pub fn sort_method(&self) -> SortMethod    { self.sort }
    pub fn board(&self) -> &Board              { &self.board }

    /// Returns the cached task at `index`, or a validation error
    pub fn task_at(&self, index: TaskIndex) -> Result<&Task, ViewError> {
        self.tasks.get(index.get())
            .ok_or(ViewError::IndexOutOfRange{ index, len: self.tasks.len() })
    }

    /// Fetch the whole task list, replace the cached copy, and prune the today set.
    ///
    /// On failure, the cached tasks are kept but the board shows an error banner.
    pub async fn refresh(&mut self) -> Result<(), ViewError> {
        let tasks = match self.backend.get_tasks().await {
            Err(err) => {
                log::error!("Unable to fetch the tasks: {}", err);
                self.board = Board::Error(err.notice());
                return Err(err);
            },
            Ok(tasks) => tasks,
        };
        log::debug!("Refreshed {} tasks", tasks.len());
        self.tasks = tasks;

        self.today = self.load_today().await;
        let pruned = self.today.reconcile(&self.tasks);
        if pruned.is_empty() == false {
            log::info!("Removed {} stale entries from the today set", pruned.len());
        }
        if let Err(err) = self.save_today().await {
            log::warn!("Unable to persist the today set: {}", err);
        }

        self.render();
        Ok(())
    }

    /// Change the order of the board. This does not contact the server
    pub fn set_sort(&mut self, method: SortMethod) {
        self.sort = method;
        if let Board::Tasks(_) = self.board {
            self.render();
        }
    }

    /// Create a task from the content of `form`.
    ///
    /// A blank name is rejected before anything is sent. On success, the form is cleared and the list refreshed.
    pub async fn add(&mut self, form: &mut TaskDraft) -> Result<Task, ViewError> {
        if form.has_blank_name() {
            log::info!("Refusing to add a task without a name");
            return Err(ViewError::EmptyName);
        }
        let mut draft = form.clone();
        draft.name = draft.name.trim().to_string();

        let task = self.backend.add_task(&draft).await
            .map_err(|err| {
                log::error!("Unable to add task {:?}: {}", draft.name, err);
                err
            })?;
        form.clear();

        self.refresh().await?;
        Ok(task)
    }

    /// Overwrite the editable fields of the task at `index`.
    ///
    /// If the task is renamed while it is in the today set, it keeps its slot under its new name.
    pub async fn update(&mut self, index: TaskIndex, draft: &TaskDraft) -> Result<Task, ViewError> {
        let current = self.task_at(index)?.clone();
        if draft.has_blank_name() {
            log::info!("Refusing to rename task {} to a blank name", index);
            return Err(ViewError::EmptyName);
        }
        let mut updated = current.clone();
        updated.apply_draft(draft);

        let stored = self.backend.update_task(index, &updated).await
            .map_err(|err| {
                log::error!("Unable to update task {}: {}", index, err);
                err
            })?;

        if current.name() != stored.name() && self.today.rename(current.name(), stored.name()) {
            log::debug!("Today set: {:?} is now {:?}", current.name(), stored.name());
            if let Err(err) = self.save_today().await {
                log::warn!("Unable to persist the today set: {}", err);
            }
        }

        self.refresh().await?;
        Ok(stored)
    }

    /// Mark the task at `index` as completed.
    ///
    /// The cached task is flagged as completed before the server has confirmed it, and this flag is not
    /// rolled back if the request fails. On success, the task is moved to the "completed" list in place,
    /// or the whole list is refreshed if it cannot be found on the board.
    pub async fn complete(&mut self, index: TaskIndex) -> Result<(), ViewError> {
        let name = self.task_at(index)?.name().to_string();
        self.tasks[index.get()].set_completed(true);

        self.backend.complete_task(index).await
            .map_err(|err| {
                log::error!("Unable to complete task {}: {}", index, err);
                err
            })?;

        if self.today.remove(&name) {
            if let Err(err) = self.save_today().await {
                log::warn!("Unable to persist the today set: {}", err);
            }
        }

        if self.relocate_to_completed(index) == false {
            log::debug!("Task {} is not on the board, refreshing", index);
            self.refresh().await?;
        }
        Ok(())
    }

    /// Delete the task at `index`, once `confirm` agrees.
    ///
    /// Returns whether the task has been deleted. Nothing is sent when the user declines.
    pub async fn delete<C: Confirm>(&mut self, index: TaskIndex, mut confirm: C) -> Result<bool, ViewError> {
        let task = self.task_at(index)?.clone();
        if confirm.confirm(&task) == false {
            log::debug!("Deletion of task {} has been cancelled", index);
            return Ok(false);
        }

        self.backend.delete_task(index).await
            .map_err(|err| {
                log::error!("Unable to delete task {}: {}", index, err);
                err
            })?;

        if self.today.remove(task.name()) {
            if let Err(err) = self.save_today().await {
                log::warn!("Unable to persist the today set: {}", err);
            }
        }

        self.refresh().await?;
        Ok(true)
    }

    /// Handle a drag-and-drop between the "pending" and "today" lists.
    ///
    /// This only changes (and persists) the today set. Returns whether it has changed.
    /// A move whose `from` is not the current list of the task is ignored.
    /// If the today set cannot be persisted, it is left unchanged.
    pub async fn move_task(&mut self, index: TaskIndex, from: Bucket, to: Bucket) -> Result<bool, ViewError> {
        if from == to {
            return Ok(false);
        }
        let task = self.task_at(index)?;
        let actual = Bucket::of(task, &self.today);
        if actual != from {
            log::debug!("Ignoring a move of task {} from {}, as it is in {}", index, from, actual);
            return Ok(false);
        }
        let name = task.name().to_string();

        let mut today = self.today.clone();
        let changed = match (from, to) {
            (Bucket::Pending, Bucket::Today) => today.insert(&name),
            (Bucket::Today, Bucket::Pending) => today.remove(&name),
            _ => {
                log::debug!("Ignoring a move from {} to {}", from, to);
                false
            },
        };
        if changed == false {
            return Ok(false);
        }

        self.store.set_item(TODAY_TASKS_KEY, today.to_json()).await
            .map_err(|err| {
                log::error!("Unable to persist the today set: {}", err);
                err
            })?;
        self.today = today;
        if let Board::Tasks(_) = self.board {
            self.render();
        }
        Ok(true)
    }

    /// Perform the action described by `event`
    pub async fn dispatch<C: Confirm>(&mut self, event: ViewEvent, confirm: C) -> Result<(), ViewError> {
        log::trace!("Dispatching {:?}", event);
        match event {
            ViewEvent::Refresh => self.refresh().await,
            ViewEvent::SetSort(method) => {
                self.set_sort(method);
                Ok(())
            },
            ViewEvent::Add(mut draft) => self.add(&mut draft).await.map(|_| ()),
            ViewEvent::Update{ index, draft } => self.update(index, &draft).await.map(|_| ()),
            ViewEvent::Complete(index) => self.complete(index).await,
            ViewEvent::Delete(index) => self.delete(index, confirm).await.map(|_| ()),
            ViewEvent::Move{ index, from, to } => self.move_task(index, from, to).await.map(|_| ()),
        }
    }

    /// The calendar of a month, built from the cached tasks
    pub fn calendar(&self, year: i32, month: u32) -> Option<MonthGrid> {
        MonthGrid::new(year, month, &self.tasks)
    }

    /// The cached tasks due on `date`, most urgent first
    pub fn tasks_on(&self, date: NaiveDate) -> Vec<IndexedTask> {
        let indexed = self.indexed_tasks();
        calendar::tasks_on(date, &indexed)
    }


    fn indexed_tasks(&self) -> Vec<IndexedTask> {
        self.tasks.iter()
            .enumerate()
            .map(|(i, task)| IndexedTask{ index: TaskIndex::from(i), task: task.clone() })
            .collect()
    }

    /// Rebuild the board from the cached tasks
    fn render(&mut self) {
        let sorted = sort_by(self.sort, &self.indexed_tasks());
        self.board = Board::Tasks(partition(&sorted, &self.today));
    }

    /// Move a task that has just been completed to the "completed" list, without refreshing.
    /// Returns false if the task is not displayed on the board.
    fn relocate_to_completed(&mut self, index: TaskIndex) -> bool {
        let method = self.sort;
        let board = match &mut self.board {
            Board::Tasks(p) => p,
            Board::Error(_) => return false,
        };

        for source in &[Bucket::Today, Bucket::Pending] {
            let list = board.bucket_mut(*source);
            if let Some(position) = list.iter().position(|t| t.index == index) {
                let mut item = list.remove(position);
                item.task.set_completed(true);
                // Same place as a full render would give it: sort key, then server position
                let target = board.completed.iter()
                    .position(|t| method.compare(&t.task, &item.task).then(t.index.cmp(&item.index)) == Ordering::Greater)
                    .unwrap_or(board.completed.len());
                board.completed.insert(target, item);
                return true;
            }
        }
        false
    }

    async fn load_today(&self) -> TodaySet {
        match self.store.get_item(TODAY_TASKS_KEY).await {
            None => TodaySet::new(),
            Some(raw) => TodaySet::from_json(&raw),
        }
    }

    async fn save_today(&mut self) -> Result<(), ViewError> {
        let json = self.today.to_json();
        self.store.set_item(TODAY_TASKS_KEY, json).await
    }
}
