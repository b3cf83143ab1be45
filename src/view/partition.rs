//! The three-way split of the task list into "today", "pending" and "completed"

use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::task::Task;
use crate::view::today::TodaySet;

/// One of the three lists a task can be shown in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bucket {
    Today,
    Pending,
    Completed,
}

impl Bucket {
    /// Which bucket a task belongs to.
    ///
    /// A completed task is never shown as "today", even if its name is still in the today set.
    pub fn of(task: &Task, today: &TodaySet) -> Self {
        if task.completed() {
            Bucket::Completed
        } else if today.contains(task.name()) {
            Bucket::Today
        } else {
            Bucket::Pending
        }
    }
}

impl Display for Bucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Bucket::Today => write!(f, "today"),
            Bucket::Pending => write!(f, "pending"),
            Bucket::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for Bucket {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(Bucket::Today),
            "pending" => Ok(Bucket::Pending),
            "completed" => Ok(Bucket::Completed),
            other => Err(format!("Unknown bucket {:?}", other)),
        }
    }
}


/// Disjoint lists that together hold every task, each keeping the order of the input
#[derive(Clone, Debug, PartialEq)]
pub struct Partition<T> {
    pub today: Vec<T>,
    pub pending: Vec<T>,
    pub completed: Vec<T>,
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self { today: Vec::new(), pending: Vec::new(), completed: Vec::new() }
    }
}

impl<T> Partition<T> {
    pub fn bucket(&self, bucket: Bucket) -> &[T] {
        match bucket {
            Bucket::Today => &self.today,
            Bucket::Pending => &self.pending,
            Bucket::Completed => &self.completed,
        }
    }

    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<T> {
        match bucket {
            Bucket::Today => &mut self.today,
            Bucket::Pending => &mut self.pending,
            Bucket::Completed => &mut self.completed,
        }
    }

    /// How many tasks the three buckets hold together
    pub fn len(&self) -> usize {
        self.today.len() + self.pending.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split `tasks` into the three buckets
pub fn partition<T>(tasks: &[T], today: &TodaySet) -> Partition<T>
where
    T: Borrow<Task> + Clone,
{
    let mut result = Partition::default();
    for task in tasks {
        let bucket = Bucket::of(task.borrow(), today);
        result.bucket_mut(bucket).push(task.clone());
    }
    result
}
