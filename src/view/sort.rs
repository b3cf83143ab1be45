//! Orderings of the task list

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::task::Task;

/// How the task list is ordered. This is pure view state, the server knows nothing about it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortMethod {
    /// Most urgent first
    Priority,
    /// Earliest deadline first, tasks without a deadline last
    Deadline,
    /// Alphabetical
    Name,
}

impl Default for SortMethod {
    fn default() -> Self {
        SortMethod::Priority
    }
}

impl Display for SortMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMethod::Priority => write!(f, "priority"),
            SortMethod::Deadline => write!(f, "deadline"),
            SortMethod::Name => write!(f, "name"),
        }
    }
}

impl FromStr for SortMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "priority" => Ok(SortMethod::Priority),
            "deadline" => Ok(SortMethod::Deadline),
            "name" => Ok(SortMethod::Name),
            other => Err(format!("Unknown sort method {:?} (expected priority, deadline or name)", other)),
        }
    }
}

impl SortMethod {
    /// Compare two tasks according to this method
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortMethod::Priority => a.priority().cmp(&b.priority()),
            SortMethod::Deadline => match (a.deadline(), b.deadline()) {
                (Some(da), Some(db)) => da.cmp(&db),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortMethod::Name => compare_names(a.name(), b.name()),
        }
    }
}

/// Case-insensitive comparison, falling back to the exact text so that the order is total
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Returns a new ordering of `tasks`. Ties keep their input order.
pub fn sort_by<T>(method: SortMethod, tasks: &[T]) -> Vec<T>
where
    T: Borrow<Task> + Clone,
{
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| method.compare(a.borrow(), b.borrow()));
    sorted
}
