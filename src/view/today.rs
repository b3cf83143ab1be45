//! The "today" set: names of the tasks the user has pulled into their focus list.
//!
//! It only exists on the client side, and is persisted under [`TODAY_TASKS_KEY`](crate::config::TODAY_TASKS_KEY).
//! Membership is keyed by task name, so two tasks sharing a name share one slot.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// An ordered, duplicate-free set of task names
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodaySet {
    names: Vec<String>,
}

impl TodaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the persisted form (a JSON array of names).
    /// Anything that cannot be parsed gives an empty set.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(names) => names.into_iter().collect(),
            Err(err) => {
                log::warn!("Unable to parse the stored today set ({}). Resetting it", err);
                Self::default()
            },
        }
    }

    pub fn to_json(&self) -> String {
        // A Vec<String> always serializes
        serde_json::to_string(&self.names).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_str())
    }

    /// Add a name. Returns whether it was not present already
    pub fn insert<S: ToString>(&mut self, name: S) -> bool {
        let name = name.to_string();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Remove a name. Returns whether it was present
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        before != self.names.len()
    }

    /// Replace `old` by `new`, keeping its slot. Returns whether `old` was present.
    ///
    /// If `new` was already a member, the two entries merge into the slot of `old`.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let position = match self.names.iter().position(|n| n == old) {
            None => return false,
            Some(p) => p,
        };
        if old == new {
            return true;
        }
        self.names[position] = new.to_string();
        let mut i = 0;
        self.names.retain(|n| {
            let keep = n != new || i == position;
            i += 1;
            keep
        });
        true
    }

    /// Drop every name that is not the name of one of `tasks`. Returns the pruned names
    pub fn reconcile(&mut self, tasks: &[Task]) -> Vec<String> {
        let (kept, pruned): (Vec<String>, Vec<String>) = self.names
            .drain(..)
            .partition(|name| tasks.iter().any(|t| t.name() == name));
        self.names = kept;
        for name in &pruned {
            log::debug!("Pruning {:?} from the today set, it is no longer on the server", name);
        }
        pruned
    }
}

impl std::iter::FromIterator<String> for TodaySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::default();
        for name in iter {
            set.insert(name);
        }
        set
    }
}
