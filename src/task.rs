//! To-do tasks, as cached from the task server

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::NaiveDate;

/// How urgent a task is.
///
/// Variants are declared from the most to the least urgent, so that the derived `Ord` sorts `High` first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// All priorities, most urgent first
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Parse a priority label the way the server stores it.
    /// Unknown labels are `Low`, like missing ones.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" | "高" => Priority::High,
            "medium" | "中" => Priority::Medium,
            "low" | "低" => Priority::Low,
            other => {
                if other.is_empty() == false {
                    log::debug!("Unknown priority {:?}, using Low", other);
                }
                Priority::Low
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Low
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl Serialize for Priority {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Priority, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label: Option<String> = Option::deserialize(deserializer)?;
        Ok(label.map(|l| Priority::from_label(&l)).unwrap_or_default())
    }
}


/// The position of a task in the last fetched list.
///
/// This is the only handle the server offers. It is only meaningful until the list changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskIndex(usize);

impl TaskIndex {
    pub fn get(&self) -> usize { self.0 }
}
impl From<usize> for TaskIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}
impl Display for TaskIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl FromStr for TaskIndex {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}


/// A to-do task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// The display name of the task. It also keys the "today" set.
    name: String,
    #[serde(default)]
    priority: Priority,
    /// The server sends `""` when there is no deadline
    #[serde(default, with = "empty_as_none_date")]
    deadline: Option<NaiveDate>,
    #[serde(default, with = "empty_as_none_text")]
    details: Option<String>,
    #[serde(default)]
    completed: bool,
}

impl Task {
    /// Create a new, uncompleted task
    pub fn new<S: ToString>(name: S, priority: Priority, deadline: Option<NaiveDate>, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            priority,
            deadline,
            details: details.filter(|d| d.is_empty() == false),
            completed: false,
        }
    }

    /// Create a task from the content of an input form
    pub fn from_draft(draft: &TaskDraft) -> Self {
        Self::new(draft.name.trim(), draft.priority, draft.deadline, draft.details.clone())
    }

    pub fn name(&self) -> &str                  { &self.name       }
    pub fn priority(&self) -> Priority          { self.priority    }
    pub fn deadline(&self) -> Option<NaiveDate> { self.deadline    }
    pub fn details(&self) -> Option<&str>       { self.details.as_deref() }
    pub fn completed(&self) -> bool             { self.completed   }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Overwrite every editable field from a form. The completion status is kept.
    pub fn apply_draft(&mut self, draft: &TaskDraft) {
        self.name = draft.name.trim().to_string();
        self.priority = draft.priority;
        self.deadline = draft.deadline;
        self.details = draft.details.clone().filter(|d| d.is_empty() == false);
    }

    /// Returns the editable fields of this task, as a form would show them
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            name: self.name.clone(),
            priority: self.priority,
            deadline: self.deadline,
            details: self.details.clone(),
        }
    }

    /// Whether the deadline of this task is the given day
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.deadline == Some(date)
    }
}


/// The content of the "new task" (or "edit task") form.
///
/// This is also the body of an `add_task` request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TaskDraft {
    pub name: String,
    pub priority: Priority,
    #[serde(with = "empty_as_none_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(with = "empty_as_none_text")]
    pub details: Option<String>,
}

impl TaskDraft {
    pub fn new<S: ToString>(name: S, priority: Priority) -> Self {
        Self {
            name: name.to_string(),
            priority,
            ..Self::default()
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_details<S: ToString>(mut self, details: S) -> Self {
        self.details = Some(details.to_string());
        self
    }

    /// Whether the name is missing (or only made of whitespace)
    pub fn has_blank_name(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// Reset the form to its initial state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}


/// The server stores a missing deadline as an empty string
mod empty_as_none_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let raw = match raw {
            None => return Ok(None),
            Some(r) => r,
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(d) => Ok(Some(d)),
            Err(err) => {
                log::warn!("Ignoring invalid deadline {:?}: {}", raw, err);
                Ok(None)
            },
        }
    }
}

/// The server stores missing details as an empty string
mod empty_as_none_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(text: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(text.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.filter(|t| t.is_empty() == false))
    }
}
