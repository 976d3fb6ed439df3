use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date format used for due dates on the command line and in storage.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable task identifier, assigned at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(TaskId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// Dated, not completed, and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// Parse a `YYYY-MM-DD` due date.
pub fn parse_due_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DUE_DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(s.to_string()))
}

/// The base list: tasks in creation order plus the id counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    next_id: TaskId,
    tasks: Vec<Task>,
}

impl Default for TaskList {
    fn default() -> Self {
        Self {
            next_id: TaskId(1),
            tasks: Vec::new(),
        }
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from already-validated tasks. `next_id` is raised past
    /// the largest id present if needed.
    pub(crate) fn from_parts(tasks: Vec<Task>, next_id: TaskId) -> Self {
        let floor = tasks
            .iter()
            .map(|t| t.id.0.saturating_add(1))
            .max()
            .unwrap_or(1);
        Self {
            next_id: TaskId(next_id.0.max(floor)),
            tasks,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn next_id(&self) -> TaskId {
        self.next_id
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Position of a task in the base list.
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Append a new incomplete task. Blank or whitespace-only text is ignored
    /// and yields `None`, as does running out of ids.
    pub fn add(&mut self, text: impl Into<String>, due_date: Option<NaiveDate>) -> Option<TaskId> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        let id = self.next_id;
        self.next_id = TaskId(id.0.checked_add(1)?);
        self.tasks.push(Task {
            id,
            text,
            completed: false,
            due_date,
        });
        Some(id)
    }

    /// Flip `completed` on the task with `id`. Returns the new state, or
    /// `None` if no such task exists.
    pub fn toggle(&mut self, id: TaskId) -> Option<bool> {
        let pos = self.position(id)?;
        self.toggle_at(pos)
    }

    /// Remove the task with `id`, returning it.
    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        let pos = self.position(id)?;
        self.delete_at(pos)
    }

    /// Positional toggle over the base list. Out of range is a no-op.
    pub fn toggle_at(&mut self, position: usize) -> Option<bool> {
        let task = self.tasks.get_mut(position)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Positional delete over the base list. Out of range is a no-op.
    pub fn delete_at(&mut self, position: usize) -> Option<Task> {
        if position >= self.tasks.len() {
            return None;
        }
        Some(self.tasks.remove(position))
    }
}
