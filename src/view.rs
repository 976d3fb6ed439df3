use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Incomplete => !task.completed,
        }
    }
}

/// Inputs to the display projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub status: StatusFilter,
    pub sort_by_due: bool,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            sort_by_due: true,
        }
    }
}

impl ViewQuery {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
            ..Default::default()
        }
    }

    pub fn unsorted(mut self) -> Self {
        self.sort_by_due = false;
        self
    }
}

/// Dated before undated; dates ascending.
fn compare_due(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Derive the read-only display projection over the base list: optional
/// stable due-date sort, then case-insensitive text search, then status.
pub fn view<'a>(tasks: &'a [Task], query: &ViewQuery) -> Vec<&'a Task> {
    let mut rows: Vec<&Task> = tasks.iter().collect();
    if query.sort_by_due {
        rows.sort_by(|a, b| compare_due(a.due_date, b.due_date));
    }

    let needle = query.search.to_lowercase();
    rows.retain(|task| needle.is_empty() || task.text.to_lowercase().contains(&needle));
    rows.retain(|task| query.status.matches(task));
    rows
}
