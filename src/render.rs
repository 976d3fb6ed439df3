use chrono::NaiveDate;

use crate::task::{DUE_DATE_FORMAT, Task};

pub const EMPTY_MESSAGE: &str = "No tasks found";

/// Render projection rows, one task per line.
///
/// ```text
/// [x]   3  Call mom  (due 2024-01-05)
/// [ ]   1  Buy milk  (due 2024-01-10) overdue
/// [ ]   2  Pay rent  (no date)
/// ```
pub fn render_rows(rows: &[&Task], today: NaiveDate) -> String {
    if rows.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let mut out = String::new();
    for task in rows {
        let mark = if task.completed { 'x' } else { ' ' };
        let due = match task.due_date {
            Some(date) => format!("due {}", date.format(DUE_DATE_FORMAT)),
            None => "no date".to_string(),
        };
        let overdue = if task.is_overdue(today) { " overdue" } else { "" };
        out.push_str(&format!(
            "[{mark}] {:>3}  {}  ({due}){overdue}\n",
            task.id, task.text
        ));
    }
    out
}
