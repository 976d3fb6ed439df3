use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Error, Result};
use crate::task::{Task, TaskId, TaskList, parse_due_date};

/// A task record as found in storage. Everything but `text` is optional so
/// that data written by older clients (no ids, `dueDate: ""`) still loads.
#[derive(Debug)]
struct StoredTask {
    id: Option<u64>,
    text: String,
    completed: bool,
    due_date: Option<String>,
}

impl StoredTask {
    /// Non-object records yield `None`. Fields of an unexpected type fall
    /// back to their defaults.
    fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        Some(Self {
            id: field(record, "id", Value::as_u64),
            text: field(record, "text", |v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            completed: field(record, "completed", Value::as_bool).unwrap_or(false),
            due_date: field(record, "dueDate", |v| v.as_str().map(str::to_string)),
        })
    }
}

fn field<T>(
    record: &Map<String, Value>,
    name: &str,
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = record.get(name).filter(|v| !v.is_null())?;
    let parsed = read(value);
    if parsed.is_none() {
        warn!("ignoring stored {name} of unexpected type: {value}");
    }
    parsed
}

/// Serialize a list to the slot format. Output is deterministic.
pub fn encode(list: &TaskList) -> Result<String> {
    Ok(serde_json::to_string_pretty(list)?)
}

/// Parse slot content, accepting both the current document form and a bare
/// array of records. Malformed fields and records are repaired or dropped;
/// only unparsable JSON or an unrecognized top-level shape is an error.
pub fn decode(content: &str) -> Result<TaskList> {
    let (records, next_id) = match serde_json::from_str::<Value>(content)? {
        Value::Array(records) => (records, None),
        Value::Object(mut doc) => {
            let next_id = doc.get("nextId").and_then(Value::as_u64);
            let records = match doc.remove("tasks") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(records)) => records,
                Some(_) => {
                    return Err(Error::SlotLayout("`tasks` is not an array".to_string()));
                }
            };
            (records, next_id)
        }
        _ => {
            return Err(Error::SlotLayout("expected an array or an object".to_string()));
        }
    };

    let records = records
        .iter()
        .filter_map(|value| {
            let record = StoredTask::from_value(value);
            if record.is_none() {
                warn!("dropping stored task that is not an object: {value}");
            }
            record
        })
        .collect();
    Ok(normalize(records, next_id))
}

/// Ids need a representable successor, so `u64::MAX` is never handed out.
fn normalize(records: Vec<StoredTask>, next_id: Option<u64>) -> TaskList {
    let max_id = records
        .iter()
        .filter_map(|r| r.id)
        .filter(|&id| id < u64::MAX)
        .max()
        .unwrap_or(0);
    let mut fresh = max_id + 1;
    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(records.len());

    for record in records {
        if record.text.trim().is_empty() {
            warn!("dropping stored task with blank text");
            continue;
        }

        let id = match record.id {
            Some(id) if id < u64::MAX && seen.insert(id) => id,
            _ => {
                if fresh == u64::MAX {
                    warn!("no task ids left, dropping stored task");
                    continue;
                }
                let id = fresh;
                fresh += 1;
                seen.insert(id);
                id
            }
        };

        let due_date = match record.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match parse_due_date(raw) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!(task = id, "{e}, treating as unset");
                    None
                }
            },
        };

        tasks.push(Task {
            id: TaskId(id),
            text: record.text,
            completed: record.completed,
            due_date,
        });
    }

    TaskList::from_parts(tasks, TaskId(next_id.unwrap_or(1).max(fresh)))
}
