use std::io::Write;

use chrono::NaiveDate;

use crate::cli::CliCommand;
use crate::config::Config;
use crate::error::Result;
use crate::render::render_rows;
use crate::storage::Storage;
use crate::store::TaskStore;
use crate::view::ViewQuery;

/// Execute one CLI command against the store, writing user-facing output to `out`.
pub fn run<S: Storage>(
    command: &CliCommand,
    config: &Config,
    store: &mut TaskStore<S>,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        CliCommand::Add { text, due } => match store.add(text, *due)? {
            Some(id) => writeln!(out, "added task {id}")?,
            None => writeln!(out, "nothing to add: task text is blank")?,
        },
        CliCommand::List {
            search,
            status,
            no_sort,
        } => {
            let query = ViewQuery {
                search: search.clone().unwrap_or_default(),
                status: status.unwrap_or(config.default_status),
                sort_by_due: config.sort_by_due && !no_sort,
            };
            let rows = store.view(&query);
            write!(out, "{}", render_rows(&rows, today))?;
        }
        CliCommand::Toggle { id } => {
            let completed = store.toggle(*id)?;
            let state = if completed { "completed" } else { "incomplete" };
            writeln!(out, "task {id} marked {state}")?;
        }
        CliCommand::Delete { id } => {
            let task = store.delete(*id)?;
            writeln!(out, "deleted task {id}: {}", task.text)?;
        }
    }
    Ok(())
}
