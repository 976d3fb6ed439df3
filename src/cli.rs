use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::task::{TaskId, parse_due_date};
use crate::view::StatusFilter;

/// tasklist — a small to-do list kept in a local data directory
#[derive(Parser, Debug, Clone)]
#[command(name = "tasklist", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Path to config file (default: ./tasklist.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Directory holding the task data (default: .tasklist)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Storage slot name (default: todos)
    #[arg(long, global = true)]
    pub slot: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Add a new task
    Add {
        /// Task text
        text: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_due)]
        due: Option<NaiveDate>,
    },

    /// List tasks, sorted by due date
    List {
        /// Only show tasks whose text contains this (case-insensitive)
        #[arg(long, short)]
        search: Option<String>,

        /// Filter by completion status
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,

        /// Keep creation order instead of sorting by due date
        #[arg(long)]
        no_sort: bool,
    },

    /// Flip a task between completed and incomplete
    Toggle {
        /// Task id as shown by `list`
        id: TaskId,
    },

    /// Delete a task
    Delete {
        /// Task id as shown by `list`
        id: TaskId,
    },
}

fn parse_due(s: &str) -> Result<NaiveDate, String> {
    parse_due_date(s).map_err(|e| e.to_string())
}
