use std::path::PathBuf;

use crate::task::TaskId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("unexpected slot layout: {0}")]
    SlotLayout(String),

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("no task ids left in this list")]
    IdsExhausted,
}

pub type Result<T> = std::result::Result<T, Error>;
