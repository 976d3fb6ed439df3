use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::store::DEFAULT_SLOT;
use crate::view::StatusFilter;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tasklist.toml";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub data_dir: Option<String>,
    pub slot: Option<String>,
    pub default_status: Option<StatusFilter>,
    pub sort_by_due: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub slot: String,
    pub default_status: StatusFilter,
    pub sort_by_due: bool,
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self> {
        Self::load_from(cli, Path::new("."))
    }

    /// Like [`Config::load`], resolving the default config file against `cwd`.
    pub fn load_from(cli: &Cli, cwd: &Path) -> Result<Self> {
        let file_config = match &cli.config {
            Some(path) => {
                let config_path = Path::new(path);
                if !config_path.exists() {
                    return Err(Error::ConfigNotFound(config_path.to_path_buf()));
                }
                parse_config(&std::fs::read_to_string(config_path)?)?
            }
            None => {
                let default_path = cwd.join(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    parse_config(&std::fs::read_to_string(default_path)?)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let config = merge(file_config, cli);
        validate_slot(&config.slot)?;
        validate_data_dir(&config.data_dir.to_string_lossy())?;
        Ok(config)
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ConfigFile) -> Result<()> {
    if let Some(ref slot) = config.slot {
        validate_slot(slot)?;
    }
    if let Some(ref dir) = config.data_dir {
        validate_data_dir(dir)?;
    }
    Ok(())
}

fn validate_data_dir(dir: &str) -> Result<()> {
    if dir.trim().is_empty() {
        return Err(Error::ConfigValidation(
            "data_dir must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_slot(slot: &str) -> Result<()> {
    if slot.is_empty() {
        return Err(Error::ConfigValidation("slot must not be empty".to_string()));
    }
    if !slot
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::ConfigValidation(format!(
            "invalid slot: {slot} (expected letters, digits, '_' or '-')"
        )));
    }
    Ok(())
}

pub fn merge(file: ConfigFile, cli: &Cli) -> Config {
    Config {
        data_dir: PathBuf::from(
            cli.data_dir
                .clone()
                .or(file.data_dir)
                .unwrap_or_else(|| ".tasklist".to_string()),
        ),
        slot: cli
            .slot
            .clone()
            .or(file.slot)
            .unwrap_or_else(|| DEFAULT_SLOT.to_string()),
        default_status: file.default_status.unwrap_or_default(),
        sort_by_due: file.sort_by_due.unwrap_or(true),
    }
}
