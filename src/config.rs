//! Optional user configuration (`config.toml`).

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{CliError, Result};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// What to render after the script has run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintMode {
    Values,
    Texts,
}

impl FromStr for PrintMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "values" => Ok(PrintMode::Values),
            "texts" => Ok(PrintMode::Texts),
            other => Err(format!("expected 'values' or 'texts', got '{}'", other)),
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Render the sheet once the script finishes.
    pub print: Option<PrintMode>,
    /// Report failing lines and continue instead of stopping.
    #[serde(default)]
    pub keep_going: bool,
}

/// Load configuration from `explicit`, or from the user config directory
/// when no path is given. A missing default file yields the defaults; a
/// missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match user_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };
    read_config(&path)
}

fn read_config(path: &Path) -> Result<Config> {
    let config_err = |message: String| CliError::Config {
        path: path.display().to_string(),
        message,
    };

    let meta = std::fs::metadata(path).map_err(|e| config_err(e.to_string()))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(config_err(format!(
            "file too large ({} bytes, max {})",
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        )));
    }
    let content = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
    parse_config(&content).map_err(config_err)
}

fn parse_config(content: &str) -> std::result::Result<Config, String> {
    toml::from_str::<Config>(content).map_err(|e| e.to_string())
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellweave")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
