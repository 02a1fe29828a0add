use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::tui::theme::ThemeConfig;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Program invoked for every tmux call. Default: "tmux"
    pub tmux_binary: String,

    /// Milliseconds between background refreshes. Default: 1000
    pub tick_interval_ms: u64,

    /// Start with windows and panes of every session listed.
    pub show_all: bool,

    /// Log file location. Default: `<state dir>/tmux-tui/tmux-tui.log`
    pub log_file: Option<PathBuf>,

    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tmux_binary: "tmux".to_string(),
            tick_interval_ms: 1000,
            show_all: false,
            log_file: None,
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(50))
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => default_log_path(),
        }
    }
}

/// Returns the base config directory: ~/.config/tmux-tui/
pub fn base_dir() -> Result<PathBuf> {
    let config = dirs::config_dir().context("could not determine config directory")?;
    Ok(config.join("tmux-tui"))
}

/// Returns the path to config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("config.toml"))
}

/// Log file under the platform state directory, falling back to the cache
/// directory where there is none (macOS, Windows).
pub fn default_log_path() -> Result<PathBuf> {
    let dir = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .context("could not determine state directory")?;
    Ok(dir.join("tmux-tui").join("tmux-tui.log"))
}

/// Load config from ~/.config/tmux-tui/config.toml (or return defaults if it
/// doesn't exist)
pub fn load() -> Result<Config> {
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(config)
}
