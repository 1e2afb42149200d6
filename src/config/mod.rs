use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::store::Filter;
use crate::tui::theme::ThemeConfig;

/// Environment variable that relocates the data directory.
pub const HOME_ENV: &str = "TICKLIST_HOME";

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Filter the dashboard opens with. Default: all
    #[serde(default)]
    pub default_filter: Filter,

    /// Log level used when `RUST_LOG` is unset (e.g. "info", "ticklist=debug").
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub theme: ThemeSettings,
}

/// Per-mode colour overrides: `[theme.dark]` and `[theme.light]`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeSettings {
    #[serde(default)]
    pub dark: ThemeConfig,
    #[serde(default)]
    pub light: ThemeConfig,
}

/// Resolve the data directory: explicit flag, then `$TICKLIST_HOME`, then `~/.ticklist/`.
pub fn resolve_base_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".ticklist"))
}

/// Returns the path to the `SQLite` database
pub fn db_path(base: &Path) -> PathBuf {
    base.join("ticklist.db")
}

pub fn log_path(base: &Path) -> PathBuf {
    base.join("ticklist.log")
}

pub fn config_path(base: &Path) -> PathBuf {
    base.join("config.toml")
}

pub fn ensure_dirs(base: &Path) -> Result<()> {
    fs::create_dir_all(base).with_context(|| format!("failed to create {}", base.display()))
}

/// Load `config.toml` from the data directory (or return defaults if it doesn't exist)
pub fn load(base: &Path) -> Result<Config> {
    let path = config_path(base);
    if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}
