use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_cliptui_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".cliptui"))
}

/// The data directory: the explicit override when given, `~/.cliptui` otherwise.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    match override_dir {
        Some(dir) => Ok(dir),
        None => get_cliptui_dir(),
    }
}

pub fn get_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.json")
}

pub fn get_history_path(data_dir: &Path) -> PathBuf {
    data_dir.join("clipboard_history.json")
}

pub fn get_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("cliptui.log")
}

pub fn ensure_directories_exist(data_dir: &Path) -> Result<()> {
    if !data_dir.exists() {
        fs::create_dir_all(data_dir)?;
    }

    Ok(())
}
