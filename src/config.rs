use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::remote::{DEFAULT_EXTENSION, DEFAULT_FOLDER};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotiviewConfig {
    pub folder: Option<String>,
    pub extension: Option<String>,
    pub download_dir: Option<String>,
}

impl NotiviewConfig {
    /// Remote folder to look for databases in
    pub fn folder_name(&self) -> &str {
        self.folder.as_deref().unwrap_or(DEFAULT_FOLDER)
    }

    /// File-name filter for remote listings
    pub fn extension_filter(&self) -> &str {
        self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("notiview.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<NotiviewConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: NotiviewConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &NotiviewConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
