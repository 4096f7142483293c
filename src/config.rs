use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::storage::StoreContext;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerDbConfig {
    /// Directory holding the `data` database file
    pub data_dir: Option<String>,
}

impl ServerDbConfig {
    /// Resolve the storage directory: explicit override, then config, then default
    pub fn store_context(&self, data_dir: Option<&Path>) -> StoreContext {
        let dir = data_dir
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_data_dir);
        StoreContext::directory(dir)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("serverdb.toml")
}

pub fn default_data_dir() -> PathBuf {
    PathBuf::from(".serverdb")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<ServerDbConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ServerDbConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &ServerDbConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
