use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimerConfig {
    /// Directory relative paths below are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub restaurants: RestaurantsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Flat directory behind the filesystem tools
    #[serde(default = "default_files_dir")]
    pub tool_root: String,

    /// Directory tree behind the `file://` resources
    #[serde(default = "default_files_dir")]
    pub resource_root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantsConfig {
    #[serde(default = "default_restaurants_file")]
    pub data_file: String,
}

fn default_files_dir() -> String {
    "data/files".to_string()
}

fn default_restaurants_file() -> String {
    "data/restaurants.json".to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            tool_root: default_files_dir(),
            resource_root: default_files_dir(),
        }
    }
}

impl Default for RestaurantsConfig {
    fn default() -> Self {
        Self {
            data_file: default_restaurants_file(),
        }
    }
}

impl PrimerConfig {
    /// Defaults rooted at `base_dir`
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            files: FilesConfig::default(),
            restaurants: RestaurantsConfig::default(),
        }
    }

    pub fn load(config_path: &Path, base_dir: PathBuf) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")?
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Self::new(base_dir.clone())
        };

        config.base_dir = base_dir;

        Ok(config)
    }

    /// Root of the filesystem tools
    pub fn tool_root(&self) -> PathBuf {
        self.base_dir.join(&self.files.tool_root)
    }

    /// Root of the `file://` resources
    pub fn resource_root(&self) -> PathBuf {
        self.base_dir.join(&self.files.resource_root)
    }

    /// Restaurant listings file
    pub fn restaurants_path(&self) -> PathBuf {
        self.base_dir.join(&self.restaurants.data_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = PrimerConfig::load(&dir.path().join("primer.toml"), dir.path().into()).unwrap();

        assert_eq!(config.tool_root(), dir.path().join("data/files"));
        assert_eq!(config.resource_root(), dir.path().join("data/files"));
        assert_eq!(config.restaurants_path(), dir.path().join("data/restaurants.json"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("primer.toml");
        std::fs::write(&path, "[files]\ntool_root = \"sandbox\"\n").unwrap();

        let config = PrimerConfig::load(&path, dir.path().into()).unwrap();
        assert_eq!(config.tool_root(), dir.path().join("sandbox"));
        assert_eq!(config.resource_root(), dir.path().join("data/files"));
        assert_eq!(config.restaurants.data_file, "data/restaurants.json");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("primer.toml");
        std::fs::write(&path, "[files\n").unwrap();
        assert!(PrimerConfig::load(&path, dir.path().into()).is_err());
    }
}
