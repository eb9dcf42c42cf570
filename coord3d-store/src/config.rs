use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Memory-map `coords.npy` and slice views out of the mapping.
    #[default]
    Mmap,
    /// Read the whole array into memory when a resolution is opened.
    Memory,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub backend: BackendKind,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            root: PathBuf::from("."),
            backend: BackendKind::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("default_page_size must be at least 1")]
    ZeroPageSize,
    #[error("max_page_size ({max}) is smaller than default_page_size ({default})")]
    MaxBelowDefault { max: usize, default: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl StoreConfig {
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        StoreConfig {
            root: root.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_page_size < 1 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.max_page_size < self.default_page_size {
            return Err(ConfigError::MaxBelowDefault {
                max: self.max_page_size,
                default: self.default_page_size,
            });
        }
        Ok(())
    }
}

impl TryFrom<&Path> for StoreConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_try_from_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coord3d.toml");
        std::fs::write(
            &path,
            "root = \"/data/coords\"\nbackend = \"memory\"\ndefault_page_size = 5\n",
        )
        .unwrap();

        let config = StoreConfig::try_from(path.as_path()).unwrap();
        assert_eq!(config.root, PathBuf::from("/data/coords"));
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.max_page_size, MAX_PAGE_SIZE);
    }

    #[rstest]
    fn test_empty_toml_gives_defaults() {
        let config: StoreConfig = toml::from_str("").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.backend, BackendKind::Mmap);
    }

    #[rstest]
    #[case("default_page_size = 0\n")]
    #[case("default_page_size = 20\nmax_page_size = 10\n")]
    #[case("backend = \"hdf5\"\n")]
    fn test_invalid_configs(#[case] contents: &str) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, contents).unwrap();
        assert_eq!(StoreConfig::try_from(path.as_path()).is_err(), true);
    }
}
