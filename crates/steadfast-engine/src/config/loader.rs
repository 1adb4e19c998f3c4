use super::schema::HarnessConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const LOCAL_CONFIG: &str = "./steadfast.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Which config file applies, if any:
    /// 1. `explicit` (e.g. `--config`), even if it does not exist
    /// 2. ./steadfast.yaml
    /// 3. ~/.steadfast/config.yaml
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            return Some(local);
        }

        dirs::home_dir()
            .map(|home| home.join(".steadfast").join("config.yaml"))
            .filter(|path| path.exists())
    }

    /// Load the file chosen by [`ConfigLoader::locate`], or defaults when there is none.
    ///
    /// An explicit path that cannot be read is an error, never a silent fallback.
    pub async fn load(explicit: Option<&Path>) -> Result<HarnessConfig, ConfigError> {
        match Self::locate(explicit) {
            Some(path) => Self::load_from(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(HarnessConfig::default())
            }
        }
    }

    pub async fn load_default() -> Result<HarnessConfig, ConfigError> {
        Self::load(None).await
    }

    /// Read one file. An empty file yields the defaults.
    pub async fn load_from(path: &Path) -> Result<HarnessConfig, ConfigError> {
        debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        if content.trim().is_empty() {
            return Ok(HarnessConfig::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
