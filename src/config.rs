//! Application configuration
//!
//! Read from `config.toml` under the platform config directory
//! (e.g. `~/.config/study-tracker/config.toml`):
//!
//! ```toml
//! email = "me@example.com"
//!
//! [backend]
//! kind = "firebase"
//! apiKey = "..."
//! projectId = "my-project"
//! storageBucket = "my-project.appspot.com"
//! ```
//!
//! A missing file means the local backend under the platform data directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::remote::{FirebaseConfig, FirebaseStore, LocalStore, RemoteStore, StoreError};

const APP_DIR: &str = "study-tracker";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Could not determine the {0} directory")]
    DirNotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where module documents, flashcards and files live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Plain files on this machine
    Local {
        #[serde(default, rename = "dataDir", skip_serializing_if = "Option::is_none")]
        data_dir: Option<PathBuf>,
    },
    Firebase(FirebaseConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Local { data_dir: None }
    }
}

impl BackendConfig {
    pub fn build_store(&self) -> Result<Arc<dyn RemoteStore>> {
        match self {
            Self::Local { data_dir } => {
                let root = match data_dir {
                    Some(dir) => dir.clone(),
                    None => default_data_dir()?,
                };
                fs::create_dir_all(&root)?;
                log::info!("Using local store at {:?}", root);
                Ok(Arc::new(LocalStore::new(root)))
            }
            Self::Firebase(firebase) => {
                log::info!("Using Firebase project {}", firebase.project_id);
                Ok(Arc::new(FirebaseStore::new(firebase.clone())?))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    /// Sign-in email used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_default() -> Result<Self> {
        Self::load(&default_path()?)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// `<config dir>/study-tracker/config.toml`
pub fn default_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_DIR).join("config.toml"))
        .ok_or(ConfigError::DirNotFound("config"))
}

/// `<local data dir>/study-tracker`
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|p| p.join(APP_DIR))
        .ok_or(ConfigError::DirNotFound("data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.backend, BackendConfig::Local { data_dir: None });
    }

    #[test]
    fn test_parse_firebase_backend() {
        let config = AppConfig::parse(
            r#"
            email = "me@example.com"

            [backend]
            kind = "firebase"
            apiKey = "key"
            projectId = "proj"
            storageBucket = "proj.appspot.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.email.as_deref(), Some("me@example.com"));
        assert_eq!(
            config.backend,
            BackendConfig::Firebase(FirebaseConfig {
                api_key: "key".to_string(),
                project_id: "proj".to_string(),
                storage_bucket: "proj.appspot.com".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_local_backend_with_dir() {
        let config = AppConfig::parse(
            r#"
            [backend]
            kind = "local"
            dataDir = "/tmp/study"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.backend,
            BackendConfig::Local {
                data_dir: Some(PathBuf::from("/tmp/study"))
            }
        );
        assert!(config.email.is_none());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[backend]\nkind = \"ftp\"\n").unwrap();

        match AppConfig::load(&path) {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_store_checks_firebase_settings() {
        let backend = BackendConfig::Firebase(FirebaseConfig {
            api_key: String::new(),
            project_id: "proj".to_string(),
            storage_bucket: "bucket".to_string(),
        });
        assert!(matches!(
            backend.build_store(),
            Err(ConfigError::Store(StoreError::InvalidConfig(_)))
        ));

        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let local = BackendConfig::Local {
            data_dir: Some(data_dir.clone()),
        };
        assert!(local.build_store().is_ok());
        assert!(data_dir.is_dir());
    }
}
