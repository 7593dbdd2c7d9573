use crate::backend::{Backend, LocalBackend, RemoteBackend};
use crate::model::seed::default_guests;
use crate::storage::{DEFAULT_SLOT_KEY, FileSlotStore};
use crate::table::{RestConfig, RestTable, SqliteTable};
use crate::view::PAGE_SIZE;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory under the project root holding config and local data.
pub const PROJECT_DIR: &str = ".vows";

/// Environment variable that overrides `[remote] api_key`.
pub const API_KEY_ENV: &str = "VOWS_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sqlite: SqliteConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// JSON snapshot in `.vows/<key>.json`.
    #[default]
    Local,
    /// Guest table in a SQLite file.
    Sqlite,
    /// Guest table behind a PostgREST-style HTTP API.
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendChoice,
    #[serde(default = "default_key")]
    pub key: String,
    /// Start a fresh local list with the sample guests.
    #[serde(default = "default_true")]
    pub seed: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendChoice::default(),
            key: default_key(),
            seed: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteConfig {
    #[serde(default = "default_sqlite_path")]
    pub path: PathBuf,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: default_sqlite_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            table: default_table(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[must_use]
pub fn project_dir(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR)
}

#[must_use]
pub fn config_path(project_root: &Path) -> PathBuf {
    project_dir(project_root).join("config.toml")
}

/// Load `.vows/config.toml`, or the defaults when the file is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = config_path(project_root);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write `config` to `.vows/config.toml`, creating `.vows/` if needed, and
/// return the path written.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be written.
pub fn write_project_config(project_root: &Path, config: &ProjectConfig) -> Result<PathBuf> {
    let dir = project_dir(project_root);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = config_path(project_root);
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Load `<config_dir>/vows/config.toml`, or the defaults when there is no
/// such file.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("vows/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

impl RemoteConfig {
    /// Connection settings, with `api_key_env` taking precedence over the
    /// configured key.
    ///
    /// # Errors
    ///
    /// Returns an error if no `url` is configured.
    pub fn rest_config(&self, api_key_env: Option<String>) -> Result<RestConfig> {
        let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) else {
            bail!("[remote] url is not set in {PROJECT_DIR}/config.toml");
        };
        Ok(RestConfig {
            url: url.to_string(),
            table: self.table.clone(),
            api_key: api_key_env
                .filter(|k| !k.is_empty())
                .or_else(|| self.api_key.clone()),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

/// Build the backend selected by `config` for the project at `project_root`.
///
/// # Errors
///
/// Returns an error if the SQLite database cannot be opened or the remote
/// backend has no `url`.
pub fn open_backend(project_root: &Path, config: &ProjectConfig) -> Result<Box<dyn Backend>> {
    match config.storage.backend {
        BackendChoice::Local => {
            let slots = FileSlotStore::new(project_dir(project_root));
            let seed = if config.storage.seed {
                default_guests()
            } else {
                Vec::new()
            };
            Ok(Box::new(
                LocalBackend::new(slots)
                    .with_key(config.storage.key.clone())
                    .with_seed(seed),
            ))
        }
        BackendChoice::Sqlite => {
            let path = project_root.join(&config.sqlite.path);
            let table = SqliteTable::open(&path)?;
            Ok(Box::new(RemoteBackend::new(table)))
        }
        BackendChoice::Remote => {
            let rest = config
                .remote
                .rest_config(std::env::var(API_KEY_ENV).ok())?;
            Ok(Box::new(RemoteBackend::new(RestTable::new(&rest))))
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_key() -> String {
    DEFAULT_SLOT_KEY.to_string()
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from(PROJECT_DIR).join("guests.db")
}

fn default_table() -> String {
    "guests".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_page_size() -> usize {
    PAGE_SIZE
}
