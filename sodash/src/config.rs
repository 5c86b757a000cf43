//! Dashboard configuration: named backend profiles plus polling and table tuning.
//! Stored under XDG config dir: $XDG_CONFIG_HOME/sodash/config.json (fallback ~/.config/sodash/config.json)

use std::{collections::BTreeMap, fs, path::Path, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProfileEntry {
    pub url: String,
}

/// Poll intervals in milliseconds, per card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub cpu_ms: u64,
    pub memory_ms: u64,
    pub processes_ms: u64,
    pub status_ms: u64,
    pub totals_ms: u64,
    pub filesystem_ms: u64,
    pub directory_ms: u64,
    pub process_io_ms: u64,
    /// Defaults to each card's own interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    pub history_points: usize,
    pub summary_points: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            cpu_ms: 5000,
            memory_ms: 5000,
            processes_ms: 5000,
            status_ms: 7000,
            totals_ms: 5000,
            filesystem_ms: 10_000,
            directory_ms: 10_000,
            process_io_ms: 5000,
            request_timeout_ms: None,
            history_points: 60,
            summary_points: 30,
        }
    }
}

impl PollingConfig {
    pub fn every(ms: u64) -> Duration {
        Duration::from_millis(ms.max(100))
    }

    pub fn timeout_for(&self, interval: Duration) -> Duration {
        self.request_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(interval)
    }

    pub fn override_all(&mut self, ms: u64) {
        self.cpu_ms = ms;
        self.memory_ms = ms;
        self.processes_ms = ms;
        self.status_ms = ms;
        self.totals_ms = ms;
        self.filesystem_ms = ms;
        self.directory_ms = ms;
        self.process_io_ms = ms;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub page_size: usize,
    pub page_increment: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: crate::table::PAGE_SIZE,
            page_increment: crate::table::PAGE_INCREMENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub table: TableConfig,
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("sodash")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sodash")
    }
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// A missing file is an empty config; an unreadable or malformed one is an error.
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

pub fn save_config(path: &Path, cfg: &ConfigFile) -> Result<(), ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let data = serde_json::to_vec_pretty(cfg).map_err(|source| ConfigError::Serialize {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, data).map_err(io_err)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSource {
    Cli,
    Profile(String),
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub url: String,
    pub source: UrlSource,
    /// The profile map was modified and should be written back.
    pub dirty: bool,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub save: bool,
}

impl ProfileRequest {
    /// CLI url wins, then the named profile, then the built-in default.
    /// A new profile named alongside a url is created; an existing one is
    /// only overwritten with `save`.
    pub fn resolve(&self, cfg: &mut ConfigFile) -> Result<Resolution, ConfigError> {
        let res = match (&self.profile_name, &self.url) {
            (Some(name), Some(url)) => {
                let entry = ProfileEntry { url: url.clone() };
                let dirty = match cfg.profiles.get(name) {
                    None => true,
                    Some(existing) => existing != &entry && self.save,
                };
                if dirty {
                    cfg.profiles.insert(name.clone(), entry);
                }
                Resolution {
                    url: url.clone(),
                    source: UrlSource::Cli,
                    dirty,
                }
            }
            (Some(name), None) => match cfg.profiles.get(name) {
                Some(entry) => Resolution {
                    url: entry.url.clone(),
                    source: UrlSource::Profile(name.clone()),
                    dirty: false,
                },
                None => return Err(ConfigError::UnknownProfile(name.clone())),
            },
            (None, Some(url)) => Resolution {
                url: url.clone(),
                source: UrlSource::Cli,
                dirty: false,
            },
            (None, None) => Resolution {
                url: DEFAULT_BASE_URL.to_string(),
                source: UrlSource::Default,
                dirty: false,
            },
        };
        Url::parse(&res.url).map_err(|source| ConfigError::BadUrl {
            url: res.url.clone(),
            source,
        })?;
        Ok(res)
    }
}
