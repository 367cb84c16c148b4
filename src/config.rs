use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "STEMSYNTH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid listen address {0}")]
    Address(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            log_level: "info".to_string(),
            max_sessions: 1024,
        }
    }
}

impl Config {
    /// `$STEMSYNTH_CONFIG`, then settings.json in the OS config dir, else defaults.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => Some(PathBuf::from(p)),
            None => default_path().filter(|p| p.exists()),
        };
        match path {
            Some(p) => Ok((Self::from_file(&p)?, Some(p))),
            None => Ok((Self::default(), None)),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Address(format!("{}:{}", self.host, self.port)))
    }
}

fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "stemsynth", "stemsynth").map(|d| d.config_dir().join("settings.json"))
}
