//! Installation-wide configuration.
//!
//! One JSON file configures every process, so the bus, engine, and
//! supervisor always agree on ports. Every section has defaults; an empty
//! object (or no file at all) gives the standard installation.

use std::fs;
use std::path::{Path, PathBuf};

use mazebeam_engine::EngineConfig;
use mazebeam_supervisor::SupervisorConfig;
use mazebeam_transport::PortMap;
use serde::{Deserialize, Serialize};

use crate::MazebeamError;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "MAZEBEAM_CONFIG";

/// Everything an installation can configure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallationConfig {
    pub ports: PortMap,
    pub engine: EngineConfig,
    pub supervisor: SupervisorConfig,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for InstallationConfig {
    fn default() -> Self {
        Self {
            ports: PortMap::default(),
            engine: EngineConfig::default(),
            supervisor: SupervisorConfig::default(),
            log_filter: "info".to_owned(),
        }
    }
}

impl InstallationConfig {
    /// Parses a config document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reads the config from `path`.
    pub fn from_file(path: &Path) -> Result<Self, MazebeamError> {
        let text = fs::read_to_string(path).map_err(|source| MazebeamError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| MazebeamError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads from `path`, else from [`CONFIG_ENV`], else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, MazebeamError> {
        match Self::resolve_path(path) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// The file [`load`](Self::load) would read, if any.
    pub fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
        path.map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }
}

/// The `--config` flag every executable accepts.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Installation config file (JSON). Defaults to $MAZEBEAM_CONFIG, then
    /// built-in defaults.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<InstallationConfig, MazebeamError> {
        InstallationConfig::load(self.config.as_deref())
    }
}
