//! Configuration handling

use crate::error::ConfigError;
use crate::form::FormConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_FORMS_CONFIG";

/// User configuration; every field is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Reset forms to their initial value after submitting
    pub reset_on_submit: Option<bool>,
    /// Ask before leaving a form with unsaved changes
    pub confirm_leave: Option<bool>,
    /// JSON fixture served by the in-memory API
    pub fixture_path: Option<PathBuf>,
    /// Page size for tag searches
    pub search_page_size: Option<u32>,
    /// Artificial API latency in milliseconds
    pub api_latency_ms: Option<u64>,
    /// Order edited by the address dialog
    pub order_id: Option<String>,
    /// Customer whose saved addresses are offered
    pub customer_id: Option<String>,
    /// Gift card edited by the tag dialog
    pub gift_card_id: Option<String>,
}

impl DashboardConfig {
    pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 20;

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("com", "dashboard", "dashboard-forms")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the default location, writing the defaults on first run
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_or_init(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load `path`, or write the defaults there when it does not exist.
    ///
    /// A failed write is logged and the defaults are still returned.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        match config.save_to(path) {
            Ok(()) => info!(path = %path.display(), "wrote default configuration"),
            Err(err) => warn!(error = %err, "could not write default configuration"),
        }
        Ok(config)
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(io_error)
    }

    /// Form options derived from this configuration
    pub fn form_config(&self) -> FormConfig {
        FormConfig {
            reset_on_submit: self.reset_on_submit.unwrap_or(false),
            confirm_leave: self.confirm_leave.unwrap_or(false),
            ..Default::default()
        }
    }

    pub fn search_page_size(&self) -> u32 {
        self.search_page_size
            .filter(|size| *size > 0)
            .unwrap_or(Self::DEFAULT_SEARCH_PAGE_SIZE)
    }
}
