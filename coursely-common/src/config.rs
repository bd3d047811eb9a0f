//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable consulted for the root folder
pub const ROOT_FOLDER_ENV: &str = "COURSELY_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "coursely.db";

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Bootstrap configuration loaded from the TOML config file
///
/// These settings cannot change while the server is running; runtime
/// behavior (session timeout, ...) lives in the database `settings` table.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BootstrapConfig {
    /// Root folder holding the database file
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit database path (overrides `<root_folder>/coursely.db`)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Log filter directive (e.g. "info", "coursely_api=debug")
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl BootstrapConfig {
    /// Load the bootstrap config file if one exists, otherwise defaults
    pub fn load() -> Self {
        match find_config_file() {
            Ok(path) => match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<BootstrapConfig>(&content) {
                    Ok(config) => {
                        tracing::info!("Loaded config file: {}", path.display());
                        config
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
                        BootstrapConfig::default()
                    }
                },
                Err(_) => BootstrapConfig::default(),
            },
            Err(_) => BootstrapConfig::default(),
        }
    }
}

/// Root folder resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `COURSELY_ROOT_FOLDER` environment variable
/// 3. TOML config file `root_folder` key
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &BootstrapConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Resolve the database path from CLI argument, config file, or root folder
pub fn resolve_database_path(
    cli_arg: Option<&Path>,
    config: &BootstrapConfig,
    root_folder: &Path,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }
    if let Some(path) = &config.database_path {
        return path.clone();
    }
    root_folder.join(DATABASE_FILE)
}

/// Create the root folder directory if it does not exist yet
pub fn ensure_root_folder(root_folder: &Path) -> Result<()> {
    if !root_folder.exists() {
        std::fs::create_dir_all(root_folder)?;
        tracing::info!("Created root folder: {}", root_folder.display());
    }
    Ok(())
}

/// Locate the configuration file for the platform
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("coursely").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/coursely/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/coursely (or /var/lib/coursely for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("coursely"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/coursely"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/coursely
        dirs::data_dir()
            .map(|d| d.join("coursely"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/coursely"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\coursely
        dirs::data_local_dir()
            .map(|d| d.join("coursely"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\coursely"))
    } else {
        PathBuf::from("./coursely_data")
    }
}
