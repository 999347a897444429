//! Path management for fairshare
//!
//! ## Path Resolution Order
//!
//! 1. `FAIRSHARE_CONFIG_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/fairshare` or `~/.config/fairshare`
//! 3. Windows: `%APPDATA%\fairshare`

use std::path::{Path, PathBuf};

use crate::error::FairshareError;

/// Environment variable overriding the base directory
pub const CONFIG_DIR_ENV: &str = "FAIRSHARE_CONFIG_DIR";

/// Manages all paths used by fairshare
#[derive(Debug, Clone)]
pub struct FairsharePaths {
    base_dir: PathBuf,
}

impl FairsharePaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, FairshareError> {
        let base_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Directory settlement reports are written to
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Create the base and export directories
    pub fn ensure_directories(&self) -> Result<(), FairshareError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FairshareError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir()).map_err(|e| {
            FairshareError::Io(format!("Failed to create export directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, FairshareError> {
    let config_base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var_os("HOME").ok_or_else(|| {
                FairshareError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("fairshare"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, FairshareError> {
    let appdata = std::env::var_os("APPDATA")
        .ok_or_else(|| FairshareError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("fairshare"))
}
