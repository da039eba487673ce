//! Path management for Parley configuration and logs.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/parley/
//! ├── config.toml        # Client configuration
//! └── logs/              # Application logs
//!     └── parley.log.YYYY-MM-DD
//! ```

use parley_core::error::{ParleyError, Result};
use std::path::PathBuf;

pub struct ParleyPaths;

impl ParleyPaths {
    /// Returns `~/.config/parley`.
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ParleyError::config("Could not determine home directory"))?;
        Ok(home.join(".config").join("parley"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn log_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("logs"))
    }
}
