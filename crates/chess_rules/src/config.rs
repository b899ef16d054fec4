//! Game configuration loaded from TOML.
//!
//! ```toml
//! time_minutes = 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, Result};

pub const DEFAULT_TIME_MINUTES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Clock budget per side in minutes
    pub time_minutes: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            time_minutes: DEFAULT_TIME_MINUTES,
        }
    }
}

impl GameConfig {
    pub fn with_time_minutes(time_minutes: u32) -> Self {
        Self { time_minutes }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ChessError::Config(format!("failed to parse: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChessError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }
}
