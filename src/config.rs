//! Game configuration, loaded from TOML and overridden from the command line.

use std::path::Path;

use serde::Deserialize;

use crate::error::{SolverError, SolverResult};
use crate::grid::Dims;

/// Board size, mine count and optional RNG seed for a game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
    /// Fixed seed for reproducible games; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            height: 8,
            width: 8,
            mines: 8,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> SolverResult<Self> {
        let config: Self = toml::from_str(text).map_err(|source| SolverError::ConfigParse { source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> SolverResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SolverError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.height, self.width)
    }

    pub fn validate(&self) -> SolverResult<()> {
        if self.height == 0 || self.width == 0 {
            return Err(SolverError::InvalidConfig {
                message: format!("grid must be at least 1x1, got {}x{}", self.height, self.width),
            });
        }
        let max = self.dims().ncells();
        if self.mines > max {
            return Err(SolverError::TooManyMines {
                height: self.height,
                width: self.width,
                max,
                requested: self.mines,
            });
        }
        Ok(())
    }
}
