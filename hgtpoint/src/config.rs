//! Tile type and directory configuration.
//!
//! A [`Config`] is built once and handed to the locator, reader and service.
//! Nothing in the library reads process-wide state after construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{HgtError, Result};

/// Number of samples per row/column for SRTM1
const SRTM1_SAMPLES: usize = 3601;

/// Number of samples per row/column for SRTM3
const SRTM3_SAMPLES: usize = 1201;

/// Environment variable selecting the tile type.
pub const TILE_TYPE_ENV: &str = "SRTM_TYPE";

/// Environment variable pointing at the tile directory.
pub const TILE_DIR_ENV: &str = "HGT_DIR";

/// Tile directory used when none is configured.
pub const DEFAULT_TILE_DIR: &str = "hgt";

/// Resolution of the tiles stored in the tile directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileType {
    /// SRTM1: 1 arc-second (~30m) resolution
    #[default]
    Srtm1,
    /// SRTM3: 3 arc-second (~90m) resolution
    Srtm3,
}

impl TileType {
    /// Returns the number of samples per row/column for this tile type.
    pub fn samples(&self) -> usize {
        match self {
            TileType::Srtm1 => SRTM1_SAMPLES,
            TileType::Srtm3 => SRTM3_SAMPLES,
        }
    }

    /// Returns the approximate resolution in meters.
    pub fn meters(&self) -> f64 {
        match self {
            TileType::Srtm1 => 30.0,
            TileType::Srtm3 => 90.0,
        }
    }

    /// Size in bytes of a complete tile of this type.
    pub fn tile_bytes(&self) -> u64 {
        let samples = self.samples() as u64;
        samples * samples * 2
    }
}

impl FromStr for TileType {
    type Err = HgtError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SRTM1" => Ok(TileType::Srtm1),
            "SRTM3" => Ok(TileType::Srtm3),
            _ => Err(HgtError::InvalidTileType {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileType::Srtm1 => f.write_str("SRTM1"),
            TileType::Srtm3 => f.write_str("SRTM3"),
        }
    }
}

/// Immutable lookup configuration: which tile type, and where tiles live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    tile_type: TileType,
    tile_directory: PathBuf,
}

impl Config {
    /// Create a configuration from explicit values.
    pub fn new<P: AsRef<Path>>(tile_type: TileType, tile_directory: P) -> Self {
        Self {
            tile_type,
            tile_directory: tile_directory.as_ref().to_path_buf(),
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SRTM_TYPE` | `SRTM1` or `SRTM3` | `SRTM1` |
    /// | `HGT_DIR` | Directory containing .hgt files | `hgt` |
    ///
    /// # Errors
    ///
    /// Returns [`HgtError::InvalidTileType`] if `SRTM_TYPE` names an
    /// unsupported tile type.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a configuration from an arbitrary key/value lookup.
    ///
    /// Keys are the environment variable names documented on
    /// [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tile_type = match lookup(TILE_TYPE_ENV) {
            Some(name) => name.parse()?,
            None => TileType::default(),
        };
        let tile_directory = lookup(TILE_DIR_ENV).unwrap_or_else(|| DEFAULT_TILE_DIR.to_string());

        Ok(Self::new(tile_type, tile_directory))
    }

    /// Returns the configured tile type.
    pub fn tile_type(&self) -> TileType {
        self.tile_type
    }

    /// Returns the grid side length implied by the tile type.
    pub fn samples(&self) -> usize {
        self.tile_type.samples()
    }

    /// Returns the tile directory.
    pub fn tile_directory(&self) -> &Path {
        &self.tile_directory
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(TileType::default(), DEFAULT_TILE_DIR)
    }
}
