//! # hgtpoint - SRTM Point Elevation Library
//!
//! Resolves a latitude/longitude to an elevation by locating the matching
//! SRTM `.hgt` tile in a directory, reading the four grid samples around the
//! point and interpolating between them.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hgtpoint::{Config, ElevationService};
//!
//! // SRTM_TYPE=SRTM1|SRTM3, HGT_DIR=/path/to/tiles
//! let service = ElevationService::new(Config::from_env()?);
//!
//! let elevation = service.get_elevation(43.524, -85.7523)?;
//! if elevation == hgtpoint::VOID_ELEVATION {
//!     println!("No tile for this coordinate");
//! } else {
//!     println!("Elevation: {elevation}m");
//! }
//! ```
//!
//! ## Components
//!
//! - [`locator`]: coordinate to tile path (`N43W086.hgt`)
//! - [`grid`]: memory-mapped `samples × samples` grid of big-endian `i16`
//! - [`reader`]: grid addressing and corner selection
//! - [`interpolate`]: bilinear interpolation over four corners
//! - [`service`]: the composed query, with an optional tile cache
//!
//! ## SRTM Data Format
//!
//! - **SRTM1**: 3601×3601 samples, 1 arc-second (~30m) resolution
//! - **SRTM3**: 1201×1201 samples, 3 arc-second (~90m) resolution
//!
//! Each sample is a 16-bit big-endian signed integer representing elevation in meters.
//! The special value -32768 indicates void (no data); queries return it when
//! no tile covers the coordinate.

pub mod config;
pub mod error;
pub mod grid;
pub mod interpolate;
pub mod locator;
pub mod reader;
pub mod service;

// Re-export main types at crate root for convenience
pub use config::{Config, TileType};
pub use error::{HgtError, Result};
pub use grid::{ElevationGrid, VOID_VALUE};
pub use interpolate::{bilinear, Corner};
pub use locator::{tile_filename, TileLocator};
pub use reader::{corner_plan, CornerPlan, TileReader};
pub use service::{
    get_elevation, CacheStats, ElevationService, ElevationServiceBuilder, VOID_ELEVATION,
};
