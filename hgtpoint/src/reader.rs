//! Tile reading: grid addressing and corner selection for a query.
//!
//! [`corner_plan`] is the whole coordinate-to-grid derivation. It is pure so
//! that the addressing can be tested without touching a tile file, and
//! [`TileReader`] only adds loading the grid and interpolating.
//!
//! The derivation is asymmetric on purpose:
//!
//! - latitude rows are counted up from the fractional position, longitude
//!   columns from its negation
//! - the bottom row is flipped into north-up grid space only when the
//!   longitude falls between two columns, while the top row is always flipped
//!
//! Negative indices address the grid from its far edge (see
//! [`ElevationGrid::sample`]).

use std::path::Path;

use tracing::trace;

use crate::config::Config;
use crate::error::Result;
use crate::grid::ElevationGrid;
use crate::interpolate::{bilinear, Corner};

/// Decimal places kept when scaling a coordinate fraction to grid units.
const GRID_DECIMALS: usize = 4;

/// One of the four grid samples surrounding a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerSample {
    /// Position within the unit interpolation cell (0 or 1)
    pub x: f64,
    /// Position within the unit interpolation cell (0 or 1)
    pub y: f64,
    /// Grid row, possibly negative
    pub row: i64,
    /// Grid column, possibly negative
    pub col: i64,
}

/// Grid addressing for a single query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerPlan {
    /// Fractional latitude offset within the cell
    pub ind_lat: f64,
    /// Fractional longitude offset within the cell
    pub ind_lon: f64,
    /// Corners tagged `(0,0)`, `(1,0)`, `(0,1)`, `(1,1)`
    pub corners: [CornerSample; 4],
}

impl CornerPlan {
    /// Read the corner values from `grid` and interpolate at the plan's offsets.
    pub fn evaluate(&self, grid: &ElevationGrid) -> Result<f64> {
        let mut points = [Corner::new(0.0, 0.0, 0.0); 4];
        for (point, corner) in points.iter_mut().zip(&self.corners) {
            let value = grid.sample(corner.row, corner.col)?;
            *point = Corner::new(corner.x, corner.y, f64::from(value));
        }

        bilinear(self.ind_lat, self.ind_lon, points)
    }
}

/// Derive the four grid corners and fractional offsets for `(lat, lon)`.
///
/// ```
/// use hgtpoint::reader::corner_plan;
///
/// let plan = corner_plan(43.524, -85.7523, 3601);
/// assert!((plan.ind_lat - 0.4).abs() < 1e-9);
/// assert_eq!((plan.corners[0].row, plan.corners[0].col), (1713, 2708));
/// ```
pub fn corner_plan(lat: f64, lon: f64, samples: usize) -> CornerPlan {
    let last = (samples - 1) as f64;

    let lat_frac = round_to((lat - lat.trunc()) * last, GRID_DECIMALS);
    let mut lat_bottom = lat_frac.floor();
    let mut lat_top = if lat_frac == lat_bottom {
        lat_frac
    } else {
        lat_frac.ceil()
    };

    let lon_frac = -round_to((lon - lon.trunc()) * last, GRID_DECIMALS);
    let lon_right = lon_frac.ceil();
    let lon_left = if lon_right == lon_frac {
        lon_right
    } else {
        lat_bottom = last - lat_bottom;
        lon_frac.floor()
    };
    lat_top = last - lat_top;

    let ind_lat = lat_frac - lat_frac.trunc();
    let ind_lon = lon_frac - lon_frac.trunc();

    let (top, bottom) = (lat_top as i64, lat_bottom as i64);
    let (left, right) = (lon_left as i64, lon_right as i64);
    let corners = [
        CornerSample { x: 0.0, y: 0.0, row: top, col: left },
        CornerSample { x: 1.0, y: 0.0, row: bottom, col: left },
        CornerSample { x: 0.0, y: 1.0, row: top, col: right },
        CornerSample { x: 1.0, y: 1.0, row: bottom, col: right },
    ];

    trace!(lat, lon, lat_frac, lon_frac, top, bottom, left, right, "Corner plan");

    CornerPlan {
        ind_lat,
        ind_lon,
        corners,
    }
}

/// Round to `decimals` places using the exact decimal expansion of `value`.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Reads interpolated elevations from individual tile files.
#[derive(Debug, Clone, Copy)]
pub struct TileReader {
    samples: usize,
}

impl TileReader {
    /// Create a reader for tiles of `samples × samples`.
    pub fn new(samples: usize) -> Self {
        Self { samples }
    }

    /// Create a reader for the configured tile type.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.samples())
    }

    /// Returns the grid side length this reader expects.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Load the tile at `tile_path` and interpolate the elevation at `(lat, lon)`.
    ///
    /// The grid is dropped before returning.
    ///
    /// # Errors
    ///
    /// Any error from [`ElevationGrid::load`], [`ElevationGrid::sample`] or
    /// [`bilinear`].
    pub fn read_elevation<P: AsRef<Path>>(&self, tile_path: P, lat: f64, lon: f64) -> Result<f64> {
        let grid = ElevationGrid::load(tile_path, self.samples)?;
        self.elevation_in(&grid, lat, lon)
    }

    /// Interpolate the elevation at `(lat, lon)` within an already loaded grid.
    pub fn elevation_in(&self, grid: &ElevationGrid, lat: f64, lon: f64) -> Result<f64> {
        corner_plan(lat, lon, grid.samples()).evaluate(grid)
    }
}
