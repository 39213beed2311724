//! Error types for the hgtpoint library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving an elevation.
///
/// A missing tile is deliberately absent from this list: the service reports
/// it as [`VOID_VALUE`](crate::VOID_VALUE) instead of failing.
#[derive(Error, Debug)]
pub enum HgtError {
    /// IO error when opening or mapping a tile.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured tile type is not one of the supported resolutions.
    #[error("Invalid tile type: {name:?} (expected SRTM1 or SRTM3)")]
    InvalidTileType { name: String },

    /// The tile exists but holds fewer bytes than its grid requires.
    #[error("Malformed tile {path}: expected at least {expected} bytes, found {actual}")]
    MalformedTile {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// The four interpolation points do not form an axis-aligned rectangle.
    #[error("Points do not form a rectangle")]
    InvalidRectangle,

    /// The rectangle has zero width or height.
    #[error("Degenerate rectangle: x in [{x1}, {x2}], y in [{y1}, {y2}]")]
    DegenerateRectangle { x1: f64, x2: f64, y1: f64, y2: f64 },

    /// The interpolation point lies outside the rectangle.
    #[error("Point ({x}, {y}) is not within the rectangle")]
    PointOutOfBounds { x: f64, y: f64 },

    /// A derived grid index does not address any sample.
    #[error("Sample index ({row}, {col}) out of range for a {samples}x{samples} grid")]
    SampleOutOfRange { row: i64, col: i64, samples: usize },
}

/// Result type alias using [`HgtError`].
pub type Result<T> = std::result::Result<T, HgtError>;
