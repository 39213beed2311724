//! Elevation grid backed by a memory-mapped `.hgt` file.
//!
//! A tile is a square, row-major matrix of 16-bit big-endian signed integers.
//! Row 0 is the northern edge and column 0 the western edge. There is no
//! header, footer or compression.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use crate::error::{HgtError, Result};

/// Value indicating no data (void) in SRTM files
pub const VOID_VALUE: i16 = -32768;

/// An immutable `samples × samples` grid of elevation samples.
///
/// # Example
///
/// ```ignore
/// use hgtpoint::ElevationGrid;
///
/// let grid = ElevationGrid::load("hgt/N43W086.hgt", 3601)?;
/// println!("NW corner: {}m", grid.sample(0, 0)?);
/// ```
pub struct ElevationGrid {
    /// Memory-mapped file data
    data: Mmap,
    /// Number of samples per row/column
    samples: usize,
}

impl ElevationGrid {
    /// Load a tile holding `samples × samples` elevation samples.
    ///
    /// Files longer than the grid are accepted and the trailing bytes ignored.
    ///
    /// # Errors
    ///
    /// - [`HgtError::Io`] if the file cannot be opened or mapped
    /// - [`HgtError::MalformedTile`] if the file is shorter than the grid
    pub fn load<P: AsRef<Path>>(path: P, samples: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let expected = (samples * samples * 2) as u64;
        let actual = file.metadata()?.len();
        if actual < expected {
            return Err(HgtError::MalformedTile {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }

        // SAFETY: Memory mapping is safe as long as the file is not modified
        // while mapped. We open the file read-only and don't expose the mapping.
        let data = unsafe { Mmap::map(&file)? };

        debug!(path = %path.display(), samples, bytes = actual, "Loaded elevation grid");

        Ok(Self { data, samples })
    }

    /// Returns the number of samples per row/column.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Get the sample at an in-range `(row, col)`.
    ///
    /// * `row` - Row index (0 = north edge)
    /// * `col` - Column index (0 = west edge)
    pub fn get(&self, row: usize, col: usize) -> Option<i16> {
        if row >= self.samples || col >= self.samples {
            return None;
        }

        let offset = (row * self.samples + col) * 2;
        Some(i16::from_be_bytes([self.data[offset], self.data[offset + 1]]))
    }

    /// Get a sample using signed indices.
    ///
    /// A negative index counts back from the far edge, so `-1` is the last
    /// row (south) or column (east). Indices outside `[-samples, samples)`
    /// are rejected.
    pub fn sample(&self, row: i64, col: i64) -> Result<i16> {
        let out_of_range = || HgtError::SampleOutOfRange {
            row,
            col,
            samples: self.samples,
        };

        let r = wrap_index(row, self.samples).ok_or_else(out_of_range)?;
        let c = wrap_index(col, self.samples).ok_or_else(out_of_range)?;
        self.get(r, c).ok_or_else(out_of_range)
    }
}

fn wrap_index(index: i64, samples: usize) -> Option<usize> {
    let n = samples as i64;
    match index {
        i if (0..n).contains(&i) => Some(i as usize),
        i if (-n..0).contains(&i) => Some((n + i) as usize),
        _ => None,
    }
}
