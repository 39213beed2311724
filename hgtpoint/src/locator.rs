//! Tile lookup: coordinate to `.hgt` file path.
//!
//! # Filename Format
//!
//! Tiles follow the naming convention `{N|S}{lat}{E|W}{lon}.hgt`:
//!
//! - Latitude: 2 digits, the truncated magnitude of the latitude
//! - Longitude: 3 digits, the truncated magnitude of the longitude **plus one**
//!
//! The longitude offset pairs with the column addressing in
//! [`corner_plan`](crate::reader::corner_plan); changing one without the
//! other resolves queries to the wrong tile or corner.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;

/// Build the tile filename for a coordinate.
///
/// # Examples
///
/// ```
/// use hgtpoint::locator::tile_filename;
///
/// assert_eq!(tile_filename(27.0, 86.0), "N27E087.hgt");
/// assert_eq!(tile_filename(-33.0, -70.0), "S33W071.hgt");
/// assert_eq!(tile_filename(43.524, -85.7523), "N43W086.hgt");
/// ```
pub fn tile_filename(lat: f64, lon: f64) -> String {
    let lat_prefix = if lat >= 0.0 { 'N' } else { 'S' };
    let lon_prefix = if lon >= 0.0 { 'E' } else { 'W' };

    format!(
        "{}{:02}{}{:03}.hgt",
        lat_prefix,
        lat.abs().trunc() as i64,
        lon_prefix,
        (lon.abs() + 1.0).trunc() as i64
    )
}

/// Maps coordinates to tile files inside a tile directory.
#[derive(Debug, Clone)]
pub struct TileLocator {
    tile_directory: PathBuf,
}

impl TileLocator {
    /// Create a locator rooted at `tile_directory`.
    pub fn new<P: AsRef<Path>>(tile_directory: P) -> Self {
        Self {
            tile_directory: tile_directory.as_ref().to_path_buf(),
        }
    }

    /// Create a locator for the configured tile directory.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tile_directory())
    }

    /// Path at which the tile for `(lat, lon)` would be stored.
    pub fn tile_path(&self, lat: f64, lon: f64) -> PathBuf {
        self.tile_directory.join(tile_filename(lat, lon))
    }

    /// Returns the tile path if a regular file exists there.
    pub fn locate(&self, lat: f64, lon: f64) -> Option<PathBuf> {
        let path = self.tile_path(lat, lon);
        if path.is_file() {
            debug!(lat, lon, path = %path.display(), "Located tile");
            Some(path)
        } else {
            debug!(lat, lon, path = %path.display(), "No tile for coordinate");
            None
        }
    }

    /// Returns the tile directory.
    pub fn tile_directory(&self) -> &Path {
        &self.tile_directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_integer_coords() {
        assert_eq!(tile_filename(27.0, 86.0), "N27E087.hgt");
        assert_eq!(tile_filename(-33.0, -70.0), "S33W071.hgt");
        assert_eq!(tile_filename(0.0, 0.0), "N00E001.hgt");
        assert_eq!(tile_filename(5.0, 5.0), "N05E006.hgt");
    }

    #[test]
    fn test_fractional_coords_truncate() {
        assert_eq!(tile_filename(43.524, -85.7523), "N43W086.hgt");
        assert_eq!(tile_filename(27.9881, 86.925), "N27E087.hgt");
        assert_eq!(tile_filename(35.3606, 138.7274), "N35E139.hgt");
        assert_eq!(tile_filename(-12.3, -77.1), "S12W078.hgt");
    }

    #[test]
    fn test_hemisphere_boundaries() {
        // Zero belongs to the northern/eastern hemisphere
        assert_eq!(tile_filename(0.0, -0.5), "N00W001.hgt");
        assert_eq!(tile_filename(-0.5, 0.0), "S00E001.hgt");
        assert_eq!(tile_filename(-0.5, -0.5), "S00W001.hgt");
        assert_eq!(tile_filename(0.5, 179.5), "N00E180.hgt");
    }

    #[test]
    fn test_out_of_range_inputs_are_not_normalized() {
        assert_eq!(tile_filename(91.0, 181.0), "N91E182.hgt");
        assert_eq!(tile_filename(123.0, 0.0), "N123E001.hgt");
    }

    #[test]
    fn test_locate_existing_tile() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("N27E087.hgt"), b"").unwrap();

        let locator = TileLocator::new(dir.path());
        assert_eq!(
            locator.locate(27.0, 86.0),
            Some(dir.path().join("N27E087.hgt"))
        );
        assert_eq!(
            locator.locate(27.5, 86.5),
            Some(dir.path().join("N27E087.hgt"))
        );
    }

    #[test]
    fn test_locate_missing_tile() {
        let dir = TempDir::new().unwrap();
        let locator = TileLocator::new(dir.path());

        assert_eq!(locator.locate(-33.0, -70.0), None);
        assert_eq!(
            locator.tile_path(-33.0, -70.0),
            dir.path().join("S33W071.hgt")
        );
    }

    #[test]
    fn test_locate_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("N27E087.hgt")).unwrap();

        let locator = TileLocator::new(dir.path());
        assert_eq!(locator.locate(27.0, 86.0), None);
    }

    #[test]
    fn test_from_config() {
        let config = Config::new(crate::TileType::Srtm3, "/data/srtm");
        let locator = TileLocator::from_config(&config);
        assert_eq!(locator.tile_directory(), Path::new("/data/srtm"));
        assert_eq!(
            locator.tile_path(43.524, -85.7523),
            Path::new("/data/srtm/N43W086.hgt")
        );
    }
}
