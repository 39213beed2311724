//! Elevation service: locate, read, interpolate.
//!
//! [`ElevationService`] composes the [`TileLocator`] and [`TileReader`] and
//! turns a missing tile into [`VOID_VALUE`]. By default every query loads its
//! tile from disk and drops it afterwards; with a non-zero cache size loaded
//! grids are kept in a bounded cache keyed by tile path. Cached and uncached
//! queries return identical values.
//!
//! ```ignore
//! use hgtpoint::{Config, ElevationService, TileType};
//!
//! let service = ElevationService::builder(Config::new(TileType::Srtm1, "/data/hgt"))
//!     .cache_size(16)
//!     .build();
//!
//! let elevation = service.get_elevation(43.524, -85.7523)?;
//! println!("Elevation: {elevation}");
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::sync::Cache;
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::Result;
use crate::grid::{ElevationGrid, VOID_VALUE};
use crate::locator::TileLocator;
use crate::reader::TileReader;

/// Void sentinel as returned by elevation queries.
pub const VOID_ELEVATION: f64 = VOID_VALUE as f64;

/// Statistics about cache usage.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of tiles currently in the cache.
    pub entry_count: u64,
    /// Number of cache hits (requests served from cache).
    pub hit_count: u64,
    /// Number of cache misses (tiles loaded from disk).
    pub miss_count: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 to 1.0).
    ///
    /// Returns 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

/// Point elevation lookups over a directory of `.hgt` tiles.
pub struct ElevationService {
    config: Config,
    locator: TileLocator,
    reader: TileReader,
    /// Loaded grids keyed by tile path; `None` when caching is disabled.
    tile_cache: Option<Cache<PathBuf, Arc<ElevationGrid>>>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl ElevationService {
    /// Create an uncached service: every query reads its tile from disk.
    pub fn new(config: Config) -> Self {
        Self::builder(config).build()
    }

    /// Create a builder for more configuration options.
    pub fn builder(config: Config) -> ElevationServiceBuilder {
        ElevationServiceBuilder::new(config)
    }

    /// Get the elevation at `(lat, lon)`.
    ///
    /// # Returns
    ///
    /// - `Ok(elevation)` - interpolated elevation in meters
    /// - `Ok(VOID_ELEVATION)` - no tile file covers the coordinate
    /// - `Err(...)` - the tile is unreadable or truncated, or the derived
    ///   grid cell is invalid for this coordinate
    pub fn get_elevation(&self, lat: f64, lon: f64) -> Result<f64> {
        match self.locator.locate(lat, lon) {
            Some(path) => self.read_from(&path, lat, lon),
            None => Ok(VOID_ELEVATION),
        }
    }

    /// Get elevations for a batch of coordinates.
    ///
    /// Coordinates are grouped by tile so that each tile is loaded at most
    /// once per call. Results are returned in input order, one per coordinate.
    pub fn get_elevations(&self, coords: &[(f64, f64)]) -> Vec<Result<f64>> {
        self.get_elevations_with_progress(coords, |_| {})
    }

    /// Like [`Self::get_elevations`], calling `on_resolved` with the number of
    /// coordinates resolved since the previous call. The counts add up to
    /// `coords.len()`.
    pub fn get_elevations_with_progress<F>(
        &self,
        coords: &[(f64, f64)],
        mut on_resolved: F,
    ) -> Vec<Result<f64>>
    where
        F: FnMut(usize),
    {
        let mut results: Vec<Result<f64>> = coords.iter().map(|_| Ok(VOID_ELEVATION)).collect();

        let mut groups: HashMap<PathBuf, Vec<usize>> = HashMap::new();
        let mut void = 0;
        for (i, &(lat, lon)) in coords.iter().enumerate() {
            match self.locator.locate(lat, lon) {
                Some(path) => groups.entry(path).or_default().push(i),
                None => void += 1,
            }
        }
        if void > 0 {
            on_resolved(void);
        }

        for (path, indices) in groups {
            match self.grid(&path) {
                Ok(grid) => {
                    for &i in &indices {
                        let (lat, lon) = coords[i];
                        results[i] = self.reader.elevation_in(&grid, lat, lon);
                    }
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Tile failed to load");
                    // Re-read so each coordinate carries its own error
                    for &i in &indices {
                        let (lat, lon) = coords[i];
                        results[i] = self.reader.read_elevation(&path, lat, lon);
                    }
                }
            }
            on_resolved(indices.len());
        }

        results
    }

    /// Returns the path of the tile covering `(lat, lon)`, if present.
    pub fn locate(&self, lat: f64, lon: f64) -> Option<PathBuf> {
        self.locator.locate(lat, lon)
    }

    fn read_from(&self, path: &Path, lat: f64, lon: f64) -> Result<f64> {
        if self.tile_cache.is_none() {
            return self.reader.read_elevation(path, lat, lon);
        }
        let grid = self.grid(path)?;
        self.reader.elevation_in(&grid, lat, lon)
    }

    /// Load a grid from the cache or from disk.
    fn grid(&self, path: &Path) -> Result<Arc<ElevationGrid>> {
        let Some(cache) = &self.tile_cache else {
            return Ok(Arc::new(ElevationGrid::load(path, self.reader.samples())?));
        };

        if let Some(grid) = cache.get(path) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            trace!(path = %path.display(), "Tile cache hit");
            return Ok(grid);
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);
        trace!(path = %path.display(), "Tile cache miss");

        let grid = Arc::new(ElevationGrid::load(path, self.reader.samples())?);
        cache.insert(path.to_path_buf(), grid.clone());
        Ok(grid)
    }

    /// Get cache statistics.
    ///
    /// All counters stay at zero when caching is disabled.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self
                .tile_cache
                .as_ref()
                .map(|c| {
                    c.run_pending_tasks();
                    c.entry_count()
                })
                .unwrap_or(0),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }

    /// Get the maximum number of cached tiles (0 when caching is disabled).
    pub fn cache_capacity(&self) -> u64 {
        self.tile_cache
            .as_ref()
            .and_then(|c| c.policy().max_capacity())
            .unwrap_or(0)
    }

    /// Clear all tiles from the cache.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.tile_cache {
            cache.invalidate_all();
        }
    }

    /// Returns the service configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Builder for creating [`ElevationService`] with custom configuration.
///
/// ```ignore
/// use hgtpoint::{Config, ElevationServiceBuilder};
///
/// let service = ElevationServiceBuilder::new(Config::from_env()?)
///     .cache_size(8)
///     .build();
/// ```
pub struct ElevationServiceBuilder {
    config: Config,
    cache_size: u64,
}

impl ElevationServiceBuilder {
    /// Create a new builder. Caching is disabled until [`Self::cache_size`]
    /// is set to a non-zero value.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cache_size: 0,
        }
    }

    /// Set the maximum number of tiles to keep in memory (0 disables caching).
    pub fn cache_size(mut self, size: u64) -> Self {
        self.cache_size = size;
        self
    }

    /// Build the [`ElevationService`].
    pub fn build(self) -> ElevationService {
        debug!(
            tile_type = %self.config.tile_type(),
            tile_directory = %self.config.tile_directory().display(),
            cache_size = self.cache_size,
            "Building elevation service"
        );

        let tile_cache =
            (self.cache_size > 0).then(|| Cache::builder().max_capacity(self.cache_size).build());

        ElevationService {
            locator: TileLocator::from_config(&self.config),
            reader: TileReader::from_config(&self.config),
            config: self.config,
            tile_cache,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        }
    }
}

/// One-shot, uncached elevation query.
///
/// Equivalent to `ElevationService::new(config.clone()).get_elevation(lat, lon)`.
pub fn get_elevation(config: &Config, lat: f64, lon: f64) -> Result<f64> {
    match TileLocator::from_config(config).locate(lat, lon) {
        Some(path) => TileReader::from_config(config).read_elevation(path, lat, lon),
        None => Ok(VOID_ELEVATION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TileType;
    use crate::error::HgtError;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLES: usize = 1201;

    /// Write an SRTM3 tile where every sample is `base + row + 2 * col`.
    fn create_test_tile(dir: &Path, filename: &str, base: i16) {
        let mut data = Vec::with_capacity(SAMPLES * SAMPLES * 2);
        for row in 0..SAMPLES {
            for col in 0..SAMPLES {
                let elev = base + (row + 2 * col) as i16;
                data.extend_from_slice(&elev.to_be_bytes());
            }
        }
        fs::write(dir.join(filename), data).unwrap();
    }

    fn srtm3(dir: &Path) -> Config {
        Config::new(TileType::Srtm3, dir)
    }

    #[test]
    fn test_service_basic() {
        let temp_dir = TempDir::new().unwrap();
        create_test_tile(temp_dir.path(), "N43W086.hgt", 0);

        let service = ElevationService::new(srtm3(temp_dir.path()));
        assert_eq!(service.get_elevation(43.5, -85.25).unwrap(), 1200.0);
        assert_eq!(
            service
                .get_elevation(43.500208333333, -85.250416666667)
                .unwrap(),
            1200.25
        );
    }

    #[test]
    fn test_missing_tile_returns_void() {
        let temp_dir = TempDir::new().unwrap();
        let service = ElevationService::new(srtm3(temp_dir.path()));

        for (lat, lon) in [(43.5, -85.25), (-33.5, -70.25), (27.9881, 86.925), (95.0, 200.0)] {
            assert_eq!(service.get_elevation(lat, lon).unwrap(), -32768.0);
        }
    }

    #[test]
    fn test_truncated_tile_is_error_not_void() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("N43W086.hgt"), [0u8; 100]).unwrap();

        let service = ElevationService::new(srtm3(temp_dir.path()));
        let result = service.get_elevation(43.5, -85.25);
        assert!(matches!(result, Err(HgtError::MalformedTile { .. })));
    }

    #[test]
    fn test_uncached_service_keeps_no_stats() {
        let temp_dir = TempDir::new().unwrap();
        create_test_tile(temp_dir.path(), "N43W086.hgt", 0);

        let service = ElevationService::new(srtm3(temp_dir.path()));
        service.get_elevation(43.5, -85.25).unwrap();
        service.get_elevation(43.5, -85.25).unwrap();

        let stats = service.cache_stats();
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.hit_count, 0);
        assert_eq!(stats.miss_count, 0);
        assert_eq!(service.cache_capacity(), 0);
    }

    #[test]
    fn test_cache_hit() {
        let temp_dir = TempDir::new().unwrap();
        create_test_tile(temp_dir.path(), "N43W086.hgt", 0);

        let service = ElevationService::builder(srtm3(temp_dir.path()))
            .cache_size(10)
            .build();

        service.get_elevation(43.5, -85.25).unwrap();
        let stats = service.cache_stats();
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 0);

        service.get_elevation(43.6, -85.25).unwrap();
        let stats = service.cache_stats();
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_cached_matches_uncached() {
        let temp_dir = TempDir::new().unwrap();
        create_test_tile(temp_dir.path(), "N43W086.hgt", 100);
        create_test_tile(temp_dir.path(), "N27E087.hgt", -50);

        let uncached = ElevationService::new(srtm3(temp_dir.path()));
        let cached = ElevationService::builder(srtm3(temp_dir.path()))
            .cache_size(4)
            .build();

        let coords = [
            (43.5, -85.25),
            (43.500208333333, -85.250416666667),
            (43.524, -85.7523),
            (43.9, -85.1),
            (27.5, 86.25),
            (27.0, 86.0),
        ];

        // Twice, so the second pass is served from the cache
        for _ in 0..2 {
            for &(lat, lon) in &coords {
                let a = uncached.get_elevation(lat, lon).unwrap();
                let b = cached.get_elevation(lat, lon).unwrap();
                assert_eq!(a.to_bits(), b.to_bits(), "mismatch at ({lat}, {lon})");
            }
        }
        assert!(cached.cache_stats().hit_count > 0);
    }

    #[test]
    fn test_clear_cache() {
        let temp_dir = TempDir::new().unwrap();
        create_test_tile(temp_dir.path(), "N43W086.hgt", 0);

        let service = ElevationService::builder(srtm3(temp_dir.path()))
            .cache_size(10)
            .build();
        service.get_elevation(43.5, -85.25).unwrap();
        assert_eq!(service.cache_stats().miss_count, 1);

        service.clear_cache();

        // After clearing, next access should be a miss again
        service.get_elevation(43.5, -85.25).unwrap();
        assert_eq!(service.cache_stats().miss_count, 2);
    }

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            entry_count: 5,
            hit_count: 80,
            miss_count: 20,
        };
        assert_eq!(stats.hit_rate(), 0.8);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_cache_capacity() {
        let temp_dir = TempDir::new().unwrap();
        let service = ElevationService::builder(srtm3(temp_dir.path()))
            .cache_size(42)
            .build();
        assert_eq!(service.cache_capacity(), 42);
    }

    #[test]
    fn test_get_elevations_batch() {
        let temp_dir = TempDir::new().unwrap();
        create_test_tile(temp_dir.path(), "N43W086.hgt", 0);
        fs::write(temp_dir.path().join("N10W011.hgt"), [0u8; 10]).unwrap();

        let service = ElevationService::builder(srtm3(temp_dir.path()))
            .cache_size(10)
            .build();

        let coords = [
            (43.5, -85.25),
            (-33.5, -70.25),
            (10.5, -10.5),
            (43.500208333333, -85.250416666667),
            (10.25, -10.25),
        ];
        let results = service.get_elevations(&coords);
        assert_eq!(results.len(), coords.len());

        assert_eq!(results[0].as_ref().unwrap(), &1200.0);
        assert_eq!(results[1].as_ref().unwrap(), &VOID_ELEVATION);
        assert!(matches!(results[2], Err(HgtError::MalformedTile { .. })));
        assert_eq!(results[3].as_ref().unwrap(), &1200.25);
        assert!(results[4].is_err());

        // One load per tile that exists
        assert_eq!(service.cache_stats().miss_count, 2);
    }

    #[test]
    fn test_get_elevations_matches_single_queries() {
        let temp_dir = TempDir::new().unwrap();
        create_test_tile(temp_dir.path(), "N43W086.hgt", 7);

        let service = ElevationService::new(srtm3(temp_dir.path()));
        let coords: Vec<(f64, f64)> = (0..20)
            .map(|i| (43.0 + i as f64 * 0.0437, -85.0 - i as f64 * 0.0391))
            .collect();

        let batch = service.get_elevations(&coords);
        for (&(lat, lon), result) in coords.iter().zip(batch) {
            let single = service.get_elevation(lat, lon).unwrap();
            assert_eq!(result.unwrap().to_bits(), single.to_bits());
        }
    }

    #[test]
    fn test_get_elevations_reports_progress() {
        let temp_dir = TempDir::new().unwrap();
        create_test_tile(temp_dir.path(), "N43W086.hgt", 0);
        create_test_tile(temp_dir.path(), "N27E087.hgt", 0);
        fs::write(temp_dir.path().join("N10W011.hgt"), [0u8; 8]).unwrap();

        let service = ElevationService::new(srtm3(temp_dir.path()));
        let coords = [
            (43.5, -85.25),
            (0.0, 0.0),
            (27.0, 86.0),
            (43.25, -85.5),
            (10.5, -10.5),
            (51.0, 0.5),
        ];

        let mut reports = Vec::new();
        let results = service.get_elevations_with_progress(&coords, |n| reports.push(n));

        assert_eq!(results.len(), coords.len());
        assert_eq!(reports.iter().sum::<usize>(), coords.len());
        // Two absent tiles reported together, then one report per tile
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0], 2);
        assert!(reports.iter().all(|&n| n > 0));
    }

    #[test]
    fn test_one_shot_get_elevation() {
        let temp_dir = TempDir::new().unwrap();
        create_test_tile(temp_dir.path(), "N43W086.hgt", 0);
        let config = srtm3(temp_dir.path());

        assert_eq!(get_elevation(&config, 43.5, -85.25).unwrap(), 1200.0);
        assert_eq!(get_elevation(&config, 10.0, 10.0).unwrap(), VOID_ELEVATION);
    }

    #[test]
    fn test_locate_and_config() {
        let temp_dir = TempDir::new().unwrap();
        create_test_tile(temp_dir.path(), "N43W086.hgt", 0);

        let service = ElevationService::new(srtm3(temp_dir.path()));
        assert_eq!(
            service.locate(43.524, -85.7523),
            Some(temp_dir.path().join("N43W086.hgt"))
        );
        assert_eq!(service.locate(-33.0, -70.0), None);
        assert_eq!(service.config().tile_type(), TileType::Srtm3);
    }
}
