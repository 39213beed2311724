pub mod batch;
pub mod locate;
pub mod query;

use hgtpoint::{Config, ElevationService};

/// Build the elevation service shared by the query commands.
pub fn build_service(config: Config, cache_size: u64) -> ElevationService {
    ElevationService::builder(config)
        .cache_size(cache_size)
        .build()
}
