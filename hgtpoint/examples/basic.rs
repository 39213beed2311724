//! Basic example demonstrating hgtpoint library usage.
//!
//! Run with: cargo run --example basic -- /path/to/hgt/files [SRTM1|SRTM3]

use hgtpoint::{Config, ElevationService, HgtError, TileType, VOID_ELEVATION};
use std::env;

fn main() -> Result<(), HgtError> {
    let mut args = env::args().skip(1);
    let tile_dir = args.next().unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/hgt/files [SRTM1|SRTM3]");
        std::process::exit(1);
    });
    let tile_type: TileType = match args.next() {
        Some(name) => name.parse()?,
        None => TileType::default(),
    };

    // Keep up to 4 tiles in memory between queries
    let service = ElevationService::builder(Config::new(tile_type, &tile_dir))
        .cache_size(4)
        .build();

    let locations = [
        ("Lake Michigan shore", 43.524, -85.7523),
        ("Mount Whitney, California", 36.5785, -118.2923),
        ("Aconcagua, Argentina", -32.6532, -70.0109),
    ];

    println!("Elevation queries ({tile_type}):");
    println!("{:-<50}", "");

    for (name, lat, lon) in &locations {
        match service.get_elevation(*lat, *lon) {
            Ok(elevation) if elevation == VOID_ELEVATION => {
                println!("{}: tile not available locally", name);
            }
            Ok(elevation) => {
                println!("{}: {:.2}m", name, elevation);
            }
            Err(e) => {
                println!("{}: error - {}", name, e);
            }
        }
    }

    let stats = service.cache_stats();
    println!("\nCache statistics:");
    println!("  Cached tiles: {}", stats.entry_count);
    println!("  Hits: {}", stats.hit_count);
    println!("  Misses: {}", stats.miss_count);

    Ok(())
}
