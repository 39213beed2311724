//! Example showing how a query decomposes into corner selection and
//! bilinear interpolation.
//!
//! Run with: cargo run --example interpolation -- /path/to/hgt/files

use hgtpoint::{bilinear, corner_plan, Config, Corner, ElevationGrid, HgtError, TileLocator};
use std::env;

fn main() -> Result<(), HgtError> {
    let tile_dir = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example interpolation -- /path/to/hgt/files");
        std::process::exit(1);
    });
    let config = Config::new(Default::default(), tile_dir);

    // The textbook case
    let value = bilinear(
        12.0,
        5.5,
        [
            (10.0, 4.0, 100.0).into(),
            (20.0, 4.0, 200.0).into(),
            (10.0, 6.0, 150.0).into(),
            (20.0, 6.0, 300.0).into(),
        ],
    )?;
    println!("bilinear(12, 5.5) = {}", value);

    let lat = 43.524;
    let lon = -85.7523;
    let plan = corner_plan(lat, lon, config.samples());

    println!("\nQuery ({}, {}):", lat, lon);
    println!("  offsets: lat={:.4} lon={:.4}", plan.ind_lat, plan.ind_lon);
    for corner in &plan.corners {
        println!(
            "  corner ({}, {}) -> grid[{}][{}]",
            corner.x, corner.y, corner.row, corner.col
        );
    }

    let Some(path) = TileLocator::from_config(&config).locate(lat, lon) else {
        println!("  tile not available locally");
        return Ok(());
    };

    let grid = ElevationGrid::load(&path, config.samples())?;
    let mut points = Vec::with_capacity(4);
    for corner in &plan.corners {
        let value = grid.sample(corner.row, corner.col)?;
        println!("  grid[{}][{}] = {}m", corner.row, corner.col, value);
        points.push(Corner::new(corner.x, corner.y, f64::from(value)));
    }

    let corners: [Corner; 4] = [points[0], points[1], points[2], points[3]];
    println!(
        "  interpolated: {:.2}m",
        bilinear(plan.ind_lat, plan.ind_lon, corners)?
    );

    Ok(())
}
