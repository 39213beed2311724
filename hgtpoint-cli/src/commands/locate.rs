use anyhow::{bail, Result};
use hgtpoint::{Config, TileLocator};

pub fn run(config: Config, lat: f64, lon: f64) -> Result<()> {
    let locator = TileLocator::from_config(&config);

    match locator.locate(lat, lon) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => bail!(
            "not found: no tile at {}",
            locator.tile_path(lat, lon).display()
        ),
    }
}
