use anyhow::{Context, Result};
use hgtpoint::{Config, VOID_ELEVATION};
use serde::Serialize;

use super::build_service;

#[derive(Serialize)]
struct ElevationResponse {
    lat: f64,
    lon: f64,
    elevation: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    void: bool,
}

pub fn run(config: Config, cache_size: u64, lat: f64, lon: f64, json: bool) -> Result<()> {
    let service = build_service(config, cache_size);

    let elevation = service
        .get_elevation(lat, lon)
        .with_context(|| format!("Failed to get elevation at ({}, {})", lat, lon))?;

    if json {
        let response = ElevationResponse {
            lat,
            lon,
            elevation,
            void: elevation == VOID_ELEVATION,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("Elevation: {:.6}", elevation);
    }

    Ok(())
}
