use anyhow::Result;
use clap::{Parser, Subcommand};
use hgtpoint::{Config, TileType};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// SRTM point elevation CLI tool
#[derive(Parser)]
#[command(name = "hgtpoint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tile type stored in the tile directory (SRTM1 or SRTM3)
    #[arg(short, long, env = "SRTM_TYPE", default_value = "SRTM1", global = true)]
    tile_type: TileType,

    /// Directory containing .hgt files
    #[arg(long, env = "HGT_DIR", default_value = "hgt", global = true)]
    hgt_dir: PathBuf,

    /// Maximum tiles kept in memory (0 disables caching)
    #[arg(
        short,
        long,
        env = "HGTPOINT_CACHE_SIZE",
        default_value = "0",
        global = true
    )]
    cache_size: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query elevation for a single coordinate
    Query {
        /// Latitude in decimal degrees
        #[arg(long, default_value = "43.524", allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, default_value = "-85.7523", allow_hyphen_values = true)]
        lon: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the tile file that covers a coordinate
    Locate {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Process elevation for multiple coordinates from a CSV file
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Output file (defaults to <input>_elevation.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hgtpoint=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::new(cli.tile_type, &cli.hgt_dir);

    match cli.command {
        Commands::Query { lat, lon, json } => {
            commands::query::run(config, cli.cache_size, lat, lon, json)
        }
        Commands::Locate { lat, lon } => commands::locate::run(config, lat, lon),
        Commands::Batch {
            input,
            output,
            lat_col,
            lon_col,
        } => commands::batch::run(config, cli.cache_size, input, output, lat_col, lon_col),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let cli = Cli::try_parse_from(["hgtpoint", "query"]).unwrap();
        assert_eq!(cli.tile_type, TileType::Srtm1);
        assert_eq!(cli.hgt_dir, PathBuf::from("hgt"));
        assert_eq!(cli.cache_size, 0);

        match cli.command {
            Commands::Query { lat, lon, json } => {
                assert_eq!(lat, 43.524);
                assert_eq!(lon, -85.7523);
                assert!(!json);
            }
            _ => panic!("Expected query command"),
        }
    }

    #[test]
    fn test_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "hgtpoint", "locate", "--lat", "-33.5", "--lon", "-70.25",
        ])
        .unwrap();

        match cli.command {
            Commands::Locate { lat, lon } => assert_eq!((lat, lon), (-33.5, -70.25)),
            _ => panic!("Expected locate command"),
        }
    }

    #[test]
    fn test_tile_type_option() {
        let cli = Cli::try_parse_from(["hgtpoint", "--tile-type", "srtm3", "query"]).unwrap();
        assert_eq!(cli.tile_type, TileType::Srtm3);
    }

    #[test]
    fn test_invalid_tile_type_rejected() {
        let result = Cli::try_parse_from(["hgtpoint", "--tile-type", "SRTM2", "query"]);
        assert!(result.is_err());
    }
}
