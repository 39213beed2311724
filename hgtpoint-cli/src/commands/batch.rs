use anyhow::{Context, Result};
use hgtpoint::{Config, ElevationService};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use super::build_service;

pub fn run(
    config: Config,
    cache_size: u64,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: String,
    lon_col: String,
) -> Result<()> {
    let service = build_service(config, cache_size);

    let output_path = output.unwrap_or_else(|| default_output_path(&input));

    let input_file = File::open(&input).context("Failed to open input file")?;
    let output_file = File::create(&output_path).context("Failed to create output file")?;

    let summary = process_csv(
        &service,
        BufReader::new(input_file),
        BufWriter::new(output_file),
        &lat_col,
        &lon_col,
        true,
    )?;

    println!(
        "Output written to: {} ({} rows, {} void, {} failed)",
        output_path.display(),
        summary.rows,
        summary.void,
        summary.failed
    );
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_elevation.csv", stem))
}

#[derive(Debug, Default, PartialEq)]
struct BatchSummary {
    rows: u64,
    void: u64,
    failed: u64,
}

fn process_csv<R: Read, W: Write>(
    service: &ElevationService,
    input: R,
    output: W,
    lat_col: &str,
    lon_col: &str,
    show_progress: bool,
) -> Result<BatchSummary> {
    let mut reader = csv::Reader::from_reader(input);

    // Find column indices
    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;

    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;

    let mut coords = Vec::with_capacity(records.len());
    for (line, record) in records.iter().enumerate() {
        let lat: f64 = record
            .get(lat_idx)
            .context("Missing latitude")?
            .trim()
            .parse()
            .with_context(|| format!("Invalid latitude on row {}", line + 1))?;
        let lon: f64 = record
            .get(lon_idx)
            .context("Missing longitude")?
            .trim()
            .parse()
            .with_context(|| format!("Invalid longitude on row {}", line + 1))?;
        coords.push((lat, lon));
    }

    let pb = if show_progress {
        ProgressBar::new(records.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let elevations = service.get_elevations_with_progress(&coords, |n| pb.inc(n as u64));
    pb.finish_with_message("done");

    let mut writer = csv::Writer::from_writer(output);

    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("elevation");
    writer.write_record(&new_headers)?;

    let mut summary = BatchSummary::default();
    for ((record, &(lat, lon)), result) in records.iter().zip(&coords).zip(elevations) {
        let elevation = match result {
            Ok(elevation) => {
                if elevation == hgtpoint::VOID_ELEVATION {
                    summary.void += 1;
                }
                elevation.to_string()
            }
            Err(e) => {
                tracing::warn!(lat, lon, error = %e, "Elevation query failed");
                summary.failed += 1;
                "error".to_string()
            }
        };

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(&elevation);
        writer.write_record(&new_record)?;

        summary.rows += 1;
    }

    writer.flush()?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hgtpoint::TileType;
    use tempfile::TempDir;

    fn create_flat_tile(dir: &Path, filename: &str, elevation: i16) {
        let samples = TileType::Srtm3.samples();
        let data: Vec<u8> = (0..samples * samples)
            .flat_map(|_| elevation.to_be_bytes())
            .collect();
        std::fs::write(dir.join(filename), data).unwrap();
    }

    fn run_batch(dir: &Path, csv_input: &str) -> (BatchSummary, String) {
        let service = ElevationService::new(Config::new(TileType::Srtm3, dir));
        let mut output = Vec::new();
        let summary =
            process_csv(&service, csv_input.as_bytes(), &mut output, "lat", "lon", false).unwrap();
        (summary, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_appends_elevation_column() {
        let dir = TempDir::new().unwrap();
        create_flat_tile(dir.path(), "N43W086.hgt", 321);

        let (summary, output) = run_batch(
            dir.path(),
            "name,lat,lon\nshore,43.5,-85.25\nsea,-33.5,-70.25\n",
        );

        assert_eq!(
            summary,
            BatchSummary {
                rows: 2,
                void: 1,
                failed: 0
            }
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "name,lat,lon,elevation");
        assert_eq!(lines[1], "shore,43.5,-85.25,321");
        assert_eq!(lines[2], "sea,-33.5,-70.25,-32768");
    }

    #[test]
    fn test_failed_queries_are_marked() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("N43W086.hgt"), [0u8; 16]).unwrap();

        let (summary, output) = run_batch(dir.path(), "lat,lon\n43.5,-85.25\n");

        assert_eq!(summary.failed, 1);
        assert!(output.lines().nth(1).unwrap().ends_with(",error"));
    }

    #[test]
    fn test_missing_column() {
        let dir = TempDir::new().unwrap();
        let service = ElevationService::new(Config::new(TileType::Srtm3, dir.path()));

        let result = process_csv(
            &service,
            "latitude,lon\n1,2\n".as_bytes(),
            Vec::new(),
            "lat",
            "lon",
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/points.csv")),
            PathBuf::from("/tmp/points_elevation.csv")
        );
    }
}
