//! Shark location dataset loading.
//!
//! The dataset is a headered CSV with at least `latitude` and `longitude`
//! columns, in any column order. Loading is best-effort: unreadable files or
//! missing columns surface as `DatasetError` for the refresh controller to
//! degrade on, and individual malformed rows are skipped with a warning
//! rather than failing the whole load.

use crate::geo::GeoPoint;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Cap on loaded locations; rows beyond it are dropped, keeping the first
/// `MAX_DATASET_POINTS` in file order.
pub const MAX_DATASET_POINTS: usize = 1000;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("no dataset file configured")]
    NotConfigured,
    #[error("failed to read dataset: {0}")]
    Read(#[from] std::io::Error),
    #[error("dataset is missing required columns 'latitude' and 'longitude'")]
    MissingColumns,
}

/// Source of observed point locations, one load per refresh cycle.
pub trait DatasetSource {
    fn load(&self) -> Result<Vec<GeoPoint>, DatasetError>;
}

/// Loads locations from a CSV file on disk. With no configured path every
/// load fails, which the refresh controller degrades to an empty dataset.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    path: Option<PathBuf>,
}

impl CsvDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn unconfigured() -> Self {
        Self { path: None }
    }
}

impl DatasetSource for CsvDataset {
    fn load(&self) -> Result<Vec<GeoPoint>, DatasetError> {
        let path = self.path.as_deref().ok_or(DatasetError::NotConfigured)?;
        let contents = std::fs::read_to_string(path)?;
        parse_locations(&contents)
    }
}

/// Fixed in-memory source, used by tests and as a stand-in when no file is
/// wired up.
#[derive(Debug, Clone)]
pub struct StaticDataset {
    points: Vec<GeoPoint>,
}

impl StaticDataset {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }
}

impl DatasetSource for StaticDataset {
    fn load(&self) -> Result<Vec<GeoPoint>, DatasetError> {
        Ok(self.points.clone())
    }
}

/// Keep the first `cap` points in order. Returns the kept points and the
/// original total when truncation happened.
pub fn cap_points(mut points: Vec<GeoPoint>, cap: usize) -> (Vec<GeoPoint>, Option<usize>) {
    let total = points.len();
    if total > cap {
        points.truncate(cap);
        (points, Some(total))
    } else {
        (points, None)
    }
}

fn parse_locations(contents: &str) -> Result<Vec<GeoPoint>, DatasetError> {
    let mut lines = contents.lines();
    let header = lines.next().ok_or(DatasetError::MissingColumns)?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let lat_index = columns
        .iter()
        .position(|column| *column == "latitude")
        .ok_or(DatasetError::MissingColumns)?;
    let lon_index = columns
        .iter()
        .position(|column| *column == "longitude")
        .ok_or(DatasetError::MissingColumns)?;

    let mut points = Vec::new();
    let mut skipped = 0usize;
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let latitude = fields.get(lat_index).and_then(|f| f.trim().parse().ok());
        let longitude = fields.get(lon_index).and_then(|f| f.trim().parse().ok());
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => {
                points.push(GeoPoint::new(latitude, longitude));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, "Skipped dataset rows with malformed coordinates");
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn parses_rows_with_columns_in_any_order() -> Result<(), DatasetError> {
        let contents = "id,longitude,latitude\n1,-60.5,20.25\n2,-40.0,12.0\n";

        let points = parse_locations(contents)?;

        assert_eq!(
            points,
            vec![GeoPoint::new(20.25, -60.5), GeoPoint::new(12.0, -40.0)]
        );
        Ok(())
    }

    #[test]
    fn missing_required_columns_is_an_error() {
        let contents = "id,lat,lon\n1,20.0,-60.0\n";

        assert!(matches!(
            parse_locations(contents),
            Err(DatasetError::MissingColumns)
        ));
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() -> Result<(), DatasetError> {
        let contents = "latitude,longitude\n20.0,-60.0\nnot-a-number,-61.0\n21.0\n22.0,-62.0\n";

        let points = parse_locations(contents)?;

        assert_eq!(
            points,
            vec![GeoPoint::new(20.0, -60.0), GeoPoint::new(22.0, -62.0)]
        );
        Ok(())
    }

    #[test]
    fn blank_lines_are_ignored() -> Result<(), DatasetError> {
        let contents = "latitude,longitude\n20.0,-60.0\n\n21.0,-61.0\n";

        let points = parse_locations(contents)?;

        assert_eq!(points.len(), 2);
        Ok(())
    }

    #[test]
    fn cap_keeps_first_points_in_order_and_reports_total() {
        let points: Vec<GeoPoint> = (0..1500)
            .map(|i| GeoPoint::new(i as f64 / 100.0, -(i as f64) / 100.0))
            .collect();

        let (kept, truncated_from) = cap_points(points.clone(), MAX_DATASET_POINTS);

        assert_eq!(kept.len(), 1000);
        assert_eq!(kept.as_slice(), &points[..1000]);
        assert_eq!(truncated_from, Some(1500));
    }

    #[test]
    fn cap_is_a_no_op_below_the_limit() {
        let points = vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)];

        let (kept, truncated_from) = cap_points(points.clone(), MAX_DATASET_POINTS);

        assert_eq!(kept, points);
        assert_eq!(truncated_from, None);
    }

    #[test]
    fn csv_dataset_reads_from_disk() -> Result<(), Box<dyn std::error::Error>> {
        let unique = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
        let path = std::env::temp_dir().join(format!("forage-map-dataset-{unique}.csv"));
        fs::write(&path, "latitude,longitude\n20.0,-60.0\n")?;

        let result = CsvDataset::new(&path).load();
        let _ = fs::remove_file(&path);

        assert_eq!(result?, vec![GeoPoint::new(20.0, -60.0)]);
        Ok(())
    }

    #[test]
    fn missing_file_returns_read_error() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("forage-map-dataset-missing-{unique}.csv"));

        let result = CsvDataset::new(&path).load();

        assert!(matches!(result, Err(DatasetError::Read(_))));
    }
}
