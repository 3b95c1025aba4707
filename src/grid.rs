//! Prediction grid sampling over a geographic bounding box.

use crate::geo::{BoundingBox, GeoPoint};
use thiserror::Error;

/// Minimum points per axis. A single-point "grid" would still zip against
/// model output positionally and silently render a broken heatmap, so it is
/// rejected up front.
pub const MIN_RESOLUTION: u32 = 2;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error(
        "grid needs at least 2 points per axis, \
         got {lat_resolution}x{lon_resolution}"
    )]
    InvalidResolution {
        lat_resolution: u32,
        lon_resolution: u32,
    },
}

/// An evenly spaced query lattice: `lat_resolution` x `lon_resolution` points
/// over `bounds`, both box edges included on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    lat_resolution: u32,
    lon_resolution: u32,
    bounds: BoundingBox,
}

impl GridSpec {
    pub fn new(
        lat_resolution: u32,
        lon_resolution: u32,
        bounds: BoundingBox,
    ) -> Result<Self, GridError> {
        if lat_resolution < MIN_RESOLUTION || lon_resolution < MIN_RESOLUTION {
            return Err(GridError::InvalidResolution {
                lat_resolution,
                lon_resolution,
            });
        }
        Ok(Self {
            lat_resolution,
            lon_resolution,
            bounds,
        })
    }

    pub fn lat_resolution(&self) -> u32 {
        self.lat_resolution
    }

    pub fn lon_resolution(&self) -> u32 {
        self.lon_resolution
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn point_count(&self) -> usize {
        self.lat_resolution as usize * self.lon_resolution as usize
    }

    /// Build the lattice, outer loop over latitude, inner loop over
    /// longitude. Every consumer zips model rates back onto these points by
    /// position, so this order is a contract, not an implementation detail.
    pub fn build_grid(&self) -> Vec<GeoPoint> {
        let lats = linspace(
            self.bounds.lat_min(),
            self.bounds.lat_max(),
            self.lat_resolution as usize,
        );
        let lons = linspace(
            self.bounds.lon_min(),
            self.bounds.lon_max(),
            self.lon_resolution as usize,
        );

        let mut points = Vec::with_capacity(self.point_count());
        for &lat in &lats {
            for &lon in &lons {
                points.push(GeoPoint::new(lat, lon));
            }
        }
        points
    }
}

/// `count` evenly spaced values from `start` to `end` inclusive. The
/// endpoints are pinned exactly: accumulated float error must not move a
/// query point off the box edge.
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    let span = end - start;
    let denom = (count - 1) as f64;
    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        if i == 0 {
            values.push(start);
        } else if i == count - 1 {
            values.push(end);
        } else {
            values.push(start + span * i as f64 / denom);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::TRAINING_BOUNDS;

    #[test]
    fn grid_has_exact_point_count_and_edge_values() {
        let spec = GridSpec::new(5, 9, TRAINING_BOUNDS).expect("valid spec");
        let grid = spec.build_grid();

        assert_eq!(grid.len(), 45);
        let first = grid.first().expect("non-empty grid");
        let last = grid.last().expect("non-empty grid");
        assert_eq!(first.latitude, TRAINING_BOUNDS.lat_min());
        assert_eq!(first.longitude, TRAINING_BOUNDS.lon_min());
        assert_eq!(last.latitude, TRAINING_BOUNDS.lat_max());
        assert_eq!(last.longitude, TRAINING_BOUNDS.lon_max());
    }

    #[test]
    fn longitude_varies_fastest() {
        let spec = GridSpec::new(3, 4, TRAINING_BOUNDS).expect("valid spec");
        let grid = spec.build_grid();

        // The first row holds one latitude across all longitudes.
        for point in &grid[..4] {
            assert_eq!(point.latitude, TRAINING_BOUNDS.lat_min());
        }
        assert_eq!(grid[0].longitude, TRAINING_BOUNDS.lon_min());
        assert_eq!(grid[3].longitude, TRAINING_BOUNDS.lon_max());
        assert!(grid[4].latitude > grid[0].latitude);
    }

    #[test]
    fn resolution_below_two_is_rejected_on_either_axis() {
        assert_eq!(
            GridSpec::new(1, 10, TRAINING_BOUNDS),
            Err(GridError::InvalidResolution {
                lat_resolution: 1,
                lon_resolution: 10,
            })
        );
        assert_eq!(
            GridSpec::new(10, 1, TRAINING_BOUNDS),
            Err(GridError::InvalidResolution {
                lat_resolution: 10,
                lon_resolution: 1,
            })
        );
        assert!(matches!(
            GridSpec::new(0, 0, TRAINING_BOUNDS),
            Err(GridError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn two_by_two_grid_is_the_four_box_corners() {
        let spec = GridSpec::new(2, 2, TRAINING_BOUNDS).expect("valid spec");
        let grid = spec.build_grid();

        assert_eq!(
            grid,
            vec![
                GeoPoint::new(8.0, -98.0),
                GeoPoint::new(8.0, -25.0),
                GeoPoint::new(55.0, -98.0),
                GeoPoint::new(55.0, -25.0),
            ]
        );
    }

    #[test]
    fn interior_spacing_is_even() {
        let values = linspace(0.0, 10.0, 5);
        assert_eq!(values, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }
}
