//! Geographic primitives and coordinate normalization.
//!
//! The prediction model was trained on coordinates normalized into the unit
//! square against a fixed bounding box. That box is part of the model's
//! contract: it must be the same for every prediction call in a session, so
//! it lives here as a constant rather than in configuration.

use thiserror::Error;

/// Fixed temporal coordinate attached to every prediction query. The model
/// expects a "latest time" marker, not a resolution-dependent value.
pub const LATEST_TIME: f64 = 1.0;

/// Geographic rectangle the prediction model was calibrated against.
pub const TRAINING_BOUNDS: BoundingBox = BoundingBox {
    lat_min: 8.0,
    lat_max: 55.0,
    lon_min: -98.0,
    lon_max: -25.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Geographic rectangle with `lat_min < lat_max` and `lon_min < lon_max`,
/// enforced at construction so normalization can never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error(
        "bounding box must satisfy min < max on both axes, \
         got lat {lat_min}..{lat_max}, lon {lon_min}..{lon_max}"
    )]
    EmptyBox {
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    },
}

impl BoundingBox {
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Result<Self, GeoError> {
        if !(lat_min < lat_max) || !(lon_min < lon_max) {
            return Err(GeoError::EmptyBox {
                lat_min,
                lat_max,
                lon_min,
                lon_max,
            });
        }
        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    pub fn lon_max(&self) -> f64 {
        self.lon_max
    }

    /// Project a point into the unit square used by the prediction model.
    ///
    /// Points inside the box land in [0,1] on both axes. Points outside pass
    /// through to out-of-[0,1] values without clamping: the grid sampler only
    /// generates in-box points, and arbitrary external inputs should surface
    /// an out-of-domain query rather than be silently pulled to the edge.
    pub fn normalize(&self, point: GeoPoint) -> NormalizedPoint {
        NormalizedPoint {
            lat_norm: (point.latitude - self.lat_min) / (self.lat_max - self.lat_min),
            lon_norm: (point.longitude - self.lon_min) / (self.lon_max - self.lon_min),
            t: LATEST_TIME,
        }
    }
}

/// A point in the model's normalized coordinate frame, plus the fixed
/// temporal marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    pub lat_norm: f64,
    pub lon_norm: f64,
    pub t: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_box_points_normalize_into_unit_square() {
        let bounds = BoundingBox::new(8.0, 55.0, -98.0, -25.0).expect("valid box");
        let corners = [
            GeoPoint::new(8.0, -98.0),
            GeoPoint::new(8.0, -25.0),
            GeoPoint::new(55.0, -98.0),
            GeoPoint::new(55.0, -25.0),
            GeoPoint::new(31.5, -61.5),
        ];

        for point in corners {
            let normalized = bounds.normalize(point);
            assert!(
                (0.0..=1.0).contains(&normalized.lat_norm),
                "lat_norm {} out of range for {point:?}",
                normalized.lat_norm
            );
            assert!(
                (0.0..=1.0).contains(&normalized.lon_norm),
                "lon_norm {} out of range for {point:?}",
                normalized.lon_norm
            );
            assert_eq!(normalized.t, LATEST_TIME);
        }
    }

    #[test]
    fn box_edges_normalize_to_exact_zero_and_one() {
        let bounds = TRAINING_BOUNDS;
        let low = bounds.normalize(GeoPoint::new(8.0, -98.0));
        let high = bounds.normalize(GeoPoint::new(55.0, -25.0));

        assert_eq!(low.lat_norm, 0.0);
        assert_eq!(low.lon_norm, 0.0);
        assert_eq!(high.lat_norm, 1.0);
        assert_eq!(high.lon_norm, 1.0);
    }

    #[test]
    fn out_of_box_points_pass_through_unclamped() {
        let bounds = TRAINING_BOUNDS;

        let south = bounds.normalize(GeoPoint::new(-10.0, -61.5));
        assert!(south.lat_norm < 0.0);

        let east = bounds.normalize(GeoPoint::new(31.5, 0.0));
        assert!(east.lon_norm > 1.0);
    }

    #[test]
    fn degenerate_box_is_rejected() {
        assert!(matches!(
            BoundingBox::new(10.0, 10.0, -98.0, -25.0),
            Err(GeoError::EmptyBox { .. })
        ));
        assert!(matches!(
            BoundingBox::new(8.0, 55.0, -25.0, -98.0),
            Err(GeoError::EmptyBox { .. })
        ));
    }
}
