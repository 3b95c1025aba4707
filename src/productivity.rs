//! Simulated ocean productivity surface.
//!
//! A placeholder signal for the dashboard: 40 random points whose
//! productivity falls off with distance from the equator plus Gaussian
//! noise, clipped at zero. Regenerated on every refresh.

use crate::geo::GeoPoint;
use crate::state::ProductivityPoint;
use rand::Rng;
use rand_distr::StandardNormal;

pub const SURFACE_POINT_COUNT: usize = 40;

const LATITUDE_SPAN: f64 = 60.0;
const COSINE_WEIGHT: f64 = 0.7;
const NOISE_WEIGHT: f64 = 0.1;

pub fn simulate_surface() -> Vec<ProductivityPoint> {
    simulate_surface_with(&mut rand::thread_rng())
}

pub fn simulate_surface_with<R: Rng>(rng: &mut R) -> Vec<ProductivityPoint> {
    let mut points = Vec::with_capacity(SURFACE_POINT_COUNT);
    for _ in 0..SURFACE_POINT_COUNT {
        let latitude = rng.gen_range(-LATITUDE_SPAN..=LATITUDE_SPAN);
        let longitude = rng.gen_range(-180.0..=180.0);
        let noise: f64 = rng.sample(StandardNormal);
        let productivity =
            (COSINE_WEIGHT * latitude.to_radians().cos() + NOISE_WEIGHT * noise).max(0.0);
        points.push(ProductivityPoint {
            point: GeoPoint::new(latitude, longitude),
            productivity,
        });
    }
    points
}
