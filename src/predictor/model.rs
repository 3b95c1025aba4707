//! Rate-prediction capability traits.
//!
//! The trained model is opaque to the rest of the service: it takes a batch
//! of normalized query coordinates plus a Monte Carlo sample budget and
//! returns one rate estimate per coordinate. Backends are selected via the
//! model artifact file and loaded once per refresh.

use crate::predictor::PredictorError;

/// Query coordinate in the model's normalized frame. `x` is normalized
/// longitude and `y` is normalized latitude — the column order the artifact
/// was trained with, not the (lat, lon) order used elsewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelCoord {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

/// Batched model output, one element per query coordinate, in query order.
#[derive(Debug, Clone, PartialEq)]
pub struct RatePrediction {
    pub mean_rate: Vec<f64>,
    /// Posterior spread per point. Reported by backends but ignored by the
    /// overlay pipeline.
    pub rate_std: Vec<f64>,
}

pub trait RatePredictor: Send + Sync + std::fmt::Debug {
    /// Predict the mean rate at each coordinate with one batched call.
    fn predict_rate(
        &self,
        coords: &[ModelCoord],
        sample_count: u32,
        alpha_regularization: bool,
    ) -> Result<RatePrediction, PredictorError>;
}

/// Source of a loaded predictor, invoked once per refresh cycle. A load
/// failure degrades that refresh to an unavailable overlay; it never aborts
/// the service.
pub trait PredictorSource {
    fn load(&self) -> Result<Box<dyn RatePredictor>, PredictorError>;
}
