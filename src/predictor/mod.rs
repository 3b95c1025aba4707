use crate::geo::{BoundingBox, GeoPoint};
use crate::state::OverlayEntry;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod kernel_v1;
pub mod mock;
pub mod model;

use kernel_v1::{KernelV1Model, KernelV1Params};
use model::{ModelCoord, RatePredictor};
pub use model::PredictorSource;

/// The artifact was trained with regularization on and nothing upstream
/// varies it, so it is fixed here rather than exposed as a tunable.
const ALPHA_REGULARIZATION: bool = true;

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("failed to read model artifact: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
    #[error("rate prediction failed: {0}")]
    Prediction(String),
    #[error("model returned {got} rates for {expected} query points")]
    OutputLength { expected: usize, got: usize },
}

/// On-disk model description: which backend to build and its parameters.
#[derive(Debug, Deserialize)]
pub struct ModelArtifact {
    pub model: String,
    pub params: serde_json::Value,
}

// Model factory
pub fn create_predictor(artifact: &ModelArtifact) -> Result<Box<dyn RatePredictor>, PredictorError> {
    match artifact.model.as_str() {
        "kernel_v1" => {
            let params: KernelV1Params = serde_json::from_value(artifact.params.clone())?;
            Ok(Box::new(KernelV1Model::new(params)?))
        }
        other => Err(PredictorError::Invalid(format!("unknown model: {other}"))),
    }
}

pub fn load_predictor_from_path(
    path: impl AsRef<Path>,
) -> Result<Box<dyn RatePredictor>, PredictorError> {
    let contents = std::fs::read_to_string(path)?;
    let artifact: ModelArtifact = serde_json::from_str(&contents)?;
    create_predictor(&artifact)
}

/// Loads the predictor from the artifact file, once per refresh. With no
/// configured path every load fails, which the refresh controller degrades
/// to an unavailable overlay.
#[derive(Debug, Clone)]
pub struct ArtifactSource {
    path: Option<PathBuf>,
}

impl ArtifactSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn unconfigured() -> Self {
        Self { path: None }
    }
}

impl PredictorSource for ArtifactSource {
    fn load(&self) -> Result<Box<dyn RatePredictor>, PredictorError> {
        match &self.path {
            Some(path) => load_predictor_from_path(path),
            None => Err(PredictorError::Invalid(
                "no model artifact configured".to_string(),
            )),
        }
    }
}

/// Run one batched prediction over `grid` and zip the rates back onto the
/// original points.
///
/// Grid points are normalized against `bounds` and sent as (x, y, t) with
/// x = normalized longitude. The model is called exactly once for the whole
/// batch; per-point calls would forfeit the shared regularization the model
/// applies across a batch. Output entries keep the grid's order and carry
/// the un-normalized coordinates — the renderer positions heat cells in
/// geographic space, not model space.
pub fn predict_overlay(
    predictor: &dyn RatePredictor,
    grid: &[GeoPoint],
    bounds: &BoundingBox,
    sample_count: u32,
) -> Result<Vec<OverlayEntry>, PredictorError> {
    if sample_count == 0 {
        return Err(PredictorError::Prediction(
            "sample count must be positive".to_string(),
        ));
    }

    let coords: Vec<ModelCoord> = grid
        .iter()
        .map(|&point| {
            let normalized = bounds.normalize(point);
            ModelCoord {
                x: normalized.lon_norm,
                y: normalized.lat_norm,
                t: normalized.t,
            }
        })
        .collect();

    let prediction = predictor.predict_rate(&coords, sample_count, ALPHA_REGULARIZATION)?;
    if prediction.mean_rate.len() != grid.len() {
        return Err(PredictorError::OutputLength {
            expected: grid.len(),
            got: prediction.mean_rate.len(),
        });
    }

    Ok(grid
        .iter()
        .zip(prediction.mean_rate)
        .map(|(&point, rate)| OverlayEntry { point, rate })
        .collect())
}
