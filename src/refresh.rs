//! Refresh controller: the single entry point that turns the current tunable
//! parameters into a new overlay, dataset, and productivity surface.
//!
//! A refresh always reloads the dataset and always recomputes the overlay at
//! the current parameters; there is no diffing against previous settings.
//! The dataset and the overlay degrade independently, each with its own
//! warning. The outcome is committed to state as one unit: on overlay
//! success the generation counter advances by exactly one, on overlay
//! failure the previous overlay is cleared rather than left on display with
//! parameters that no longer match the controls.

use crate::dataset::{DatasetSource, MAX_DATASET_POINTS, cap_points};
use crate::error::AppError;
use crate::geo::TRAINING_BOUNDS;
use crate::grid::{GridError, GridSpec};
use crate::predictor::{PredictorError, PredictorSource, predict_overlay};
use crate::productivity;
use crate::state::{AppState, Overlay};
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{info, warn};

// Tunable parameter bounds exposed to the UI layer.
pub const LAT_RESOLUTION_RANGE: RangeInclusive<u32> = 10..=100;
pub const LON_RESOLUTION_RANGE: RangeInclusive<u32> = 20..=200;
pub const NUM_SAMPLES_RANGE: RangeInclusive<u32> = 100..=2000;

#[derive(Debug, Error, PartialEq)]
pub enum RefreshError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("{name} {got} outside allowed range {min}..={max}")]
    ParamOutOfRange {
        name: &'static str,
        got: u32,
        min: u32,
        max: u32,
    },
    #[error(transparent)]
    State(#[from] AppError),
}

/// Validated refresh parameters: grid resolutions and the Monte Carlo sample
/// budget, all within the bounds the sliders advertise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshParams {
    lat_resolution: u32,
    lon_resolution: u32,
    num_samples: u32,
}

impl RefreshParams {
    pub fn new(
        lat_resolution: u32,
        lon_resolution: u32,
        num_samples: u32,
    ) -> Result<Self, RefreshError> {
        check_range("lat_resolution", lat_resolution, LAT_RESOLUTION_RANGE)?;
        check_range("lon_resolution", lon_resolution, LON_RESOLUTION_RANGE)?;
        check_range("num_samples", num_samples, NUM_SAMPLES_RANGE)?;
        Ok(Self {
            lat_resolution,
            lon_resolution,
            num_samples,
        })
    }

    pub fn lat_resolution(&self) -> u32 {
        self.lat_resolution
    }

    pub fn lon_resolution(&self) -> u32 {
        self.lon_resolution
    }

    pub fn num_samples(&self) -> u32 {
        self.num_samples
    }
}

fn check_range(
    name: &'static str,
    got: u32,
    range: RangeInclusive<u32>,
) -> Result<(), RefreshError> {
    if range.contains(&got) {
        Ok(())
    } else {
        Err(RefreshError::ParamOutOfRange {
            name,
            got,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshWarning {
    PredictionUnavailable { reason: String },
    DatasetUnavailable { reason: String },
    DatasetTruncated { total: usize, kept: usize },
}

impl fmt::Display for RefreshWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshWarning::PredictionUnavailable { reason } => {
                write!(f, "model prediction not available: {reason}")
            }
            RefreshWarning::DatasetUnavailable { reason } => {
                write!(f, "could not load shark locations: {reason}")
            }
            RefreshWarning::DatasetTruncated { total, kept } => {
                write!(f, "dataset has {total} shark locations, showing the first {kept}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub generation: u64,
    pub overlay_ready: bool,
    pub dataset_points: usize,
    pub warnings: Vec<RefreshWarning>,
}

/// Run one full refresh cycle and commit the result.
///
/// Grid geometry is validated before any collaborator runs; a `RefreshError`
/// from that validation leaves the existing state untouched. Collaborator
/// failures past that point never abort the refresh — they degrade their own
/// slice of the outcome and show up in `warnings`.
pub fn run_refresh<P, D>(
    state: &Arc<RwLock<AppState>>,
    params: &RefreshParams,
    predictor_source: &P,
    dataset_source: &D,
) -> Result<RefreshOutcome, RefreshError>
where
    P: PredictorSource,
    D: DatasetSource,
{
    let spec = GridSpec::new(
        params.lat_resolution(),
        params.lon_resolution(),
        TRAINING_BOUNDS,
    )?;

    let mut warnings = Vec::new();

    let locations = match dataset_source.load() {
        Ok(points) => {
            let (kept, truncated_from) = cap_points(points, MAX_DATASET_POINTS);
            if let Some(total) = truncated_from {
                warn!(total, kept = kept.len(), "Dataset truncated");
                warnings.push(RefreshWarning::DatasetTruncated {
                    total,
                    kept: kept.len(),
                });
            }
            kept
        }
        Err(err) => {
            warn!(error = %err, "Failed to load shark locations");
            warnings.push(RefreshWarning::DatasetUnavailable {
                reason: err.to_string(),
            });
            Vec::new()
        }
    };

    let next_generation = {
        let guard = state.read().map_err(|_| AppError::StateLock)?;
        guard.generation() + 1
    };

    let overlay = match compute_overlay(&spec, params.num_samples(), predictor_source, next_generation)
    {
        Ok(overlay) => {
            log_rate_stats(&overlay);
            Some(overlay)
        }
        Err(err) => {
            warn!(error = %err, "Model prediction not available");
            warnings.push(RefreshWarning::PredictionUnavailable {
                reason: err.to_string(),
            });
            None
        }
    };

    let productivity = productivity::simulate_surface();

    let outcome = {
        let mut guard = state.write().map_err(|_| AppError::StateLock)?;
        guard.commit_refresh(overlay, locations, productivity);
        RefreshOutcome {
            generation: guard.generation(),
            overlay_ready: guard.overlay().is_some(),
            dataset_points: guard.locations().len(),
            warnings,
        }
    };

    info!(
        generation = outcome.generation,
        overlay_ready = outcome.overlay_ready,
        dataset_points = outcome.dataset_points,
        warnings = outcome.warnings.len(),
        "Refresh cycle complete"
    );
    Ok(outcome)
}

fn log_rate_stats(overlay: &Overlay) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut nonzero = 0usize;
    for entry in &overlay.entries {
        min = min.min(entry.rate);
        max = max.max(entry.rate);
        sum += entry.rate;
        if entry.rate != 0.0 {
            nonzero += 1;
        }
    }
    let total = overlay.entries.len();
    info!(
        min,
        max,
        mean = sum / total as f64,
        nonzero,
        total,
        "Prediction overlay stats"
    );
}

fn compute_overlay<P: PredictorSource>(
    spec: &GridSpec,
    num_samples: u32,
    predictor_source: &P,
    generation: u64,
) -> Result<Overlay, PredictorError> {
    let predictor = predictor_source.load()?;
    let grid = spec.build_grid();
    let entries = predict_overlay(predictor.as_ref(), &grid, spec.bounds(), num_samples)?;
    Ok(Overlay {
        lat_resolution: spec.lat_resolution(),
        lon_resolution: spec.lon_resolution(),
        entries,
        generation,
    })
}
