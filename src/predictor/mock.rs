use crate::predictor::PredictorError;
use crate::predictor::model::{ModelCoord, RatePrediction, RatePredictor, PredictorSource};

/// What the mock model returns for each point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockRate {
    /// The same rate for every query point.
    Constant(f64),
    /// `x + y` of the normalized query coordinate, so each grid point gets a
    /// distinct, position-derived rate. Useful for order checks.
    CoordinateSum,
}

#[derive(Debug, Clone, Copy)]
pub struct MockPredictorBehavior {
    pub predict_ok: bool,
    pub rate: MockRate,
    /// Drop this many entries from the output to simulate a model that
    /// violates the one-rate-per-point contract.
    pub missing_outputs: usize,
}

impl MockPredictorBehavior {
    pub fn constant(rate: f64) -> Self {
        Self {
            predict_ok: true,
            rate: MockRate::Constant(rate),
            missing_outputs: 0,
        }
    }

    pub fn coordinate_sum() -> Self {
        Self {
            predict_ok: true,
            rate: MockRate::CoordinateSum,
            missing_outputs: 0,
        }
    }

    pub fn fail_predict() -> Self {
        Self {
            predict_ok: false,
            rate: MockRate::Constant(0.0),
            missing_outputs: 0,
        }
    }

    pub fn short_output(missing_outputs: usize) -> Self {
        Self {
            predict_ok: true,
            rate: MockRate::Constant(0.0),
            missing_outputs,
        }
    }
}

#[derive(Debug)]
pub struct MockPredictor {
    behavior: MockPredictorBehavior,
}

impl MockPredictor {
    pub fn new(behavior: MockPredictorBehavior) -> Self {
        Self { behavior }
    }
}

impl RatePredictor for MockPredictor {
    fn predict_rate(
        &self,
        coords: &[ModelCoord],
        _sample_count: u32,
        _alpha_regularization: bool,
    ) -> Result<RatePrediction, PredictorError> {
        if !self.behavior.predict_ok {
            return Err(PredictorError::Prediction(
                "mock predict failed".to_string(),
            ));
        }

        let count = coords.len().saturating_sub(self.behavior.missing_outputs);
        let mean_rate: Vec<f64> = coords[..count]
            .iter()
            .map(|coord| match self.behavior.rate {
                MockRate::Constant(rate) => rate,
                MockRate::CoordinateSum => coord.x + coord.y,
            })
            .collect();
        let rate_std = vec![0.0; mean_rate.len()];
        Ok(RatePrediction {
            mean_rate,
            rate_std,
        })
    }
}

/// Predictor source with scripted load behavior, mirroring how tests drive
/// the artifact loader without a file on disk.
#[derive(Debug, Clone, Copy)]
pub struct MockPredictorSource {
    behavior: MockPredictorBehavior,
    load_ok: bool,
}

impl MockPredictorSource {
    pub fn new(behavior: MockPredictorBehavior) -> Self {
        Self {
            behavior,
            load_ok: true,
        }
    }

    pub fn fail_load() -> Self {
        Self {
            behavior: MockPredictorBehavior::constant(0.0),
            load_ok: false,
        }
    }
}

impl PredictorSource for MockPredictorSource {
    fn load(&self) -> Result<Box<dyn RatePredictor>, PredictorError> {
        if self.load_ok {
            Ok(Box::new(MockPredictor::new(self.behavior)))
        } else {
            Err(PredictorError::Invalid("mock load failed".to_string()))
        }
    }
}
