//! Kernel V1 rate model: a weighted sum of isotropic Gaussian kernels over
//! normalized (x, y), plus a baseline intensity. Stands in for the trained
//! sparse point-process artifact; the temporal coordinate is fixed upstream
//! and carries no weight in this backend.

use crate::predictor::PredictorError;
use crate::predictor::model::{ModelCoord, RatePrediction, RatePredictor};
use serde::Deserialize;

const DEFAULT_ALPHA: f64 = 1.0;

#[derive(Debug, Clone, Deserialize)]
pub struct KernelCenter {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KernelV1Params {
    pub baseline: f64,
    pub bandwidth: f64,
    /// Regularization strength applied when the caller requests it.
    pub alpha: Option<f64>,
    pub centers: Vec<KernelCenter>,
}

#[derive(Debug)]
pub struct KernelV1Model {
    params: KernelV1Params,
}

impl KernelV1Model {
    pub fn new(params: KernelV1Params) -> Result<Self, PredictorError> {
        if !(params.bandwidth > 0.0) || !params.bandwidth.is_finite() {
            return Err(PredictorError::Invalid(format!(
                "bandwidth must be positive and finite, got {}",
                params.bandwidth
            )));
        }
        if let Some(alpha) = params.alpha
            && (alpha < 0.0 || !alpha.is_finite())
        {
            return Err(PredictorError::Invalid(format!(
                "alpha must be non-negative and finite, got {alpha}"
            )));
        }
        Ok(Self { params })
    }

    fn rate_at(&self, coord: &ModelCoord, weight_scale: f64) -> f64 {
        let two_bw_sq = 2.0 * self.params.bandwidth * self.params.bandwidth;
        let mut rate = self.params.baseline;
        for center in &self.params.centers {
            let dx = coord.x - center.x;
            let dy = coord.y - center.y;
            rate += weight_scale * center.weight * (-(dx * dx + dy * dy) / two_bw_sq).exp();
        }
        rate
    }
}

impl RatePredictor for KernelV1Model {
    fn predict_rate(
        &self,
        coords: &[ModelCoord],
        sample_count: u32,
        alpha_regularization: bool,
    ) -> Result<RatePrediction, PredictorError> {
        let weight_scale = if alpha_regularization {
            1.0 / (1.0 + self.params.alpha.unwrap_or(DEFAULT_ALPHA))
        } else {
            1.0
        };
        // Monte Carlo std error shrinks with the sample budget.
        let spread = 1.0 / f64::from(sample_count).sqrt();

        let mut mean_rate = Vec::with_capacity(coords.len());
        let mut rate_std = Vec::with_capacity(coords.len());
        for coord in coords {
            let rate = self.rate_at(coord, weight_scale);
            mean_rate.push(rate);
            rate_std.push(rate * spread);
        }
        Ok(RatePrediction {
            mean_rate,
            rate_std,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_with_one_center() -> KernelV1Params {
        KernelV1Params {
            baseline: 0.05,
            bandwidth: 0.1,
            alpha: Some(1.0),
            centers: vec![KernelCenter {
                x: 0.5,
                y: 0.5,
                weight: 2.0,
            }],
        }
    }

    #[test]
    fn rate_peaks_at_kernel_center() -> Result<(), PredictorError> {
        let model = KernelV1Model::new(params_with_one_center())?;
        let coords = [
            ModelCoord {
                x: 0.5,
                y: 0.5,
                t: 1.0,
            },
            ModelCoord {
                x: 0.9,
                y: 0.9,
                t: 1.0,
            },
        ];

        let prediction = model.predict_rate(&coords, 500, true)?;

        assert_eq!(prediction.mean_rate.len(), 2);
        assert!(prediction.mean_rate[0] > prediction.mean_rate[1]);
        // At the center the exponent is zero: baseline + weight / (1 + alpha).
        assert!((prediction.mean_rate[0] - 1.05).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn regularization_shrinks_kernel_weights_only() -> Result<(), PredictorError> {
        let model = KernelV1Model::new(params_with_one_center())?;
        let center = [ModelCoord {
            x: 0.5,
            y: 0.5,
            t: 1.0,
        }];

        let regularized = model.predict_rate(&center, 500, true)?;
        let raw = model.predict_rate(&center, 500, false)?;

        assert!((regularized.mean_rate[0] - 1.05).abs() < 1e-12);
        assert!((raw.mean_rate[0] - 2.05).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn larger_sample_budget_tightens_rate_std() -> Result<(), PredictorError> {
        let model = KernelV1Model::new(params_with_one_center())?;
        let coords = [ModelCoord {
            x: 0.5,
            y: 0.5,
            t: 1.0,
        }];

        let coarse = model.predict_rate(&coords, 100, true)?;
        let fine = model.predict_rate(&coords, 2000, true)?;

        assert_eq!(coarse.mean_rate, fine.mean_rate);
        assert!(fine.rate_std[0] < coarse.rate_std[0]);
        Ok(())
    }

    #[test]
    fn non_positive_bandwidth_is_rejected() {
        let mut params = params_with_one_center();
        params.bandwidth = 0.0;

        assert!(matches!(
            KernelV1Model::new(params),
            Err(PredictorError::Invalid(_))
        ));
    }

    #[test]
    fn negative_alpha_is_rejected() {
        let mut params = params_with_one_center();
        params.alpha = Some(-0.5);

        assert!(matches!(
            KernelV1Model::new(params),
            Err(PredictorError::Invalid(_))
        ));
    }
}
