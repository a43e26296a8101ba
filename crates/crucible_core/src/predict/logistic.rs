//! L2-regularized logistic regression, fit by deterministic batch
//! gradient descent on standardized features.
//!
//! Parameter layout: `[w_0..w_3, bias, mean_0..mean_3, std_0..std_3]` -
//! the standardization constants travel with the weights so prediction
//! sees the same feature scaling as training.

use nalgebra::{DMatrix, DVector};

use super::features::{FeatureVector, FEATURE_COUNT};
use super::model::{Classifier, TrainingSample};
use crate::error::{EngineError, Result};

const L2_REG: f64 = 0.06;
const MAX_ITERS: usize = 2200;
const LEARNING_RATE: f64 = 0.08;
const IMPROVEMENT_EPS: f64 = 1e-9;

const PARAM_LEN: usize = FEATURE_COUNT * 3 + 1;

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub l2: f64,
    pub max_iters: usize,
    pub learning_rate: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            l2: L2_REG,
            max_iters: MAX_ITERS,
            learning_rate: LEARNING_RATE,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticRegression {
    fn algorithm(&self) -> &'static str {
        "logistic_regression"
    }

    fn fit(&self, samples: &[TrainingSample]) -> Result<Vec<f64>> {
        let n = samples.len();
        if n < FEATURE_COUNT + 1 {
            return Err(EngineError::InsufficientTrainingData {
                samples: n,
                required: FEATURE_COUNT + 1,
            });
        }

        // Per-column mean and standard deviation for standardization.
        let mut mean = [0.0f64; FEATURE_COUNT];
        let mut std = [0.0f64; FEATURE_COUNT];
        for sample in samples {
            for (j, v) in sample.features.as_array().iter().enumerate() {
                mean[j] += v;
            }
        }
        for m in &mut mean {
            *m /= n as f64;
        }
        for sample in samples {
            for (j, v) in sample.features.as_array().iter().enumerate() {
                std[j] += (v - mean[j]).powi(2);
            }
        }
        for s in &mut std {
            *s = (*s / n as f64).sqrt();
            if *s < 1e-12 {
                *s = 1.0; // constant column, leave it centered
            }
        }

        let rows: Vec<f64> = samples
            .iter()
            .flat_map(|sample| {
                let raw = sample.features.as_array();
                (0..FEATURE_COUNT)
                    .map(move |j| (raw[j] - mean[j]) / std[j])
                    .collect::<Vec<f64>>()
            })
            .collect();
        let x = DMatrix::from_row_slice(n, FEATURE_COUNT, &rows);
        let y = DVector::from_iterator(n, samples.iter().map(|s| s.outcome.label()));

        let mut w = DVector::zeros(FEATURE_COUNT);
        let mut bias = 0.0f64;
        let mut prev_loss = f64::INFINITY;

        for _ in 0..self.max_iters {
            let z = &x * &w;
            let p = DVector::from_iterator(n, z.iter().map(|zi| sigmoid(zi + bias)));
            let residual = &p - &y;

            let grad_w = (x.transpose() * &residual) / n as f64 + &w * self.l2;
            let grad_b = residual.sum() / n as f64;
            w -= grad_w * self.learning_rate;
            bias -= grad_b * self.learning_rate;

            let loss = -samples
                .iter()
                .zip(p.iter())
                .map(|(s, pi)| {
                    let pi = pi.clamp(1e-12, 1.0 - 1e-12);
                    s.outcome.label() * pi.ln() + (1.0 - s.outcome.label()) * (1.0 - pi).ln()
                })
                .sum::<f64>()
                / n as f64
                + 0.5 * self.l2 * w.norm_squared();
            if prev_loss - loss < IMPROVEMENT_EPS {
                break;
            }
            prev_loss = loss;
        }

        let mut params = Vec::with_capacity(PARAM_LEN);
        params.extend(w.iter());
        params.push(bias);
        params.extend_from_slice(&mean);
        params.extend_from_slice(&std);
        Ok(params)
    }

    fn predict(&self, params: &[f64], features: &FeatureVector) -> f64 {
        if params.len() != PARAM_LEN {
            return 0.5; // unfit or foreign parameters
        }
        let (w, rest) = params.split_at(FEATURE_COUNT);
        let (bias, rest) = rest.split_first().unwrap();
        let (mean, std) = rest.split_at(FEATURE_COUNT);

        let raw = features.as_array();
        let z: f64 = (0..FEATURE_COUNT)
            .map(|j| w[j] * (raw[j] - mean[j]) / std[j])
            .sum::<f64>()
            + bias;
        sigmoid(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::model::Outcome;

    fn sample(score: f64, outcome: Outcome) -> TrainingSample {
        TrainingSample {
            features: FeatureVector {
                actual_score: score,
                of_ratio: 0.5,
                day: 2.0,
                heat_category: 3.0,
            },
            outcome,
        }
    }

    #[test]
    fn fit_is_deterministic() {
        let samples: Vec<TrainingSample> = (0..10)
            .map(|i| {
                sample(
                    0.02 * (i + 1) as f64,
                    if i < 5 { Outcome::Success } else { Outcome::Failure },
                )
            })
            .collect();
        let clf = LogisticRegression::default();
        assert_eq!(clf.fit(&samples).unwrap(), clf.fit(&samples).unwrap());
    }

    #[test]
    fn param_layout_round_trips() {
        let samples: Vec<TrainingSample> = (0..8)
            .map(|i| {
                sample(
                    0.05 * (i + 1) as f64,
                    if i % 2 == 0 { Outcome::Success } else { Outcome::Failure },
                )
            })
            .collect();
        let clf = LogisticRegression::default();
        let params = clf.fit(&samples).unwrap();
        assert_eq!(params.len(), PARAM_LEN);
        let p = clf.predict(&params, &samples[0].features);
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn malformed_params_fall_back_to_even_odds() {
        let clf = LogisticRegression::default();
        let p = clf.predict(&[1.0, 2.0], &sample(0.1, Outcome::Success).features);
        assert_eq!(p, 0.5);
    }

    #[test]
    fn constant_column_does_not_divide_by_zero() {
        // of_ratio, day, heat are constant across this set.
        let samples: Vec<TrainingSample> = (0..6)
            .map(|i| {
                sample(
                    0.1 * (i + 1) as f64,
                    if i < 3 { Outcome::Success } else { Outcome::Failure },
                )
            })
            .collect();
        let clf = LogisticRegression::default();
        let params = clf.fit(&samples).unwrap();
        assert!(params.iter().all(|v| v.is_finite()));
    }
}
