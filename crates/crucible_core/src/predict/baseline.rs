//! Composition-strength baseline predictor.
//!
//! Success rate = strength / (strength + difficulty), clamped to
//! [0.30, 0.95]. OF members contribute full strength, ADE members
//! slightly less, and the mean difficulty the roster has already absorbed
//! feeds back as a small boost. Mainly a sanity baseline next to the
//! logistic model, and proof that the classifier seam is pluggable.

use super::features::FeatureVector;
use super::model::{Classifier, TrainingSample};
use crate::error::Result;

const OF_STRENGTH: f64 = 1.0;
const ADE_STRENGTH: f64 = 0.8;
const MIN_RATE: f64 = 0.30;
const MAX_RATE: f64 = 0.95;
const BOOST_DIVISOR: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct CompositionBaseline {
    /// Reference team size used to turn the OF ratio back into counts.
    pub team_size: f64,
}

impl Default for CompositionBaseline {
    fn default() -> Self {
        Self { team_size: 18.0 }
    }
}

impl Classifier for CompositionBaseline {
    fn algorithm(&self) -> &'static str {
        "composition_baseline"
    }

    fn fit(&self, samples: &[TrainingSample]) -> Result<Vec<f64>> {
        // The only fitted quantity is the performance boost: mean
        // difficulty seen so far, scaled down.
        let mean_score = if samples.is_empty() {
            0.0
        } else {
            samples.iter().map(|s| s.features.actual_score).sum::<f64>() / samples.len() as f64
        };
        Ok(vec![mean_score / BOOST_DIVISOR])
    }

    fn predict(&self, params: &[f64], features: &FeatureVector) -> f64 {
        let boost = params.first().copied().unwrap_or(0.0);
        let of_count = features.of_ratio.clamp(0.0, 1.0) * self.team_size;
        let ade_count = self.team_size - of_count;
        let strength = (of_count * OF_STRENGTH + ade_count * ADE_STRENGTH) * (1.0 + boost);
        let difficulty = features.actual_score.max(0.0);
        let rate = strength / (strength + difficulty);
        rate.clamp(MIN_RATE, MAX_RATE)
    }
}
