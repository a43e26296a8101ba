use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::features::{FeatureVector, FEATURE_COUNT};
use super::logistic::LogisticRegression;
use crate::error::{EngineError, Result};

/// Whether the team cleared the caller's drop-rate threshold for the
/// event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn label(&self) -> f64 {
        match self {
            Outcome::Success => 1.0,
            Outcome::Failure => 0.0,
        }
    }
}

/// One training row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub features: FeatureVector,
    pub outcome: Outcome,
}

/// Fit/predict capability.
///
/// Any classifier satisfying this contract can back the predictor; the
/// engine does not mandate an algorithm. Fitted parameters are opaque to
/// everything except the classifier that produced them.
pub trait Classifier {
    fn algorithm(&self) -> &'static str;

    /// Fit on the training set, returning opaque fitted parameters.
    fn fit(&self, samples: &[TrainingSample]) -> Result<Vec<f64>>;

    /// Probability of success in [0, 1] under previously fitted
    /// parameters.
    fn predict(&self, params: &[f64], features: &FeatureVector) -> f64;
}

/// An immutable fitted model: opaque parameters plus the schema that
/// produced them, versioned by training timestamp and training-set size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionModel {
    pub id: Uuid,
    pub algorithm: String,
    pub feature_names: Vec<String>,
    pub params: Vec<f64>,
    pub trained_at: DateTime<Utc>,
    pub sample_count: usize,
}

/// Front end over a [`Classifier`]: enforces the minimum-sample rule on
/// fit and the schema contract on predict.
pub struct SuccessPredictor {
    classifier: Box<dyn Classifier>,
}

impl SuccessPredictor {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// The shipped default: logistic regression.
    pub fn logistic() -> Self {
        Self::new(Box::new(LogisticRegression::default()))
    }

    /// Fit an immutable model. Requires at least one more sample than
    /// there are feature dimensions.
    pub fn fit(&self, samples: &[TrainingSample]) -> Result<PredictionModel> {
        let required = FEATURE_COUNT + 1;
        if samples.len() < required {
            return Err(EngineError::InsufficientTrainingData {
                samples: samples.len(),
                required,
            });
        }
        let params = self.classifier.fit(samples)?;
        let model = PredictionModel {
            id: Uuid::new_v4(),
            algorithm: self.classifier.algorithm().to_string(),
            feature_names: FeatureVector::schema(),
            params,
            trained_at: Utc::now(),
            sample_count: samples.len(),
        };
        info!(
            "fitted {} model {} on {} samples",
            model.algorithm, model.id, model.sample_count
        );
        Ok(model)
    }

    /// Success probability in [0, 1] for a prospective team/event
    /// feature row.
    pub fn predict(&self, model: &PredictionModel, features: &FeatureVector) -> Result<f64> {
        if model.feature_names != FeatureVector::schema() {
            return Err(EngineError::FeatureSchemaMismatch {
                expected: model.feature_names.join(", "),
                found: FeatureVector::schema().join(", "),
            });
        }
        if model.algorithm != self.classifier.algorithm() {
            return Err(EngineError::FeatureSchemaMismatch {
                expected: model.algorithm.clone(),
                found: self.classifier.algorithm().to_string(),
            });
        }
        Ok(self.classifier.predict(&model.params, features).clamp(0.0, 1.0))
    }
}
