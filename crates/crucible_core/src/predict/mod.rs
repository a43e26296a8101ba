//! # Team Success Prediction
//!
//! A fit/predict contract over historical (team, event, score, outcome)
//! tuples. The classifier behind it is a pluggable capability: anything
//! implementing [`Classifier`] can back the predictor. Two
//! implementations ship with the engine - an L2-regularized logistic
//! regression (the default) and the composition-strength baseline.

pub mod baseline;
pub mod features;
pub mod logistic;
pub mod model;

pub use baseline::CompositionBaseline;
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use logistic::LogisticRegression;
pub use model::{Classifier, Outcome, PredictionModel, SuccessPredictor, TrainingSample};
