//! Inverse-solve calibration for Day 3-4 event parameters.

pub mod calibrator;

pub use calibrator::{CalibrationMode, CalibrationOutcome, DifficultyCalibrator};
