//! # crucible_core - Selection Event Scoring Engine
//!
//! Scoring, rebalancing, and calibration engine for a four-day team
//! selection event: difficulty scores per team per event, an append-only
//! drop ledger, the Day-2 -> Day-3 team rebalance, inverse-solve
//! difficulty calibration for Day 3-4 events, and a success-probability
//! predictor over the score history.
//!
//! ## Features
//! - Pure, deterministic score formulas with typed numeric guards
//! - Ratio-preserving snake-draft rebalancing (deterministic heuristic)
//! - One-shot calibration and rebalance transitions over a versioned store
//! - Pluggable fit/predict classifier capability

pub mod calibration;
pub mod data;
pub mod error;
pub mod export;
pub mod models;
pub mod predict;
pub mod rebalance;
pub mod scoring;
pub mod state;

pub use error::{EngineError, Result};

pub use models::{
    CandidateType, DifficultyScore, Equipment, EquipmentSlot, Event, EventKey, Participant,
    Phase, TeamAssignment,
};

pub use calibration::{CalibrationMode, CalibrationOutcome, DifficultyCalibrator};
pub use rebalance::TeamRebalancer;
pub use scoring::{DropLedger, DropRecord, ScoreCalculator};

pub use predict::{
    Classifier, CompositionBaseline, FeatureVector, LogisticRegression, Outcome,
    PredictionModel, SuccessPredictor, TrainingSample, FEATURE_COUNT, FEATURE_NAMES,
};

pub use export::{
    calibration_row, prediction_row, reassignment_table, score_table, CalibrationRow,
    PredictionRow, ReassignmentRow, Recommendation, ScoreRow,
};

pub use state::{
    get_state, get_state_mut, reset_state, set_state, CompetitionState, ENGINE_STATE,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationMode;
    use crate::data::{default_event_rows, default_roster_rows};
    use std::time::Duration;

    /// Full lifecycle: load, score Days 1-2, rebalance, calibrate Day 4,
    /// score it, train, predict.
    #[test]
    fn end_to_end_competition_flow() {
        let mut state =
            CompetitionState::from_rows(&default_roster_rows(), &default_event_rows()).unwrap();

        let day1_keys: Vec<EventKey> = state
            .events
            .iter()
            .filter(|e| e.day <= 2)
            .map(|e| e.key())
            .collect();
        for key in &day1_keys {
            for team in 1..=10u64 {
                let limit = state.event(key).unwrap().time_limit;
                state
                    .record_result(
                        &format!("Team {}", team),
                        key,
                        limit + Duration::from_secs(team * 60),
                    )
                    .unwrap();
            }
        }

        let assignment = state.rebalance(10).unwrap().clone();
        assert_eq!(assignment.roster_size(), 180);

        let day4_key = state.events.iter().find(|e| e.day == 4).unwrap().key();
        let outcome = state
            .calibrate_event(&day4_key, 0.5, &CalibrationMode::Weight)
            .unwrap();
        assert!((outcome.resulting_score - 0.5).abs() < 1e-9);
        let calibrated = state.event(&day4_key).unwrap();
        let score =
            ScoreCalculator::initial_difficulty(calibrated, calibrated.total_weight()).unwrap();
        assert!(((score - 0.5) / 0.5).abs() < 1e-6);

        state
            .record_result("Team 1", &day4_key, Duration::from_secs(610 * 60))
            .unwrap();

        let samples = state.training_set(0.1).unwrap();
        assert!(samples.len() >= FEATURE_COUNT + 1);
        let predictor = SuccessPredictor::logistic();
        let model = predictor.fit(&samples).unwrap();
        let row = prediction_row(&state, "Team 5", &day4_key, &predictor, &model).unwrap();
        assert!((0.0..=1.0).contains(&row.success_probability));
    }
}
