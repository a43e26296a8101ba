//! Presentation-boundary tables.
//!
//! Flat, serializable rows for the exporting/rendering collaborator.
//! Persistence and layout are its concern; the engine only guarantees the
//! column sets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationOutcome;
use crate::error::Result;
use crate::models::EventKey;
use crate::predict::{PredictionModel, SuccessPredictor};
use crate::state::CompetitionState;

/// One line of the per-(team, event) score table. Latest versions only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreRow {
    pub team: String,
    pub event_name: String,
    pub day: u8,
    pub initial_score: f64,
    pub actual_score: f64,
    pub effective_participants: u32,
}

/// One line of the post-rebalance assignment table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReassignmentRow {
    pub roster_number: u32,
    pub new_team: String,
}

/// Calibration result for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalibrationRow {
    pub event_name: String,
    pub new_equipment_weight: Option<f64>,
    pub new_distance_km: Option<f64>,
    pub resulting_score: f64,
}

/// Advice band derived from the predicted probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Recommendation {
    High,
    Moderate,
    AtRisk,
}

impl Recommendation {
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.80 {
            Recommendation::High
        } else if probability > 0.60 {
            Recommendation::Moderate
        } else {
            Recommendation::AtRisk
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Recommendation::High => "This team has a high likelihood of success for this event.",
            Recommendation::Moderate => {
                "This team has a moderate likelihood of success for this event."
            }
            Recommendation::AtRisk => {
                "This team may struggle with this event. Consider adjusting the event \
                 difficulty or team composition."
            }
        }
    }
}

/// Prediction result for one team/event pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionRow {
    pub team: String,
    pub event_name: String,
    pub success_probability: f64,
    pub recommendation: Recommendation,
}

/// Latest score versions as a flat table, ordered by day, event number,
/// event name, team.
pub fn score_table(state: &CompetitionState) -> Vec<ScoreRow> {
    state
        .current_scores()
        .into_iter()
        .map(|score| ScoreRow {
            team: score.team.clone(),
            event_name: score.event.name.clone(),
            day: score.event.day,
            initial_score: score.initial_score,
            actual_score: score.actual_score,
            effective_participants: score.effective_participants,
        })
        .collect()
}

/// The Days 3-4 assignment as a flat table ordered by roster number.
/// Empty until the rebalance has run.
pub fn reassignment_table(state: &CompetitionState) -> Vec<ReassignmentRow> {
    let Some(assignment) = &state.rebalanced_assignment else {
        return Vec::new();
    };
    let mut rows: Vec<ReassignmentRow> = assignment
        .teams
        .iter()
        .flat_map(|(team, members)| {
            members.iter().map(|&roster_number| ReassignmentRow {
                roster_number,
                new_team: team.clone(),
            })
        })
        .collect();
    rows.sort_by_key(|row| row.roster_number);
    rows
}

pub fn calibration_row(outcome: &CalibrationOutcome) -> CalibrationRow {
    CalibrationRow {
        event_name: outcome.event.name.clone(),
        new_equipment_weight: outcome.new_total_weight,
        new_distance_km: outcome.new_distance_km,
        resulting_score: outcome.resulting_score,
    }
}

/// Predict success for a prospective team/event pairing and band the
/// result.
pub fn prediction_row(
    state: &CompetitionState,
    team: &str,
    key: &EventKey,
    predictor: &SuccessPredictor,
    model: &PredictionModel,
) -> Result<PredictionRow> {
    let features = state.features_for(team, key)?;
    let probability = predictor.predict(model, &features)?;
    Ok(PredictionRow {
        team: team.to_string(),
        event_name: key.name.clone(),
        success_probability: probability,
        recommendation: Recommendation::from_probability(probability),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationMode;
    use crate::data::{default_event_rows, default_roster_rows};
    use crate::predict::{FeatureVector, Outcome, SuccessPredictor, TrainingSample};
    use std::time::Duration;

    fn loaded_state() -> CompetitionState {
        CompetitionState::from_rows(&default_roster_rows(), &default_event_rows()).unwrap()
    }

    #[test]
    fn rows_serialize_for_the_exporter() {
        let row = ScoreRow {
            team: "Team 1".to_string(),
            event_name: "JUNK YARD".to_string(),
            day: 4,
            initial_score: 0.27,
            actual_score: 0.31,
            effective_participants: 16,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["team"], "Team 1");
        assert_eq!(json["effective_participants"], 16);
        let back: ScoreRow = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn recommendation_bands() {
        assert_eq!(Recommendation::from_probability(0.9), Recommendation::High);
        assert_eq!(Recommendation::from_probability(0.7), Recommendation::Moderate);
        assert_eq!(Recommendation::from_probability(0.6), Recommendation::AtRisk);
        assert_eq!(Recommendation::from_probability(0.1), Recommendation::AtRisk);
    }

    #[test]
    fn score_table_uses_latest_versions() {
        let mut state = loaded_state();
        let key = state.events.iter().find(|e| e.day == 1).unwrap().key();
        state
            .record_result("Team 1", &key, Duration::from_secs(200 * 60))
            .unwrap();
        state.record_drop(1001, &key, Duration::from_secs(10 * 60)).unwrap();
        state.recompute_result("Team 1", &key).unwrap();

        let table = score_table(&state);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].effective_participants, 17);
    }

    #[test]
    fn reassignment_table_orders_by_roster_number() {
        let mut state = loaded_state();
        assert!(reassignment_table(&state).is_empty());
        state.rebalance(10).unwrap();
        let rows = reassignment_table(&state);
        assert_eq!(rows.len(), 180);
        assert!(rows.windows(2).all(|w| w[0].roster_number < w[1].roster_number));
    }

    #[test]
    fn calibration_row_carries_solution() {
        let mut state = loaded_state();
        let key = state.events.iter().find(|e| e.day == 4).unwrap().key();
        let outcome = state
            .calibrate_event(&key, 0.3, &CalibrationMode::Weight)
            .unwrap();
        let row = calibration_row(&outcome);
        assert_eq!(row.event_name, key.name);
        assert!(row.new_equipment_weight.is_some());
        assert!(row.new_distance_km.is_none());
        assert!((row.resulting_score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn prediction_row_bands_probability() {
        let state = loaded_state();
        let key = state.events.iter().find(|e| e.day == 1).unwrap().key();
        let predictor = SuccessPredictor::logistic();
        let samples: Vec<TrainingSample> = (0..8)
            .map(|i| TrainingSample {
                features: FeatureVector {
                    actual_score: 0.02 * (i + 1) as f64,
                    of_ratio: 0.5,
                    day: 1.0,
                    heat_category: 1.0,
                },
                outcome: if i < 4 { Outcome::Success } else { Outcome::Failure },
            })
            .collect();
        let model = predictor.fit(&samples).unwrap();
        let row = prediction_row(&state, "Team 1", &key, &predictor, &model).unwrap();
        assert!((0.0..=1.0).contains(&row.success_probability));
        assert_eq!(
            row.recommendation,
            Recommendation::from_probability(row.success_probability)
        );
    }
}
