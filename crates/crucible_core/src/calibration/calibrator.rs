//! # Difficulty Calibrator
//!
//! Solves the difficulty formula backwards: given a target score for a
//! Day 3-4 event and the parameters being held fixed, find the new total
//! equipment weight and/or distance that hits the target. Equipment-level
//! weights are rescaled proportionally so the ratio between items is
//! preserved.
//!
//! The calibrator itself is pure compute; applying the outcome to an
//! event is a one-shot transition enforced by the state store.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{Event, EventKey};
use crate::scoring::ScoreCalculator;

/// Which parameter the operator chose to vary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CalibrationMode {
    /// Solve for total equipment weight, holding distance fixed.
    Weight,
    /// Solve for distance, holding equipment weight fixed.
    Distance,
    /// Vary both. `weight_share` in [0, 1] is the portion of the required
    /// multiplicative delta applied to weight; the rest goes to distance.
    /// There is no implied default - the split is always explicit.
    Combined { weight_share: f64 },
}

/// Solved parameter changes for one event, plus the score they produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOutcome {
    pub event: EventKey,
    pub new_total_weight: Option<f64>,
    /// Per-item weights after proportional rescaling, in equipment order.
    pub new_equipment_weights: Option<Vec<(String, f64)>>,
    pub new_distance_km: Option<f64>,
    pub resulting_score: f64,
}

pub struct DifficultyCalibrator;

impl DifficultyCalibrator {
    /// Day-3/4 target expressed as a multiplier on the Days 1-2 average
    /// actual score.
    pub fn target_from_average(avg_score: f64, target_multiplier: f64) -> f64 {
        avg_score * target_multiplier
    }

    /// Solve for the chosen parameter so the event's initial difficulty
    /// equals `target` when run by `effective_participants` people.
    pub fn solve(
        event: &Event,
        target: f64,
        effective_participants: u32,
        mode: &CalibrationMode,
    ) -> Result<CalibrationOutcome> {
        if effective_participants < 1 {
            return Err(EngineError::InfeasibleTarget {
                event: event.name.clone(),
                target,
                reason: "no participants remain for the event".to_string(),
            });
        }
        if !(target > 0.0) {
            return Err(EngineError::InfeasibleTarget {
                event: event.name.clone(),
                target,
                reason: "target score must be positive".to_string(),
            });
        }
        let multiplier = ScoreCalculator::temperature_multiplier(event.heat_category)?;
        let time_limit = event.time_limit_secs();
        if time_limit <= 0.0 {
            return Err(EngineError::InvalidEventParameters {
                event: event.name.clone(),
                reason: "time limit must be positive".to_string(),
            });
        }
        if !(event.distance_km > 0.0) {
            return Err(EngineError::InvalidEventParameters {
                event: event.name.clone(),
                reason: "distance must be positive".to_string(),
            });
        }
        let old_weight = event.total_weight();
        if !(old_weight > 0.0) {
            return Err(EngineError::InfeasibleTarget {
                event: event.name.clone(),
                target,
                reason: "event carries no equipment weight".to_string(),
            });
        }
        let participants = effective_participants as f64;

        let (new_weight, new_distance) = match mode {
            CalibrationMode::Weight => {
                let solved = target * participants * time_limit / (multiplier * event.distance_km);
                (Some(Self::feasible(event, target, solved, "weight")?), None)
            }
            CalibrationMode::Distance => {
                let solved = target * participants * time_limit / (multiplier * old_weight);
                (None, Some(Self::feasible(event, target, solved, "distance")?))
            }
            CalibrationMode::Combined { weight_share } => {
                if !(0.0..=1.0).contains(weight_share) {
                    return Err(EngineError::Validation {
                        field: "weight_share".to_string(),
                        message: format!("split ratio {} outside [0, 1]", weight_share),
                    });
                }
                let current = multiplier * (old_weight / participants)
                    * (event.distance_km / time_limit);
                let delta = target / current;
                let weight_factor = 1.0 + (delta - 1.0) * weight_share;
                let weight =
                    Self::feasible(event, target, old_weight * weight_factor, "weight")?;
                let distance = Self::feasible(
                    event,
                    target,
                    event.distance_km * (delta / weight_factor),
                    "distance",
                )?;
                (Some(weight), Some(distance))
            }
        };

        let solved_weight = new_weight.unwrap_or(old_weight);
        let solved_distance = new_distance.unwrap_or(event.distance_km);
        let resulting_score =
            multiplier * (solved_weight / participants) * (solved_distance / time_limit);

        let new_equipment_weights = new_weight.map(|total| {
            let factor = total / old_weight;
            event
                .equipment
                .iter()
                .map(|slot| (slot.equipment.name.clone(), slot.equipment.weight * factor))
                .collect()
        });

        Ok(CalibrationOutcome {
            event: event.key(),
            new_total_weight: new_weight,
            new_equipment_weights,
            new_distance_km: new_distance,
            resulting_score,
        })
    }

    /// Apply a solved outcome to the event, rescaling equipment weights
    /// proportionally. The one-shot discipline (apply at most once, and
    /// only before any Day 3-4 score exists) lives in the state store.
    pub fn apply(event: &mut Event, outcome: &CalibrationOutcome) -> Result<()> {
        if let Some(new_total) = outcome.new_total_weight {
            let old_total = event.total_weight();
            if !(old_total > 0.0) {
                return Err(EngineError::InvalidEventParameters {
                    event: event.name.clone(),
                    reason: "cannot rescale an event with no equipment weight".to_string(),
                });
            }
            let factor = new_total / old_total;
            for slot in &mut event.equipment {
                slot.equipment.weight *= factor;
            }
        }
        if let Some(distance) = outcome.new_distance_km {
            event.distance_km = distance;
        }
        Ok(())
    }

    fn feasible(event: &Event, target: f64, solved: f64, what: &str) -> Result<f64> {
        if solved.is_finite() && solved > 0.0 {
            Ok(solved)
        } else {
            Err(EngineError::InfeasibleTarget {
                event: event.name.clone(),
                target,
                reason: format!("solved {} {} is not positive", what, solved),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Equipment, EquipmentSlot};
    use std::time::Duration;

    fn event(weight_items: &[(&str, f64, u32)], distance: f64, limit_secs: u64, heat: u8) -> Event {
        Event {
            name: "RED DOT APP".to_string(),
            day: 3,
            event_number: 1,
            equipment: weight_items
                .iter()
                .map(|(name, weight, count)| EquipmentSlot {
                    equipment: Equipment {
                        name: name.to_string(),
                        weight: *weight,
                    },
                    count: *count,
                })
                .collect(),
            time_limit: Duration::from_secs(limit_secs),
            initial_participants: 10,
            distance_km: distance,
            heat_category: heat,
        }
    }

    #[test]
    fn weight_mode_reference_scenario() {
        // target 0.15, distance 5, limit 1800 s, 10 participants, mult 1.0
        // -> new total weight = 0.15 x 10 x 1800 / 5 = 540
        let event = event(&[("RED DOT LOG", 30.0, 10)], 5.0, 1800, 2);
        let outcome =
            DifficultyCalibrator::solve(&event, 0.15, 10, &CalibrationMode::Weight).unwrap();
        let total = outcome.new_total_weight.unwrap();
        assert!((total - 540.0).abs() < 1e-9, "got {}", total);
        assert!(outcome.new_distance_km.is_none());
    }

    #[test]
    fn weight_mode_round_trip() {
        let mut event = event(&[("AMMO CAN", 120.0, 4), ("TIRE", 10.0, 4)], 7.0, 185 * 60, 4);
        let target = 0.09;
        let outcome =
            DifficultyCalibrator::solve(&event, target, 10, &CalibrationMode::Weight).unwrap();
        DifficultyCalibrator::apply(&mut event, &outcome).unwrap();
        let score = ScoreCalculator::initial_difficulty(&event, event.total_weight()).unwrap();
        assert!(
            ((score - target) / target).abs() < 1e-6,
            "round trip {} != {}",
            score,
            target
        );
    }

    #[test]
    fn weight_mode_preserves_equipment_ratios() {
        let mut event = event(&[("AMMO CAN", 120.0, 4), ("TIRE", 10.0, 4)], 7.0, 185 * 60, 2);
        let before = event.equipment[0].equipment.weight / event.equipment[1].equipment.weight;
        let outcome =
            DifficultyCalibrator::solve(&event, 0.2, 18, &CalibrationMode::Weight).unwrap();
        DifficultyCalibrator::apply(&mut event, &outcome).unwrap();
        let after = event.equipment[0].equipment.weight / event.equipment[1].equipment.weight;
        assert!((before - after).abs() < 1e-9);
        let total: f64 = event.total_weight();
        assert!((total - outcome.new_total_weight.unwrap()).abs() < 1e-9);
    }

    #[test]
    fn distance_mode_round_trip() {
        let mut event = event(&[("WATER DRUM", 265.0, 2)], 4.7, 225 * 60, 5);
        let target = 0.05;
        let outcome =
            DifficultyCalibrator::solve(&event, target, 18, &CalibrationMode::Distance).unwrap();
        event.initial_participants = 18;
        DifficultyCalibrator::apply(&mut event, &outcome).unwrap();
        assert!(outcome.new_total_weight.is_none());
        let score = ScoreCalculator::initial_difficulty(&event, event.total_weight()).unwrap();
        assert!(((score - target) / target).abs() < 1e-6);
    }

    #[test]
    fn combined_mode_splits_delta() {
        let mut event = event(&[("PAIL", 35.0, 27)], 7.22, 270 * 60, 2);
        event.initial_participants = 18;
        let target = 0.1;
        let outcome = DifficultyCalibrator::solve(
            &event,
            target,
            18,
            &CalibrationMode::Combined { weight_share: 0.5 },
        )
        .unwrap();
        assert!(outcome.new_total_weight.is_some());
        assert!(outcome.new_distance_km.is_some());
        DifficultyCalibrator::apply(&mut event, &outcome).unwrap();
        let score = ScoreCalculator::initial_difficulty(&event, event.total_weight()).unwrap();
        assert!(((score - target) / target).abs() < 1e-6, "got {}", score);
    }

    #[test]
    fn combined_mode_requires_explicit_share_in_range() {
        let event = event(&[("PAIL", 35.0, 27)], 7.22, 270 * 60, 2);
        let err = DifficultyCalibrator::solve(
            &event,
            0.1,
            18,
            &CalibrationMode::Combined { weight_share: 1.5 },
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
    }

    #[test]
    fn zero_participants_is_infeasible() {
        let event = event(&[("RUCK", 65.0, 1)], 3.8, 330 * 60, 2);
        let err =
            DifficultyCalibrator::solve(&event, 0.1, 0, &CalibrationMode::Weight).unwrap_err();
        assert!(matches!(err, EngineError::InfeasibleTarget { .. }));
    }

    #[test]
    fn non_positive_target_is_infeasible() {
        let event = event(&[("RUCK", 65.0, 1)], 3.8, 330 * 60, 2);
        let err =
            DifficultyCalibrator::solve(&event, 0.0, 18, &CalibrationMode::Distance).unwrap_err();
        assert!(matches!(err, EngineError::InfeasibleTarget { .. }));
    }

    #[test]
    fn target_from_average_multiplies() {
        let target = DifficultyCalibrator::target_from_average(0.08, 1.25);
        assert!((target - 0.1).abs() < 1e-12);
    }
}
