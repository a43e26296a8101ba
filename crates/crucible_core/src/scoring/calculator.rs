//! # Difficulty Score Formulas
//!
//! Difficulty = multiplier x (total weight / participants) x (distance / time)
//!
//! The initial score uses the event's planned participants and time limit;
//! the actual score substitutes the effective participant count (after
//! drops) and the measured completion time. Heat categories 4 and 5 scale
//! the result up.

use std::time::Duration;

use crate::error::{EngineError, Result};
use crate::models::Event;
use crate::scoring::ledger::{DropLedger, DropRecord};

/// Pure difficulty-score calculator.
///
/// All functions are side-effect free and cache nothing; recomputation
/// after a ledger or event change is the caller's responsibility.
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Heat-category scaling factor: categories 1-3 are neutral, 4 and 5
    /// scale difficulty up.
    pub fn temperature_multiplier(heat_category: u8) -> Result<f64> {
        match heat_category {
            1..=3 => Ok(1.0),
            4 => Ok(1.15),
            5 => Ok(1.3),
            other => Err(EngineError::InvalidHeatCategory { heat: other }),
        }
    }

    /// Planned difficulty, from the event's fixed parameters.
    pub fn initial_difficulty(event: &Event, total_weight: f64) -> Result<f64> {
        if event.initial_participants < 1 {
            return Err(EngineError::InvalidEventParameters {
                event: event.name.clone(),
                reason: "initial participants must be at least 1".to_string(),
            });
        }
        let time_limit = event.time_limit_secs();
        if time_limit <= 0.0 {
            return Err(EngineError::InvalidEventParameters {
                event: event.name.clone(),
                reason: "time limit must be positive".to_string(),
            });
        }
        let multiplier = Self::temperature_multiplier(event.heat_category)?;
        Ok(multiplier
            * (total_weight / event.initial_participants as f64)
            * (event.distance_km / time_limit))
    }

    /// Realized difficulty, substituting the post-drop participant count
    /// and the measured completion time.
    pub fn actual_difficulty(
        event: &Event,
        total_weight: f64,
        effective_participants: u32,
        actual_time: Duration,
    ) -> Result<f64> {
        if effective_participants < 1 {
            return Err(EngineError::AllParticipantsDropped {
                event: event.name.clone(),
            });
        }
        let seconds = actual_time.as_secs_f64();
        if seconds <= 0.0 {
            return Err(EngineError::InvalidActualTime {
                event: event.name.clone(),
                seconds,
            });
        }
        let multiplier = Self::temperature_multiplier(event.heat_category)?;
        Ok(multiplier
            * (total_weight / effective_participants as f64)
            * (event.distance_km / seconds))
    }

    /// Participants still in the event when it completed.
    ///
    /// A drop recorded exactly at completion time counts as not-dropped:
    /// only drops strictly before `actual_time` reduce the count.
    pub fn effective_participants(event: &Event, ledger: &DropLedger, actual_time: Duration) -> u32 {
        let dropped = Self::count_drops_before(ledger.drops_for_event(&event.key()), actual_time);
        event.initial_participants.saturating_sub(dropped as u32)
    }

    /// Shared boundary rule for drop counting (strictly-before).
    pub(crate) fn count_drops_before<'a>(
        drops: impl Iterator<Item = &'a DropRecord>,
        actual_time: Duration,
    ) -> usize {
        drops.filter(|r| r.drop_time < actual_time).count()
    }

    /// Duration-weighted average participant count over the event.
    ///
    /// Splits the run into segments between drops and averages the
    /// participant count over them. A reporting metric only; the actual
    /// difficulty formula uses the final count.
    pub fn time_weighted_participants(
        event: &Event,
        ledger: &DropLedger,
        actual_time: Duration,
    ) -> Result<f64> {
        let seconds = actual_time.as_secs_f64();
        if seconds <= 0.0 {
            return Err(EngineError::InvalidActualTime {
                event: event.name.clone(),
                seconds,
            });
        }
        let mut boundaries = vec![0.0];
        for record in ledger.drops_for_event(&event.key()) {
            if record.drop_time < actual_time {
                boundaries.push(record.drop_time.as_secs_f64());
            }
        }
        boundaries.push(seconds);

        let mut weighted = 0.0;
        for i in 0..boundaries.len() - 1 {
            let count = (event.initial_participants as f64 - i as f64).max(0.0);
            weighted += count * (boundaries[i + 1] - boundaries[i]);
        }
        Ok(weighted / seconds)
    }
}
